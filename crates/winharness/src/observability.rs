//! Process-wide counters for close fallbacks.

use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::Lazy;
use tracing::info;

use crate::ops::ElementRef;

static NATIVE_CLOSE_FALLBACKS: Lazy<AtomicUsize> = Lazy::new(|| AtomicUsize::new(0));
static CLOSE_RETRIES: Lazy<AtomicUsize> = Lazy::new(|| AtomicUsize::new(0));

pub(crate) fn record_native_close_fallback(element: ElementRef) {
    let count = NATIVE_CLOSE_FALLBACKS.fetch_add(1, Ordering::SeqCst) + 1;
    info!(
        target: "winharness::fallback",
        element = %element,
        count,
        "Title-bar close failed; used the native close command"
    );
}

pub(crate) fn record_close_retry(element: ElementRef) {
    let count = CLOSE_RETRIES.fetch_add(1, Ordering::SeqCst) + 1;
    info!(
        target: "winharness::fallback",
        element = %element,
        count,
        "Element vanished during close; retried the native close command"
    );
}

/// Number of closes that fell back from the title bar to the native command.
pub fn native_close_fallback_count() -> usize {
    NATIVE_CLOSE_FALLBACKS.load(Ordering::SeqCst)
}

/// Number of closes that needed the delayed retry.
pub fn close_retry_count() -> usize {
    CLOSE_RETRIES.load(Ordering::SeqCst)
}

/// Zero both counters.
pub fn reset_close_counters() {
    NATIVE_CLOSE_FALLBACKS.store(0, Ordering::SeqCst);
    CLOSE_RETRIES.store(0, Ordering::SeqCst);
}

//! Smoketest cases, each scripted against an in-memory desktop.
pub mod close;
pub mod display;
pub mod lifecycle;
pub mod readiness;
pub mod support;

//! The collaborator bundle handed to every window.

use std::sync::Arc;

use crate::ops::{Accessibility, PointerService, ProcessService, SessionRegistry, WindowCommands};

/// Groups the collaborators a window talks to so construction sites pass one
/// value instead of five.
#[derive(Clone)]
pub struct Services {
    /// Element tree, attributes and events.
    pub accessibility: Arc<dyn Accessibility>,
    /// Native window commands.
    pub commands: Arc<dyn WindowCommands>,
    /// Owning-process queries.
    pub process: Arc<dyn ProcessService>,
    /// Pointer cursor and nudges.
    pub pointer: Arc<dyn PointerService>,
    /// Session-wide window bookkeeping.
    pub session: Arc<dyn SessionRegistry>,
}

impl Services {
    /// Use one provider object for every collaborator role.
    pub fn from_provider<P>(provider: Arc<P>) -> Self
    where
        P: Accessibility
            + WindowCommands
            + ProcessService
            + PointerService
            + SessionRegistry
            + 'static,
    {
        Self {
            accessibility: provider.clone(),
            commands: provider.clone(),
            process: provider.clone(),
            pointer: provider.clone(),
            session: provider,
        }
    }
}

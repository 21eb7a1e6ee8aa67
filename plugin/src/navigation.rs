use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::host::Navigator;
use crate::model::NavigationAnchor;

/// Single-slot memory of where to send the user back to.
///
/// Last write wins and `restore` does not consume the slot, so every pending
/// restore goes to whatever anchor was remembered most recently.
pub struct NavigationMemory {
    navigator: Arc<dyn Navigator>,
    anchor: Mutex<Option<NavigationAnchor>>,
}

impl NavigationMemory {
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self {
            navigator,
            anchor: Mutex::new(None),
        }
    }

    pub fn remember(&self, anchor: Option<NavigationAnchor>) {
        *self.anchor.lock().unwrap_or_else(PoisonError::into_inner) = anchor;
    }

    pub fn current(&self) -> Option<NavigationAnchor> {
        self.anchor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Navigate to the remembered anchor, if any.
    pub fn restore(&self) {
        match self.current() {
            Some(anchor) => self.navigator.transition_to(&anchor.path()),
            None => debug!("no anchor remembered, staying put"),
        }
    }
}

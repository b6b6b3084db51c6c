//! In-process stand-ins for the hosted backend, used for local development
//! (`WEATHERPREDICT_BACKEND=memory`) and as test doubles.

use std::sync::Mutex;

pub mod auth;
pub mod events;
pub mod predictions;

pub use auth::InMemoryAuthenticationService;
pub use events::InMemoryEventRepository;
pub use predictions::InMemoryPredictionRepository;

/// A storage error to return from the next calls of one operation, until
/// cleared.
#[derive(Default)]
pub(crate) struct FailureSwitch {
    message: Mutex<Option<String>>,
}

impl FailureSwitch {
    pub(crate) fn set(&self, message: Option<&str>) {
        *self.message.lock().unwrap_or_else(|e| e.into_inner()) = message.map(str::to_string);
    }

    pub(crate) fn check(&self) -> Option<String> {
        self.message
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

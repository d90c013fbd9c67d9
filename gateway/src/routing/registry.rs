//! Keyed handler registry backing the typed sub-routers.

use std::collections::HashMap;

use thiserror::Error;

use crate::handler::Handler;
use crate::interaction::InteractionKind;

/// Errors returned while wiring handlers into the dispatch tree.
///
/// These are startup-time configuration mistakes. They are surfaced as
/// typed errors so misconfigurations fail the deploy immediately instead of
/// silently shadowing a handler.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistrationError {
    /// A handler is already registered under this key.
    #[error("a handler is already registered for key `{0}`")]
    DuplicateKey(String),

    /// The slot for this interaction kind already holds a handler that the
    /// requested operation would silently override.
    #[error("the {0} interaction slot already holds a handler")]
    SlotOccupied(InteractionKind),
}

/// Append-only mapping from routing key to handler.
///
/// Keys are unique: once registered, a key is never overwritten.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Box<dyn Handler>>,
}

impl HandlerRegistry {
    /// Register a handler under the given key.
    ///
    /// Returns [`RegistrationError::DuplicateKey`] if the key is taken.
    pub fn register(
        &mut self,
        key: impl Into<String>,
        handler: impl Handler + 'static,
    ) -> Result<(), RegistrationError> {
        let key = key.into();
        if self.handlers.contains_key(&key) {
            return Err(RegistrationError::DuplicateKey(key));
        }
        self.handlers.insert(key, Box::new(handler));
        Ok(())
    }

    /// Look up the handler registered under the given key.
    pub fn lookup(&self, key: &str) -> Option<&dyn Handler> {
        self.handlers.get(key).map(|h| h.as_ref())
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no keys are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

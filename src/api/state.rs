//! Application state for the fee engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::store::DataStore;

/// Shared application state.
///
/// Holds the storage backend behind a trait object so the handlers stay
/// agnostic of the concrete store.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn DataStore>,
}

impl AppState {
    /// Creates a new application state backed by the given store.
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Returns a reference to the storage backend.
    pub fn store(&self) -> &dyn DataStore {
        self.store.as_ref()
    }
}

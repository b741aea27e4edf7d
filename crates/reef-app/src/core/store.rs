//! # Store Handle
//!
//! Shared, clonable handle to the [`ViewState`]. Dispatches take the
//! write lock for the whole reduction, so events apply one at a time and
//! readers always observe a complete state: the single-threaded
//! event-loop model, without pinning callers to one thread.

use std::sync::Arc;

use async_lock::RwLock;

use super::{reduce, StoreEvent, ViewState};

/// Shared handle to the data-layer state.
#[derive(Debug, Clone, Default)]
pub struct Store {
    state: Arc<RwLock<ViewState>>,
}

impl Store {
    /// Create a store with empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with an existing state.
    pub fn with_state(state: ViewState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Apply one event.
    pub async fn dispatch(&self, event: StoreEvent) {
        let mut state = self.state.write().await;
        reduce(&mut state, event);
    }

    /// Apply a batch of events atomically; no reader or other dispatch
    /// observes a point between them.
    pub async fn dispatch_all(&self, events: impl IntoIterator<Item = StoreEvent>) {
        let mut state = self.state.write().await;
        for event in events {
            reduce(&mut state, event);
        }
    }

    /// Read from the state without cloning it.
    pub async fn read<T>(&self, f: impl FnOnce(&ViewState) -> T) -> T {
        let state = self.state.read().await;
        f(&state)
    }

    /// Run a read-modify-write step atomically.
    ///
    /// The mutation workflows use this to capture their rollback snapshot
    /// and apply the optimistic update in one step, so a concurrent
    /// workflow can never slip between the two.
    pub async fn update<T>(&self, f: impl FnOnce(&mut ViewState) -> T) -> T {
        let mut state = self.state.write().await;
        f(&mut state)
    }

    /// Clone the current state. Cheap, since slices share their maps.
    pub async fn snapshot(&self) -> ViewState {
        self.state.read().await.clone()
    }
}

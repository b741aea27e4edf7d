//! # Core Store Module
//!
//! The event-driven heart of the data layer:
//!
//! - [`StoreEvent`]: every state change, as a closed enum
//! - [`reduce`]: applies one event to a [`ViewState`]
//! - [`Store`]: the shared handle that serializes dispatches
//!
//! ```text
//! StoreEvent → reduce → ViewState
//! ```

mod event;
mod reducer;
mod state;
mod store;

pub use event::StoreEvent;
pub use reducer::reduce;
pub use state::ViewState;
pub use store::Store;

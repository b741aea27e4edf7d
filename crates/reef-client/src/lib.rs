//! # Reef Client
//!
//! REST bindings for the Reef data layer: route builders for the
//! category and preference endpoints plus a `reqwest`-backed
//! [`RestClient`] implementing the effect traits from
//! [`reef_app::effects`]. The JSON shapes on the wire come straight from
//! the serde derives in `reef-app`, so they stay byte-for-byte
//! compatible with the server.

mod rest;
pub mod routes;

pub use rest::RestClient;

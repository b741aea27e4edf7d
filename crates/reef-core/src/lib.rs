//! # Reef Core
//!
//! Foundation types shared across the Reef data layer: typed identifiers
//! for server entities and the direct-channel name encoding.
//!
//! This crate is pure: no I/O and no runtime dependencies. Everything that
//! talks to a server or holds mutable state lives in the crates above it.

mod identifiers;

pub use identifiers::{
    direct_channel_name, CategoryId, ChannelId, TeamId, UserId, MILLIS_PER_DAY,
};

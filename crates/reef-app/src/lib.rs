//! # Reef App
//!
//! Headless data layer for the Reef team-messaging client. This crate
//! owns the normalized local cache of server entities and everything
//! derived from it:
//!
//! - [`views`]: the entity-store slices (channels, users, preferences,
//!   posts) and the category store, each copy-on-write behind `Arc` so
//!   unchanged slices keep their allocation across reducer steps.
//! - [`core`]: the closed [`StoreEvent`](core::StoreEvent) enum, the
//!   reducer that applies it, and the [`Store`](core::Store) handle that
//!   serializes dispatches.
//! - [`sidebar`]: the channel derivation pipeline, the memoized filter
//!   and sort chain that computes which channels appear in which sidebar
//!   category, in what order.
//! - [`workflows`]: optimistic mutation commands (category CRUD and
//!   preference writes) that dispatch locally, round-trip the server
//!   through the [`effects`] traits, and roll back a scoped snapshot on
//!   failure.
//!
//! ```text
//! server event -> StoreEvent -> reduce -> ViewState -> sidebar queries -> UI
//!                     ^                                      |
//!                 workflows  <------- user action <----------+
//! ```

pub mod core;
pub mod effects;
pub mod errors;
pub mod sidebar;
pub mod views;
pub mod workflows;

pub use crate::core::{reduce, Store, StoreEvent, ViewState};
pub use crate::errors::AppError;
pub use crate::views::{
    CategoriesState, CategorySorting, CategoryType, Channel, ChannelCategory, ChannelType,
    ChannelsState, MyChannelMember, PostsState, Preference, PreferencesState, SidebarConfig,
    UserProfile, UsersState,
};

//! # View State

use serde::{Deserialize, Serialize};

use crate::views::{
    CategoriesState, ChannelsState, PostsState, PreferencesState, SidebarConfig, UsersState,
};

/// The complete normalized state of the data layer.
///
/// One instance lives behind the [`Store`](crate::core::Store) lock; the
/// reducer is the only writer. Cloning is cheap; every slice holds its
/// maps behind `Arc`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewState {
    /// Channels, memberships, and the open channel
    pub channels: ChannelsState,
    /// User profiles and the logged-in user
    pub users: UsersState,
    /// Flat per-user preference map
    pub preferences: PreferencesState,
    /// Per-channel recent-post timestamps
    pub posts: PostsState,
    /// Categories and their per-team ordering
    pub categories: CategoriesState,
    /// Server-driven sidebar knobs
    pub config: SidebarConfig,
}

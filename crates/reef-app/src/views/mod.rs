//! # View State Module
//!
//! The normalized state slices the data layer maintains. Each slice keeps
//! its maps behind [`std::sync::Arc`] and swaps the `Arc` only when the
//! contents actually change, so the sidebar queries can detect "nothing I
//! read has changed" by pointer identity alone.
//!
//! Slices are written exclusively by the reducer in [`crate::core`]; the
//! rest of the crate reads them.

pub mod categories;
pub mod channels;
pub mod config;
pub mod posts;
pub mod preferences;
pub mod users;

pub use categories::{CategoriesState, CategorySorting, CategoryType, ChannelCategory};
pub use channels::{Channel, ChannelType, ChannelsState, MyChannelMember};
pub use config::SidebarConfig;
pub use posts::PostsState;
pub use preferences::{Preference, PreferencesState};
pub use users::{UserProfile, UsersState};

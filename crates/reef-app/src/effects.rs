//! # Server Effects
//!
//! Dependency-inversion seam between the mutation workflows and the
//! transport. The workflows call these traits; `reef-client` implements
//! them over REST, and tests implement them with scripted fakes. Nothing
//! in this crate touches the network directly.

use async_trait::async_trait;
use thiserror::Error;

use reef_core::{CategoryId, TeamId, UserId};

use crate::views::{ChannelCategory, Preference};

/// Failure of a server round-trip.
#[derive(Debug, Clone, Error)]
pub enum EffectError {
    /// The server answered with a non-success status.
    #[error("server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Server-provided message, possibly empty
        message: String,
    },

    /// The request never completed.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Category CRUD against the server.
#[async_trait]
pub trait CategoryEffects: Send + Sync {
    /// Create a category; the server assigns the real id.
    async fn create_category(
        &self,
        user_id: &UserId,
        team_id: &TeamId,
        category: &ChannelCategory,
    ) -> Result<ChannelCategory, EffectError>;

    /// Replace one category record.
    async fn update_category(
        &self,
        user_id: &UserId,
        team_id: &TeamId,
        category: &ChannelCategory,
    ) -> Result<ChannelCategory, EffectError>;

    /// Replace a batch of category records in one call.
    async fn update_categories(
        &self,
        user_id: &UserId,
        team_id: &TeamId,
        categories: &[ChannelCategory],
    ) -> Result<Vec<ChannelCategory>, EffectError>;

    /// Delete a category.
    async fn delete_category(
        &self,
        user_id: &UserId,
        team_id: &TeamId,
        category_id: &CategoryId,
    ) -> Result<(), EffectError>;

    /// Replace a team's category order.
    async fn update_category_order(
        &self,
        user_id: &UserId,
        team_id: &TeamId,
        order: &[CategoryId],
    ) -> Result<Vec<CategoryId>, EffectError>;
}

/// Umbrella for transports that implement every server effect.
///
/// Workflows that touch both categories and preferences (moving a
/// channel into Favorites) take this; everything else takes the narrow
/// trait it needs.
pub trait ServerEffects: CategoryEffects + PreferenceEffects {}

impl<T: CategoryEffects + PreferenceEffects + ?Sized> ServerEffects for T {}

/// Preference writes against the server.
#[async_trait]
pub trait PreferenceEffects: Send + Sync {
    /// Save a batch of preference entries.
    async fn save_preferences(
        &self,
        user_id: &UserId,
        preferences: &[Preference],
    ) -> Result<(), EffectError>;

    /// Delete a batch of preference entries.
    async fn delete_preferences(
        &self,
        user_id: &UserId,
        preferences: &[Preference],
    ) -> Result<(), EffectError>;
}

//! API route builders.
//!
//! Paths only; the host half lives in [`crate::RestClient`].

use reef_core::{CategoryId, TeamId, UserId};

/// A user's sidebar categories for one team.
pub fn categories(user_id: &UserId, team_id: &TeamId) -> String {
    format!(
        "/api/v4/users/{}/teams/{}/channels/categories",
        user_id.as_str(),
        team_id.as_str()
    )
}

/// One sidebar category.
pub fn category(user_id: &UserId, team_id: &TeamId, category_id: &CategoryId) -> String {
    format!("{}/{}", categories(user_id, team_id), category_id.as_str())
}

/// A team's category order.
pub fn categories_order(user_id: &UserId, team_id: &TeamId) -> String {
    format!("{}/order", categories(user_id, team_id))
}

/// A user's preferences.
pub fn preferences(user_id: &UserId) -> String {
    format!("/api/v4/users/{}/preferences", user_id.as_str())
}

/// Preference deletion endpoint.
pub fn preferences_delete(user_id: &UserId) -> String {
    format!("{}/delete", preferences(user_id))
}

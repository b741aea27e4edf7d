//! # Users View State

use reef_core::UserId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// A user profile as received from the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User identifier
    pub id: UserId,
    /// Login name
    #[serde(default)]
    pub username: String,
    /// Optional nickname
    #[serde(default)]
    pub nickname: String,
    /// Given name
    #[serde(default)]
    pub first_name: String,
    /// Family name
    #[serde(default)]
    pub last_name: String,
    /// Deactivation timestamp (ms); zero while the account is active
    #[serde(default)]
    pub delete_at: i64,
}

impl UserProfile {
    /// Whether the account has been deactivated.
    pub fn is_deactivated(&self) -> bool {
        self.delete_at > 0
    }

    /// Name shown for this user: nickname, else full name, else username.
    pub fn display_name(&self) -> String {
        if !self.nickname.is_empty() {
            return self.nickname.clone();
        }
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if !full.is_empty() {
            return full.to_string();
        }
        self.username.clone()
    }
}

/// Users slice of the entity store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsersState {
    profiles: Arc<HashMap<UserId, UserProfile>>,
    current_user_id: UserId,
}

impl UsersState {
    /// Get a profile by id.
    pub fn profile(&self, id: &UserId) -> Option<&UserProfile> {
        self.profiles.get(id)
    }

    /// The logged-in user's id. Empty before login.
    pub fn current_user_id(&self) -> &UserId {
        &self.current_user_id
    }

    /// Merge a batch of profiles.
    pub fn apply_profiles(&mut self, profiles: impl IntoIterator<Item = UserProfile>) {
        let map = Arc::make_mut(&mut self.profiles);
        for profile in profiles {
            map.insert(profile.id.clone(), profile);
        }
    }

    /// Record the logged-in user.
    pub fn set_current_user(&mut self, id: UserId) {
        self.current_user_id = id;
    }

    /// Reset to empty (logout).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn profiles_arc(&self) -> &Arc<HashMap<UserId, UserProfile>> {
        &self.profiles
    }
}

//! # Preferences View State
//!
//! Flat per-user settings keyed `category--name`. The sidebar pipeline
//! reads favorites, DM/GM visibility, auto-close opt-out, and per-channel
//! open timestamps from here.

use reef_core::{ChannelId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Well-known preference categories.
pub mod categories {
    /// Marks a channel as favorite; `name` is the channel id.
    pub const FAVORITE_CHANNEL: &str = "favorite_channel";
    /// Direct-conversation visibility; `name` is the counterpart user id.
    pub const DIRECT_CHANNEL_SHOW: &str = "direct_channel_show";
    /// Group-conversation visibility; `name` is the channel id.
    pub const GROUP_CHANNEL_SHOW: &str = "group_channel_show";
    /// Sidebar behavior settings.
    pub const SIDEBAR_SETTINGS: &str = "sidebar_settings";
    /// Per-channel last-opened timestamps; `name` is the channel id.
    pub const CHANNEL_OPEN_TIME: &str = "channel_open_time";
}

/// Well-known preference names.
pub mod names {
    /// Opt-out switch for hiding stale DMs/GMs automatically.
    pub const CLOSE_UNUSED_DIRECT_MESSAGES: &str = "close_unused_direct_messages";
}

/// A single preference entry, wire-shaped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    /// Owning user
    pub user_id: UserId,
    /// Preference category
    pub category: String,
    /// Preference name (often an entity id)
    pub name: String,
    /// Preference value
    pub value: String,
}

fn pref_key(category: &str, name: &str) -> String {
    format!("{category}--{name}")
}

/// Preferences slice of the entity store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferencesState {
    prefs: Arc<HashMap<String, Preference>>,
}

impl PreferencesState {
    /// Look up a preference entry.
    pub fn get(&self, category: &str, name: &str) -> Option<&Preference> {
        self.prefs.get(&pref_key(category, name))
    }

    /// Look up a preference value.
    pub fn value(&self, category: &str, name: &str) -> Option<&str> {
        self.get(category, name).map(|p| p.value.as_str())
    }

    /// Whether a preference is present with a truthy value
    /// (anything except empty or `"false"`).
    pub fn is_truthy(&self, category: &str, name: &str) -> bool {
        self.value(category, name)
            .is_some_and(|v| !v.is_empty() && v != "false")
    }

    /// Whether a channel carries the favorite marker.
    pub fn is_favorite_channel(&self, id: &ChannelId) -> bool {
        self.is_truthy(categories::FAVORITE_CHANNEL, id.as_str())
    }

    /// Whether the user has the stale-DM auto-close behavior enabled.
    ///
    /// Opt-out model: enabled unless explicitly set to `"false"`.
    pub fn autoclose_dms_enabled(&self) -> bool {
        self.value(
            categories::SIDEBAR_SETTINGS,
            names::CLOSE_UNUSED_DIRECT_MESSAGES,
        ) != Some("false")
    }

    /// When a channel was last explicitly opened, if recorded.
    pub fn channel_open_time(&self, id: &ChannelId) -> Option<i64> {
        self.value(categories::CHANNEL_OPEN_TIME, id.as_str())
            .and_then(|v| v.parse().ok())
    }

    /// Merge a batch of preference entries.
    pub fn apply(&mut self, prefs: impl IntoIterator<Item = Preference>) {
        let map = Arc::make_mut(&mut self.prefs);
        for pref in prefs {
            map.insert(pref_key(&pref.category, &pref.name), pref);
        }
    }

    /// Delete a batch of preference entries (matched by category + name).
    pub fn delete(&mut self, prefs: impl IntoIterator<Item = Preference>) {
        // Collect keys first so an empty batch leaves the Arc untouched.
        let keys: Vec<String> = prefs
            .into_iter()
            .map(|p| pref_key(&p.category, &p.name))
            .filter(|k| self.prefs.contains_key(k))
            .collect();
        if keys.is_empty() {
            return;
        }
        let map = Arc::make_mut(&mut self.prefs);
        for key in keys {
            map.remove(&key);
        }
    }

    /// Reset to empty (logout).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn prefs_arc(&self) -> &Arc<HashMap<String, Preference>> {
        &self.prefs
    }
}

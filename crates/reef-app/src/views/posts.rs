//! # Posts View State
//!
//! The data layer does not cache post bodies; the sidebar only needs to
//! know how recently each channel saw a loaded post, so this slice keeps
//! one timestamp per channel.

use reef_core::ChannelId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Recent-post-activity slice of the entity store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostsState {
    most_recent_post_at: Arc<HashMap<ChannelId, i64>>,
}

impl PostsState {
    /// Timestamp of the newest loaded post in a channel, if any.
    pub fn most_recent_post_at(&self, id: &ChannelId) -> Option<i64> {
        self.most_recent_post_at.get(id).copied()
    }

    /// Record a loaded post; keeps only the newest timestamp per channel.
    pub fn apply_post(&mut self, id: ChannelId, create_at: i64) {
        let current = self.most_recent_post_at.get(&id).copied().unwrap_or(0);
        if create_at <= current {
            return;
        }
        Arc::make_mut(&mut self.most_recent_post_at).insert(id, create_at);
    }

    /// Drop a channel's record (leave/delete events).
    pub fn remove_channel(&mut self, id: &ChannelId) {
        if self.most_recent_post_at.contains_key(id) {
            Arc::make_mut(&mut self.most_recent_post_at).remove(id);
        }
    }

    /// Reset to empty (logout).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn posts_arc(&self) -> &Arc<HashMap<ChannelId, i64>> {
        &self.most_recent_post_at
    }
}

//! # Channels View State

use reef_core::{ChannelId, TeamId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Channel type, with the server's single-letter wire encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ChannelType {
    /// Open (public) channel
    #[default]
    #[serde(rename = "O")]
    Open,
    /// Private channel
    #[serde(rename = "P")]
    Private,
    /// 1:1 direct message channel (team-agnostic)
    #[serde(rename = "D")]
    Direct,
    /// Multi-user group message channel (team-agnostic)
    #[serde(rename = "G")]
    Group,
}

impl ChannelType {
    /// Whether this is a direct or group conversation.
    pub fn is_direct_or_group(&self) -> bool {
        matches!(self, Self::Direct | Self::Group)
    }
}

/// A channel as received from the server.
///
/// Serde derives preserve the wire field names exactly; this shape must
/// stay byte-for-byte compatible with the server JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel identifier
    pub id: ChannelId,
    /// Owning team; empty for direct/group channels
    #[serde(default)]
    pub team_id: TeamId,
    /// Channel type
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    /// Human-readable name shown in the sidebar
    #[serde(default)]
    pub display_name: String,
    /// URL slug; for direct channels this encodes `idA__idB` (sorted)
    #[serde(default)]
    pub name: String,
    /// Total messages ever posted, for unread arithmetic
    #[serde(default)]
    pub total_msg_count: i64,
    /// Deletion timestamp (ms); zero while the channel is live
    #[serde(default)]
    pub delete_at: i64,
    /// Timestamp of the newest post (ms)
    #[serde(default)]
    pub last_post_at: i64,
}

impl Channel {
    /// Whether this is a direct or group conversation.
    pub fn is_direct_or_group(&self) -> bool {
        self.channel_type.is_direct_or_group()
    }

    /// The other participant of a direct channel, decoded from `name`.
    ///
    /// `None` for non-direct channels or when the name is malformed.
    pub fn counterpart(&self, me: &UserId) -> Option<UserId> {
        if self.channel_type != ChannelType::Direct {
            return None;
        }
        ChannelId::counterpart_in_name(&self.name, me)
    }
}

/// The current user's membership in one channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MyChannelMember {
    /// Channel this membership belongs to
    pub channel_id: ChannelId,
    /// Messages seen at last read, for unread arithmetic
    #[serde(default)]
    pub msg_count: i64,
    /// Unread mentions
    #[serde(default)]
    pub mention_count: i64,
    /// When the channel was last viewed (ms)
    #[serde(default)]
    pub last_viewed_at: i64,
}

/// Channels slice of the entity store.
///
/// Holds the channel records, the current user's memberships, known
/// group-channel member sets, and which channel is currently open.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelsState {
    channels: Arc<HashMap<ChannelId, Channel>>,
    members: Arc<HashMap<ChannelId, MyChannelMember>>,
    group_members: Arc<HashMap<ChannelId, BTreeSet<UserId>>>,
    current_channel_id: Option<ChannelId>,
}

impl ChannelsState {
    /// Get a channel by id.
    pub fn channel(&self, id: &ChannelId) -> Option<&Channel> {
        self.channels.get(id)
    }

    /// Get the current user's membership in a channel.
    pub fn member(&self, id: &ChannelId) -> Option<&MyChannelMember> {
        self.members.get(id)
    }

    /// Member user ids of a group channel, when known.
    pub fn group_members(&self, id: &ChannelId) -> Option<&BTreeSet<UserId>> {
        self.group_members.get(id)
    }

    /// The channel currently open in the UI, if any.
    pub fn current_channel_id(&self) -> Option<&ChannelId> {
        self.current_channel_id.as_ref()
    }

    /// Whether a channel has unread activity for the current user.
    ///
    /// A channel without a membership record is never unread.
    pub fn is_unread(&self, channel: &Channel) -> bool {
        match self.members.get(&channel.id) {
            Some(member) => {
                member.mention_count > 0 || channel.total_msg_count - member.msg_count > 0
            }
            None => false,
        }
    }

    /// Merge one channel record.
    pub fn apply_channel(&mut self, channel: Channel) {
        Arc::make_mut(&mut self.channels).insert(channel.id.clone(), channel);
    }

    /// Merge a batch of channel records.
    pub fn apply_channels(&mut self, channels: impl IntoIterator<Item = Channel>) {
        let map = Arc::make_mut(&mut self.channels);
        for channel in channels {
            map.insert(channel.id.clone(), channel);
        }
    }

    /// Merge a membership record.
    pub fn apply_member(&mut self, member: MyChannelMember) {
        Arc::make_mut(&mut self.members).insert(member.channel_id.clone(), member);
    }

    /// Record the member set of a group channel.
    pub fn set_group_members(&mut self, id: ChannelId, members: BTreeSet<UserId>) {
        Arc::make_mut(&mut self.group_members).insert(id, members);
    }

    /// Drop a channel and its membership (leave/delete events only).
    pub fn remove_channel(&mut self, id: &ChannelId) {
        if self.channels.contains_key(id) {
            Arc::make_mut(&mut self.channels).remove(id);
        }
        if self.members.contains_key(id) {
            Arc::make_mut(&mut self.members).remove(id);
        }
        if self.group_members.contains_key(id) {
            Arc::make_mut(&mut self.group_members).remove(id);
        }
        if self.current_channel_id.as_ref() == Some(id) {
            self.current_channel_id = None;
        }
    }

    /// Record which channel the UI has open.
    pub fn set_current_channel(&mut self, id: Option<ChannelId>) {
        self.current_channel_id = id;
    }

    /// Bump a channel's `last_post_at` when a newer post arrives.
    pub fn touch_last_post_at(&mut self, id: &ChannelId, create_at: i64) {
        let newer = self
            .channels
            .get(id)
            .is_some_and(|c| c.last_post_at < create_at);
        if newer {
            if let Some(channel) = Arc::make_mut(&mut self.channels).get_mut(id) {
                channel.last_post_at = create_at;
            }
        }
    }

    /// Reset to empty (logout).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn channels_arc(&self) -> &Arc<HashMap<ChannelId, Channel>> {
        &self.channels
    }

    pub(crate) fn members_arc(&self) -> &Arc<HashMap<ChannelId, MyChannelMember>> {
        &self.members
    }

    pub(crate) fn group_members_arc(&self) -> &Arc<HashMap<ChannelId, BTreeSet<UserId>>> {
        &self.group_members
    }
}

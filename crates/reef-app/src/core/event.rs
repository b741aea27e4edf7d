//! # Store Events
//!
//! Every state change the data layer knows about, as one closed enum.
//! Server pushes, REST responses, and the optimistic/rollback dispatches
//! of the mutation workflows all arrive here, so handler coverage is
//! checked at compile time instead of through string-keyed dispatch.

use reef_core::{CategoryId, ChannelId, TeamId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::views::{
    Channel, ChannelCategory, MyChannelMember, Preference, SidebarConfig, UserProfile,
};

/// A state-changing event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StoreEvent {
    // =========================================================================
    // Category Events
    // =========================================================================
    /// The user's membership in a team was observed; lazily synthesizes
    /// that team's default categories.
    TeamMembershipReceived {
        /// Team the user belongs to
        team_id: TeamId,
    },

    /// Batch form of [`Self::TeamMembershipReceived`].
    TeamMembershipsReceived {
        /// Teams the user belongs to
        team_ids: Vec<TeamId>,
    },

    /// One category record arrived (server push, REST response, or an
    /// optimistic dispatch).
    CategoryReceived {
        /// The category record
        category: ChannelCategory,
    },

    /// A batch of category records arrived.
    CategoriesReceived {
        /// The category records
        categories: Vec<ChannelCategory>,
    },

    /// A team's category order was replaced wholesale.
    CategoryOrderReceived {
        /// Team whose order changed
        team_id: TeamId,
        /// The new order
        order: Vec<CategoryId>,
    },

    /// A category was deleted.
    CategoryDeleted {
        /// The deleted category
        category_id: CategoryId,
    },

    // =========================================================================
    // Channel Events
    // =========================================================================
    /// One channel record arrived.
    ChannelReceived {
        /// The channel record
        channel: Channel,
    },

    /// A batch of channel records arrived.
    ChannelsReceived {
        /// The channel records
        channels: Vec<Channel>,
    },

    /// The current user's membership in a channel arrived.
    ChannelMemberReceived {
        /// The membership record
        member: MyChannelMember,
    },

    /// The member set of a group channel became known.
    GroupChannelMembersReceived {
        /// The group channel
        channel_id: ChannelId,
        /// Its member user ids
        member_ids: BTreeSet<UserId>,
    },

    /// The user left a channel, or the channel was deleted.
    ChannelLeft {
        /// The departed channel
        channel_id: ChannelId,
    },

    /// The UI switched channels.
    CurrentChannelChanged {
        /// The newly open channel, if any
        channel_id: Option<ChannelId>,
    },

    /// A post arrived or was loaded for a channel.
    PostReceived {
        /// Channel the post belongs to
        channel_id: ChannelId,
        /// Post creation timestamp (ms)
        create_at: i64,
    },

    // =========================================================================
    // User & Preference Events
    // =========================================================================
    /// A batch of user profiles arrived.
    ProfilesReceived {
        /// The profiles
        profiles: Vec<UserProfile>,
    },

    /// The logged-in user became known.
    CurrentUserReceived {
        /// The logged-in user's id
        user_id: UserId,
    },

    /// Preference entries were written.
    PreferencesReceived {
        /// The written entries
        preferences: Vec<Preference>,
    },

    /// Preference entries were deleted.
    PreferencesDeleted {
        /// The deleted entries (matched by category + name)
        preferences: Vec<Preference>,
    },

    // =========================================================================
    // Session Events
    // =========================================================================
    /// The user left a team.
    TeamLeft {
        /// The departed team
        team_id: TeamId,
    },

    /// Server configuration arrived.
    ConfigReceived {
        /// The sidebar knobs
        config: SidebarConfig,
    },

    /// The session ended; every slice resets.
    LoggedOut,
}

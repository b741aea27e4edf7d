//! # Reducer
//!
//! Applies one [`StoreEvent`] to a [`ViewState`]. Pure in the reducer
//! sense: the only inputs are the previous state and the event, and a
//! malformed or stale event (a delete for an id that is already gone, a
//! membership for an unknown channel) reduces to a silent no-op rather
//! than an error, since such events arise from benign races between server
//! pushes and REST responses.

use super::{StoreEvent, ViewState};

/// Apply one event to the state.
pub fn reduce(state: &mut ViewState, event: StoreEvent) {
    match event {
        // Categories
        StoreEvent::TeamMembershipReceived { team_id } => {
            state.categories.ensure_default_categories(&team_id);
        }
        StoreEvent::TeamMembershipsReceived { team_ids } => {
            for team_id in &team_ids {
                state.categories.ensure_default_categories(team_id);
            }
        }
        StoreEvent::CategoryReceived { category } => {
            state.categories.receive_category(category);
        }
        StoreEvent::CategoriesReceived { categories } => {
            state.categories.receive_categories(categories);
        }
        StoreEvent::CategoryOrderReceived { team_id, order } => {
            state.categories.receive_order(team_id, order);
        }
        StoreEvent::CategoryDeleted { category_id } => {
            state.categories.delete_category(&category_id);
        }

        // Channels
        StoreEvent::ChannelReceived { channel } => {
            state.channels.apply_channel(channel);
        }
        StoreEvent::ChannelsReceived { channels } => {
            state.channels.apply_channels(channels);
        }
        StoreEvent::ChannelMemberReceived { member } => {
            state.channels.apply_member(member);
        }
        StoreEvent::GroupChannelMembersReceived {
            channel_id,
            member_ids,
        } => {
            state.channels.set_group_members(channel_id, member_ids);
        }
        StoreEvent::ChannelLeft { channel_id } => {
            state.categories.channel_left(&channel_id);
            state.channels.remove_channel(&channel_id);
            state.posts.remove_channel(&channel_id);
        }
        StoreEvent::CurrentChannelChanged { channel_id } => {
            state.channels.set_current_channel(channel_id);
        }
        StoreEvent::PostReceived {
            channel_id,
            create_at,
        } => {
            state.posts.apply_post(channel_id.clone(), create_at);
            state.channels.touch_last_post_at(&channel_id, create_at);
        }

        // Users & preferences
        StoreEvent::ProfilesReceived { profiles } => {
            state.users.apply_profiles(profiles);
        }
        StoreEvent::CurrentUserReceived { user_id } => {
            state.users.set_current_user(user_id);
        }
        StoreEvent::PreferencesReceived { preferences } => {
            state.preferences.apply(preferences);
        }
        StoreEvent::PreferencesDeleted { preferences } => {
            state.preferences.delete(preferences);
        }

        // Session
        StoreEvent::TeamLeft { team_id } => {
            state.categories.team_left(&team_id);
        }
        StoreEvent::ConfigReceived { config } => {
            state.config = config;
        }
        StoreEvent::LoggedOut => {
            state.channels.reset();
            state.users.reset();
            state.preferences.reset();
            state.posts.reset();
            state.categories.reset();
        }
    }
}

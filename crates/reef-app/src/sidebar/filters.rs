//! # Pipeline Filter Stages
//!
//! Stages 2–5 of the sidebar derivation pipeline. Each stage is a pure
//! function over the channel list and the state slices it reads, and
//! returns [`Cow::Borrowed`] when it removes nothing, so downstream
//! stages and the memoizing query can recognize an unchanged list.

use std::borrow::Cow;

use crate::core::ViewState;
use crate::views::preferences::categories as pref_categories;
use crate::views::{CategoryType, Channel, ChannelCategory, ChannelType, PreferencesState};

fn retain_or_borrow<'a>(
    channels: &'a [Channel],
    keep: impl Fn(&Channel) -> bool,
) -> Cow<'a, [Channel]> {
    if channels.iter().all(&keep) {
        return Cow::Borrowed(channels);
    }
    Cow::Owned(channels.iter().filter(|c| keep(c)).cloned().collect())
}

/// Restrict a custom category to the channels it actually lists.
///
/// Default categories derive membership from channel type and favorite
/// state, but a custom category's membership *is* its `channel_ids`;
/// ids that dangle (no live channel) simply never reach the output.
pub fn filter_by_category_membership<'a>(
    channels: &'a [Channel],
    category: &ChannelCategory,
) -> Cow<'a, [Channel]> {
    if category.category_type != CategoryType::Custom {
        return Cow::Borrowed(channels);
    }
    retain_or_borrow(channels, |c| category.contains_channel(&c.id))
}

/// Keep favorites in the Favorites category and nowhere else.
///
/// A favorited channel must never show up twice, so every other
/// category drops it.
pub fn filter_by_favorites<'a>(
    channels: &'a [Channel],
    preferences: &PreferencesState,
    category_type: CategoryType,
) -> Cow<'a, [Channel]> {
    if category_type == CategoryType::Favorites {
        retain_or_borrow(channels, |c| preferences.is_favorite_channel(&c.id))
    } else {
        retain_or_borrow(channels, |c| !preferences.is_favorite_channel(&c.id))
    }
}

/// Keep only the channel types the category is for.
pub fn filter_by_type<'a>(
    channels: &'a [Channel],
    category_type: CategoryType,
) -> Cow<'a, [Channel]> {
    match category_type {
        CategoryType::Public => retain_or_borrow(channels, |c| {
            c.channel_type == ChannelType::Open
        }),
        CategoryType::Private => retain_or_borrow(channels, |c| {
            c.channel_type == ChannelType::Private
        }),
        CategoryType::DirectMessages => {
            retain_or_borrow(channels, |c| c.channel_type.is_direct_or_group())
        }
        CategoryType::Favorites | CategoryType::Custom => Cow::Borrowed(channels),
    }
}

/// When a direct/group channel was last opened by the user: the later of
/// the recorded open-time preference and the membership view time.
fn last_opened_at(state: &ViewState, channel: &Channel) -> i64 {
    let viewed = state
        .channels
        .member(&channel.id)
        .map(|m| m.last_viewed_at)
        .unwrap_or(0);
    let opened = state.preferences.channel_open_time(&channel.id).unwrap_or(0);
    opened.max(viewed)
}

fn is_auto_closed(state: &ViewState, channel: &Channel, now_ms: i64) -> bool {
    if !channel.is_direct_or_group() {
        return false;
    }

    let current = state.channels.current_channel_id() == Some(&channel.id);
    let last_opened = last_opened_at(state, channel);

    // Deactivated-counterpart rule for direct channels: a conversation
    // never opened since the counterpart was deactivated is hidden
    // outright (unless it is the open channel); one opened afterwards is
    // pinned visible until manually closed.
    if channel.channel_type == ChannelType::Direct {
        let counterpart = channel
            .counterpart(state.users.current_user_id())
            .and_then(|id| state.users.profile(&id).cloned());
        if let Some(profile) = counterpart {
            if profile.is_deactivated() {
                return !current && profile.delete_at > last_opened;
            }
        }
    }

    if !state.config.autoclose_dms_enabled {
        return false;
    }
    if !state.preferences.autoclose_dms_enabled() {
        return false;
    }
    if current {
        return false;
    }
    if state.channels.is_unread(channel) {
        return false;
    }

    let cutoff = now_ms - state.config.autoclose_window_ms;
    if last_opened >= cutoff {
        return false;
    }
    let recent_activity = state
        .posts
        .most_recent_post_at(&channel.id)
        .unwrap_or(0)
        .max(channel.last_post_at);
    if recent_activity >= cutoff {
        return false;
    }

    true
}

/// Hide direct/group conversations that have gone stale.
///
/// Applies only to the DirectMessages category; `now_ms` is the caller's
/// clock; nothing here reads global time.
pub fn filter_autoclosed_dms<'a>(
    channels: &'a [Channel],
    state: &ViewState,
    category_type: CategoryType,
    now_ms: i64,
) -> Cow<'a, [Channel]> {
    if category_type != CategoryType::DirectMessages {
        return Cow::Borrowed(channels);
    }
    retain_or_borrow(channels, |c| !is_auto_closed(state, c, now_ms))
}

fn is_manually_closed(state: &ViewState, channel: &Channel) -> bool {
    match channel.channel_type {
        ChannelType::Direct => {
            let visible = channel
                .counterpart(state.users.current_user_id())
                .and_then(|other| {
                    state
                        .preferences
                        .value(pref_categories::DIRECT_CHANNEL_SHOW, other.as_str())
                })
                .is_some_and(|v| v != "false");
            !visible
        }
        ChannelType::Group => {
            let visible = state
                .preferences
                .value(pref_categories::GROUP_CHANNEL_SHOW, channel.id.as_str())
                .is_some_and(|v| v != "false");
            !visible
        }
        ChannelType::Open | ChannelType::Private => false,
    }
}

/// Hide direct/group conversations the user has closed (or never opened).
///
/// A direct channel is visible only while the `direct_channel_show`
/// preference for its counterpart is present and not `"false"`; group
/// channels use `group_channel_show` keyed by channel id. Other types
/// always pass.
pub fn filter_manually_closed_dms<'a>(
    channels: &'a [Channel],
    state: &ViewState,
) -> Cow<'a, [Channel]> {
    retain_or_borrow(channels, |c| !is_manually_closed(state, c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{reduce, StoreEvent};
    use crate::views::{MyChannelMember, Preference, SidebarConfig, UserProfile};
    use reef_core::{ChannelId, UserId};

    fn channel(id: &str, ty: ChannelType) -> Channel {
        Channel {
            id: ChannelId::from(id),
            channel_type: ty,
            display_name: id.to_string(),
            ..Channel::default()
        }
    }

    fn dm(id: &str, me: &str, other: &str) -> Channel {
        Channel {
            id: ChannelId::from(id),
            channel_type: ChannelType::Direct,
            name: reef_core::direct_channel_name(&UserId::from(me), &UserId::from(other)),
            ..Channel::default()
        }
    }

    fn pref(category: &str, name: &str, value: &str) -> Preference {
        Preference {
            user_id: UserId::from("me"),
            category: category.to_string(),
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    fn state_with_me() -> ViewState {
        let mut state = ViewState::default();
        reduce(
            &mut state,
            StoreEvent::CurrentUserReceived {
                user_id: UserId::from("me"),
            },
        );
        state
    }

    #[test]
    fn unchanged_stage_borrows_its_input() {
        let channels = vec![channel("c1", ChannelType::Open)];
        let out = filter_by_type(&channels, CategoryType::Public);
        assert!(matches!(out, Cow::Borrowed(_)));

        let out = filter_by_type(&channels, CategoryType::DirectMessages);
        assert!(matches!(out, Cow::Owned(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn favorites_category_keeps_only_favorites() {
        let mut state = state_with_me();
        state
            .preferences
            .apply([pref(pref_categories::FAVORITE_CHANNEL, "c1", "true")]);
        let channels = vec![channel("c1", ChannelType::Open), channel("c2", ChannelType::Open)];

        let favorites =
            filter_by_favorites(&channels, &state.preferences, CategoryType::Favorites);
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, ChannelId::from("c1"));

        // The favorited channel never shows in its type category.
        let public = filter_by_favorites(&channels, &state.preferences, CategoryType::Public);
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].id, ChannelId::from("c2"));
    }

    #[test]
    fn custom_categories_derive_from_channel_ids() {
        let channels = vec![channel("c1", ChannelType::Open), channel("c2", ChannelType::Private)];
        let category = ChannelCategory {
            category_type: CategoryType::Custom,
            channel_ids: vec![ChannelId::from("c2"), ChannelId::from("dangling")],
            ..ChannelCategory::default()
        };
        let out = filter_by_category_membership(&channels, &category);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, ChannelId::from("c2"));
    }

    #[test]
    fn manually_closed_dm_needs_show_preference() {
        let mut state = state_with_me();
        let conversation = dm("dm1", "me", "bob");
        let channels = vec![conversation.clone(), channel("c1", ChannelType::Open)];

        // No preference: hidden.
        let out = filter_manually_closed_dms(&channels, &state);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, ChannelId::from("c1"));

        state
            .preferences
            .apply([pref(pref_categories::DIRECT_CHANNEL_SHOW, "bob", "true")]);
        let out = filter_manually_closed_dms(&channels, &state);
        assert_eq!(out.len(), 2);

        state
            .preferences
            .apply([pref(pref_categories::DIRECT_CHANNEL_SHOW, "bob", "false")]);
        let out = filter_manually_closed_dms(&channels, &state);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn group_channels_use_their_own_show_preference() {
        let mut state = state_with_me();
        let channels = vec![channel("gm1", ChannelType::Group)];

        assert!(filter_manually_closed_dms(&channels, &state).is_empty());

        state
            .preferences
            .apply([pref(pref_categories::GROUP_CHANNEL_SHOW, "gm1", "true")]);
        assert_eq!(filter_manually_closed_dms(&channels, &state).len(), 1);
    }

    fn autoclose_state(now: i64) -> (ViewState, Channel) {
        let mut state = state_with_me();
        state.config = SidebarConfig {
            autoclose_dms_enabled: true,
            autoclose_window_ms: SidebarConfig::DEFAULT_AUTOCLOSE_WINDOW_MS,
        };
        let conversation = dm("dm1", "me", "bob");
        reduce(
            &mut state,
            StoreEvent::ChannelReceived {
                channel: conversation.clone(),
            },
        );
        reduce(
            &mut state,
            StoreEvent::ProfilesReceived {
                profiles: vec![UserProfile {
                    id: UserId::from("bob"),
                    username: "bob".to_string(),
                    ..UserProfile::default()
                }],
            },
        );
        // Viewed long before the window.
        reduce(
            &mut state,
            StoreEvent::ChannelMemberReceived {
                member: MyChannelMember {
                    channel_id: ChannelId::from("dm1"),
                    last_viewed_at: now - 30 * reef_core::MILLIS_PER_DAY,
                    ..MyChannelMember::default()
                },
            },
        );
        (state, conversation)
    }

    #[test]
    fn stale_dm_is_auto_closed() {
        let now = 100 * reef_core::MILLIS_PER_DAY;
        let (state, conversation) = autoclose_state(now);
        let channels = vec![conversation];

        let out = filter_autoclosed_dms(&channels, &state, CategoryType::DirectMessages, now);
        assert!(out.is_empty());

        // The stage only applies to the DirectMessages category.
        let out = filter_autoclosed_dms(&channels, &state, CategoryType::Favorites, now);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn recent_activity_keeps_a_dm_open() {
        let now = 100 * reef_core::MILLIS_PER_DAY;
        let (mut state, conversation) = autoclose_state(now);
        reduce(
            &mut state,
            StoreEvent::PostReceived {
                channel_id: ChannelId::from("dm1"),
                create_at: now - reef_core::MILLIS_PER_DAY,
            },
        );
        let channels = vec![state.channels.channel(&conversation.id).unwrap().clone()];

        let out = filter_autoclosed_dms(&channels, &state, CategoryType::DirectMessages, now);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn unread_current_or_disabled_never_auto_closes() {
        let now = 100 * reef_core::MILLIS_PER_DAY;

        let (mut state, conversation) = autoclose_state(now);
        reduce(
            &mut state,
            StoreEvent::CurrentChannelChanged {
                channel_id: Some(conversation.id.clone()),
            },
        );
        let channels = vec![conversation.clone()];
        assert_eq!(
            filter_autoclosed_dms(&channels, &state, CategoryType::DirectMessages, now).len(),
            1
        );

        let (mut state, conversation) = autoclose_state(now);
        let mut unread = conversation.clone();
        unread.total_msg_count = 5;
        reduce(
            &mut state,
            StoreEvent::ChannelReceived {
                channel: unread.clone(),
            },
        );
        assert_eq!(
            filter_autoclosed_dms(&[unread], &state, CategoryType::DirectMessages, now).len(),
            1
        );

        let (mut state, conversation) = autoclose_state(now);
        state.config.autoclose_dms_enabled = false;
        assert_eq!(
            filter_autoclosed_dms(&[conversation], &state, CategoryType::DirectMessages, now)
                .len(),
            1
        );
    }

    #[test]
    fn user_preference_opts_out_of_auto_close() {
        let now = 100 * reef_core::MILLIS_PER_DAY;
        let (mut state, conversation) = autoclose_state(now);
        state.preferences.apply([pref(
            pref_categories::SIDEBAR_SETTINGS,
            crate::views::preferences::names::CLOSE_UNUSED_DIRECT_MESSAGES,
            "false",
        )]);
        assert_eq!(
            filter_autoclosed_dms(&[conversation], &state, CategoryType::DirectMessages, now)
                .len(),
            1
        );
    }

    #[test]
    fn deactivated_counterpart_hides_unopened_dm() {
        let now = 100 * reef_core::MILLIS_PER_DAY;
        let (mut state, conversation) = autoclose_state(now);
        // Deactivated after the last open.
        reduce(
            &mut state,
            StoreEvent::ProfilesReceived {
                profiles: vec![UserProfile {
                    id: UserId::from("bob"),
                    username: "bob".to_string(),
                    delete_at: now - 10 * reef_core::MILLIS_PER_DAY,
                    ..UserProfile::default()
                }],
            },
        );
        let channels = vec![conversation.clone()];
        assert!(
            filter_autoclosed_dms(&channels, &state, CategoryType::DirectMessages, now).is_empty()
        );

        // Opened since deactivation: pinned visible, even past the window.
        reduce(
            &mut state,
            StoreEvent::ChannelMemberReceived {
                member: MyChannelMember {
                    channel_id: conversation.id.clone(),
                    last_viewed_at: now - 9 * reef_core::MILLIS_PER_DAY,
                    ..MyChannelMember::default()
                },
            },
        );
        assert_eq!(
            filter_autoclosed_dms(&channels, &state, CategoryType::DirectMessages, now).len(),
            1
        );
    }
}

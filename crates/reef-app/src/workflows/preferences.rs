//! # Preference Workflows
//!
//! The write side of the preference lifecycle: optimistic save/delete of
//! preference batches, plus the concrete sidebar preferences built on
//! top (favorites, DM/GM visibility, channel open times).

use tracing::warn;

use reef_core::{ChannelId, UserId};

use crate::core::{reduce, Store, StoreEvent};
use crate::effects::PreferenceEffects;
use crate::errors::AppError;
use crate::views::preferences::categories as pref_categories;
use crate::views::Preference;

struct PrefPlan {
    user_id: UserId,
    written: Vec<Preference>,
    /// Prior entry per written preference; `None` where none existed.
    previous: Vec<(Preference, Option<Preference>)>,
}

fn capture_previous(
    state: &crate::core::ViewState,
    preferences: &[Preference],
) -> Vec<(Preference, Option<Preference>)> {
    preferences
        .iter()
        .map(|p| {
            (
                p.clone(),
                state.preferences.get(&p.category, &p.name).cloned(),
            )
        })
        .collect()
}

fn rollback_events(previous: Vec<(Preference, Option<Preference>)>) -> Vec<StoreEvent> {
    let mut restore = Vec::new();
    let mut remove = Vec::new();
    for (written, prior) in previous {
        match prior {
            Some(old) => restore.push(old),
            None => remove.push(written),
        }
    }
    let mut events = Vec::new();
    if !restore.is_empty() {
        events.push(StoreEvent::PreferencesReceived {
            preferences: restore,
        });
    }
    if !remove.is_empty() {
        events.push(StoreEvent::PreferencesDeleted {
            preferences: remove,
        });
    }
    events
}

/// Optimistically save a batch of preference entries.
pub async fn save_preferences(
    store: &Store,
    server: &dyn PreferenceEffects,
    preferences: Vec<Preference>,
) -> Result<(), AppError> {
    if preferences.is_empty() {
        return Ok(());
    }
    let plan = store
        .update(|state| {
            let previous = capture_previous(state, &preferences);
            reduce(
                state,
                StoreEvent::PreferencesReceived {
                    preferences: preferences.clone(),
                },
            );
            PrefPlan {
                user_id: state.users.current_user_id().clone(),
                written: preferences,
                previous,
            }
        })
        .await;

    match server.save_preferences(&plan.user_id, &plan.written).await {
        Ok(()) => Ok(()),
        Err(err) => {
            warn!(error = %err, count = plan.written.len(), "preference save rolled back");
            store.dispatch_all(rollback_events(plan.previous)).await;
            Err(err.into())
        }
    }
}

/// Optimistically delete a batch of preference entries.
pub async fn delete_preferences(
    store: &Store,
    server: &dyn PreferenceEffects,
    preferences: Vec<Preference>,
) -> Result<(), AppError> {
    if preferences.is_empty() {
        return Ok(());
    }
    let plan = store
        .update(|state| {
            let previous = capture_previous(state, &preferences);
            reduce(
                state,
                StoreEvent::PreferencesDeleted {
                    preferences: preferences.clone(),
                },
            );
            PrefPlan {
                user_id: state.users.current_user_id().clone(),
                written: preferences,
                previous,
            }
        })
        .await;

    match server
        .delete_preferences(&plan.user_id, &plan.written)
        .await
    {
        Ok(()) => Ok(()),
        Err(err) => {
            warn!(error = %err, count = plan.written.len(), "preference delete rolled back");
            // Deleted entries that existed come back; ones that never
            // existed need nothing.
            let restore: Vec<Preference> = plan
                .previous
                .into_iter()
                .filter_map(|(_, prior)| prior)
                .collect();
            if !restore.is_empty() {
                store
                    .dispatch(StoreEvent::PreferencesReceived {
                        preferences: restore,
                    })
                    .await;
            }
            Err(err.into())
        }
    }
}

fn user_pref(user_id: &UserId, category: &str, name: &str, value: &str) -> Preference {
    Preference {
        user_id: user_id.clone(),
        category: category.to_string(),
        name: name.to_string(),
        value: value.to_string(),
    }
}

/// Mark or unmark a channel as favorite.
pub async fn favorite_channel(
    store: &Store,
    server: &dyn PreferenceEffects,
    channel_id: &ChannelId,
    favorite: bool,
) -> Result<(), AppError> {
    let user_id = store.read(|s| s.users.current_user_id().clone()).await;
    let pref = user_pref(
        &user_id,
        pref_categories::FAVORITE_CHANNEL,
        channel_id.as_str(),
        "true",
    );
    if favorite {
        save_preferences(store, server, vec![pref]).await
    } else {
        delete_preferences(store, server, vec![pref]).await
    }
}

/// Show or hide a direct conversation (manual close).
pub async fn set_direct_channel_visible(
    store: &Store,
    server: &dyn PreferenceEffects,
    other_user_id: &UserId,
    visible: bool,
) -> Result<(), AppError> {
    let user_id = store.read(|s| s.users.current_user_id().clone()).await;
    let pref = user_pref(
        &user_id,
        pref_categories::DIRECT_CHANNEL_SHOW,
        other_user_id.as_str(),
        if visible { "true" } else { "false" },
    );
    save_preferences(store, server, vec![pref]).await
}

/// Show or hide a group conversation (manual close).
pub async fn set_group_channel_visible(
    store: &Store,
    server: &dyn PreferenceEffects,
    channel_id: &ChannelId,
    visible: bool,
) -> Result<(), AppError> {
    let user_id = store.read(|s| s.users.current_user_id().clone()).await;
    let pref = user_pref(
        &user_id,
        pref_categories::GROUP_CHANNEL_SHOW,
        channel_id.as_str(),
        if visible { "true" } else { "false" },
    );
    save_preferences(store, server, vec![pref]).await
}

/// Record that a channel was opened, for the auto-close heuristic.
pub async fn record_channel_open_time(
    store: &Store,
    server: &dyn PreferenceEffects,
    channel_id: &ChannelId,
    now_ms: i64,
) -> Result<(), AppError> {
    let user_id = store.read(|s| s.users.current_user_id().clone()).await;
    let pref = user_pref(
        &user_id,
        pref_categories::CHANNEL_OPEN_TIME,
        channel_id.as_str(),
        &now_ms.to_string(),
    );
    save_preferences(store, server, vec![pref]).await
}

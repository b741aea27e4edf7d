//! # Category Workflows
//!
//! The seven sidebar-category mutations. Each follows the optimistic
//! contract described in [`crate::workflows`]: plan and dispatch under
//! one lock, round-trip the server, commit or roll back the scoped
//! snapshot.
//!
//! Channel-id lists are treated as sets: inserting an id a category
//! already holds never duplicates it, and removing a non-member is a
//! no-op.

use tracing::warn;
use uuid::Uuid;

use reef_core::{CategoryId, ChannelId, TeamId, UserId};

use crate::core::{reduce, Store, StoreEvent, ViewState};
use crate::effects::{CategoryEffects, ServerEffects};
use crate::errors::AppError;
use crate::views::preferences::categories as pref_categories;
use crate::views::{CategorySorting, CategoryType, ChannelCategory, ChannelType, Preference};

// =============================================================================
// Helpers
// =============================================================================

fn dedup_preserving_order(ids: Vec<ChannelId>) -> Vec<ChannelId> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

/// Remove `ids` from every same-team category except `except`.
///
/// Returns the untouched originals (the rollback snapshot) and the
/// stripped replacements, covering only categories that actually listed
/// one of the ids.
fn strip_channels_from_team(
    state: &ViewState,
    team_id: &TeamId,
    ids: &[ChannelId],
    except: Option<&CategoryId>,
) -> (Vec<ChannelCategory>, Vec<ChannelCategory>) {
    let mut originals = Vec::new();
    let mut updated = Vec::new();
    for category in state.categories.categories_of_team(team_id) {
        if Some(&category.id) == except {
            continue;
        }
        if category.channel_ids.iter().any(|c| ids.contains(c)) {
            originals.push(category.clone());
            let mut stripped = category.clone();
            stripped.channel_ids.retain(|c| !ids.contains(c));
            updated.push(stripped);
        }
    }
    (originals, updated)
}

fn categories_rollback(snapshot: Vec<ChannelCategory>) -> Option<StoreEvent> {
    if snapshot.is_empty() {
        None
    } else {
        Some(StoreEvent::CategoriesReceived {
            categories: snapshot,
        })
    }
}

// =============================================================================
// create_category
// =============================================================================

struct CreatePlan {
    user_id: UserId,
    provisional: ChannelCategory,
    sibling_snapshot: Vec<ChannelCategory>,
    order_snapshot: Vec<CategoryId>,
}

/// Create a custom category, optionally seeded with channels.
///
/// The new category lands right after Favorites when Favorites holds
/// slot 0 of the team order, else at slot 0. Seeded channels leave
/// whichever same-team category previously listed them as part of the
/// same optimistic update. A client-generated id stands in until the
/// server's record replaces it.
pub async fn create_category(
    store: &Store,
    server: &dyn CategoryEffects,
    team_id: &TeamId,
    display_name: &str,
    channel_ids: Vec<ChannelId>,
) -> Result<ChannelCategory, AppError> {
    let plan = store
        .update(|state| {
            let provisional = ChannelCategory {
                id: CategoryId::from(format!("pending-{}", Uuid::new_v4().as_simple())),
                team_id: team_id.clone(),
                category_type: CategoryType::Custom,
                display_name: display_name.to_string(),
                sorting: CategorySorting::Default,
                channel_ids: dedup_preserving_order(channel_ids),
            };

            let (sibling_snapshot, updated_siblings) =
                strip_channels_from_team(state, team_id, &provisional.channel_ids, None);

            let order_snapshot = state.categories.order_for_team(team_id).to_vec();
            let favorites_first = order_snapshot
                .first()
                .and_then(|id| state.categories.category(id))
                .is_some_and(|c| c.category_type == CategoryType::Favorites);
            let mut order = order_snapshot.clone();
            order.insert(usize::from(favorites_first), provisional.id.clone());

            let mut payload = updated_siblings;
            payload.push(provisional.clone());
            reduce(state, StoreEvent::CategoriesReceived { categories: payload });
            reduce(
                state,
                StoreEvent::CategoryOrderReceived {
                    team_id: team_id.clone(),
                    order,
                },
            );

            CreatePlan {
                user_id: state.users.current_user_id().clone(),
                provisional,
                sibling_snapshot,
                order_snapshot,
            }
        })
        .await;

    match server
        .create_category(&plan.user_id, team_id, &plan.provisional)
        .await
    {
        Ok(confirmed) => {
            let provisional_id = plan.provisional.id;
            let committed = confirmed.clone();
            store
                .update(|state| {
                    // Swap the provisional id for the server's in the
                    // current order, not the planned one, which may be
                    // stale by now.
                    let order: Vec<CategoryId> = state
                        .categories
                        .order_for_team(team_id)
                        .iter()
                        .map(|id| {
                            if *id == provisional_id {
                                committed.id.clone()
                            } else {
                                id.clone()
                            }
                        })
                        .collect();
                    reduce(
                        state,
                        StoreEvent::CategoryDeleted {
                            category_id: provisional_id.clone(),
                        },
                    );
                    reduce(
                        state,
                        StoreEvent::CategoryReceived {
                            category: committed.clone(),
                        },
                    );
                    reduce(
                        state,
                        StoreEvent::CategoryOrderReceived {
                            team_id: team_id.clone(),
                            order,
                        },
                    );
                })
                .await;
            Ok(confirmed)
        }
        Err(err) => {
            warn!(team = %team_id, error = %err, "create category rolled back");
            store
                .update(|state| {
                    reduce(
                        state,
                        StoreEvent::CategoryDeleted {
                            category_id: plan.provisional.id.clone(),
                        },
                    );
                    if let Some(event) = categories_rollback(plan.sibling_snapshot) {
                        reduce(state, event);
                    }
                    reduce(
                        state,
                        StoreEvent::CategoryOrderReceived {
                            team_id: team_id.clone(),
                            order: plan.order_snapshot,
                        },
                    );
                })
                .await;
            Err(err.into())
        }
    }
}

// =============================================================================
// rename_category / set_category_sorting
// =============================================================================

struct PatchPlan {
    user_id: UserId,
    team_id: TeamId,
    snapshot: ChannelCategory,
    updated: ChannelCategory,
}

async fn patch_category(
    store: &Store,
    server: &dyn CategoryEffects,
    category_id: &CategoryId,
    patch: impl FnOnce(&mut ChannelCategory),
    what: &'static str,
) -> Result<ChannelCategory, AppError> {
    let plan = store
        .update(|state| -> Result<PatchPlan, AppError> {
            let snapshot = state
                .categories
                .category(category_id)
                .cloned()
                .ok_or_else(|| AppError::CategoryNotFound(category_id.clone()))?;
            let mut updated = snapshot.clone();
            patch(&mut updated);
            reduce(
                state,
                StoreEvent::CategoryReceived {
                    category: updated.clone(),
                },
            );
            Ok(PatchPlan {
                user_id: state.users.current_user_id().clone(),
                team_id: snapshot.team_id.clone(),
                snapshot,
                updated,
            })
        })
        .await?;

    match server
        .update_category(&plan.user_id, &plan.team_id, &plan.updated)
        .await
    {
        Ok(confirmed) => {
            store
                .dispatch(StoreEvent::CategoryReceived {
                    category: confirmed.clone(),
                })
                .await;
            Ok(confirmed)
        }
        Err(err) => {
            warn!(category = %category_id, error = %err, "{what} rolled back");
            store
                .dispatch(StoreEvent::CategoryReceived {
                    category: plan.snapshot,
                })
                .await;
            Err(err.into())
        }
    }
}

/// Rename a category. Patches `display_name` only.
pub async fn rename_category(
    store: &Store,
    server: &dyn CategoryEffects,
    category_id: &CategoryId,
    display_name: &str,
) -> Result<ChannelCategory, AppError> {
    let name = display_name.to_string();
    patch_category(
        store,
        server,
        category_id,
        move |c| c.display_name = name,
        "rename",
    )
    .await
}

/// Change a category's sorting mode.
///
/// Persisted like every other mutation; dispatch a
/// [`StoreEvent::CategoryReceived`] directly for a client-side preview
/// without the round-trip.
pub async fn set_category_sorting(
    store: &Store,
    server: &dyn CategoryEffects,
    category_id: &CategoryId,
    sorting: CategorySorting,
) -> Result<ChannelCategory, AppError> {
    patch_category(
        store,
        server,
        category_id,
        move |c| c.sorting = sorting,
        "sorting change",
    )
    .await
}

// =============================================================================
// delete_category
// =============================================================================

struct DeletePlan {
    user_id: UserId,
    team_id: TeamId,
    snapshot: Vec<ChannelCategory>,
    order_snapshot: Vec<CategoryId>,
}

/// Delete a custom category.
///
/// Channels it held go back to the team's default category matching
/// their type: open/private channels to Channels, direct/group
/// conversations to Direct Messages. An empty category is simply
/// dropped. (A favorited channel needs no special move: the favorite
/// preference survives, so the pipeline keeps deriving it into
/// Favorites.)
pub async fn delete_category(
    store: &Store,
    server: &dyn CategoryEffects,
    category_id: &CategoryId,
) -> Result<(), AppError> {
    let plan = store
        .update(|state| -> Result<DeletePlan, AppError> {
            let original = state
                .categories
                .category(category_id)
                .cloned()
                .ok_or_else(|| AppError::CategoryNotFound(category_id.clone()))?;
            let team_id = original.team_id.clone();
            let order_snapshot = state.categories.order_for_team(&team_id).to_vec();

            // Route each held channel to its type's default category.
            let mut channels_default = state
                .categories
                .default_category_for_team(&team_id, CategoryType::Public)
                .cloned();
            let mut dms_default = state
                .categories
                .default_category_for_team(&team_id, CategoryType::DirectMessages)
                .cloned();
            let mut snapshot = vec![original.clone()];
            for target in [&channels_default, &dms_default].into_iter().flatten() {
                snapshot.push(target.clone());
            }

            for channel_id in &original.channel_ids {
                let Some(channel) = state.channels.channel(channel_id) else {
                    continue;
                };
                let target = match channel.channel_type {
                    ChannelType::Open | ChannelType::Private => channels_default.as_mut(),
                    ChannelType::Direct | ChannelType::Group => dms_default.as_mut(),
                };
                if let Some(target) = target {
                    if !target.contains_channel(channel_id) {
                        target.channel_ids.push(channel_id.clone());
                    }
                }
            }

            reduce(
                state,
                StoreEvent::CategoryDeleted {
                    category_id: category_id.clone(),
                },
            );
            let updated: Vec<ChannelCategory> = [channels_default, dms_default]
                .into_iter()
                .flatten()
                .collect();
            if !updated.is_empty() {
                reduce(state, StoreEvent::CategoriesReceived { categories: updated });
            }

            Ok(DeletePlan {
                user_id: state.users.current_user_id().clone(),
                team_id,
                snapshot,
                order_snapshot,
            })
        })
        .await?;

    match server
        .delete_category(&plan.user_id, &plan.team_id, category_id)
        .await
    {
        Ok(()) => Ok(()),
        Err(err) => {
            warn!(category = %category_id, error = %err, "delete category rolled back");
            store
                .dispatch_all([
                    StoreEvent::CategoriesReceived {
                        categories: plan.snapshot,
                    },
                    StoreEvent::CategoryOrderReceived {
                        team_id: plan.team_id,
                        order: plan.order_snapshot,
                    },
                ])
                .await;
            Err(err.into())
        }
    }
}

// =============================================================================
// add_channel_to_category / move_channel_to_category
// =============================================================================

struct MovePlan {
    user_id: UserId,
    team_id: TeamId,
    payload: Vec<ChannelCategory>,
    snapshot: Vec<ChannelCategory>,
    target_id: CategoryId,
    favorite_written: Option<Preference>,
    favorite_cleared: Option<Preference>,
    favorite_prior: Option<Preference>,
}

fn plan_channel_move(
    state: &mut ViewState,
    category_id: &CategoryId,
    channel_id: &ChannelId,
    index: Option<usize>,
    make_manual: bool,
) -> Result<Option<MovePlan>, AppError> {
    let target = state
        .categories
        .category(category_id)
        .cloned()
        .ok_or_else(|| AppError::CategoryNotFound(category_id.clone()))?;
    let team_id = target.team_id.clone();

    let source = state
        .categories
        .category_containing(&team_id, channel_id)
        .filter(|c| c.id != target.id)
        .cloned();

    // Adding to a category that already lists the channel is a no-op;
    // the disjointness invariant means no other category can hold it.
    if index.is_none() && target.contains_channel(channel_id) {
        return Ok(None);
    }

    let mut updated_target = target.clone();
    updated_target.channel_ids.retain(|c| c != channel_id);
    let at = index
        .unwrap_or(0)
        .min(updated_target.channel_ids.len());
    updated_target.channel_ids.insert(at, channel_id.clone());
    if make_manual {
        updated_target.sorting = CategorySorting::Manual;
    }

    let mut snapshot = vec![target.clone()];
    let mut payload = vec![updated_target];
    if let Some(source) = &source {
        snapshot.push(source.clone());
        let mut stripped = source.clone();
        stripped.channel_ids.retain(|c| c != channel_id);
        payload.push(stripped);
    }

    // Favorite preference follows moves across the Favorites boundary.
    let user_id = state.users.current_user_id().clone();
    let favorite_prior = state
        .preferences
        .get(pref_categories::FAVORITE_CHANNEL, channel_id.as_str())
        .cloned();
    // "From favorites" covers both a Favorites source category and a
    // reorder within the Favorites category itself.
    let from_favorites = source.as_ref().map(|c| c.category_type) == Some(CategoryType::Favorites)
        || (target.category_type == CategoryType::Favorites
            && target.contains_channel(channel_id));
    let mut favorite_written = None;
    let mut favorite_cleared = None;
    if target.category_type == CategoryType::Favorites && !from_favorites {
        favorite_written = Some(Preference {
            user_id: user_id.clone(),
            category: pref_categories::FAVORITE_CHANNEL.to_string(),
            name: channel_id.as_str().to_string(),
            value: "true".to_string(),
        });
    } else if from_favorites && target.category_type != CategoryType::Favorites {
        favorite_cleared = Some(Preference {
            user_id: user_id.clone(),
            category: pref_categories::FAVORITE_CHANNEL.to_string(),
            name: channel_id.as_str().to_string(),
            value: String::new(),
        });
    }

    reduce(
        state,
        StoreEvent::CategoriesReceived {
            categories: payload.clone(),
        },
    );
    if let Some(pref) = &favorite_written {
        reduce(
            state,
            StoreEvent::PreferencesReceived {
                preferences: vec![pref.clone()],
            },
        );
    }
    if let Some(pref) = &favorite_cleared {
        reduce(
            state,
            StoreEvent::PreferencesDeleted {
                preferences: vec![pref.clone()],
            },
        );
    }

    Ok(Some(MovePlan {
        user_id,
        team_id,
        payload,
        snapshot,
        target_id: category_id.clone(),
        favorite_written,
        favorite_cleared,
        favorite_prior,
    }))
}

fn favorite_rollback_events(plan: &MovePlan) -> Vec<StoreEvent> {
    let mut events = Vec::new();
    if let Some(written) = &plan.favorite_written {
        match &plan.favorite_prior {
            Some(prior) => events.push(StoreEvent::PreferencesReceived {
                preferences: vec![prior.clone()],
            }),
            None => events.push(StoreEvent::PreferencesDeleted {
                preferences: vec![written.clone()],
            }),
        }
    }
    if plan.favorite_cleared.is_some() {
        if let Some(prior) = &plan.favorite_prior {
            events.push(StoreEvent::PreferencesReceived {
                preferences: vec![prior.clone()],
            });
        }
    }
    events
}

async fn run_channel_move(
    store: &Store,
    server: &dyn ServerEffects,
    plan: MovePlan,
) -> Result<ChannelCategory, AppError> {
    let outcome = async {
        let confirmed = server
            .update_categories(&plan.user_id, &plan.team_id, &plan.payload)
            .await?;
        if let Some(pref) = &plan.favorite_written {
            server
                .save_preferences(&plan.user_id, std::slice::from_ref(pref))
                .await?;
        }
        if let Some(pref) = &plan.favorite_cleared {
            server
                .delete_preferences(&plan.user_id, std::slice::from_ref(pref))
                .await?;
        }
        Ok::<_, crate::effects::EffectError>(confirmed)
    }
    .await;

    match outcome {
        Ok(confirmed) => {
            let committed = confirmed
                .iter()
                .find(|c| c.id == plan.target_id)
                .cloned()
                .or_else(|| plan.payload.first().cloned())
                .unwrap_or_default();
            store
                .dispatch(StoreEvent::CategoriesReceived {
                    categories: confirmed,
                })
                .await;
            Ok(committed)
        }
        Err(err) => {
            warn!(
                category = %plan.target_id,
                error = %err,
                "channel move rolled back"
            );
            let mut events = Vec::new();
            events.push(StoreEvent::CategoriesReceived {
                categories: plan.snapshot.clone(),
            });
            events.extend(favorite_rollback_events(&plan));
            store.dispatch_all(events).await;
            Err(err.into())
        }
    }
}

/// Put a channel at the front of a category's list.
///
/// The channel leaves whichever same-team category previously listed it;
/// the target's sorting mode is untouched.
pub async fn add_channel_to_category(
    store: &Store,
    server: &dyn ServerEffects,
    category_id: &CategoryId,
    channel_id: &ChannelId,
) -> Result<ChannelCategory, AppError> {
    let planned = store
        .update(|state| plan_channel_move(state, category_id, channel_id, None, false))
        .await?;
    match planned {
        Some(plan) => run_channel_move(store, server, plan).await,
        None => {
            // Already listed; nothing to change anywhere.
            let current = store
                .read(|s| s.categories.category(category_id).cloned())
                .await;
            current.ok_or_else(|| AppError::CategoryNotFound(category_id.clone()))
        }
    }
}

/// Move a channel to an explicit position in a category.
///
/// Works both for moving across categories and reordering within one.
/// The destination's sorting mode becomes manual (an explicit position
/// was chosen); the source's mode is untouched. Crossing the Favorites
/// boundary writes or clears the channel's favorite preference.
pub async fn move_channel_to_category(
    store: &Store,
    server: &dyn ServerEffects,
    category_id: &CategoryId,
    channel_id: &ChannelId,
    index: usize,
) -> Result<ChannelCategory, AppError> {
    let planned = store
        .update(|state| plan_channel_move(state, category_id, channel_id, Some(index), true))
        .await?;
    match planned {
        Some(plan) => run_channel_move(store, server, plan).await,
        None => unreachable!("explicit-index moves always produce a plan"),
    }
}

// =============================================================================
// move_category
// =============================================================================

/// Move a category to a new position in its team's sidebar order.
///
/// A standard array move: the id comes out of its old slot and goes into
/// `new_index`, shifting siblings accordingly.
pub async fn move_category(
    store: &Store,
    server: &dyn CategoryEffects,
    team_id: &TeamId,
    category_id: &CategoryId,
    new_index: usize,
) -> Result<Vec<CategoryId>, AppError> {
    struct OrderPlan {
        user_id: UserId,
        snapshot: Vec<CategoryId>,
        updated: Vec<CategoryId>,
    }

    let plan = store
        .update(|state| -> Result<OrderPlan, AppError> {
            let snapshot = state.categories.order_for_team(team_id).to_vec();
            if snapshot.is_empty() {
                return Err(AppError::TeamOrderMissing(team_id.clone()));
            }
            if !snapshot.contains(category_id) {
                return Err(AppError::CategoryNotFound(category_id.clone()));
            }
            let mut updated = snapshot.clone();
            updated.retain(|id| id != category_id);
            let at = new_index.min(updated.len());
            updated.insert(at, category_id.clone());
            reduce(
                state,
                StoreEvent::CategoryOrderReceived {
                    team_id: team_id.clone(),
                    order: updated.clone(),
                },
            );
            Ok(OrderPlan {
                user_id: state.users.current_user_id().clone(),
                snapshot,
                updated,
            })
        })
        .await?;

    match server
        .update_category_order(&plan.user_id, team_id, &plan.updated)
        .await
    {
        Ok(confirmed) => {
            store
                .dispatch(StoreEvent::CategoryOrderReceived {
                    team_id: team_id.clone(),
                    order: confirmed.clone(),
                })
                .await;
            Ok(confirmed)
        }
        Err(err) => {
            warn!(team = %team_id, category = %category_id, error = %err, "category move rolled back");
            store
                .dispatch(StoreEvent::CategoryOrderReceived {
                    team_id: team_id.clone(),
                    order: plan.snapshot,
                })
                .await;
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{EffectError, PreferenceEffects};
    use crate::views::Channel;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Scripted fake transport: echoes requests back as confirmations,
    /// or fails everything when told to.
    #[derive(Default)]
    struct FakeServer {
        fail: AtomicBool,
        category_calls: AtomicUsize,
    }

    impl FakeServer {
        fn failing() -> Self {
            Self {
                fail: AtomicBool::new(true),
                ..Self::default()
            }
        }

        fn check(&self) -> Result<(), EffectError> {
            if self.fail.load(Ordering::SeqCst) {
                Err(EffectError::Server {
                    status: 500,
                    message: "boom".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl CategoryEffects for FakeServer {
        async fn create_category(
            &self,
            _user_id: &UserId,
            _team_id: &TeamId,
            category: &ChannelCategory,
        ) -> Result<ChannelCategory, EffectError> {
            self.category_calls.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            let mut confirmed = category.clone();
            confirmed.id = CategoryId::from("server-assigned");
            Ok(confirmed)
        }

        async fn update_category(
            &self,
            _user_id: &UserId,
            _team_id: &TeamId,
            category: &ChannelCategory,
        ) -> Result<ChannelCategory, EffectError> {
            self.category_calls.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            Ok(category.clone())
        }

        async fn update_categories(
            &self,
            _user_id: &UserId,
            _team_id: &TeamId,
            categories: &[ChannelCategory],
        ) -> Result<Vec<ChannelCategory>, EffectError> {
            self.category_calls.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            Ok(categories.to_vec())
        }

        async fn delete_category(
            &self,
            _user_id: &UserId,
            _team_id: &TeamId,
            _category_id: &CategoryId,
        ) -> Result<(), EffectError> {
            self.category_calls.fetch_add(1, Ordering::SeqCst);
            self.check()
        }

        async fn update_category_order(
            &self,
            _user_id: &UserId,
            _team_id: &TeamId,
            order: &[CategoryId],
        ) -> Result<Vec<CategoryId>, EffectError> {
            self.category_calls.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            Ok(order.to_vec())
        }
    }

    #[async_trait]
    impl PreferenceEffects for FakeServer {
        async fn save_preferences(
            &self,
            _user_id: &UserId,
            _preferences: &[Preference],
        ) -> Result<(), EffectError> {
            self.check()
        }

        async fn delete_preferences(
            &self,
            _user_id: &UserId,
            _preferences: &[Preference],
        ) -> Result<(), EffectError> {
            self.check()
        }
    }

    fn team() -> TeamId {
        TeamId::from("team1")
    }

    fn custom(id: &str, channels: &[&str]) -> ChannelCategory {
        ChannelCategory {
            id: CategoryId::from(id),
            team_id: team(),
            category_type: CategoryType::Custom,
            display_name: id.to_string(),
            sorting: CategorySorting::Default,
            channel_ids: channels.iter().map(|c| ChannelId::from(*c)).collect(),
        }
    }

    async fn seeded_store() -> Store {
        let store = Store::new();
        store
            .dispatch_all([
                StoreEvent::CurrentUserReceived {
                    user_id: UserId::from("me"),
                },
                StoreEvent::TeamMembershipReceived { team_id: team() },
                StoreEvent::CategoriesReceived {
                    categories: vec![
                        custom("category1", &["channel1", "channel2"]),
                        custom("category2", &["channel3", "channel4"]),
                    ],
                },
            ])
            .await;
        let mut order = store
            .read(|s| s.categories.order_for_team(&team()).to_vec())
            .await;
        order.push(CategoryId::from("category1"));
        order.push(CategoryId::from("category2"));
        store
            .dispatch(StoreEvent::CategoryOrderReceived {
                team_id: team(),
                order,
            })
            .await;
        store
    }

    async fn channel_ids(store: &Store, id: &str) -> Vec<ChannelId> {
        store
            .read(|s| {
                s.categories
                    .category(&CategoryId::from(id))
                    .map(|c| c.channel_ids.clone())
                    .unwrap_or_default()
            })
            .await
    }

    #[tokio::test]
    async fn add_prepends_and_strips_the_previous_category() {
        let store = seeded_store().await;
        let server = FakeServer::default();

        add_channel_to_category(
            &store,
            &server,
            &CategoryId::from("category1"),
            &ChannelId::from("channel3"),
        )
        .await
        .unwrap();

        assert_eq!(
            channel_ids(&store, "category1").await,
            ["channel3", "channel1", "channel2"].map(ChannelId::from)
        );
        assert_eq!(
            channel_ids(&store, "category2").await,
            ["channel4"].map(ChannelId::from)
        );
    }

    #[tokio::test]
    async fn duplicate_add_is_a_noop_without_a_round_trip() {
        let store = seeded_store().await;
        let server = FakeServer::default();

        add_channel_to_category(
            &store,
            &server,
            &CategoryId::from("category1"),
            &ChannelId::from("channel1"),
        )
        .await
        .unwrap();

        assert_eq!(
            channel_ids(&store, "category1").await,
            ["channel1", "channel2"].map(ChannelId::from)
        );
        assert_eq!(server.category_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn move_into_favorites_writes_the_preference_and_back_out_clears_it() {
        let store = seeded_store().await;
        let server = FakeServer::default();
        let favorites_id = CategoryId::from("team1-favorites");
        let channel = ChannelId::from("channel1");

        move_channel_to_category(&store, &server, &favorites_id, &channel, 0)
            .await
            .unwrap();
        assert!(store.read(|s| s.preferences.is_favorite_channel(&channel)).await);
        assert_eq!(
            channel_ids(&store, "category1").await,
            ["channel2"].map(ChannelId::from)
        );

        move_channel_to_category(&store, &server, &CategoryId::from("category1"), &channel, 0)
            .await
            .unwrap();
        assert!(!store.read(|s| s.preferences.is_favorite_channel(&channel)).await);
    }

    #[tokio::test]
    async fn move_sets_destination_sorting_to_manual_only() {
        let store = seeded_store().await;
        let server = FakeServer::default();

        move_channel_to_category(
            &store,
            &server,
            &CategoryId::from("category1"),
            &ChannelId::from("channel3"),
            1,
        )
        .await
        .unwrap();

        let (dest_sorting, source_sorting) = store
            .read(|s| {
                (
                    s.categories
                        .category(&CategoryId::from("category1"))
                        .unwrap()
                        .sorting,
                    s.categories
                        .category(&CategoryId::from("category2"))
                        .unwrap()
                        .sorting,
                )
            })
            .await;
        assert_eq!(dest_sorting, CategorySorting::Manual);
        assert_eq!(source_sorting, CategorySorting::Default);
        assert_eq!(
            channel_ids(&store, "category1").await,
            ["channel1", "channel3", "channel2"].map(ChannelId::from)
        );
    }

    #[tokio::test]
    async fn move_category_is_a_standard_array_move() {
        let store = Store::new();
        store
            .dispatch_all([
                StoreEvent::CurrentUserReceived {
                    user_id: UserId::from("me"),
                },
                StoreEvent::CategoriesReceived {
                    categories: vec![
                        custom("category1", &[]),
                        custom("category2", &[]),
                        custom("category3", &[]),
                        custom("category4", &[]),
                    ],
                },
                StoreEvent::CategoryOrderReceived {
                    team_id: team(),
                    order: ["category1", "category2", "category3", "category4"]
                        .map(CategoryId::from)
                        .to_vec(),
                },
            ])
            .await;
        let server = FakeServer::default();

        move_category(&store, &server, &team(), &CategoryId::from("category1"), 3)
            .await
            .unwrap();

        let order = store
            .read(|s| s.categories.order_for_team(&team()).to_vec())
            .await;
        assert_eq!(
            order,
            ["category2", "category3", "category4", "category1"].map(CategoryId::from)
        );
    }

    #[tokio::test]
    async fn create_lands_after_favorites_and_claims_its_channels() {
        let store = seeded_store().await;
        let server = FakeServer::default();

        let created = create_category(
            &store,
            &server,
            &team(),
            "Projects",
            vec![ChannelId::from("channel1"), ChannelId::from("channel1")],
        )
        .await
        .unwrap();

        assert_eq!(created.id, CategoryId::from("server-assigned"));
        assert_eq!(created.channel_ids, ["channel1"].map(ChannelId::from));

        let order = store
            .read(|s| s.categories.order_for_team(&team()).to_vec())
            .await;
        assert_eq!(order[0], CategoryId::from("team1-favorites"));
        assert_eq!(order[1], CategoryId::from("server-assigned"));

        // The seeded channel left its previous category.
        assert_eq!(
            channel_ids(&store, "category1").await,
            ["channel2"].map(ChannelId::from)
        );
        // No provisional id survives anywhere.
        let stray = store
            .read(|s| {
                s.categories
                    .order_for_team(&team())
                    .iter()
                    .any(|id| id.as_str().starts_with("pending-"))
            })
            .await;
        assert!(!stray);
    }

    #[tokio::test]
    async fn failed_create_restores_siblings_and_order() {
        let store = seeded_store().await;
        let before_order = store
            .read(|s| s.categories.order_for_team(&team()).to_vec())
            .await;

        let result = create_category(
            &store,
            &FakeServer::failing(),
            &team(),
            "Projects",
            vec![ChannelId::from("channel1")],
        )
        .await;
        assert!(result.is_err());

        assert_eq!(
            channel_ids(&store, "category1").await,
            ["channel1", "channel2"].map(ChannelId::from)
        );
        let after_order = store
            .read(|s| s.categories.order_for_team(&team()).to_vec())
            .await;
        assert_eq!(after_order, before_order);
    }

    #[tokio::test]
    async fn delete_redistributes_channels_by_type() {
        let store = seeded_store().await;
        store
            .dispatch(StoreEvent::ChannelsReceived {
                channels: vec![
                    Channel {
                        id: ChannelId::from("channel1"),
                        team_id: team(),
                        channel_type: ChannelType::Open,
                        ..Channel::default()
                    },
                    Channel {
                        id: ChannelId::from("channel2"),
                        channel_type: ChannelType::Direct,
                        name: "me__bob".to_string(),
                        ..Channel::default()
                    },
                ],
            })
            .await;
        let server = FakeServer::default();

        delete_category(&store, &server, &CategoryId::from("category1"))
            .await
            .unwrap();

        assert!(store
            .read(|s| s.categories.category(&CategoryId::from("category1")).is_none())
            .await);
        assert_eq!(
            channel_ids(&store, "team1-channels").await,
            ["channel1"].map(ChannelId::from)
        );
        assert_eq!(
            channel_ids(&store, "team1-direct_messages").await,
            ["channel2"].map(ChannelId::from)
        );
    }

    #[tokio::test]
    async fn failed_rename_rolls_back_the_display_name() {
        let store = seeded_store().await;

        let result = rename_category(
            &store,
            &FakeServer::failing(),
            &CategoryId::from("category1"),
            "Renamed",
        )
        .await;
        assert!(result.is_err());

        let name = store
            .read(|s| {
                s.categories
                    .category(&CategoryId::from("category1"))
                    .unwrap()
                    .display_name
                    .clone()
            })
            .await;
        assert_eq!(name, "category1");
    }

    #[tokio::test]
    async fn sorting_change_persists_through_the_server() {
        let store = seeded_store().await;
        let server = FakeServer::default();

        set_category_sorting(
            &store,
            &server,
            &CategoryId::from("category1"),
            CategorySorting::Recency,
        )
        .await
        .unwrap();

        let sorting = store
            .read(|s| {
                s.categories
                    .category(&CategoryId::from("category1"))
                    .unwrap()
                    .sorting
            })
            .await;
        assert_eq!(sorting, CategorySorting::Recency);
        assert_eq!(server.category_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_category_is_an_error_not_a_dispatch() {
        let store = seeded_store().await;
        let server = FakeServer::default();

        let result = rename_category(
            &store,
            &server,
            &CategoryId::from("missing"),
            "whatever",
        )
        .await;
        assert!(matches!(result, Err(AppError::CategoryNotFound(_))));
        assert_eq!(server.category_calls.load(Ordering::SeqCst), 0);
    }

    mod disjointness {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Add { category: usize, channel: usize },
            Move { category: usize, channel: usize, index: usize },
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0..4usize, 0..6usize).prop_map(|(category, channel)| Op::Add { category, channel }),
                (0..4usize, 0..6usize, 0..6usize)
                    .prop_map(|(category, channel, index)| Op::Move { category, channel, index }),
            ]
        }

        fn seeded_state() -> ViewState {
            let mut state = ViewState::default();
            reduce(
                &mut state,
                StoreEvent::CurrentUserReceived {
                    user_id: UserId::from("me"),
                },
            );
            reduce(&mut state, StoreEvent::TeamMembershipReceived { team_id: team() });
            reduce(
                &mut state,
                StoreEvent::CategoriesReceived {
                    categories: vec![
                        custom("custom-a", &["ch0", "ch1"]),
                        custom("custom-b", &["ch2", "ch3"]),
                    ],
                },
            );
            state
        }

        proptest! {
            // After any sequence of adds/moves, no channel id appears in
            // two same-team categories.
            #[test]
            fn channel_ids_stay_disjoint(ops in proptest::collection::vec(op_strategy(), 1..40)) {
                let categories = [
                    CategoryId::from("team1-favorites"),
                    CategoryId::from("team1-channels"),
                    CategoryId::from("custom-a"),
                    CategoryId::from("custom-b"),
                ];
                let mut state = seeded_state();
                for op in ops {
                    let result = match op {
                        Op::Add { category, channel } => plan_channel_move(
                            &mut state,
                            &categories[category],
                            &ChannelId::from(format!("ch{channel}")),
                            None,
                            false,
                        ),
                        Op::Move { category, channel, index } => plan_channel_move(
                            &mut state,
                            &categories[category],
                            &ChannelId::from(format!("ch{channel}")),
                            Some(index),
                            true,
                        ),
                    };
                    prop_assert!(result.is_ok());
                }

                let mut seen = std::collections::HashSet::new();
                for category in state.categories.categories_of_team(&team()) {
                    for id in &category.channel_ids {
                        prop_assert!(
                            seen.insert(id.clone()),
                            "channel {id} listed twice (last in {})",
                            category.id
                        );
                    }
                }
            }
        }
    }
}

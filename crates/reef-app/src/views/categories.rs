//! # Channel Categories View State
//!
//! The category store: category records by id plus the per-team ordering
//! of category ids. The ordering lives in its own map so reordering never
//! rewrites the category records themselves.

use reef_core::{CategoryId, ChannelId, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Category type, with the server wire encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CategoryType {
    /// Favorited channels of any type
    #[serde(rename = "favorites")]
    Favorites,
    /// Open channels ("Channels" in the sidebar)
    #[serde(rename = "channels")]
    Public,
    /// Private channels
    #[serde(rename = "private")]
    Private,
    /// Direct and group conversations
    #[serde(rename = "direct_messages")]
    DirectMessages,
    /// User-created category
    #[default]
    #[serde(rename = "custom")]
    Custom,
}

impl CategoryType {
    /// Id suffix for the deterministically-named default categories.
    fn default_id_slug(&self) -> Option<&'static str> {
        match self {
            Self::Favorites => Some("favorites"),
            Self::Public => Some("channels"),
            Self::DirectMessages => Some("direct_messages"),
            Self::Private | Self::Custom => None,
        }
    }
}

/// How a category orders its channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CategorySorting {
    /// Type-appropriate default
    #[default]
    #[serde(rename = "")]
    Default,
    /// By display name
    #[serde(rename = "alpha")]
    Alphabetical,
    /// Most recent activity first
    #[serde(rename = "recent")]
    Recency,
    /// Explicit user-chosen order via `channel_ids`
    #[serde(rename = "manual")]
    Manual,
}

/// A sidebar category, wire-shaped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelCategory {
    /// Category identifier
    pub id: CategoryId,
    /// Owning team
    pub team_id: TeamId,
    /// Category type
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    /// Name shown in the sidebar
    pub display_name: String,
    /// Sorting mode
    #[serde(default)]
    pub sorting: CategorySorting,
    /// Channel membership and, under manual sorting, explicit order
    #[serde(default)]
    pub channel_ids: Vec<ChannelId>,
}

impl ChannelCategory {
    /// Whether the category lists a channel.
    pub fn contains_channel(&self, id: &ChannelId) -> bool {
        self.channel_ids.iter().any(|c| c == id)
    }
}

/// Deterministic id of a team's default category of the given type.
///
/// `None` for types that have no default category.
pub fn default_category_id(team_id: &TeamId, category_type: CategoryType) -> Option<CategoryId> {
    category_type
        .default_id_slug()
        .map(|slug| CategoryId::from(format!("{}-{slug}", team_id.as_str())))
}

fn default_category(team_id: &TeamId, category_type: CategoryType) -> Option<ChannelCategory> {
    let id = default_category_id(team_id, category_type)?;
    let (display_name, sorting) = match category_type {
        CategoryType::Favorites => ("Favorites", CategorySorting::Default),
        CategoryType::Public => ("Channels", CategorySorting::Default),
        CategoryType::DirectMessages => ("Direct Messages", CategorySorting::Alphabetical),
        CategoryType::Private | CategoryType::Custom => return None,
    };
    Some(ChannelCategory {
        id,
        team_id: team_id.clone(),
        category_type,
        display_name: display_name.to_string(),
        sorting,
        channel_ids: Vec::new(),
    })
}

/// Category store: records by id plus per-team ordering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoriesState {
    by_id: Arc<HashMap<CategoryId, ChannelCategory>>,
    order_by_team: Arc<HashMap<TeamId, Vec<CategoryId>>>,
}

impl CategoriesState {
    /// Get a category by id.
    pub fn category(&self, id: &CategoryId) -> Option<&ChannelCategory> {
        self.by_id.get(id)
    }

    /// A team's category order. Empty when the team is unknown.
    pub fn order_for_team(&self, team_id: &TeamId) -> &[CategoryId] {
        self.order_by_team
            .get(team_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// A team's default category of the given type, when present.
    pub fn default_category_for_team(
        &self,
        team_id: &TeamId,
        category_type: CategoryType,
    ) -> Option<&ChannelCategory> {
        let id = default_category_id(team_id, category_type)?;
        self.by_id.get(&id)
    }

    /// All categories of one team, in no particular order.
    pub fn categories_of_team<'a>(
        &'a self,
        team_id: &'a TeamId,
    ) -> impl Iterator<Item = &'a ChannelCategory> {
        self.by_id.values().filter(move |c| &c.team_id == team_id)
    }

    /// The same-team category currently listing a channel, if any.
    pub fn category_containing<'a>(
        &'a self,
        team_id: &'a TeamId,
        channel_id: &ChannelId,
    ) -> Option<&'a ChannelCategory> {
        self.categories_of_team(team_id)
            .find(|c| c.contains_channel(channel_id))
    }

    /// Lazily synthesize a team's default categories.
    ///
    /// Idempotent: a team that already has its defaults is left
    /// completely untouched (existing channel lists included), and the
    /// order array is only prepended to on first creation.
    pub fn ensure_default_categories(&mut self, team_id: &TeamId) {
        let defaults = [
            CategoryType::Favorites,
            CategoryType::Public,
            CategoryType::DirectMessages,
        ];

        let missing: Vec<ChannelCategory> = defaults
            .iter()
            .filter_map(|ty| default_category(team_id, *ty))
            .filter(|c| !self.by_id.contains_key(&c.id))
            .collect();
        if missing.is_empty() {
            return;
        }

        let by_id = Arc::make_mut(&mut self.by_id);
        let order = Arc::make_mut(&mut self.order_by_team)
            .entry(team_id.clone())
            .or_default();
        // Prepend in reverse so the final order matches `defaults`.
        for category in missing.into_iter().rev() {
            if !order.contains(&category.id) {
                order.insert(0, category.id.clone());
            }
            by_id.insert(category.id.clone(), category);
        }
    }

    /// Merge one category record by id.
    pub fn receive_category(&mut self, category: ChannelCategory) {
        Arc::make_mut(&mut self.by_id).insert(category.id.clone(), category);
    }

    /// Merge a batch of category records.
    pub fn receive_categories(&mut self, categories: impl IntoIterator<Item = ChannelCategory>) {
        let mut iter = categories.into_iter().peekable();
        if iter.peek().is_none() {
            return;
        }
        let by_id = Arc::make_mut(&mut self.by_id);
        for category in iter {
            by_id.insert(category.id.clone(), category);
        }
    }

    /// Replace a team's category order wholesale.
    pub fn receive_order(&mut self, team_id: TeamId, order: Vec<CategoryId>) {
        Arc::make_mut(&mut self.order_by_team).insert(team_id, order);
    }

    /// Remove a category record and scrub it from every order array.
    ///
    /// Scrubbing all teams is defensive; only one team's array should
    /// actually contain the id.
    pub fn delete_category(&mut self, id: &CategoryId) {
        if self.by_id.contains_key(id) {
            Arc::make_mut(&mut self.by_id).remove(id);
        }
        let listed = self
            .order_by_team
            .values()
            .any(|order| order.contains(id));
        if listed {
            for order in Arc::make_mut(&mut self.order_by_team).values_mut() {
                order.retain(|c| c != id);
            }
        }
    }

    /// Strip a channel from any category that lists it.
    ///
    /// No-op (allocation untouched) when no category lists the channel.
    pub fn channel_left(&mut self, channel_id: &ChannelId) {
        let listed = self
            .by_id
            .values()
            .any(|c| c.contains_channel(channel_id));
        if !listed {
            return;
        }
        for category in Arc::make_mut(&mut self.by_id).values_mut() {
            category.channel_ids.retain(|c| c != channel_id);
        }
    }

    /// Drop every category of a team along with its order entry.
    pub fn team_left(&mut self, team_id: &TeamId) {
        if self.by_id.values().any(|c| &c.team_id == team_id) {
            Arc::make_mut(&mut self.by_id).retain(|_, c| &c.team_id != team_id);
        }
        if self.order_by_team.contains_key(team_id) {
            Arc::make_mut(&mut self.order_by_team).remove(team_id);
        }
    }

    /// Reset to empty (logout).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn by_id_arc(&self) -> &Arc<HashMap<CategoryId, ChannelCategory>> {
        &self.by_id
    }

    pub(crate) fn order_arc(&self) -> &Arc<HashMap<TeamId, Vec<CategoryId>>> {
        &self.order_by_team
    }
}

//! # Pipeline Sort Stage
//!
//! Stage 6: order a category's channels. Direct channels sort by the
//! counterpart's display name and group channels by the joined names of
//! their other members, so conversations sort by who they are with, not
//! by their opaque slugs. Comparison is case-insensitive and
//! numeric-aware ("Channel 2" before "Channel 10").

use std::cmp::Ordering;
use std::collections::HashMap;

use reef_core::ChannelId;

use crate::core::ViewState;
use crate::views::{CategorySorting, Channel, ChannelCategory, ChannelType};

/// Case-insensitive, numeric-aware name comparison.
///
/// Digit runs compare as numbers; everything else compares by lowercased
/// character. This approximates locale collation closely enough for
/// sidebar ordering without a collation table.
pub fn compare_display_names(a: &str, b: &str) -> Ordering {
    let mut ca = a.chars().peekable();
    let mut cb = b.chars().peekable();

    loop {
        match (ca.peek().copied(), cb.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let na = take_digit_run(&mut ca);
                let nb = take_digit_run(&mut cb);
                let sa = na.trim_start_matches('0');
                let sb = nb.trim_start_matches('0');
                // More significant digits wins; equal lengths compare
                // lexicographically, which for equal-length digit runs is
                // numeric order.
                let ord = sa.len().cmp(&sb.len()).then_with(|| sa.cmp(sb));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let lx = x.to_lowercase().next().unwrap_or(x);
                let ly = y.to_lowercase().next().unwrap_or(y);
                if lx != ly {
                    return lx.cmp(&ly);
                }
                ca.next();
                cb.next();
            }
        }
    }
}

fn take_digit_run(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

/// The name a channel sorts under.
///
/// Missing cross-references (counterpart profile not loaded, unknown
/// group membership) degrade to empty or fallback keys; sorting never
/// fails.
pub fn sort_display_name(state: &ViewState, channel: &Channel) -> String {
    match channel.channel_type {
        ChannelType::Direct => channel
            .counterpart(state.users.current_user_id())
            .and_then(|id| state.users.profile(&id))
            .map(|p| p.display_name())
            .unwrap_or_default(),
        ChannelType::Group => {
            let me = state.users.current_user_id();
            match state.channels.group_members(&channel.id) {
                Some(members) => {
                    let mut names: Vec<String> = members
                        .iter()
                        .filter(|id| *id != me)
                        .map(|id| {
                            state
                                .users
                                .profile(id)
                                .map(|p| p.display_name())
                                .unwrap_or_default()
                        })
                        .collect();
                    names.sort_by(|a, b| compare_display_names(a, b));
                    names.join(", ")
                }
                None => channel.display_name.clone(),
            }
        }
        ChannelType::Open | ChannelType::Private => channel.display_name.clone(),
    }
}

fn last_activity_at(state: &ViewState, channel: &Channel) -> i64 {
    state
        .posts
        .most_recent_post_at(&channel.id)
        .unwrap_or(0)
        .max(channel.last_post_at)
}

/// Order a category's channels per its sorting mode.
///
/// Always returns a fresh list; the input is never mutated. The sort is
/// stable, so equal keys keep their incoming (id-deterministic) order.
pub fn sort_channels(
    state: &ViewState,
    category: &ChannelCategory,
    channels: &[Channel],
) -> Vec<Channel> {
    match category.sorting {
        CategorySorting::Default | CategorySorting::Alphabetical => {
            let mut keyed: Vec<(String, Channel)> = channels
                .iter()
                .map(|c| (sort_display_name(state, c), c.clone()))
                .collect();
            keyed.sort_by(|a, b| compare_display_names(&a.0, &b.0));
            keyed.into_iter().map(|(_, c)| c).collect()
        }
        CategorySorting::Recency => {
            let mut keyed: Vec<(i64, String, Channel)> = channels
                .iter()
                .map(|c| (last_activity_at(state, c), sort_display_name(state, c), c.clone()))
                .collect();
            keyed.sort_by(|a, b| {
                b.0.cmp(&a.0)
                    .then_with(|| compare_display_names(&a.1, &b.1))
            });
            keyed.into_iter().map(|(_, _, c)| c).collect()
        }
        CategorySorting::Manual => {
            let position: HashMap<&ChannelId, usize> = category
                .channel_ids
                .iter()
                .enumerate()
                .map(|(i, id)| (id, i))
                .collect();
            let mut keyed: Vec<(Option<usize>, String, Channel)> = channels
                .iter()
                .map(|c| {
                    (
                        position.get(&c.id).copied(),
                        sort_display_name(state, c),
                        c.clone(),
                    )
                })
                .collect();
            // Listed channels in list order; stragglers after, by name.
            keyed.sort_by(|a, b| match (a.0, b.0) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => compare_display_names(&a.1, &b.1),
            });
            keyed.into_iter().map(|(_, _, c)| c).collect()
        }
    }
}

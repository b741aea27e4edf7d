//! Core identifier types used across the Reef data layer
//!
//! Server entity identifiers are opaque strings on the wire, so each
//! identifier is a newtype over `String` with transparent serde. The
//! newtypes exist to keep a channel id from ever being passed where a
//! team id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Milliseconds in one day, for retention-window arithmetic.
pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw server identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The raw identifier string.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the identifier is the empty sentinel.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Unwrap into the raw string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// User identifier.
    UserId,
    "user:"
);

string_id!(
    /// Team identifier. Direct and group channels are team-agnostic and
    /// carry the empty team id.
    TeamId,
    "team:"
);

string_id!(
    /// Channel identifier.
    ChannelId,
    "channel:"
);

string_id!(
    /// Channel-category identifier. Default categories use the
    /// deterministic `{team_id}-favorites|channels|direct_messages` form;
    /// custom categories carry server-assigned ids.
    CategoryId,
    "category:"
);

/// Build the canonical name of a direct channel between two users.
///
/// The two ids are joined with `__` in sorted order, so both participants
/// derive the same name.
pub fn direct_channel_name(a: &UserId, b: &UserId) -> String {
    if a.as_str() <= b.as_str() {
        format!("{}__{}", a.as_str(), b.as_str())
    } else {
        format!("{}__{}", b.as_str(), a.as_str())
    }
}

impl ChannelId {
    /// Extract the counterpart user id from a direct-channel `name`.
    ///
    /// Returns `None` when the name does not follow the `idA__idB`
    /// encoding or when neither side matches `me`. A self-DM
    /// (`me__me`) resolves to `me`.
    pub fn counterpart_in_name(name: &str, me: &UserId) -> Option<UserId> {
        let (a, b) = name.split_once("__")?;
        if a == me.as_str() {
            Some(UserId::from(b))
        } else if b == me.as_str() {
            Some(UserId::from(a))
        } else {
            None
        }
    }
}

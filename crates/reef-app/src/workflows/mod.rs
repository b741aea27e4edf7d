//! # Workflows: Optimistic Mutations
//!
//! Multi-step mutation commands, portable across frontends. Every
//! workflow follows the same contract:
//!
//! 1. **Plan + apply** under one store lock: look up the records the
//!    mutation touches, capture them as the rollback snapshot, and
//!    dispatch the optimistic update, atomically, so a racing workflow
//!    can never slip between snapshot and dispatch.
//! 2. **Round-trip** the server through the [`crate::effects`] traits.
//! 3. **Commit** the confirmed records on `Ok` (frequently a no-op
//!    duplicate of the optimistic state), or **roll back** the snapshot
//!    on `Err` and return the error to the caller.
//!
//! Snapshots are scoped to exactly the records a workflow touched.
//! When two mutations race and the earlier one fails after the later
//! one committed, rolling back the earlier snapshot restores only its
//! own records and leaves the later mutation's work in place.

pub mod categories;
pub mod preferences;

pub use categories::{
    add_channel_to_category, create_category, delete_category, move_category,
    move_channel_to_category, rename_category, set_category_sorting,
};
pub use preferences::{
    delete_preferences, favorite_channel, record_channel_open_time, save_preferences,
    set_direct_channel_visible, set_group_channel_visible,
};

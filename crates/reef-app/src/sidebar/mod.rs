//! # Sidebar Derivation Pipeline
//!
//! Computes which channels appear in which sidebar category, in what
//! order. The pipeline is a fixed composition of pure stages:
//!
//! ```text
//! gather → membership → favorites → type → auto-closed → manually-closed → sort
//! ```
//!
//! Stages that remove nothing hand their input through untouched
//! ([`std::borrow::Cow::Borrowed`]); the sort stage always allocates.
//! The query objects in [`queries`] memoize the whole chain on the `Arc`
//! identity of the slices it reads, so an unchanged store returns the
//! same allocation call after call.
//!
//! The pipeline never fails: a channel whose counterpart profile has not
//! loaded yet sorts with an empty key instead of erroring, so category
//! lists are complete even before secondary data arrives.

pub mod filters;
pub mod queries;
pub mod sort;

pub use queries::{category_ids_for_team, CategoriesForTeam, ChannelsForCategory};

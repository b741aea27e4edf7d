//! Data-layer errors
//!
//! Reducers never error; malformed events reduce to no-ops. Errors
//! exist only at the workflow boundary, where a mutation can fail
//! locally (missing reference) or remotely (server round-trip).

use reef_core::{CategoryId, TeamId};
use thiserror::Error;

use crate::effects::EffectError;

/// Error returned by mutation workflows.
#[derive(Debug, Error)]
pub enum AppError {
    /// The referenced category does not exist locally.
    #[error("category {0} not found")]
    CategoryNotFound(CategoryId),

    /// The referenced team has no category order.
    #[error("no category order for team {0}")]
    TeamOrderMissing(TeamId),

    /// The server round-trip failed; the optimistic update was rolled
    /// back before this was returned.
    #[error(transparent)]
    Effect(#[from] EffectError),
}

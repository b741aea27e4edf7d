//! # Sidebar Configuration

use reef_core::MILLIS_PER_DAY;
use serde::{Deserialize, Serialize};

/// Server-driven knobs for sidebar behavior.
///
/// Arrives with the server's client configuration; nothing in the data
/// layer reads process globals (the retention window and the clock are
/// always explicit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarConfig {
    /// Server-side switch for hiding stale DMs/GMs automatically.
    pub autoclose_dms_enabled: bool,
    /// How long a DM/GM may sit untouched before it is hidden (ms).
    pub autoclose_window_ms: i64,
}

impl SidebarConfig {
    /// Default retention window: seven days.
    pub const DEFAULT_AUTOCLOSE_WINDOW_MS: i64 = 7 * MILLIS_PER_DAY;
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            autoclose_dms_enabled: false,
            autoclose_window_ms: Self::DEFAULT_AUTOCLOSE_WINDOW_MS,
        }
    }
}

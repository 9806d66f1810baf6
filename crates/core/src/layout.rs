//! Dashboard layout snapshot: the full set of a user's widgets plus
//! grid-level settings.

use serde::{Deserialize, Serialize};

use crate::types::{Timestamp, UserId};
use crate::widget::Widget;

/// Default number of grid columns.
pub const DEFAULT_GRID_COLUMNS: i32 = 4;

/// Default gap between grid cells, in pixels.
pub const DEFAULT_GRID_GAP: i32 = 16;

/// Grid-level display settings for a dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSettings {
    pub columns: i32,
    pub gap: i32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            columns: DEFAULT_GRID_COLUMNS,
            gap: DEFAULT_GRID_GAP,
        }
    }
}

/// The full persisted snapshot of one user's dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardLayout {
    pub user_id: UserId,
    pub widgets: Vec<Widget>,
    #[serde(default)]
    pub grid: GridSettings,
    pub updated_at: Timestamp,
}

impl DashboardLayout {
    /// An empty layout for a fresh session.
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            widgets: Vec::new(),
            grid: GridSettings::default(),
            updated_at: chrono::Utc::now(),
        }
    }
}

//! Widget data model: types, sizes, positions, settings, and DTOs.
//!
//! A [`Widget`] is one configured instance on a user's dashboard,
//! bound to a [`WidgetType`] that selects its data source and
//! renderer. The type set is closed; adding a widget type is a code
//! change, not a runtime event.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{Timestamp, UserId, WidgetId};

// ---------------------------------------------------------------------------
// Widget type
// ---------------------------------------------------------------------------

/// Closed enumeration of widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetType {
    Schedule,
    Grades,
    Assignments,
    Tasks,
    News,
    Finance,
    SystemStats,
    Calendar,
}

impl WidgetType {
    /// The wire name of this type (serde snake_case).
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetType::Schedule => "schedule",
            WidgetType::Grades => "grades",
            WidgetType::Assignments => "assignments",
            WidgetType::Tasks => "tasks",
            WidgetType::News => "news",
            WidgetType::Finance => "finance",
            WidgetType::SystemStats => "system_stats",
            WidgetType::Calendar => "calendar",
        }
    }
}

impl std::fmt::Display for WidgetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Sizes and positions
// ---------------------------------------------------------------------------

/// Semantic size step used by both widget size families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticSize {
    Small,
    Medium,
    Large,
}

/// Size descriptor for a widget.
///
/// Most widgets use a single semantic step (`"medium"` on the wire);
/// the split family sizes width and height independently
/// (`{"width": "large", "height": "small"}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WidgetSize {
    Uniform(SemanticSize),
    Split {
        width: SemanticSize,
        height: SemanticSize,
    },
}

/// Persisted grid coordinates, width/height in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

// ---------------------------------------------------------------------------
// Per-widget settings
// ---------------------------------------------------------------------------

/// Per-widget settings, keyed by widget type.
///
/// Each variant carries the strongly-typed payload its renderer
/// understands; the presentation layer pattern-matches on the tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetSettings {
    Schedule {
        #[serde(default)]
        week_offset: i32,
        #[serde(default)]
        show_weekends: bool,
    },
    Grades {
        #[serde(default)]
        term: Option<String>,
        #[serde(default)]
        show_averages: bool,
    },
    Assignments {
        days_ahead: u32,
        #[serde(default)]
        include_submitted: bool,
    },
    Tasks {
        #[serde(default)]
        show_completed: bool,
    },
    News {
        #[serde(default)]
        feed: Option<String>,
        max_items: u32,
    },
    Finance {
        currency: String,
        #[serde(default)]
        include_pending: bool,
    },
    SystemStats {
        refresh_secs: u64,
        #[serde(default)]
        show_load_graph: bool,
    },
    Calendar {
        #[serde(default)]
        week_starts_monday: bool,
    },
}

// ---------------------------------------------------------------------------
// Widget entity and create DTO
// ---------------------------------------------------------------------------

/// One configured widget instance on a user's dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: WidgetId,
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    pub title: String,
    pub size: WidgetSize,
    pub position: GridRect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<WidgetSettings>,
    pub user_id: UserId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new widget. The remote store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WidgetDraft {
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    pub size: WidgetSize,
    pub position: GridRect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<WidgetSettings>,
    pub user_id: UserId,
}

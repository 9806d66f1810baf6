//! Position/grid mapper.
//!
//! Pure functions translating semantic sizes into grid units and
//! assigning default row-major positions. Deterministic for the same
//! inputs; demo provisioning and the reposition no-op guard depend on
//! that.

use crate::widget::{GridRect, SemanticSize, Widget, WidgetSize};

/// A widget's footprint in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridUnits {
    pub width: i32,
    pub height: i32,
}

/// Map a semantic size to grid units.
///
/// Uniform sizes use the fixed dashboard lookup (small 1x1, medium
/// 2x1, large 2x2). Split sizes map width and height independently
/// (small 1, medium 2, large 3).
pub fn grid_size(size: &WidgetSize) -> GridUnits {
    match size {
        WidgetSize::Uniform(SemanticSize::Small) => GridUnits {
            width: 1,
            height: 1,
        },
        WidgetSize::Uniform(SemanticSize::Medium) => GridUnits {
            width: 2,
            height: 1,
        },
        WidgetSize::Uniform(SemanticSize::Large) => GridUnits {
            width: 2,
            height: 2,
        },
        WidgetSize::Split { width, height } => GridUnits {
            width: axis_units(*width),
            height: axis_units(*height),
        },
    }
}

fn axis_units(size: SemanticSize) -> i32 {
    match size {
        SemanticSize::Small => 1,
        SemanticSize::Medium => 2,
        SemanticSize::Large => 3,
    }
}

/// Assign the `index`-th widget of a batch its default grid slot.
///
/// Row-major placement: widgets of `units.width` fit
/// `columns / units.width` per row (at least one), so
/// `x = (index % per_row) * width` and `y = (index / per_row) * height`.
pub fn default_position(index: usize, units: GridUnits, columns: i32) -> GridRect {
    let per_row = (columns / units.width).max(1) as usize;
    GridRect {
        x: (index % per_row) as i32 * units.width,
        y: (index / per_row) as i32 * units.height,
        width: units.width,
        height: units.height,
    }
}

/// Whether the candidate list changes anything a reposition cares
/// about, compared index-aligned: a different widget id at some index
/// (a reorder) or a different `(x, y, width, height)`. Lists of
/// different lengths always differ.
pub fn positions_differ(current: &[Widget], candidate: &[Widget]) -> bool {
    if current.len() != candidate.len() {
        return true;
    }
    current
        .iter()
        .zip(candidate)
        .any(|(a, b)| a.id != b.id || a.position != b.position)
}

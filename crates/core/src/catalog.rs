//! Static widget catalog.
//!
//! Process-wide registry mapping each [`WidgetType`] to its display
//! metadata, default size, and role eligibility. Loaded at compile
//! time and never mutated at runtime.

use crate::error::CoreError;
use crate::roles::Role;
use crate::widget::{SemanticSize, WidgetSize, WidgetType};

/// Widget category, used to group templates in the "add widget" picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetCategory {
    Academic,
    Productivity,
    Information,
    Administration,
}

/// Catalog entry: static metadata describing one widget type.
#[derive(Debug, Clone, Copy)]
pub struct WidgetTemplate {
    pub widget_type: WidgetType,
    pub title: &'static str,
    pub description: &'static str,
    pub category: WidgetCategory,
    pub icon: &'static str,
    pub default_size: WidgetSize,
    pub available_roles: &'static [Role],
}

const ALL_ROLES: &[Role] = &[Role::Student, Role::Teacher, Role::Admin];
const ACADEMIC_ROLES: &[Role] = &[Role::Student, Role::Teacher];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// The full catalog, in picker display order.
pub static TEMPLATES: &[WidgetTemplate] = &[
    WidgetTemplate {
        widget_type: WidgetType::Schedule,
        title: "Class Schedule",
        description: "Upcoming lessons for the current week",
        category: WidgetCategory::Academic,
        icon: "calendar-days",
        default_size: WidgetSize::Uniform(SemanticSize::Medium),
        available_roles: ACADEMIC_ROLES,
    },
    WidgetTemplate {
        widget_type: WidgetType::Grades,
        title: "Grades",
        description: "Latest grades and term averages",
        category: WidgetCategory::Academic,
        icon: "graduation-cap",
        default_size: WidgetSize::Uniform(SemanticSize::Medium),
        available_roles: ACADEMIC_ROLES,
    },
    WidgetTemplate {
        widget_type: WidgetType::Assignments,
        title: "Assignments",
        description: "Open assignments and due dates",
        category: WidgetCategory::Academic,
        icon: "clipboard-list",
        default_size: WidgetSize::Uniform(SemanticSize::Medium),
        available_roles: ACADEMIC_ROLES,
    },
    WidgetTemplate {
        widget_type: WidgetType::Tasks,
        title: "Tasks",
        description: "Personal to-do list",
        category: WidgetCategory::Productivity,
        icon: "check-square",
        default_size: WidgetSize::Uniform(SemanticSize::Medium),
        available_roles: ALL_ROLES,
    },
    WidgetTemplate {
        widget_type: WidgetType::News,
        title: "Campus News",
        description: "Announcements and news feed",
        category: WidgetCategory::Information,
        icon: "newspaper",
        default_size: WidgetSize::Uniform(SemanticSize::Medium),
        available_roles: ALL_ROLES,
    },
    WidgetTemplate {
        widget_type: WidgetType::Finance,
        title: "Finance",
        description: "Account balance and open invoices",
        category: WidgetCategory::Administration,
        icon: "banknote",
        default_size: WidgetSize::Split {
            width: SemanticSize::Medium,
            height: SemanticSize::Small,
        },
        available_roles: ADMIN_ONLY,
    },
    WidgetTemplate {
        widget_type: WidgetType::SystemStats,
        title: "System Stats",
        description: "Server load and service health",
        category: WidgetCategory::Administration,
        icon: "activity",
        default_size: WidgetSize::Split {
            width: SemanticSize::Large,
            height: SemanticSize::Small,
        },
        available_roles: ADMIN_ONLY,
    },
    WidgetTemplate {
        widget_type: WidgetType::Calendar,
        title: "Calendar",
        description: "Month view with personal events",
        category: WidgetCategory::Productivity,
        icon: "calendar",
        default_size: WidgetSize::Uniform(SemanticSize::Large),
        available_roles: ALL_ROLES,
    },
];

/// Demo starter set per role, in provisioning order.
const STUDENT_DEMO: &[WidgetType] = &[
    WidgetType::Schedule,
    WidgetType::Grades,
    WidgetType::Assignments,
    WidgetType::Tasks,
];
const TEACHER_DEMO: &[WidgetType] = &[
    WidgetType::Schedule,
    WidgetType::Tasks,
    WidgetType::Calendar,
    WidgetType::News,
];
const ADMIN_DEMO: &[WidgetType] = &[
    WidgetType::Finance,
    WidgetType::News,
    WidgetType::Tasks,
    WidgetType::SystemStats,
];

/// All templates available to `role`, in catalog order.
pub fn templates_for_role(role: Role) -> Vec<&'static WidgetTemplate> {
    TEMPLATES
        .iter()
        .filter(|t| t.available_roles.contains(&role))
        .collect()
}

/// Look up the template for a widget type.
///
/// A miss means the registry is out of sync with the type enum; the
/// caller must fail closed rather than default.
pub fn template_for_type(widget_type: WidgetType) -> Result<&'static WidgetTemplate, CoreError> {
    TEMPLATES
        .iter()
        .find(|t| t.widget_type == widget_type)
        .ok_or(CoreError::UnknownWidgetType(widget_type))
}

/// The demo widget types to provision for `role`.
///
/// Filtered to types that actually have a catalog entry (and therefore
/// a renderer), de-duplicated preserving order, and restricted to the
/// role's eligible templates.
pub fn demo_types_for_role(role: Role) -> Vec<WidgetType> {
    let raw = match role {
        Role::Student => STUDENT_DEMO,
        Role::Teacher => TEACHER_DEMO,
        Role::Admin => ADMIN_DEMO,
    };

    let mut seen = Vec::new();
    for &ty in raw {
        if seen.contains(&ty) {
            continue;
        }
        match template_for_type(ty) {
            Ok(template) if template.available_roles.contains(&role) => seen.push(ty),
            _ => {}
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_widget_type_has_a_template() {
        for ty in [
            WidgetType::Schedule,
            WidgetType::Grades,
            WidgetType::Assignments,
            WidgetType::Tasks,
            WidgetType::News,
            WidgetType::Finance,
            WidgetType::SystemStats,
            WidgetType::Calendar,
        ] {
            assert!(
                template_for_type(ty).is_ok(),
                "Widget type '{ty}' is missing from the catalog"
            );
        }
    }

    #[test]
    fn student_cannot_see_admin_templates() {
        let templates = templates_for_role(Role::Student);
        assert!(templates
            .iter()
            .all(|t| t.widget_type != WidgetType::SystemStats
                && t.widget_type != WidgetType::Finance));
    }

    #[test]
    fn templates_for_role_preserves_catalog_order() {
        let templates = templates_for_role(Role::Student);
        let positions: Vec<usize> = templates
            .iter()
            .map(|t| {
                TEMPLATES
                    .iter()
                    .position(|c| c.widget_type == t.widget_type)
                    .unwrap()
            })
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn student_demo_set_is_the_documented_starter_set() {
        assert_eq!(
            demo_types_for_role(Role::Student),
            vec![
                WidgetType::Schedule,
                WidgetType::Grades,
                WidgetType::Assignments,
                WidgetType::Tasks,
            ]
        );
    }

    #[test]
    fn demo_sets_contain_no_duplicates() {
        for role in [Role::Student, Role::Teacher, Role::Admin] {
            let types = demo_types_for_role(role);
            let mut deduped = types.clone();
            deduped.dedup();
            assert_eq!(types.len(), deduped.len());
            for ty in &types {
                assert_eq!(types.iter().filter(|t| *t == ty).count(), 1);
            }
        }
    }

    #[test]
    fn demo_sets_respect_role_eligibility() {
        for role in [Role::Student, Role::Teacher, Role::Admin] {
            for ty in demo_types_for_role(role) {
                let template = template_for_type(ty).unwrap();
                assert!(
                    template.available_roles.contains(&role),
                    "Demo set for {role} contains ineligible type '{ty}'"
                );
            }
        }
    }
}

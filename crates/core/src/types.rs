//! Shared type aliases and identifier helpers.

/// Widget identifiers are strings assigned by the remote store on
/// creation. A locally generated placeholder id is never durable.
pub type WidgetId = String;

/// User identifiers come from the identity provider.
pub type UserId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Prefix marking an id that was generated locally and never confirmed
/// by the remote store.
pub const PLACEHOLDER_ID_PREFIX: &str = "local-";

/// Generate a fresh placeholder id (UUID v4 behind the local prefix).
///
/// For store implementations and test doubles that must hand out an
/// id before a durable one exists; the engine itself never puts a
/// placeholder id on a draft. Placeholder ids must never be admitted
/// into durable state; see [`is_placeholder_id`].
pub fn placeholder_id() -> WidgetId {
    format!("{PLACEHOLDER_ID_PREFIX}{}", uuid::Uuid::new_v4())
}

/// Whether `id` is empty or carries the local placeholder prefix.
pub fn is_placeholder_id(id: &str) -> bool {
    id.is_empty() || id.starts_with(PLACEHOLDER_ID_PREFIX)
}

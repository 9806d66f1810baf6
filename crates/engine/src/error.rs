use gridboard_core::error::CoreError;
use gridboard_core::widget::WidgetType;
use gridboard_store::StoreError;

/// Errors surfaced by layout engine operations.
///
/// Persistence failures of fire-and-forget side effects are *not*
/// represented here; they land in the session's
/// [`SyncError`](crate::session::SyncError) slot instead.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A domain-level error from `gridboard-core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A persistence error from `gridboard-store`.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The widget type is already on the dashboard.
    #[error("Widget type '{0}' is already on the dashboard")]
    DuplicateWidget(WidgetType),

    /// The remote store returned a transient id it never confirmed;
    /// the widget is not admitted into the in-memory list.
    #[error("Remote store returned a placeholder id: {0}")]
    PlaceholderRejected(String),

    /// A widget draft failed validation before it was sent anywhere.
    #[error("Invalid widget draft: {0}")]
    InvalidDraft(#[from] validator::ValidationErrors),

    /// An operation was invoked without an active session.
    #[error("No active session")]
    NoActiveSession,
}

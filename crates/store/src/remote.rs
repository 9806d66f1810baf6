//! The narrow interface over the remote widget store.

use async_trait::async_trait;

use gridboard_core::layout::DashboardLayout;
use gridboard_core::types::UserId;
use gridboard_core::widget::{Widget, WidgetDraft};

use crate::error::StoreError;

/// Authoritative backend persistence for widgets and layouts.
///
/// One method per network call; each call can fail independently.
/// No retries happen at this layer -- retry and fallback policy belong
/// to the layout engine.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch all widgets for a user.
    async fn fetch_widgets(&self, user_id: &UserId) -> Result<Vec<Widget>, StoreError>;

    /// Fetch the user's layout snapshot, if one exists.
    async fn fetch_layout(&self, user_id: &UserId)
        -> Result<Option<DashboardLayout>, StoreError>;

    /// Create a widget. The server assigns the durable id.
    async fn create_widget(&self, draft: &WidgetDraft) -> Result<Widget, StoreError>;

    /// Update an existing widget.
    async fn update_widget(&self, widget: &Widget) -> Result<Widget, StoreError>;

    /// Delete a widget by id. Idempotent: deleting an already-deleted
    /// id is not an error.
    async fn delete_widget(&self, id: &str) -> Result<(), StoreError>;

    /// Persist the full widget list as the user's layout.
    async fn save_layout(&self, user_id: &UserId, widgets: &[Widget]) -> Result<(), StoreError>;
}

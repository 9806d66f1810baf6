//! The layout engine: canonical owner of the active user's widget list.
//!
//! All mutations go through the operations here, invoked by a single
//! logical owner (`&mut self`). Each operation applies atomically to
//! the in-memory list; persistence side effects run as tracked
//! background tasks whose failures surface through the session's
//! [`SyncError`] slot, never as failures of the triggering call.
//!
//! Overlapping in-flight operations are applied in invocation order
//! but are not serialized against each other: if an update and a
//! delete for the same widget id race, the last write to the
//! in-memory list wins, and a delete is final once it has run (a
//! late-arriving update never re-inserts the widget).

use std::sync::{Arc, Mutex};

use tokio::task::JoinSet;
use validator::Validate;

use gridboard_core::catalog::{self, WidgetTemplate};
use gridboard_core::grid;
use gridboard_core::layout::{DashboardLayout, GridSettings};
use gridboard_core::types::is_placeholder_id;
use gridboard_core::widget::{Widget, WidgetDraft, WidgetType};
use gridboard_store::{FallbackStore, RemoteStore, StoreError};

use crate::error::EngineError;
use crate::session::{record_sync_error, Session, SessionPhase, SyncError, SyncErrorSlot, UserContext};

/// Per-session widget layout engine.
pub struct LayoutEngine {
    remote: Arc<dyn RemoteStore>,
    fallback: Arc<FallbackStore>,
    session: Option<Session>,
    sync_error: SyncErrorSlot,
    pending: JoinSet<()>,
}

impl LayoutEngine {
    pub fn new(remote: Arc<dyn RemoteStore>, fallback: FallbackStore) -> Self {
        Self {
            remote,
            fallback: Arc::new(fallback),
            session: None,
            sync_error: Arc::new(Mutex::new(None)),
            pending: JoinSet::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Session lifecycle
    // -----------------------------------------------------------------------

    /// Begin (or continue) a session for `user`.
    ///
    /// An identity change discards all prior in-memory state; calling
    /// again with the same identity keeps the current state.
    pub fn start_session(&mut self, user: UserContext) {
        match &self.session {
            Some(session) if session.user == user => {
                tracing::debug!(user_id = %user.id, "Session already active for this user");
            }
            Some(session) => {
                tracing::info!(
                    old_user = %session.user.id,
                    new_user = %user.id,
                    "Identity changed, discarding session state"
                );
                self.reset(user);
            }
            None => {
                tracing::info!(user_id = %user.id, role = %user.role, "Session started");
                self.reset(user);
            }
        }
    }

    /// End the session and discard all in-memory state.
    ///
    /// In-flight persistence tasks are left to finish; they own
    /// snapshots of the data they need.
    pub fn end_session(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!(user_id = %session.user.id, "Session ended, discarding in-memory state");
        }
        self.sync_error = Arc::new(Mutex::new(None));
    }

    fn reset(&mut self, user: UserContext) {
        self.session = Some(Session::new(user));
        // Tasks spawned for the previous session keep their handle to
        // the old slot; their late failures must not surface here.
        self.sync_error = Arc::new(Mutex::new(None));
    }

    // -----------------------------------------------------------------------
    // Accessors (no I/O)
    // -----------------------------------------------------------------------

    /// The current in-memory widget list (empty without a session).
    pub fn widgets(&self) -> &[Widget] {
        self.session
            .as_ref()
            .map(|s| s.layout.widgets.as_slice())
            .unwrap_or(&[])
    }

    /// The full in-memory layout snapshot, if a session is active.
    pub fn layout(&self) -> Option<&DashboardLayout> {
        self.session.as_ref().map(|s| &s.layout)
    }

    /// Current session phase.
    pub fn phase(&self) -> SessionPhase {
        self.session
            .as_ref()
            .map(|s| s.phase)
            .unwrap_or(SessionPhase::Uninitialized)
    }

    /// The identity the engine is operating for, if any.
    pub fn current_user(&self) -> Option<&UserContext> {
        self.session.as_ref().map(|s| &s.user)
    }

    /// Whether a widget of `widget_type` is already on the dashboard.
    pub fn is_widget_added(&self, widget_type: WidgetType) -> bool {
        self.widgets().iter().any(|w| w.widget_type == widget_type)
    }

    /// The pending persistence failure, if one has not been dismissed.
    pub fn sync_error(&self) -> Option<SyncError> {
        self.sync_error.lock().ok().and_then(|guard| guard.clone())
    }

    /// Dismiss the persistence failure banner.
    pub fn dismiss_sync_error(&mut self) {
        self.clear_sync_error();
    }

    fn clear_sync_error(&mut self) {
        if let Ok(mut guard) = self.sync_error.lock() {
            *guard = None;
        }
    }

    // -----------------------------------------------------------------------
    // Load & provisioning
    // -----------------------------------------------------------------------

    /// Load the user's widgets, in precedence order: remote widget
    /// list, remote layout snapshot, local cached layout, demo
    /// provisioning.
    ///
    /// Never fails on store errors; a total failure leaves the list
    /// empty in `Degraded` phase with a recorded [`SyncError`].
    pub async fn load_widgets(&mut self) -> Result<(), EngineError> {
        let user = self.require_user()?;
        self.set_phase(SessionPhase::Loading);
        tracing::info!(user_id = %user.id, role = %user.role, "Loading widgets");

        let fetched = self.remote.fetch_widgets(&user.id).await;
        match fetched {
            Ok(widgets) if !widgets.is_empty() => {
                tracing::info!(user_id = %user.id, count = widgets.len(), "Adopted remote widget list");
                self.adopt(widgets, None);
                self.spawn_cache_refresh();
                Ok(())
            }
            Ok(_) => {
                let snapshot = self.remote.fetch_layout(&user.id).await;
                match snapshot {
                    Ok(Some(layout)) if !layout.widgets.is_empty() => {
                        tracing::info!(
                            user_id = %user.id,
                            count = layout.widgets.len(),
                            "Adopted remote layout snapshot"
                        );
                        self.adopt(layout.widgets, Some(layout.grid));
                        self.spawn_cache_refresh();
                        Ok(())
                    }
                    Ok(_) => {
                        tracing::info!(user_id = %user.id, "Remote store empty, provisioning demo widgets");
                        self.provision_demo_widgets().await
                    }
                    Err(e) => self.load_from_cache_or_provision(e).await,
                }
            }
            Err(e) => self.load_from_cache_or_provision(e).await,
        }
    }

    /// Degraded read path: adopt the cached layout if one exists,
    /// otherwise fall through to demo provisioning.
    async fn load_from_cache_or_provision(&mut self, err: StoreError) -> Result<(), EngineError> {
        let user = self.require_user()?;
        tracing::warn!(user_id = %user.id, error = %err, "Remote load failed, trying cached layout");
        record_sync_error(&self.sync_error, "load_widgets", &err);

        let cached = self.fallback.read_cached_layout(&user.id).await;
        match cached {
            Ok(Some(layout)) if !layout.widgets.is_empty() => {
                tracing::info!(
                    user_id = %user.id,
                    count = layout.widgets.len(),
                    "Adopted cached layout"
                );
                let session = self.session_mut()?;
                session.layout = layout;
                session.phase = SessionPhase::Degraded;
                Ok(())
            }
            Ok(_) => self.provision_demo_widgets().await,
            Err(cache_err) => {
                tracing::warn!(user_id = %user.id, error = %cache_err, "Cached layout unreadable");
                self.provision_demo_widgets().await
            }
        }
    }

    /// Create the role's demo starter widgets for a dashboard that has
    /// none.
    ///
    /// Creates sequentially so positions are deterministic. Types
    /// already present are skipped, so a lost-then-retried load never
    /// duplicates. A single type's failure (or a placeholder id from
    /// the store) drops that widget from the session without aborting
    /// the rest.
    pub async fn provision_demo_widgets(&mut self) -> Result<(), EngineError> {
        let user = self.require_user()?;
        let types = catalog::demo_types_for_role(user.role);
        let columns = self.session_mut()?.layout.grid.columns;

        let mut admitted = 0usize;
        let mut dropped = 0usize;

        for ty in types {
            if self.is_widget_added(ty) {
                tracing::debug!(widget_type = %ty, "Demo type already present, skipping");
                continue;
            }
            let template = match catalog::template_for_type(ty) {
                Ok(template) => template,
                Err(e) => {
                    tracing::warn!(widget_type = %ty, error = %e, "No catalog entry, skipping demo type");
                    dropped += 1;
                    continue;
                }
            };

            let index = self.widgets().len();
            let draft = build_draft(template, index, columns, &user);

            let created = self.remote.create_widget(&draft).await;
            match created {
                Ok(widget) if is_placeholder_id(&widget.id) => {
                    tracing::warn!(
                        widget_type = %ty,
                        id = %widget.id,
                        "Create returned a placeholder id, dropping widget"
                    );
                    dropped += 1;
                }
                Ok(widget) => {
                    tracing::info!(widget_type = %ty, widget_id = %widget.id, "Demo widget provisioned");
                    self.session_mut()?.layout.widgets.push(widget);
                    admitted += 1;
                }
                Err(e) => {
                    tracing::warn!(widget_type = %ty, error = %e, "Demo widget creation failed");
                    record_sync_error(&self.sync_error, "provision_demo_widgets", &e);
                    dropped += 1;
                }
            }
        }

        let session = self.session_mut()?;
        session.layout.updated_at = chrono::Utc::now();
        session.phase = if session.layout.widgets.is_empty() && dropped > 0 {
            SessionPhase::Degraded
        } else {
            SessionPhase::Ready
        };

        if admitted > 0 {
            self.spawn_persist("provision_demo_widgets");
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Add a widget of `widget_type` at the next free grid slot.
    ///
    /// Duplicate types are rejected here, not just at the call site.
    /// The widget is only admitted once the remote store has assigned
    /// a durable id; on any failure the in-memory list is unchanged.
    pub async fn add_widget(&mut self, widget_type: WidgetType) -> Result<Widget, EngineError> {
        let user = self.require_user()?;
        if self.is_widget_added(widget_type) {
            return Err(EngineError::DuplicateWidget(widget_type));
        }

        let template = catalog::template_for_type(widget_type)?;
        let columns = self.session_mut()?.layout.grid.columns;
        let index = self.widgets().len();
        let draft = build_draft(template, index, columns, &user);
        draft.validate()?;

        let widget = self.remote.create_widget(&draft).await?;
        if is_placeholder_id(&widget.id) {
            return Err(EngineError::PlaceholderRejected(widget.id));
        }

        tracing::info!(
            widget_type = %widget_type,
            widget_id = %widget.id,
            user_id = %user.id,
            "Widget added"
        );
        let session = self.session_mut()?;
        session.layout.widgets.push(widget.clone());
        session.layout.updated_at = chrono::Utc::now();
        session.phase = SessionPhase::Ready;
        self.spawn_persist("add_widget");
        Ok(widget)
    }

    /// Apply a caller-supplied edit (title, size, settings).
    ///
    /// The in-memory copy updates immediately so the UI never appears
    /// to ignore an edit; the remote update and layout save run in the
    /// background, and their failure surfaces via [`Self::sync_error`]
    /// without rolling back the edit. The next successful
    /// [`Self::load_widgets`] is the point of truth reconciliation.
    /// An update for an id no longer on the dashboard is ignored (a
    /// delete is final).
    pub async fn update_widget(&mut self, mut widget: Widget) -> Result<(), EngineError> {
        self.require_user()?;
        widget.updated_at = chrono::Utc::now();

        let session = self.session_mut()?;
        let Some(slot) = session
            .layout
            .widgets
            .iter_mut()
            .find(|w| w.id == widget.id)
        else {
            tracing::debug!(widget_id = %widget.id, "Update for a widget no longer on the dashboard, ignoring");
            return Ok(());
        };
        *slot = widget.clone();
        session.layout.updated_at = chrono::Utc::now();
        let layout = session.layout.clone();

        let remote = Arc::clone(&self.remote);
        let fallback = Arc::clone(&self.fallback);
        let sync_error = Arc::clone(&self.sync_error);
        self.pending.spawn(async move {
            if let Err(e) = remote.update_widget(&widget).await {
                tracing::warn!(
                    widget_id = %widget.id,
                    error = %e,
                    "Remote widget update failed, keeping optimistic local copy"
                );
                record_sync_error(&sync_error, "update_widget", &e);
            }
            persist_layout(remote, fallback, sync_error, layout, "update_widget").await;
        });
        Ok(())
    }

    /// Remove a widget. The local removal is immediate and final; the
    /// remote delete and layout save fire concurrently in the
    /// background, and their failure never re-inserts the widget.
    /// Deleting an id that is not present is a quiet no-op.
    pub async fn delete_widget(&mut self, id: &str) -> Result<(), EngineError> {
        self.require_user()?;
        let session = self.session_mut()?;

        let before = session.layout.widgets.len();
        session.layout.widgets.retain(|w| w.id != id);
        if session.layout.widgets.len() == before {
            tracing::debug!(widget_id = %id, "Delete for a widget not on the dashboard, ignoring");
            return Ok(());
        }
        session.layout.updated_at = chrono::Utc::now();
        let layout = session.layout.clone();
        let id = id.to_string();
        tracing::info!(widget_id = %id, user_id = %layout.user_id, "Widget deleted");

        let remote = Arc::clone(&self.remote);
        let fallback = Arc::clone(&self.fallback);
        let sync_error = Arc::clone(&self.sync_error);
        self.pending.spawn(async move {
            let (deleted, saved) = futures::join!(
                remote.delete_widget(&id),
                remote.save_layout(&layout.user_id, &layout.widgets),
            );
            if let Err(e) = deleted {
                tracing::warn!(widget_id = %id, error = %e, "Remote widget delete failed; local removal stands");
                record_sync_error(&sync_error, "delete_widget", &e);
            }
            if let Err(e) = saved {
                tracing::warn!(user_id = %layout.user_id, error = %e, "Layout persistence failed, writing fallback blob");
                record_sync_error(&sync_error, "delete_widget", &e);
                if let Err(cache_err) = fallback.write_cached_layout(&layout).await {
                    tracing::warn!(user_id = %layout.user_id, error = %cache_err, "Fallback write failed");
                }
            }
        });
        Ok(())
    }

    /// Adopt a full candidate list delivered by a drag/resize/reorder
    /// gesture.
    ///
    /// If neither order nor any `(x, y, width, height)` changed
    /// index-aligned, this is a no-op with zero persistence calls;
    /// grid libraries fire spurious events and must not cause save
    /// storms.
    pub async fn reposition_widgets(&mut self, widgets: Vec<Widget>) -> Result<(), EngineError> {
        self.require_user()?;
        let session = self.session_mut()?;

        if !grid::positions_differ(&session.layout.widgets, &widgets) {
            tracing::debug!(
                user_id = %session.layout.user_id,
                "Reposition with unchanged geometry, skipping persistence"
            );
            return Ok(());
        }

        session.layout.widgets = widgets;
        session.layout.updated_at = chrono::Utc::now();
        tracing::info!(
            user_id = %session.layout.user_id,
            count = session.layout.widgets.len(),
            "Widgets repositioned"
        );
        self.spawn_persist("reposition_widgets");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Background persistence
    // -----------------------------------------------------------------------

    /// Await all tracked background persistence tasks.
    ///
    /// The mutating operations resolve as soon as the in-memory state
    /// is updated; call this to drain their side effects (shutdown,
    /// tests).
    pub async fn flush_persistence(&mut self) {
        while let Some(result) = self.pending.join_next().await {
            if let Err(e) = result {
                tracing::error!(error = %e, "Persistence task failed to complete");
            }
        }
    }

    fn spawn_persist(&mut self, operation: &'static str) {
        let Some(session) = &self.session else {
            return;
        };
        let layout = session.layout.clone();
        let remote = Arc::clone(&self.remote);
        let fallback = Arc::clone(&self.fallback);
        let sync_error = Arc::clone(&self.sync_error);
        self.pending
            .spawn(persist_layout(remote, fallback, sync_error, layout, operation));
    }

    /// Overwrite the local cache after a successful remote read.
    fn spawn_cache_refresh(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        let layout = session.layout.clone();
        let fallback = Arc::clone(&self.fallback);
        self.pending.spawn(async move {
            if let Err(e) = fallback.write_cached_layout(&layout).await {
                tracing::warn!(user_id = %layout.user_id, error = %e, "Cache refresh failed");
            }
        });
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn require_user(&self) -> Result<UserContext, EngineError> {
        self.session
            .as_ref()
            .map(|s| s.user.clone())
            .ok_or(EngineError::NoActiveSession)
    }

    fn session_mut(&mut self) -> Result<&mut Session, EngineError> {
        self.session.as_mut().ok_or(EngineError::NoActiveSession)
    }

    fn set_phase(&mut self, phase: SessionPhase) {
        if let Some(session) = &mut self.session {
            session.phase = phase;
        }
    }

    fn adopt(&mut self, widgets: Vec<Widget>, grid_settings: Option<GridSettings>) {
        if let Some(session) = &mut self.session {
            session.layout.widgets = widgets;
            if let Some(grid_settings) = grid_settings {
                session.layout.grid = grid_settings;
            }
            session.layout.updated_at = chrono::Utc::now();
            session.phase = SessionPhase::Ready;
        }
    }
}

/// Build a create draft from a catalog template and batch index.
fn build_draft(
    template: &WidgetTemplate,
    index: usize,
    columns: i32,
    user: &UserContext,
) -> WidgetDraft {
    let units = grid::grid_size(&template.default_size);
    WidgetDraft {
        widget_type: template.widget_type,
        title: template.title.to_string(),
        size: template.default_size,
        position: grid::default_position(index, units, columns),
        settings: None,
        user_id: user.id.clone(),
    }
}

/// Save the layout remotely; on failure record the sync error and
/// write the fallback blob best-effort.
async fn persist_layout(
    remote: Arc<dyn RemoteStore>,
    fallback: Arc<FallbackStore>,
    sync_error: SyncErrorSlot,
    layout: DashboardLayout,
    operation: &'static str,
) {
    match remote.save_layout(&layout.user_id, &layout.widgets).await {
        Ok(()) => {
            tracing::debug!(
                user_id = %layout.user_id,
                operation,
                widgets = layout.widgets.len(),
                "Layout persisted"
            );
        }
        Err(e) => {
            tracing::warn!(
                user_id = %layout.user_id,
                operation,
                error = %e,
                "Layout persistence failed, writing fallback blob"
            );
            record_sync_error(&sync_error, operation, &e);
            if let Err(cache_err) = fallback.write_cached_layout(&layout).await {
                tracing::warn!(user_id = %layout.user_id, error = %cache_err, "Fallback write failed");
            }
        }
    }
}

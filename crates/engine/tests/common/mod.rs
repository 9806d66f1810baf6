//! Shared test harness: an in-memory [`RemoteStore`] with failure
//! switches and call counters, plus engine/session builders.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use gridboard_core::layout::DashboardLayout;
use gridboard_core::roles::Role;
use gridboard_core::types::{placeholder_id, UserId};
use gridboard_core::widget::{GridRect, SemanticSize, Widget, WidgetDraft, WidgetSize, WidgetType};
use gridboard_engine::{LayoutEngine, UserContext};
use gridboard_store::{FallbackStore, RemoteStore, StoreError};

/// In-memory remote store double.
///
/// Holds a server-side widget list, per-call failure switches, and
/// call counters the tests assert on.
#[derive(Default)]
pub struct MockRemoteStore {
    pub widgets: Mutex<Vec<Widget>>,
    pub layout: Mutex<Option<DashboardLayout>>,

    pub fail_fetch_widgets: AtomicBool,
    pub fail_fetch_layout: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_delete: AtomicBool,
    pub fail_save: AtomicBool,
    /// Widget types whose `create_widget` calls fail.
    pub fail_create_types: Mutex<HashSet<WidgetType>>,
    /// When set, `create_widget` returns ids the store never confirms.
    pub return_placeholder_ids: AtomicBool,

    pub create_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    pub save_layout_calls: AtomicUsize,

    next_id: AtomicUsize,
}

impl MockRemoteStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A store pre-seeded with server-side widgets.
    pub fn seeded(widgets: Vec<Widget>) -> Arc<Self> {
        let store = Self::default();
        *store.widgets.lock().unwrap() = widgets;
        Arc::new(store)
    }

    pub fn fail_create_for(&self, widget_type: WidgetType) {
        self.fail_create_types.lock().unwrap().insert(widget_type);
    }

    pub fn server_widgets(&self) -> Vec<Widget> {
        self.widgets.lock().unwrap().clone()
    }

    pub fn saved_layout(&self) -> Option<DashboardLayout> {
        self.layout.lock().unwrap().clone()
    }

    fn unavailable() -> StoreError {
        StoreError::RemoteUnavailable("connection refused".into())
    }
}

#[async_trait]
impl RemoteStore for MockRemoteStore {
    async fn fetch_widgets(&self, _user_id: &UserId) -> Result<Vec<Widget>, StoreError> {
        if self.fail_fetch_widgets.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        Ok(self.widgets.lock().unwrap().clone())
    }

    async fn fetch_layout(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<DashboardLayout>, StoreError> {
        if self.fail_fetch_layout.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        Ok(self.layout.lock().unwrap().clone())
    }

    async fn create_widget(&self, draft: &WidgetDraft) -> Result<Widget, StoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self
            .fail_create_types
            .lock()
            .unwrap()
            .contains(&draft.widget_type)
        {
            return Err(Self::unavailable());
        }

        let id = if self.return_placeholder_ids.load(Ordering::SeqCst) {
            placeholder_id()
        } else {
            format!("w-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
        };

        let now = chrono::Utc::now();
        let widget = Widget {
            id,
            widget_type: draft.widget_type,
            title: draft.title.clone(),
            size: draft.size,
            position: draft.position,
            settings: draft.settings.clone(),
            user_id: draft.user_id.clone(),
            created_at: now,
            updated_at: now,
        };
        self.widgets.lock().unwrap().push(widget.clone());
        Ok(widget)
    }

    async fn update_widget(&self, widget: &Widget) -> Result<Widget, StoreError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        let mut widgets = self.widgets.lock().unwrap();
        if let Some(slot) = widgets.iter_mut().find(|w| w.id == widget.id) {
            *slot = widget.clone();
        }
        Ok(widget.clone())
    }

    async fn delete_widget(&self, id: &str) -> Result<(), StoreError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        // Idempotent: removing an absent id is fine.
        self.widgets.lock().unwrap().retain(|w| w.id != id);
        Ok(())
    }

    async fn save_layout(&self, user_id: &UserId, widgets: &[Widget]) -> Result<(), StoreError> {
        self.save_layout_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        *self.widgets.lock().unwrap() = widgets.to_vec();
        *self.layout.lock().unwrap() = Some(DashboardLayout {
            user_id: user_id.clone(),
            widgets: widgets.to_vec(),
            grid: Default::default(),
            updated_at: chrono::Utc::now(),
        });
        Ok(())
    }
}

/// The canonical student test identity.
pub fn student() -> UserContext {
    UserContext {
        id: "u-student".into(),
        role: Role::Student,
    }
}

/// An engine wired to `store` and a throwaway fallback directory.
///
/// The [`TempDir`] must stay alive for the duration of the test.
pub fn engine_with(store: &Arc<MockRemoteStore>) -> (LayoutEngine, TempDir) {
    let dir = tempfile::tempdir().expect("temp dir for fallback store");
    let engine = LayoutEngine::new(
        Arc::clone(store) as Arc<dyn RemoteStore>,
        FallbackStore::new(dir.path()),
    );
    (engine, dir)
}

/// A fallback store over the same directory the engine uses, for
/// seeding and inspecting cache blobs.
pub fn fallback_at(dir: &TempDir) -> FallbackStore {
    FallbackStore::new(dir.path())
}

/// Build a medium (2x1) widget at a given slot.
pub fn widget(id: &str, widget_type: WidgetType, x: i32, y: i32, user_id: &str) -> Widget {
    let now = chrono::Utc::now();
    Widget {
        id: id.into(),
        widget_type,
        title: widget_type.as_str().to_string(),
        size: WidgetSize::Uniform(SemanticSize::Medium),
        position: GridRect {
            x,
            y,
            width: 2,
            height: 1,
        },
        settings: None,
        user_id: user_id.into(),
        created_at: now,
        updated_at: now,
    }
}

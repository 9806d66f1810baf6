//! Local fallback store.
//!
//! Durable cache of the last known-good layout, one JSON blob per
//! user, used only when the remote store is unreachable. Blobs are
//! overwritten wholesale, never patched; the remote store stays the
//! source of truth whenever it is reachable.

use std::path::{Path, PathBuf};

use gridboard_core::layout::DashboardLayout;
use gridboard_core::types::UserId;

use crate::error::StoreError;

/// File-backed fallback cache rooted at a directory.
pub struct FallbackStore {
    dir: PathBuf,
}

impl FallbackStore {
    /// Create a fallback store rooted at `dir`. The directory is
    /// created on first write, not here.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn blob_path(&self, user_id: &UserId) -> PathBuf {
        self.dir.join(format!("layout-{user_id}.json"))
    }

    /// Read the cached layout for a user, if one exists.
    pub async fn read_cached_layout(
        &self,
        user_id: &UserId,
    ) -> Result<Option<DashboardLayout>, StoreError> {
        let path = self.blob_path(user_id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let layout = serde_json::from_slice(&bytes)?;
        Ok(Some(layout))
    }

    /// Overwrite the cached layout for the layout's user.
    ///
    /// Writes to a temp file and renames so a crash mid-write never
    /// leaves a truncated blob behind.
    pub async fn write_cached_layout(&self, layout: &DashboardLayout) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.blob_path(&layout.user_id);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(layout)?;

        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::debug!(
            user_id = %layout.user_id,
            widgets = layout.widgets.len(),
            path = %path.display(),
            "Cached layout written"
        );
        Ok(())
    }

    /// The directory this store writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridboard_core::widget::{GridRect, SemanticSize, Widget, WidgetSize, WidgetType};

    fn sample_layout(user_id: &str) -> DashboardLayout {
        DashboardLayout {
            user_id: user_id.into(),
            widgets: vec![Widget {
                id: "w-1".into(),
                widget_type: WidgetType::Tasks,
                title: "Tasks".into(),
                size: WidgetSize::Uniform(SemanticSize::Small),
                position: GridRect {
                    x: 0,
                    y: 0,
                    width: 1,
                    height: 1,
                },
                settings: None,
                user_id: user_id.into(),
                created_at: chrono::Utc::now(),
                updated_at: chrono::Utc::now(),
            }],
            grid: Default::default(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn missing_blob_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FallbackStore::new(dir.path());
        let cached = store.read_cached_layout(&"u-1".to_string()).await.unwrap();
        assert!(cached.is_none());
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FallbackStore::new(dir.path());

        let layout = sample_layout("u-1");
        store.write_cached_layout(&layout).await.unwrap();

        let cached = store
            .read_cached_layout(&"u-1".to_string())
            .await
            .unwrap()
            .expect("blob should exist after write");
        assert_eq!(cached, layout);
    }

    #[tokio::test]
    async fn writes_overwrite_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let store = FallbackStore::new(dir.path());

        let mut layout = sample_layout("u-1");
        store.write_cached_layout(&layout).await.unwrap();

        layout.widgets.clear();
        store.write_cached_layout(&layout).await.unwrap();

        let cached = store
            .read_cached_layout(&"u-1".to_string())
            .await
            .unwrap()
            .unwrap();
        assert!(cached.widgets.is_empty());
    }

    #[tokio::test]
    async fn blobs_are_keyed_per_user() {
        let dir = tempfile::tempdir().unwrap();
        let store = FallbackStore::new(dir.path());

        store.write_cached_layout(&sample_layout("u-1")).await.unwrap();

        let other = store.read_cached_layout(&"u-2".to_string()).await.unwrap();
        assert!(other.is_none());
    }
}

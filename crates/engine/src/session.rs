//! Session state for one authenticated dashboard user.

use std::sync::{Arc, Mutex};

use gridboard_core::layout::DashboardLayout;
use gridboard_core::roles::Role;
use gridboard_core::types::{Timestamp, UserId};
use gridboard_store::StoreError;

/// The identity the engine operates on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub id: UserId,
    pub role: Role,
}

/// Lifecycle phase of the active session.
///
/// `Degraded` is "ready with stale or incomplete data": the dashboard
/// stays interactive with whatever subset of widgets did load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    Loading,
    Ready,
    Degraded,
}

/// A persistence failure surfaced asynchronously to the presentation
/// layer as a dismissible banner, never as a crashed operation.
#[derive(Debug, Clone)]
pub struct SyncError {
    /// Which engine operation the failing side effect belonged to.
    pub operation: &'static str,
    pub message: String,
    pub at: Timestamp,
}

/// Shared slot background persistence tasks write their failures into.
pub(crate) type SyncErrorSlot = Arc<Mutex<Option<SyncError>>>;

/// Record a store failure in the shared slot. Last writer wins.
pub(crate) fn record_sync_error(slot: &SyncErrorSlot, operation: &'static str, err: &StoreError) {
    let entry = SyncError {
        operation,
        message: err.to_string(),
        at: chrono::Utc::now(),
    };
    // A poisoned lock only happens if another writer panicked; the
    // banner is best-effort, so skip rather than propagate the panic.
    if let Ok(mut guard) = slot.lock() {
        *guard = Some(entry);
    }
}

/// In-memory state for one active user session.
pub(crate) struct Session {
    pub user: UserContext,
    pub layout: DashboardLayout,
    pub phase: SessionPhase,
}

impl Session {
    pub fn new(user: UserContext) -> Self {
        let layout = DashboardLayout::empty(user.id.clone());
        Self {
            user,
            layout,
            phase: SessionPhase::Uninitialized,
        }
    }
}

//! `gridboard-engine` -- the widget layout & synchronization engine.
//!
//! Owns the canonical in-memory widget list for the active user
//! session, reconciles it against the remote store with a local
//! fallback, provisions demo widgets per role when none exist, and
//! keeps positions, sizes, and content consistent across add, update,
//! delete, and reorder operations.
//!
//! The binary entrypoint in `main.rs` is a small demo daemon; the
//! library is what the presentation layer drives.

pub mod config;
pub mod engine;
pub mod error;
pub mod session;

pub use engine::LayoutEngine;
pub use error::EngineError;
pub use session::{SessionPhase, SyncError, UserContext};

//! `gridboard-store` -- persistence adapters for the dashboard.
//!
//! Exposes the [`RemoteStore`] trait (the narrow interface over the
//! remote widget API), its [`HttpRemoteStore`] reqwest implementation,
//! and the [`FallbackStore`] local cache used in degraded mode.

pub mod error;
pub mod fallback;
pub mod http;
pub mod remote;

pub use error::StoreError;
pub use fallback::FallbackStore;
pub use http::HttpRemoteStore;
pub use remote::RemoteStore;

//! `gridboard-engine` demo daemon.
//!
//! Loads (and, for a fresh user, provisions) the configured user's
//! dashboard against a real remote store, logs the resulting layout,
//! and drains pending persistence before exiting.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gridboard_engine::config::Config;
use gridboard_engine::{LayoutEngine, UserContext};
use gridboard_store::{FallbackStore, HttpRemoteStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gridboard_engine=info,gridboard_store=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    tracing::info!(
        api_url = %config.api_url,
        user_id = %config.user_id,
        role = %config.role,
        cache_dir = %config.cache_dir.display(),
        "Starting gridboard-engine"
    );

    let remote = Arc::new(HttpRemoteStore::new(
        config.api_url.clone(),
        config.request_timeout,
    ));
    let fallback = FallbackStore::new(config.cache_dir.clone());

    let mut engine = LayoutEngine::new(remote, fallback);
    engine.start_session(UserContext {
        id: config.user_id.clone(),
        role: config.role,
    });

    if let Err(e) = engine.load_widgets().await {
        tracing::error!(error = %e, "Failed to load widgets");
        std::process::exit(1);
    }

    tracing::info!(
        phase = ?engine.phase(),
        count = engine.widgets().len(),
        "Dashboard loaded"
    );
    for widget in engine.widgets() {
        tracing::info!(
            widget_id = %widget.id,
            widget_type = %widget.widget_type,
            title = %widget.title,
            x = widget.position.x,
            y = widget.position.y,
            width = widget.position.width,
            height = widget.position.height,
            "Widget"
        );
    }

    if let Some(sync_error) = engine.sync_error() {
        tracing::warn!(
            operation = sync_error.operation,
            message = %sync_error.message,
            "Session has a pending sync error"
        );
    }

    engine.flush_persistence().await;
}

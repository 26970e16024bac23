//! Application startup and lifecycle management.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::RelayConfig;
use crate::handlers;
use crate::middleware::cors_middleware;
use crate::services::providers::gemini::GeminiCaptionProvider;
use crate::services::providers::CaptionProvider;
use crate::services::{CaptionService, ImageRegistry, ImageResolver};

/// Upper bound on request bodies, shared by both entry points.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: RelayConfig,
    pub service: CaptionService,
}

/// Builds the relay router: the generation endpoint, the health probe, and
/// the static front-end directory, wrapped in tracing and CORS layers.
pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route(
            "/api/gemini",
            post(handlers::generate_caption).fallback(handlers::method_not_allowed),
        )
        .route("/health", get(handlers::health_check))
        .fallback_service(ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(cors_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Builds the application with the Gemini provider wired in.
    pub async fn build(config: RelayConfig) -> anyhow::Result<Self> {
        let provider = Arc::new(GeminiCaptionProvider::new(config.gemini_api_key.clone()));
        Self::build_with_provider(config, provider).await
    }

    /// Builds with an explicit provider. Tests use this to script the
    /// upstream while exercising the real HTTP surface.
    pub async fn build_with_provider(
        config: RelayConfig,
        provider: Arc<dyn CaptionProvider>,
    ) -> anyhow::Result<Self> {
        let service = CaptionService::new(ImageResolver::new(), ImageRegistry::new(), provider);
        let state = AppState {
            config: config.clone(),
            service,
        };

        let addr = SocketAddr::from(([0, 0, 0, 0], config.http.port));
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        let port = listener
            .local_addr()
            .context("failed to read local address")?
            .port();

        tracing::info!("Caption relay listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// The bound port; useful when the configuration asked for port 0.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Runs the server until it fails or `shutdown` resolves. Once the
    /// signal fires, requests already in flight are drained before the
    /// future completes.
    pub async fn run_until_stopped(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> std::io::Result<()> {
        let router = build_router(self.state);
        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

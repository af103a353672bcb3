//! HTTP surface of the gateway.
//!
//! Axum router with permissive CORS so a browser front-end on any origin can
//! call it directly.

pub mod routes;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method,
    },
    routing::post,
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::analysis::Analyzer;
use crate::config::Config;
pub use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    // Preflight (`OPTIONS`) requests are answered by the CORS layer itself.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ]);

    Router::new()
        .route("/analyze-xray", post(routes::analyze_xray))
        .route("/functions/v1/analyze-xray", post(routes::analyze_xray))
        // Uploads are trusted as-is; the client enforces its own size cap.
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(config: &Config, bind_addr: SocketAddr) -> anyhow::Result<()> {
    let state = AppState::new(Analyzer::from_config(config));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Analysis gateway listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

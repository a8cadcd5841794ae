#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod type_routes;

use aide::{
    axum::{ApiRouter, routing::get},
    openapi::OpenApi,
};
use axum::{Extension, Json};
use nts_core::ports::Application;
use schemars::JsonSchema;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

mod openapi;
use openapi::{api_docs, docs_routes};

pub mod config;
use config::AxumConfig;

pub mod error;
pub mod headers;

/// Response for the health check endpoint
#[derive(Serialize, JsonSchema)]
#[schemars(inline)]
struct HealthResponse {
    status: String,
}

/// Simple health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Construct a full API router with the given state
pub fn router<T: ApiApplication>(state: T) -> axum::Router {
    let mut api = OpenApi::default();
    ApiRouter::new()
        .api_route("/health", get(health_check))
        .nest("/v2/types", type_routes::router())
        .nest_api_service("/docs", docs_routes())
        .finish_api_with(&mut api, api_docs)
        // The OpenAPI document must go behind an Arc: it is cloned into
        // every request otherwise.
        .layer(Extension(Arc::new(api)))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Starts the HTTP server with the provided configuration
pub async fn start_server<T: ApiApplication>(
    config: AxumConfig,
    app: T,
) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    tracing::info!("Listening for requests on {}", listener.local_addr()?);

    let service = router(app);
    axum::serve(listener, service).await
}

/// Axum imposes constraints on what can pass for state. This trait, coupled
/// with a blanket implementation, states them once: anything implementing
/// the core [`Application`] port qualifies.
pub trait ApiApplication: Application {}

// this is the blanket implementation
impl<T: Application> ApiApplication for T {}

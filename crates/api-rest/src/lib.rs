//! # API REST
//!
//! REST surface for the mHealth data exchange module.
//!
//! Handles:
//! - the module form endpoint (GET renders the form view, POST accepts a submission)
//! - a liveness endpoint
//! - OpenAPI/Swagger documentation and CORS
//!
//! All data comes from the injected [`PlatformServices`]; nothing here reaches for global state.

#![warn(rust_2018_idioms)]

pub mod controller;

use axum::{response::Json, routing::get, Router};
use mhde_core::PlatformServices;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub use controller::{FormViewRes, UserRes, FORM_PATH, FORM_VIEW};

/// Application state shared across handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub services: PlatformServices,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, controller::on_get, controller::on_post),
    components(schemas(HealthRes, FormViewRes, UserRes))
)]
struct ApiDoc;

/// Build the REST router over the given host services.
pub fn router(services: PlatformServices) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            FORM_PATH,
            get(controller::on_get).post(controller::on_post),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(AppState { services })
}

/// Bind `addr` and serve the router until the server stops.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails while running.
pub async fn serve(addr: &str, services: PlatformServices) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("++ mHealth data exchange REST listening on {}", addr);
    axum::serve(listener, router(services)).await?;
    Ok(())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Liveness endpoint for monitoring and load balancer health checks.
async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "mHealth data exchange is alive".into(),
    })
}

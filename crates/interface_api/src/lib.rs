//! HTTP API Layer
//!
//! This crate provides the REST API for the claims engine using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Claim lifecycle and health endpoints
//! - **Middleware**: Bearer-token authentication, audit logging
//! - **DTOs**: camelCase request/response shapes under the uniform
//!   `{success, message, data?}` envelope
//! - **Storage**: Document storage behind a swappable trait
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod storage;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_claims::ClaimService;

use crate::config::ApiConfig;
use crate::handlers::{claims, health};
use crate::middleware::{audit_middleware, auth_middleware};
use crate::storage::DocumentStorage;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ClaimService>,
    pub documents: Arc<dyn DocumentStorage>,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Shared application state: the claim service, document
///   storage, and configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Claim routes
    let claim_routes = Router::new()
        .route("/", post(claims::create_claim))
        .route("/", get(claims::list_claims))
        .route("/:id", get(claims::get_claim))
        .route("/:id/status", put(claims::update_status))
        .route("/:id/notes", post(claims::add_note))
        .route("/:id/documents", post(claims::attach_document));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/claims", claim_routes)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            audit_middleware,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

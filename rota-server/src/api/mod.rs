//! HTTP routes over the review service
//!
//! Every handler validates its input, derives a per-request cancellation
//! token from the server's shutdown token and calls exactly one
//! [`ReviewService`] operation.

mod dto;
mod error;
mod pull_requests;
mod teams;
mod users;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Json, Router};
use rota_core::ReviewService;
use rota_db::SqliteStore;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

pub use error::ApiErr;

/// Shared state for the axum routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ReviewService<SqliteStore>>,
    /// Cancelled when the server shuts down
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(service: ReviewService<SqliteStore>, shutdown: CancellationToken) -> Self {
        Self {
            service: Arc::new(service),
            shutdown,
        }
    }

    /// Token for one request; fires on shutdown
    fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/team/add", post(teams::add))
        .route("/team/get", get(teams::get))
        .route("/users/setIsActive", post(users::set_is_active))
        .route("/users/getReview", get(users::get_review))
        .route("/pullRequest/create", post(pull_requests::create))
        .route("/pullRequest/merge", post(pull_requests::merge))
        .route("/pullRequest/reassign", post(pull_requests::reassign))
        .with_state(state)
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

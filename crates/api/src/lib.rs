//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST routes for enrollments, balances and payments
//! - Mapping of domain errors to HTTP responses

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use bursar_core::enrollment::Validator;
use bursar_db::{EnrollmentRepository, FinancialRepository, PaymentRepository};
use bursar_shared::DatabaseConfig;
use sea_orm::DatabaseConnection;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Payload validator, built once at startup.
    pub validator: Arc<Validator>,
    /// Enrollment aggregate writes.
    pub enrollments: EnrollmentRepository,
    /// Balance reads.
    pub financials: FinancialRepository,
    /// Payment writes and listings.
    pub payments: PaymentRepository,
}

impl AppState {
    /// Builds the state around a connection pool.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: &DatabaseConfig) -> Self {
        let timeout = config.statement_timeout();
        Self {
            enrollments: EnrollmentRepository::new(db.clone(), timeout),
            financials: FinancialRepository::new(db.clone(), timeout),
            payments: PaymentRepository::new(db.clone(), timeout),
            validator: Arc::new(Validator::new()),
            db: Arc::new(db),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

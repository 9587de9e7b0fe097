//! API route definitions.

use axum::Router;
use chrono::{NaiveDate, Utc};

use crate::AppState;

pub mod enrollments;
pub mod health;
pub mod payments;
pub mod tuitions;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(enrollments::routes())
        .merge(tuitions::routes())
        .merge(payments::routes())
}

/// Date used for "not in the future" checks.
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

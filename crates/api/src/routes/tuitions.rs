//! Balance routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use bursar_shared::types::{EnrollmentId, PageRequest};

use crate::{ApiError, AppState};

/// Creates the balance routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tuitions", get(list_tuitions))
        .route("/enrollments/{id}/financials", get(get_financials))
}

/// GET `/tuitions?page=&per_page=&search=` - Paginated balances, newest first.
async fn list_tuitions(
    State(state): State<AppState>,
    Query(request): Query<PageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state.financials.list(&request).await?;
    Ok(Json(page))
}

/// GET `/enrollments/{id}/financials` - Fee breakdown, discounts and balance.
async fn get_financials(
    State(state): State<AppState>,
    Path(id): Path<EnrollmentId>,
) -> Result<impl IntoResponse, ApiError> {
    let financials = state.financials.get_financials(id).await?;
    Ok(Json(financials))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};

    use crate::test_support::{json_body, send};

    #[tokio::test]
    async fn test_malformed_id_is_rejected() {
        let request = Request::builder()
            .uri("/api/v1/enrollments/not-a-uuid/financials")
            .body(Body::empty())
            .unwrap();

        let response = send(request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_listing_hides_storage_errors() {
        let request = Request::builder()
            .uri("/api/v1/tuitions?page=2&search=cruz")
            .body(Body::empty())
            .unwrap();

        let (status, body) = json_body(send(request).await).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "internal_error");
    }
}

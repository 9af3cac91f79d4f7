use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};
use uuid::Uuid;

use crate::{
    dto::compare::{AddCompareRequest, ComparisonView},
    error::AppResult,
    middleware::session::SessionId,
    response::ApiResponse,
    services::compare_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(view_comparison).post(add_to_comparison).delete(clear_comparison))
        .route("/{product_id}", delete(remove_from_comparison))
}

#[utoipa::path(
    get,
    path = "/api/compare",
    responses(
        (status = 200, description = "Compared products and their spec table", body = ApiResponse<ComparisonView>)
    ),
    security(("session_header" = [])),
    tag = "Compare"
)]
pub async fn view_comparison(
    State(state): State<AppState>,
    session: SessionId,
) -> AppResult<Json<ApiResponse<ComparisonView>>> {
    let response = compare_service::view_comparison(&state, &session).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/compare",
    request_body = AddCompareRequest,
    responses(
        (status = 200, description = "Added to comparison", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Comparison full or product not found"),
    ),
    security(("session_header" = [])),
    tag = "Compare"
)]
pub async fn add_to_comparison(
    State(state): State<AppState>,
    session: SessionId,
    Json(payload): Json<AddCompareRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let response = compare_service::add_to_comparison(&state, &session, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/api/compare/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Removed from comparison", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Not in comparison"),
    ),
    security(("session_header" = [])),
    tag = "Compare"
)]
pub async fn remove_from_comparison(
    State(state): State<AppState>,
    session: SessionId,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let response = compare_service::remove_from_comparison(&state, &session, product_id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/api/compare",
    responses(
        (status = 200, description = "Comparison cleared", body = ApiResponse<serde_json::Value>)
    ),
    security(("session_header" = [])),
    tag = "Compare"
)]
pub async fn clear_comparison(
    State(state): State<AppState>,
    session: SessionId,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let response = compare_service::clear_comparison(&state, &session).await?;
    Ok(Json(response))
}

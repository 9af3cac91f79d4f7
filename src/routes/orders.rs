use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{CheckoutRequest, OrderList, OrderWithItems, PayOrderRequest},
    error::AppResult,
    middleware::session::SessionId,
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/checkout", post(checkout))
        .route("/{id}", get(get_order))
        .route("/{id}/pay", post(pay_order))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by order status"),
        ("sort_order" = Option<String>, Query, description = "asc | desc, default desc"),
    ),
    responses(
        (status = 200, description = "Session's orders, newest first", body = ApiResponse<OrderList>)
    ),
    security(("session_header" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    session: SessionId,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let response = order_service::list_orders(&state, &session, query).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/orders/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Order created from the selected cart lines", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "Nothing selected or insufficient stock"),
    ),
    security(("session_header" = [])),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    session: SessionId,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let response = order_service::checkout(&state, &session, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with its lines", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Order not found"),
    ),
    security(("session_header" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    session: SessionId,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let response = order_service::get_order(&state, &session, id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/pay",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = PayOrderRequest,
    responses(
        (status = 200, description = "Payment recorded", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "Order already paid"),
        (status = 404, description = "Order not found"),
    ),
    security(("session_header" = [])),
    tag = "Orders"
)]
pub async fn pay_order(
    State(state): State<AppState>,
    session: SessionId,
    Path(id): Path<Uuid>,
    Json(payload): Json<PayOrderRequest>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let response = order_service::pay_order(&state, &session, id, payload).await?;
    Ok(Json(response))
}

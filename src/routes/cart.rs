use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch, post, put},
};
use uuid::Uuid;

use crate::{
    dto::cart::{
        AddToCartRequest, ApplyCouponRequest, CartView, CouponResult, SelectionRequest,
        UpdateCartItemRequest,
    },
    engine::pricing::OrderSummary,
    error::AppResult,
    middleware::session::SessionId,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(view_cart).delete(clear_cart))
        .route("/items", post(add_to_cart))
        .route("/items/{id}", patch(update_cart_item).delete(remove_from_cart))
        .route("/selection", put(set_selection))
        .route("/coupon", post(apply_coupon).delete(remove_coupon))
        .route("/summary", get(summary))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart with per-line selection and checkout summary", body = ApiResponse<CartView>)
    ),
    security(("session_header" = [])),
    tag = "Cart"
)]
pub async fn view_cart(
    State(state): State<AppState>,
    session: SessionId,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let response = cart_service::view_cart(&state, &session).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/cart/items",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Add a product; merges with an existing line", body = ApiResponse<CartView>),
        (status = 400, description = "Bad request"),
    ),
    security(("session_header" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: SessionId,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let response = cart_service::add_to_cart(&state, &session, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    patch,
    path = "/api/cart/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Cart item ID")
    ),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Update quantity and/or selection", body = ApiResponse<CartView>),
        (status = 404, description = "Cart item not found"),
    ),
    security(("session_header" = [])),
    tag = "Cart"
)]
pub async fn update_cart_item(
    State(state): State<AppState>,
    session: SessionId,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCartItemRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let response = cart_service::update_cart_item(&state, &session, id, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/api/cart/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Cart item ID")
    ),
    responses(
        (status = 200, description = "Removed from cart", body = ApiResponse<CartView>),
        (status = 404, description = "Cart item not found"),
    ),
    security(("session_header" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    session: SessionId,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let response = cart_service::remove_from_cart(&state, &session, id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart cleared; the applied coupon survives", body = ApiResponse<CartView>)
    ),
    security(("session_header" = [])),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    session: SessionId,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let response = cart_service::clear_cart(&state, &session).await?;
    Ok(Json(response))
}

#[utoipa::path(
    put,
    path = "/api/cart/selection",
    request_body = SelectionRequest,
    responses(
        (status = 200, description = "Select all or none", body = ApiResponse<CartView>)
    ),
    security(("session_header" = [])),
    tag = "Cart"
)]
pub async fn set_selection(
    State(state): State<AppState>,
    session: SessionId,
    Json(payload): Json<SelectionRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let response = cart_service::set_selection(&state, &session, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/cart/coupon",
    request_body = ApplyCouponRequest,
    responses(
        (status = 200, description = "Applied or rejected; rejection keeps the prior coupon", body = ApiResponse<CouponResult>)
    ),
    security(("session_header" = [])),
    tag = "Cart"
)]
pub async fn apply_coupon(
    State(state): State<AppState>,
    session: SessionId,
    Json(payload): Json<ApplyCouponRequest>,
) -> AppResult<Json<ApiResponse<CouponResult>>> {
    let response = cart_service::apply_coupon(&state, &session, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/api/cart/coupon",
    responses(
        (status = 200, description = "Coupon removed", body = ApiResponse<CouponResult>)
    ),
    security(("session_header" = [])),
    tag = "Cart"
)]
pub async fn remove_coupon(
    State(state): State<AppState>,
    session: SessionId,
) -> AppResult<Json<ApiResponse<CouponResult>>> {
    let response = cart_service::remove_coupon(&state, &session).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/cart/summary",
    responses(
        (status = 200, description = "Checkout summary over the selected lines", body = ApiResponse<OrderSummary>)
    ),
    security(("session_header" = [])),
    tag = "Cart"
)]
pub async fn summary(
    State(state): State<AppState>,
    session: SessionId,
) -> AppResult<Json<ApiResponse<OrderSummary>>> {
    let response = cart_service::summary(&state, &session).await?;
    Ok(Json(response))
}

use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::wishlist::{AddWishlistRequest, WishlistProductList},
    error::{AppError, AppResult},
    middleware::session::SessionId,
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_wishlist(
    state: &AppState,
    session: &SessionId,
    pagination: Pagination,
) -> AppResult<ApiResponse<WishlistProductList>> {
    let (page, limit, offset) = pagination.normalize();
    let ids = state.sessions.wishlist(session.as_str());
    let total = ids.len() as i64;

    let items: Vec<Product> = ids
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .filter_map(|id| state.catalog.get(id))
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "OK",
        WishlistProductList { items },
        Some(meta),
    ))
}

pub async fn add_to_wishlist(
    state: &AppState,
    session: &SessionId,
    payload: AddWishlistRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let product = state
        .catalog
        .get(payload.product_id)
        .filter(|p| p.is_active)
        .ok_or_else(|| AppError::BadRequest("Product not found".into()))?;

    // Idempotent: adding an already wished product is a no-op success.
    state.sessions.with_wishlist(session.as_str(), |wishlist| {
        if !wishlist.contains(&product.id) {
            wishlist.push(product.id);
        }
    });

    log_audit(
        session.as_str(),
        "wishlist_add",
        Some("wishlist"),
        Some(serde_json::json!({ "product_id": payload.product_id })),
    );

    Ok(ApiResponse::success(
        "Added to wishlist",
        serde_json::json!({ "product_id": payload.product_id }),
        Some(Meta::empty()),
    ))
}

pub async fn remove_from_wishlist(
    state: &AppState,
    session: &SessionId,
    product_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let removed = state.sessions.with_wishlist(session.as_str(), |wishlist| {
        let before = wishlist.len();
        wishlist.retain(|id| *id != product_id);
        wishlist.len() < before
    });

    if !removed {
        return Err(AppError::NotFound);
    }

    log_audit(
        session.as_str(),
        "wishlist_remove",
        Some("wishlist"),
        Some(serde_json::json!({ "product_id": product_id })),
    );

    Ok(ApiResponse::success(
        "Removed from wishlist",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

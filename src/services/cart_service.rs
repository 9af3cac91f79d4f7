use anyhow::anyhow;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::cart::{
        AddToCartRequest, ApplyCouponRequest, CartLineDto, CartView, CouponResult,
        SelectionRequest, UpdateCartItemRequest,
    },
    engine::cart::{Cart, QuantityChange},
    engine::coupon::CouponOutcome,
    engine::pricing::{self, OrderSummary},
    error::{AppError, AppResult},
    middleware::session::SessionId,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn view_cart(
    state: &AppState,
    session: &SessionId,
) -> AppResult<ApiResponse<CartView>> {
    let cart = state.sessions.cart_snapshot(session.as_str());
    let view = build_view(state, &cart)?;
    Ok(ApiResponse::success("OK", view, Some(Meta::empty())))
}

pub async fn add_to_cart(
    state: &AppState,
    session: &SessionId,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartView>> {
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }
    let product = state
        .catalog
        .get(payload.product_id)
        .filter(|p| p.is_active)
        .ok_or_else(|| AppError::BadRequest("product not found".to_string()))?;
    if product.stock <= 0 {
        return Err(AppError::BadRequest("product is out of stock".to_string()));
    }

    let added = state
        .sessions
        .with_cart(session.as_str(), |cart| cart.add_item(&product, payload.quantity));

    log_audit(
        session.as_str(),
        "cart_add",
        Some("cart_items"),
        Some(serde_json::json!({
            "product_id": payload.product_id,
            "quantity": added.quantity,
            "merged": added.merged,
        })),
    );

    let message = if added.clamped {
        "Added to cart (quantity limited to available stock)"
    } else {
        "Added to cart"
    };
    let cart = state.sessions.cart_snapshot(session.as_str());
    Ok(ApiResponse::success(message, build_view(state, &cart)?, None))
}

pub async fn update_cart_item(
    state: &AppState,
    session: &SessionId,
    item_id: Uuid,
    payload: UpdateCartItemRequest,
) -> AppResult<ApiResponse<CartView>> {
    let mut message = "Cart updated".to_string();

    if let Some(quantity) = payload.quantity {
        let cart = state.sessions.cart_snapshot(session.as_str());
        let line = cart
            .items()
            .iter()
            .find(|item| item.id == item_id)
            .ok_or(AppError::NotFound)?;
        let stock = state
            .catalog
            .get(line.product_id)
            .map(|p| p.stock)
            .unwrap_or(0);

        let change = state
            .sessions
            .with_cart(session.as_str(), |cart| {
                cart.set_quantity(item_id, quantity, stock)
            })
            .ok_or(AppError::NotFound)?;

        message = match change {
            QuantityChange::Removed => "Item removed from cart".to_string(),
            QuantityChange::Updated { clamped: true, .. } => {
                "Quantity limited to available stock".to_string()
            }
            QuantityChange::Updated { .. } => "Cart updated".to_string(),
        };

        log_audit(
            session.as_str(),
            "cart_update",
            Some("cart_items"),
            Some(serde_json::json!({ "item_id": item_id, "quantity": quantity })),
        );
    }

    if let Some(selected) = payload.selected {
        let found = state
            .sessions
            .with_cart(session.as_str(), |cart| cart.set_selected(item_id, selected));
        // A quantity update may have just removed the line; only a pure
        // selection change on a missing line is a 404.
        if !found && payload.quantity.is_none() {
            return Err(AppError::NotFound);
        }
    }

    let cart = state.sessions.cart_snapshot(session.as_str());
    Ok(ApiResponse::success(message, build_view(state, &cart)?, None))
}

pub async fn remove_from_cart(
    state: &AppState,
    session: &SessionId,
    item_id: Uuid,
) -> AppResult<ApiResponse<CartView>> {
    let removed = state
        .sessions
        .with_cart(session.as_str(), |cart| cart.remove_item(item_id));
    if !removed {
        return Err(AppError::NotFound);
    }

    log_audit(
        session.as_str(),
        "cart_remove",
        Some("cart_items"),
        Some(serde_json::json!({ "item_id": item_id })),
    );

    let cart = state.sessions.cart_snapshot(session.as_str());
    Ok(ApiResponse::success(
        "Removed from cart",
        build_view(state, &cart)?,
        None,
    ))
}

pub async fn clear_cart(
    state: &AppState,
    session: &SessionId,
) -> AppResult<ApiResponse<CartView>> {
    state.sessions.with_cart(session.as_str(), Cart::clear);

    log_audit(session.as_str(), "cart_clear", Some("cart_items"), None);

    let cart = state.sessions.cart_snapshot(session.as_str());
    Ok(ApiResponse::success(
        "Cart cleared",
        build_view(state, &cart)?,
        None,
    ))
}

pub async fn set_selection(
    state: &AppState,
    session: &SessionId,
    payload: SelectionRequest,
) -> AppResult<ApiResponse<CartView>> {
    state.sessions.with_cart(session.as_str(), |cart| {
        if payload.selected {
            cart.select_all();
        } else {
            cart.select_none();
        }
    });

    let message = if payload.selected {
        "All items selected"
    } else {
        "Selection cleared"
    };
    let cart = state.sessions.cart_snapshot(session.as_str());
    Ok(ApiResponse::success(message, build_view(state, &cart)?, None))
}

pub async fn apply_coupon(
    state: &AppState,
    session: &SessionId,
    payload: ApplyCouponRequest,
) -> AppResult<ApiResponse<CouponResult>> {
    let outcome = state.sessions.with_cart(session.as_str(), |cart| {
        cart.apply_coupon(&payload.code, state.coupons.as_ref())
    });

    let response = match outcome {
        CouponOutcome::Applied(coupon) => {
            log_audit(
                session.as_str(),
                "coupon_apply",
                Some("cart"),
                Some(serde_json::json!({ "code": coupon.code })),
            );
            ApiResponse::success(
                "Coupon applied",
                CouponResult {
                    accepted: true,
                    coupon: Some(coupon),
                },
                None,
            )
        }
        // Not an error: prior coupon state is untouched, the user may retry.
        CouponOutcome::Rejected => ApiResponse::success(
            "Invalid coupon code",
            CouponResult {
                accepted: false,
                coupon: None,
            },
            None,
        ),
    };
    Ok(response)
}

pub async fn remove_coupon(
    state: &AppState,
    session: &SessionId,
) -> AppResult<ApiResponse<CouponResult>> {
    state
        .sessions
        .with_cart(session.as_str(), Cart::remove_coupon);

    log_audit(session.as_str(), "coupon_remove", Some("cart"), None);

    Ok(ApiResponse::success(
        "Coupon removed",
        CouponResult {
            accepted: true,
            coupon: None,
        },
        None,
    ))
}

pub async fn summary(
    state: &AppState,
    session: &SessionId,
) -> AppResult<ApiResponse<OrderSummary>> {
    let cart = state.sessions.cart_snapshot(session.as_str());
    Ok(ApiResponse::success(
        "Order summary",
        summarize(state, &cart),
        None,
    ))
}

pub(crate) fn summarize(state: &AppState, cart: &Cart) -> OrderSummary {
    pricing::compute_order_summary(
        cart.items(),
        cart.selected_ids(),
        cart.coupon(),
        &state.pricing,
    )
}

fn build_view(state: &AppState, cart: &Cart) -> AppResult<CartView> {
    let items = cart
        .items()
        .iter()
        .map(|item| {
            let product = state
                .catalog
                .get(item.product_id)
                .ok_or_else(|| anyhow!("cart line {} references unknown product", item.id))?;
            Ok(CartLineDto {
                id: item.id,
                product,
                unit_price: item.unit_price,
                quantity: item.quantity,
                selected: cart.is_selected(item.id),
                line_total: item.line_total(),
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(CartView {
        items,
        coupon: cart.coupon().cloned(),
        item_count: cart.item_count(),
        display_subtotal: cart.display_subtotal(),
        summary: summarize(state, cart),
    })
}

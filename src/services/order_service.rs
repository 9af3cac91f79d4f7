use chrono::Utc;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{CheckoutRequest, OrderList, OrderWithItems, PayOrderRequest},
    error::{AppError, AppResult},
    middleware::session::SessionId,
    models::{Order, OrderItem},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::cart_service,
    state::AppState,
    store::PayStatus,
};

/// Convert the *selected* cart lines into an order. Blocked when nothing
/// is selected; rejected when live stock no longer covers a line (cart
/// quantities were clamped at mutation time, but stock may have dropped
/// since). On success stock is decremented, the purchased lines leave the
/// cart, and the applied coupon is consumed.
pub async fn checkout(
    state: &AppState,
    session: &SessionId,
    _payload: CheckoutRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let cart = state.sessions.cart_snapshot(session.as_str());
    let selected = cart.selected_items();

    if selected.is_empty() {
        return Err(AppError::BadRequest(
            "No items selected for checkout".into(),
        ));
    }

    for line in &selected {
        let product = state
            .catalog
            .get(line.product_id)
            .ok_or_else(|| AppError::BadRequest(format!("Product no longer available: {}", line.title)))?;
        if product.stock < line.quantity {
            return Err(AppError::BadRequest(format!(
                "Insufficient stock for {}",
                line.title
            )));
        }
    }

    let summary = cart_service::summarize(state, &cart);

    let order_id = Uuid::new_v4();
    let now = Utc::now();
    let order = Order {
        id: order_id,
        session_id: session.as_str().to_string(),
        invoice_number: build_invoice_number(order_id),
        subtotal: summary.subtotal,
        tax: summary.tax,
        shipping: summary.shipping,
        discount: summary.discount,
        total: summary.total,
        coupon_code: cart.coupon().map(|c| c.code.clone()),
        status: "pending".into(),
        payment_status: "unpaid".into(),
        paid_at: None,
        created_at: now,
        updated_at: now,
    };

    let items: Vec<OrderItem> = selected
        .iter()
        .map(|line| OrderItem {
            id: Uuid::new_v4(),
            order_id,
            product_id: line.product_id,
            title: line.title.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
            created_at: now,
        })
        .collect();

    for line in &selected {
        if !state.catalog.commit_sale(line.product_id, line.quantity) {
            return Err(AppError::BadRequest(format!(
                "Insufficient stock for {}",
                line.title
            )));
        }
    }

    let purchased: Vec<Uuid> = selected.iter().map(|line| line.id).collect();
    state.sessions.with_cart(session.as_str(), |cart| {
        for item_id in &purchased {
            cart.remove_item(*item_id);
        }
        cart.remove_coupon();
    });

    state.orders.insert(order.clone(), items.clone());

    log_audit(
        session.as_str(),
        "checkout",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "total": order.total })),
    );

    Ok(ApiResponse::success(
        "Checkout success",
        OrderWithItems { order, items },
        Some(Meta::empty()),
    ))
}

pub async fn list_orders(
    state: &AppState,
    session: &SessionId,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize();

    let mut orders = state.orders.list_for_session(session.as_str());
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        orders.retain(|order| &order.status == status);
    }

    // Insertion order is oldest first; default listing is newest first.
    match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Desc => orders.reverse(),
        SortOrder::Asc => {}
    }

    let total = orders.len() as i64;
    let items: Vec<Order> = orders
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Ok", OrderList { items }, Some(meta)))
}

pub async fn get_order(
    state: &AppState,
    session: &SessionId,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let stored = state
        .orders
        .get(session.as_str(), id)
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: stored.order,
            items: stored.items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn pay_order(
    state: &AppState,
    session: &SessionId,
    id: Uuid,
    _payload: PayOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let stored = match state.orders.mark_paid(session.as_str(), id) {
        PayStatus::NotFound => return Err(AppError::NotFound),
        PayStatus::AlreadyPaid => {
            return Err(AppError::BadRequest("Order already paid".into()));
        }
        PayStatus::Paid(stored) => stored,
    };

    log_audit(
        session.as_str(),
        "order_paid",
        Some("orders"),
        Some(serde_json::json!({ "order_id": stored.order.id })),
    );

    Ok(ApiResponse::success(
        "Payment recorded",
        OrderWithItems {
            order: stored.order,
            items: stored.items,
        },
        Some(Meta::empty()),
    ))
}

fn build_invoice_number(order_id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = order_id.to_string();
    let short = &suffix[..8];
    format!("INV-{}-{}", date, short)
}

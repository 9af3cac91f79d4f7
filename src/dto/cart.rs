use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::engine::pricing::OrderSummary;
use crate::models::{Cents, Coupon, Product};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Partial update of one cart line: quantity, selection, or both.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    pub quantity: Option<i32>,
    pub selected: Option<bool>,
}

/// Bulk selection: `true` selects every line, `false` deselects all.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectionRequest {
    pub selected: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApplyCouponRequest {
    pub code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CouponResult {
    pub accepted: bool,
    pub coupon: Option<Coupon>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineDto {
    pub id: Uuid,
    pub product: Product,
    /// Snapshot price from add time, not the product's current price.
    pub unit_price: Cents,
    pub quantity: i32,
    pub selected: bool,
    pub line_total: Cents,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartLineDto>,
    pub coupon: Option<Coupon>,
    /// Units across all lines (the cart badge).
    pub item_count: i64,
    /// Sum over all lines, selected or not.
    pub display_subtotal: Cents,
    /// Checkout math over the selected lines only.
    pub summary: OrderSummary,
}

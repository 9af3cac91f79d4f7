use std::collections::HashSet;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{CartItem, Cents, Coupon};

/// Storefront pricing constants. Loaded from the environment by
/// `AppConfig`; the defaults are the production values.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    /// Tax rate in basis points (800 = 8.00%).
    pub tax_rate_basis_points: i64,
    /// Subtotal at which shipping becomes free.
    pub free_shipping_threshold: Cents,
    /// Flat shipping fee below the threshold.
    pub shipping_fee: Cents,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate_basis_points: 800,
            free_shipping_threshold: 5000,
            shipping_fee: 999,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderSummary {
    pub subtotal: Cents,
    pub tax: Cents,
    pub shipping: Cents,
    pub discount: Cents,
    pub total: Cents,
    pub selected_count: usize,
}

/// Compute the checkout summary over the *selected* cart lines.
///
/// The subtotal covers only items whose id is in `selected`; the full-cart
/// display subtotal is a different number and lives on `Cart`. The coupon
/// discount comes off the grand total only, and the total is clamped at
/// zero so an oversized discount can never produce a negative order.
pub fn compute_order_summary(
    items: &[CartItem],
    selected: &HashSet<Uuid>,
    coupon: Option<&Coupon>,
    config: &PricingConfig,
) -> OrderSummary {
    let selected_items: Vec<&CartItem> = items
        .iter()
        .filter(|item| selected.contains(&item.id))
        .collect();

    let subtotal: Cents = selected_items.iter().map(|item| item.line_total()).sum();
    let tax = tax_on(subtotal, config.tax_rate_basis_points);

    let free_shipping = subtotal >= config.free_shipping_threshold
        || coupon.is_some_and(|c| c.free_shipping);
    let shipping = if free_shipping { 0 } else { config.shipping_fee };

    let discount = coupon.map_or(0, |c| c.discount);
    let total = (subtotal + tax + shipping - discount).max(0);

    OrderSummary {
        subtotal,
        tax,
        shipping,
        discount,
        total,
        selected_count: selected_items.len(),
    }
}

/// Tax in cents, rounded half-up. Integer arithmetic keeps repeated
/// recomputation exact.
fn tax_on(subtotal: Cents, basis_points: i64) -> Cents {
    (subtotal * basis_points + 5_000) / 10_000
}

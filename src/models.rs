use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// All currency amounts in this crate are integer cents.
pub type Cents = i64;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub brand: String,
    /// Category slug, e.g. "electronics".
    pub category_id: String,
    pub price: Cents,
    /// Pre-discount price; a product is "on sale" when this exceeds `price`.
    pub original_price: Option<Cents>,
    pub rating: f32,
    pub review_count: i32,
    pub stock: i32,
    pub free_shipping: bool,
    /// Normalized attribute bag, see [`merge_specifications`].
    pub specs: BTreeMap<String, String>,
    pub is_active: bool,
    pub total_sales: i64,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn has_discount(&self) -> bool {
        self.original_price.is_some_and(|orig| orig > self.price)
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Merge the two free-form attribute bags a product arrives with into the
/// single `specs` map. On key collision the specification value wins.
pub fn merge_specifications(
    attributes: BTreeMap<String, String>,
    specifications: BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged = attributes;
    merged.extend(specifications);
    merged
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub is_active: bool,
}

/// One cart line. `unit_price` is snapshotted when the line is created and
/// never follows later catalog price changes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub title: String,
    pub unit_price: Cents,
    pub quantity: i32,
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    pub fn line_total(&self) -> Cents {
        self.unit_price * self.quantity as i64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coupon {
    /// Uppercase code, the registry lookup key.
    pub code: String,
    /// Flat discount off the grand total.
    pub discount: Cents,
    /// Waives the shipping fee regardless of the subtotal threshold.
    pub free_shipping: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub session_id: String,
    pub invoice_number: String,
    pub subtotal: Cents,
    pub tax: Cents,
    pub shipping: Cents,
    pub discount: Cents,
    pub total: Cents,
    pub coupon_code: Option<String>,
    pub status: String,
    pub payment_status: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub title: String,
    pub unit_price: Cents,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

use std::collections::HashSet;

use chrono::Utc;
use uuid::Uuid;

use crate::engine::coupon::{CouponOutcome, CouponRegistry};
use crate::models::{CartItem, Cents, Coupon, Product};

/// One session's cart: ordered lines, the checkout selection set, and the
/// applied coupon. Insertion order is display order. Totals are never
/// stored; they are recomputed from the lines on every read so they cannot
/// drift.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CartItem>,
    selected: HashSet<Uuid>,
    coupon: Option<Coupon>,
}

/// What `add_item` did.
#[derive(Debug, Clone, PartialEq)]
pub struct AddedLine {
    pub item_id: Uuid,
    pub quantity: i32,
    /// The requested quantity exceeded available stock and was reduced.
    pub clamped: bool,
    /// An existing line for the same product was incremented instead of a
    /// new line being inserted.
    pub merged: bool,
}

/// What `set_quantity` did.
#[derive(Debug, Clone, PartialEq)]
pub enum QuantityChange {
    /// Quantity dropped below 1, so the line was deleted.
    Removed,
    Updated { quantity: i32, clamped: bool },
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Units across all lines, the cart-badge number.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|item| item.quantity as i64).sum()
    }

    /// Sum over *all* lines, shown while browsing. Checkout math runs over
    /// the selection only, see `engine::pricing`.
    pub fn display_subtotal(&self) -> Cents {
        self.items.iter().map(|item| item.line_total()).sum()
    }

    pub fn selected_ids(&self) -> &HashSet<Uuid> {
        &self.selected
    }

    pub fn is_selected(&self, item_id: Uuid) -> bool {
        self.selected.contains(&item_id)
    }

    /// Selected lines in display order.
    pub fn selected_items(&self) -> Vec<&CartItem> {
        self.items
            .iter()
            .filter(|item| self.selected.contains(&item.id))
            .collect()
    }

    pub fn coupon(&self) -> Option<&Coupon> {
        self.coupon.as_ref()
    }

    /// Add a product to the cart, snapshotting its current price on the
    /// line. Adding a product that already has a line increments that line
    /// instead of inserting a duplicate. Quantity is clamped to
    /// `[1, product.stock]`; the caller guarantees `product.stock >= 1`.
    /// New lines start selected, matching the storefront's
    /// select-everything default.
    pub fn add_item(&mut self, product: &Product, quantity: i32) -> AddedLine {
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product_id == product.id)
        {
            let requested = item.quantity.saturating_add(quantity.max(1));
            let clamped = requested > product.stock;
            item.quantity = requested.min(product.stock).max(1);
            return AddedLine {
                item_id: item.id,
                quantity: item.quantity,
                clamped,
                merged: true,
            };
        }

        let clamped = quantity > product.stock;
        let quantity = quantity.min(product.stock).max(1);
        let item = CartItem {
            id: Uuid::new_v4(),
            product_id: product.id,
            title: product.title.clone(),
            unit_price: product.price,
            quantity,
            added_at: Utc::now(),
        };
        let item_id = item.id;
        self.items.push(item);
        self.selected.insert(item_id);
        AddedLine {
            item_id,
            quantity,
            clamped,
            merged: false,
        }
    }

    /// Set a line's quantity. Below 1 the line is removed; above `stock`
    /// (the product's current availability) the quantity clamps. The unit
    /// price never changes here — it stays the add-time snapshot. Returns
    /// `None` when no such line exists.
    pub fn set_quantity(
        &mut self,
        item_id: Uuid,
        quantity: i32,
        stock: i32,
    ) -> Option<QuantityChange> {
        if !self.items.iter().any(|item| item.id == item_id) {
            return None;
        }
        if quantity < 1 {
            self.remove_item(item_id);
            return Some(QuantityChange::Removed);
        }
        let clamped = quantity > stock;
        let quantity = quantity.min(stock).max(1);
        for item in &mut self.items {
            if item.id == item_id {
                item.quantity = quantity;
            }
        }
        Some(QuantityChange::Updated { quantity, clamped })
    }

    /// Remove a line and drop it from the selection set, so no orphaned
    /// selection id can survive the line.
    pub fn remove_item(&mut self, item_id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != item_id);
        self.selected.remove(&item_id);
        self.items.len() < before
    }

    /// Drop all lines and the selection. The applied coupon is cleared only
    /// by `remove_coupon`.
    pub fn clear(&mut self) {
        self.items.clear();
        self.selected.clear();
    }

    /// Flip one line's selection. Returns the new state, or `None` when the
    /// line does not exist.
    pub fn toggle_selection(&mut self, item_id: Uuid) -> Option<bool> {
        if !self.items.iter().any(|item| item.id == item_id) {
            return None;
        }
        if self.selected.remove(&item_id) {
            Some(false)
        } else {
            self.selected.insert(item_id);
            Some(true)
        }
    }

    /// Set one line's selection explicitly. Returns `false` when the line
    /// does not exist.
    pub fn set_selected(&mut self, item_id: Uuid, selected: bool) -> bool {
        if !self.items.iter().any(|item| item.id == item_id) {
            return false;
        }
        if selected {
            self.selected.insert(item_id);
        } else {
            self.selected.remove(&item_id);
        }
        true
    }

    pub fn select_all(&mut self) {
        self.selected = self.items.iter().map(|item| item.id).collect();
    }

    pub fn select_none(&mut self) {
        self.selected.clear();
    }

    /// Apply a coupon code: trim, uppercase, exact registry lookup. A hit
    /// replaces whatever coupon was active; a miss leaves the previous
    /// coupon untouched and reports rejection.
    pub fn apply_coupon(&mut self, code: &str, registry: &dyn CouponRegistry) -> CouponOutcome {
        let normalized = code.trim().to_uppercase();
        match registry.lookup(&normalized) {
            Some(coupon) => {
                self.coupon = Some(coupon.clone());
                CouponOutcome::Applied(coupon)
            }
            None => CouponOutcome::Rejected,
        }
    }

    pub fn remove_coupon(&mut self) {
        self.coupon = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::coupon::StaticCouponRegistry;
    use std::collections::BTreeMap;

    fn product(price: Cents, stock: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            title: "Test Widget".into(),
            description: None,
            brand: "Acme".into(),
            category_id: "electronics".into(),
            price,
            original_price: None,
            rating: 4.0,
            review_count: 10,
            stock,
            free_shipping: false,
            specs: BTreeMap::new(),
            is_active: true,
            total_sales: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn new_lines_snapshot_price_and_start_selected() {
        let mut cart = Cart::new();
        let widget = product(1000, 5);
        let added = cart.add_item(&widget, 2);

        assert!(!added.merged);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].unit_price, 1000);
        assert!(cart.is_selected(added.item_id));

        // Later quantity changes keep the snapshot price.
        cart.set_quantity(added.item_id, 4, widget.stock);
        assert_eq!(cart.items()[0].unit_price, 1000);
    }

    #[test]
    fn adding_the_same_product_merges_lines() {
        let mut cart = Cart::new();
        let widget = product(1000, 5);
        let first = cart.add_item(&widget, 2);
        let second = cart.add_item(&widget, 2);

        assert!(second.merged);
        assert_eq!(first.item_id, second.item_id);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 4);
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn add_clamps_to_stock() {
        let mut cart = Cart::new();
        let widget = product(1000, 3);
        let added = cart.add_item(&widget, 10);
        assert!(added.clamped);
        assert_eq!(added.quantity, 3);
    }

    #[test]
    fn zero_and_negative_quantities_remove_the_line() {
        for qty in [0, -1] {
            let mut cart = Cart::new();
            let widget = product(1000, 5);
            let added = cart.add_item(&widget, 2);

            let change = cart.set_quantity(added.item_id, qty, widget.stock);
            assert_eq!(change, Some(QuantityChange::Removed));
            assert!(cart.is_empty());
            assert!(cart.selected_ids().is_empty());
        }
    }

    #[test]
    fn quantity_above_stock_clamps() {
        let mut cart = Cart::new();
        let widget = product(1000, 5);
        let added = cart.add_item(&widget, 1);

        let change = cart.set_quantity(added.item_id, 9, widget.stock);
        assert_eq!(
            change,
            Some(QuantityChange::Updated {
                quantity: 5,
                clamped: true
            })
        );
    }

    #[test]
    fn unknown_line_yields_none() {
        let mut cart = Cart::new();
        assert_eq!(cart.set_quantity(Uuid::new_v4(), 2, 10), None);
        assert!(!cart.remove_item(Uuid::new_v4()));
        assert_eq!(cart.toggle_selection(Uuid::new_v4()), None);
    }

    #[test]
    fn removing_a_line_cleans_up_its_selection() {
        let mut cart = Cart::new();
        let widget = product(1000, 5);
        let added = cart.add_item(&widget, 1);
        assert!(cart.is_selected(added.item_id));

        cart.remove_item(added.item_id);
        assert!(cart.selected_ids().is_empty());
    }

    #[test]
    fn selection_toggles_and_bulk_ops() {
        let mut cart = Cart::new();
        let a = cart.add_item(&product(1000, 5), 1);
        let b = cart.add_item(&product(2000, 5), 1);

        assert_eq!(cart.toggle_selection(a.item_id), Some(false));
        assert_eq!(cart.selected_items().len(), 1);
        assert_eq!(cart.selected_items()[0].id, b.item_id);

        cart.select_none();
        assert!(cart.selected_ids().is_empty());

        cart.select_all();
        assert_eq!(cart.selected_ids().len(), 2);
    }

    #[test]
    fn clear_keeps_the_coupon() {
        let registry = StaticCouponRegistry::default();
        let mut cart = Cart::new();
        cart.add_item(&product(1000, 5), 1);
        cart.apply_coupon("SAVE10", &registry);

        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.coupon().is_some());

        cart.remove_coupon();
        assert!(cart.coupon().is_none());
    }

    #[test]
    fn coupon_codes_are_normalized_before_lookup() {
        let registry = StaticCouponRegistry::default();
        let mut cart = Cart::new();
        let outcome = cart.apply_coupon("  save10 ", &registry);
        assert!(matches!(outcome, CouponOutcome::Applied(_)));
        assert_eq!(cart.coupon().unwrap().code, "SAVE10");
    }

    #[test]
    fn invalid_code_keeps_the_previous_coupon() {
        let registry = StaticCouponRegistry::default();
        let mut cart = Cart::new();
        cart.apply_coupon("SAVE10", &registry);

        let outcome = cart.apply_coupon("BOGUS", &registry);
        assert_eq!(outcome, CouponOutcome::Rejected);
        assert_eq!(cart.coupon().unwrap().code, "SAVE10");
    }

    #[test]
    fn reapplying_the_same_code_is_idempotent_and_a_new_code_replaces() {
        let registry = StaticCouponRegistry::default();
        let mut cart = Cart::new();
        cart.apply_coupon("SAVE10", &registry);
        cart.apply_coupon("SAVE10", &registry);
        assert_eq!(cart.coupon().unwrap().discount, 1000);

        cart.apply_coupon("WELCOME20", &registry);
        assert_eq!(cart.coupon().unwrap().code, "WELCOME20");
        assert_eq!(cart.coupon().unwrap().discount, 2000);
    }

    #[test]
    fn display_subtotal_covers_every_line_regardless_of_selection() {
        let mut cart = Cart::new();
        let a = cart.add_item(&product(1000, 5), 2);
        cart.add_item(&product(500, 5), 1);

        cart.set_selected(a.item_id, false);
        assert_eq!(cart.display_subtotal(), 2500);
    }
}

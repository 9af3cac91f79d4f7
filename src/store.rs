use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::engine::cart::Cart;
use crate::engine::compare::ComparisonSet;
use crate::models::{Category, Order, OrderItem, Product};

/// The catalog, seeded at startup. Products keep their insertion order in
/// a `Vec` because search tie-breaking relies on stable catalog order; a
/// `RwLock` is enough since writes only happen at checkout (stock and
/// sales counters).
pub struct CatalogStore {
    products: RwLock<Vec<Product>>,
    categories: Vec<Category>,
}

impl CatalogStore {
    pub fn new(products: Vec<Product>, categories: Vec<Category>) -> Self {
        Self {
            products: RwLock::new(products),
            categories,
        }
    }

    pub fn snapshot(&self) -> Vec<Product> {
        self.products.read().expect("catalog lock poisoned").clone()
    }

    pub fn get(&self, id: Uuid) -> Option<Product> {
        self.products
            .read()
            .expect("catalog lock poisoned")
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.categories
            .iter()
            .filter(|c| c.is_active)
            .cloned()
            .collect()
    }

    /// Decrement stock and bump the sales counter for a purchased line.
    /// Fails (without mutating) when current stock no longer covers the
    /// quantity.
    pub fn commit_sale(&self, product_id: Uuid, quantity: i32) -> bool {
        let mut products = self.products.write().expect("catalog lock poisoned");
        match products.iter_mut().find(|p| p.id == product_id) {
            Some(product) if product.stock >= quantity => {
                product.stock -= quantity;
                product.total_sales += quantity as i64;
                true
            }
            _ => false,
        }
    }
}

/// Per-session state, keyed by the opaque `x-session-id` value. Each
/// session owns exactly one cart, wishlist, and comparison set; entries
/// materialize empty on first touch.
#[derive(Default)]
pub struct SessionStore {
    carts: DashMap<String, Cart>,
    wishlists: DashMap<String, Vec<Uuid>>,
    comparisons: DashMap<String, ComparisonSet>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cart<T>(&self, session_id: &str, f: impl FnOnce(&mut Cart) -> T) -> T {
        let mut entry = self.carts.entry(session_id.to_string()).or_default();
        f(entry.value_mut())
    }

    pub fn cart_snapshot(&self, session_id: &str) -> Cart {
        self.carts
            .get(session_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    pub fn with_wishlist<T>(&self, session_id: &str, f: impl FnOnce(&mut Vec<Uuid>) -> T) -> T {
        let mut entry = self.wishlists.entry(session_id.to_string()).or_default();
        f(entry.value_mut())
    }

    pub fn wishlist(&self, session_id: &str) -> Vec<Uuid> {
        self.wishlists
            .get(session_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    pub fn with_comparison<T>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut ComparisonSet) -> T,
    ) -> T {
        let mut entry = self.comparisons.entry(session_id.to_string()).or_default();
        f(entry.value_mut())
    }

    pub fn comparison(&self, session_id: &str) -> ComparisonSet {
        self.comparisons
            .get(session_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct StoredOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

pub enum PayStatus {
    Paid(StoredOrder),
    AlreadyPaid,
    NotFound,
}

/// Order log, newest last.
#[derive(Default)]
pub struct OrderStore {
    orders: RwLock<Vec<StoredOrder>>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, order: Order, items: Vec<OrderItem>) {
        self.orders
            .write()
            .expect("order lock poisoned")
            .push(StoredOrder { order, items });
    }

    pub fn list_for_session(&self, session_id: &str) -> Vec<Order> {
        self.orders
            .read()
            .expect("order lock poisoned")
            .iter()
            .filter(|stored| stored.order.session_id == session_id)
            .map(|stored| stored.order.clone())
            .collect()
    }

    pub fn get(&self, session_id: &str, id: Uuid) -> Option<StoredOrder> {
        self.orders
            .read()
            .expect("order lock poisoned")
            .iter()
            .find(|stored| stored.order.id == id && stored.order.session_id == session_id)
            .cloned()
    }

    pub fn mark_paid(&self, session_id: &str, id: Uuid) -> PayStatus {
        let mut orders = self.orders.write().expect("order lock poisoned");
        let Some(stored) = orders
            .iter_mut()
            .find(|stored| stored.order.id == id && stored.order.session_id == session_id)
        else {
            return PayStatus::NotFound;
        };

        if stored.order.payment_status == "paid" {
            return PayStatus::AlreadyPaid;
        }

        let now = Utc::now();
        stored.order.payment_status = "paid".to_string();
        stored.order.status = "paid".to_string();
        stored.order.paid_at = Some(now);
        stored.order.updated_at = now;
        PayStatus::Paid(stored.clone())
    }
}

/// Demo catalog served until a real product feed is wired in.
pub fn demo_catalog() -> (Vec<Product>, Vec<Category>) {
    let categories = vec![
        category("electronics", "Electronics"),
        category("fashion", "Fashion"),
        category("home", "Home & Kitchen"),
    ];

    let products = vec![
        product(ProductSeed {
            title: "Aurora X1 Smartphone",
            brand: "Aurora",
            category: "electronics",
            price: 59_900,
            original_price: Some(69_900),
            rating: 4.5,
            review_count: 1287,
            stock: 42,
            free_shipping: true,
            specs: &[
                ("Display", "6.1 inch OLED"),
                ("Storage", "128 GB"),
                ("Battery", "4100 mAh"),
                ("Color", "Midnight Black"),
            ],
        }),
        product(ProductSeed {
            title: "Aurora Buds Pro",
            brand: "Aurora",
            category: "electronics",
            price: 12_900,
            original_price: None,
            rating: 4.2,
            review_count: 654,
            stock: 120,
            free_shipping: true,
            specs: &[("Battery", "30 h with case"), ("Color", "White")],
        }),
        product(ProductSeed {
            title: "Volt 15 Laptop",
            brand: "Voltaic",
            category: "electronics",
            price: 129_900,
            original_price: Some(149_900),
            rating: 4.7,
            review_count: 412,
            stock: 15,
            free_shipping: true,
            specs: &[
                ("Display", "15.6 inch IPS"),
                ("Storage", "512 GB SSD"),
                ("Memory", "16 GB"),
            ],
        }),
        product(ProductSeed {
            title: "Nimbus Cotton T-Shirt",
            brand: "Nimbus",
            category: "fashion",
            price: 1_900,
            original_price: None,
            rating: 4.0,
            review_count: 233,
            stock: 300,
            free_shipping: false,
            specs: &[("Material", "100% cotton"), ("Fit", "Regular")],
        }),
        product(ProductSeed {
            title: "Nimbus Rain Jacket",
            brand: "Nimbus",
            category: "fashion",
            price: 8_900,
            original_price: Some(11_900),
            rating: 4.3,
            review_count: 89,
            stock: 48,
            free_shipping: false,
            specs: &[("Material", "Recycled nylon"), ("Waterproof", "10k mm")],
        }),
        product(ProductSeed {
            title: "Ember Pour-Over Kettle",
            brand: "Ember",
            category: "home",
            price: 6_500,
            original_price: None,
            rating: 4.8,
            review_count: 156,
            stock: 0,
            free_shipping: false,
            specs: &[("Capacity", "0.9 L"), ("Material", "Stainless steel")],
        }),
        product(ProductSeed {
            title: "Ember Chef Knife",
            brand: "Ember",
            category: "home",
            price: 4_900,
            original_price: Some(5_900),
            rating: 4.6,
            review_count: 301,
            stock: 77,
            free_shipping: false,
            specs: &[("Blade", "20 cm"), ("Steel", "High-carbon")],
        }),
        product(ProductSeed {
            title: "Voltaic USB-C Charger 65W",
            brand: "Voltaic",
            category: "electronics",
            price: 3_900,
            original_price: None,
            rating: 4.4,
            review_count: 540,
            stock: 200,
            free_shipping: true,
            specs: &[("Output", "65 W"), ("Ports", "2x USB-C")],
        }),
    ];

    (products, categories)
}

fn category(id: &str, name: &str) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        is_active: true,
    }
}

struct ProductSeed {
    title: &'static str,
    brand: &'static str,
    category: &'static str,
    price: i64,
    original_price: Option<i64>,
    rating: f32,
    review_count: i32,
    stock: i32,
    free_shipping: bool,
    specs: &'static [(&'static str, &'static str)],
}

fn product(seed: ProductSeed) -> Product {
    Product {
        id: Uuid::new_v4(),
        title: seed.title.to_string(),
        description: None,
        brand: seed.brand.to_string(),
        category_id: seed.category.to_string(),
        price: seed.price,
        original_price: seed.original_price,
        rating: seed.rating,
        review_count: seed.review_count,
        stock: seed.stock,
        free_shipping: seed.free_shipping,
        specs: seed
            .specs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>(),
        is_active: true,
        total_sales: 0,
        created_at: Utc::now(),
    }
}

use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{
            AddToCartRequest, ApplyCouponRequest, CartLineDto, CartView, CouponResult,
            SelectionRequest, UpdateCartItemRequest,
        },
        compare::{AddCompareRequest, ComparisonView},
        orders::{CheckoutRequest, OrderList, OrderWithItems, PayOrderRequest},
        products::{CategoryList, SearchData},
        wishlist::{AddWishlistRequest, WishlistProductList},
    },
    engine::{compare::SpecRow, pricing::OrderSummary},
    models::{CartItem, Category, Coupon, Order, OrderItem, Product},
    response::{ApiResponse, Meta},
    routes::{cart, compare, health, orders, params, products, wishlist},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session_header",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("x-session-id"))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::search_products,
        products::get_product,
        products::list_categories,
        cart::view_cart,
        cart::add_to_cart,
        cart::update_cart_item,
        cart::remove_from_cart,
        cart::clear_cart,
        cart::set_selection,
        cart::apply_coupon,
        cart::remove_coupon,
        cart::summary,
        orders::list_orders,
        orders::checkout,
        orders::get_order,
        orders::pay_order,
        wishlist::list_wishlist,
        wishlist::add_to_wishlist,
        wishlist::remove_from_wishlist,
        compare::view_comparison,
        compare::add_to_comparison,
        compare::remove_from_comparison,
        compare::clear_comparison,
    ),
    components(
        schemas(
            Product,
            Category,
            CartItem,
            Coupon,
            Order,
            OrderItem,
            OrderSummary,
            SpecRow,
            AddToCartRequest,
            UpdateCartItemRequest,
            SelectionRequest,
            ApplyCouponRequest,
            CouponResult,
            CartLineDto,
            CartView,
            CheckoutRequest,
            PayOrderRequest,
            OrderWithItems,
            OrderList,
            SearchData,
            CategoryList,
            AddWishlistRequest,
            WishlistProductList,
            AddCompareRequest,
            ComparisonView,
            params::Pagination,
            params::ProductQuery,
            params::OrderListQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<SearchData>,
            ApiResponse<CartView>,
            ApiResponse<OrderSummary>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>
        )
    ),
    security(
        ("session_header" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Catalog search and detail endpoints"),
        (name = "Cart", description = "Cart, selection, and coupon endpoints"),
        (name = "Orders", description = "Checkout and order history endpoints"),
        (name = "Wishlist", description = "Wishlist endpoints"),
        (name = "Compare", description = "Product comparison endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

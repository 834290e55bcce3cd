use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    cart::{Cart, CartEntry, CartProduct},
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{AddToCartRequest, CartItemQuery, CartLine, CartView, UpdateCartItemRequest},
        catalog::{CategoryList, CreateCategoryRequest, CreateDesignRequest, DesignList},
        orders::{
            CheckoutRequest, OrderHistory, OrderList, OrderWithItems, UpdateOrderStatusRequest,
        },
        partner::{DailySales, PartnerDashboard, PartnerOrder, PartnerOrderList, RecentOrder},
        pricing::{CommissionQuote, CommissionQuoteRequest, RangeQuery, RecommendedRange},
        products::{
            CreateProductRequest, DesignPlacement, ProductCommission, ProductList,
            UpdateProductRequest, VariantCommission, VariantRequest,
        },
    },
    models::{
        Category, Design, Order, OrderItem, OrderStatusEntry, Product, ProductDesign,
        ProductVariant, ProductWithVariants, User,
    },
    pricing::{CartTotals, CategoryRef, CommissionBreakdown, PriceRange, ProductKind},
    response::{ApiResponse, Meta},
    routes::{
        admin, auth, cart, categories, health, orders, params, partner, pricing, products,
    },
    status::OrderStatus,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        products::list_products,
        products::create_product,
        products::get_product,
        products::update_product,
        products::delete_product,
        products::product_commission,
        pricing::quote_commission,
        pricing::recommended_range,
        cart::view_cart,
        cart::add_to_cart,
        cart::update_cart_item,
        cart::remove_from_cart,
        cart::clear_cart,
        cart::open_cart,
        cart::close_cart,
        orders::list_orders,
        orders::checkout,
        orders::get_order,
        orders::order_history,
        orders::update_order_status,
        partner::list_partner_orders,
        partner::dashboard,
        partner::list_designs,
        partner::create_design,
        categories::list_categories,
        categories::create_category,
        admin::list_all_orders
    ),
    components(
        schemas(
            User,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            Product,
            ProductVariant,
            ProductWithVariants,
            ProductDesign,
            DesignPlacement,
            CreateProductRequest,
            UpdateProductRequest,
            VariantRequest,
            ProductList,
            ProductCommission,
            VariantCommission,
            ProductKind,
            CategoryRef,
            PriceRange,
            CommissionBreakdown,
            CommissionQuoteRequest,
            CommissionQuote,
            RangeQuery,
            RecommendedRange,
            Cart,
            CartEntry,
            CartProduct,
            CartTotals,
            CartLine,
            CartView,
            AddToCartRequest,
            UpdateCartItemRequest,
            CartItemQuery,
            Order,
            OrderItem,
            OrderStatus,
            OrderStatusEntry,
            CheckoutRequest,
            UpdateOrderStatusRequest,
            OrderWithItems,
            OrderList,
            OrderHistory,
            PartnerOrder,
            PartnerOrderList,
            RecentOrder,
            DailySales,
            PartnerDashboard,
            Category,
            CategoryList,
            CreateCategoryRequest,
            Design,
            DesignList,
            CreateDesignRequest,
            params::Pagination,
            params::ProductQuery,
            params::OrderListQuery,
            Meta,
            ApiResponse<ProductWithVariants>,
            ApiResponse<ProductList>,
            ApiResponse<CartView>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<PartnerDashboard>,
            ApiResponse<CategoryList>,
            ApiResponse<DesignList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Products", description = "Catalog endpoints"),
        (name = "Pricing", description = "Commission and price guidance"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Partner", description = "Partner sales and design endpoints"),
        (name = "Categories", description = "Product categories"),
        (name = "Admin", description = "Store-wide admin views"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

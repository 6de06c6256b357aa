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
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest, RegisteredCustomer},
        cart::{AddToCartRequest, CartAction, CartLineDetail, CartView, ManageCartRequest},
        customers::CustomerProfile,
        orders::{
            AdminOrderDetail, CheckoutRequest, OrderDetail, OrderList, UpdateOrderStatusRequest,
        },
        products::{CategoryList, CategoryWithProducts, ProductList},
        session::SessionData,
    },
    entity::sea_orm_active_enums::OrderStatus,
    models::{Cart, CartLine, Category, Customer, Order, Product, User},
    response::{ApiResponse, Meta},
    routes::{admin, auth, cart, customers, health, orders, params, products, session},
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
        session::open_session,
        auth::login,
        auth::register,
        products::list_products,
        products::get_product,
        products::list_categories,
        cart::my_cart,
        cart::add_to_cart,
        cart::manage_cart,
        cart::empty_cart,
        orders::list_order,
        orders::checkout,
        orders::get_order,
        customers::my_profile,
        admin::list_all_orders,
        admin::list_pending_orders,
        admin::get_order_admin,
        admin::update_order_status
    ),
    components(
        schemas(
            User,
            Customer,
            Category,
            Product,
            Cart,
            CartLine,
            Order,
            OrderStatus,
            RegisterRequest,
            RegisteredCustomer,
            LoginRequest,
            LoginResponse,
            AddToCartRequest,
            CartAction,
            ManageCartRequest,
            CartLineDetail,
            CartView,
            CheckoutRequest,
            UpdateOrderStatusRequest,
            OrderDetail,
            AdminOrderDetail,
            OrderList,
            CustomerProfile,
            ProductList,
            CategoryWithProducts,
            CategoryList,
            SessionData,
            params::Pagination,
            params::ProductQuery,
            params::OrderListQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<CartView>,
            ApiResponse<OrderDetail>,
            ApiResponse<AdminOrderDetail>,
            ApiResponse<OrderList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Session", description = "Anonymous shopping sessions"),
        (name = "Products", description = "Catalog endpoints"),
        (name = "Cart", description = "Session cart endpoints"),
        (name = "Orders", description = "Checkout and customer order endpoints"),
        (name = "Customers", description = "Customer profile"),
        (name = "Admin", description = "Admin endpoints"),
        (name = "Auth", description = "Authentication endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

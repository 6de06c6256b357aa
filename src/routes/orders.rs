use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{CheckoutRequest, OrderDetail, OrderList},
    error::AppResult,
    middleware::{auth::AuthUser, session::SessionContext},
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    services::order_service::{self, CheckoutResult, CustomerOrderLookup},
    state::AppState,
};

pub const CATALOG_HOME: &str = "/api/products";
pub const CUSTOMER_PROFILE: &str = "/api/customers/me";

pub fn route() -> Router<AppState> {
    Router::new()
        .route("/", get(list_order))
        .route("/checkout", post(checkout))
        .route("/{id}", get(get_order))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "The customer's orders, newest first", body = ApiResponse<OrderList>),
        (status = 403, description = "No customer profile")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_order(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_customer_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/checkout",
    params(
        ("x-session-id" = Uuid, Header, description = "Session id")
    ),
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order created from the session's cart", body = ApiResponse<OrderDetail>),
        (status = 303, description = "No open cart; redirected to the catalog"),
        (status = 400, description = "Empty cart or missing shipping fields"),
        (status = 403, description = "No customer profile")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
    mut session: SessionContext,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Response> {
    let result = order_service::checkout(&state, &user, &mut session, payload).await?;
    let response = match result {
        CheckoutResult::Created(detail) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                "Checkout success",
                detail,
                Some(Meta::empty()),
            )),
        )
            .into_response(),
        CheckoutResult::NoOpenCart => Redirect::to(CATALOG_HOME).into_response(),
    };
    Ok(response)
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with its lines", body = ApiResponse<OrderDetail>),
        (status = 303, description = "Order belongs to another customer; redirected to profile"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let lookup = order_service::get_customer_order(&state, &user, id).await?;
    let response = match lookup {
        CustomerOrderLookup::Found(detail) => {
            Json(ApiResponse::success("OK", detail, Some(Meta::empty()))).into_response()
        }
        CustomerOrderLookup::NotOwned => Redirect::to(CUSTOMER_PROFILE).into_response(),
    };
    Ok(response)
}

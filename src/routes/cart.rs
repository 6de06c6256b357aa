use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartView, ManageCartRequest},
    error::AppResult,
    middleware::session::SessionContext,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(my_cart).delete(empty_cart))
        .route("/items", post(add_to_cart))
        .route("/lines/{line_id}", post(manage_cart))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    params(
        ("x-session-id" = Uuid, Header, description = "Session id")
    ),
    responses(
        (status = 200, description = "The session's cart", body = ApiResponse<CartView>),
        (status = 400, description = "Missing session header")
    ),
    tag = "Cart"
)]
pub async fn my_cart(
    State(state): State<AppState>,
    session: SessionContext,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::get_cart(&state, &session).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart/items",
    params(
        ("x-session-id" = Uuid, Header, description = "Session id")
    ),
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Add one unit of a product", body = ApiResponse<CartView>),
        (status = 404, description = "Product not found")
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    mut session: SessionContext,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::add_item(&state, &mut session, payload.product_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart/lines/{line_id}",
    params(
        ("x-session-id" = Uuid, Header, description = "Session id"),
        ("line_id" = Uuid, Path, description = "Cart line ID")
    ),
    request_body = ManageCartRequest,
    responses(
        (status = 200, description = "Increment, decrement or remove a line", body = ApiResponse<CartView>),
        (status = 404, description = "Line not in this session's cart")
    ),
    tag = "Cart"
)]
pub async fn manage_cart(
    State(state): State<AppState>,
    session: SessionContext,
    Path(line_id): Path<Uuid>,
    Json(payload): Json<ManageCartRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::adjust_line(&state, &session, line_id, payload.action).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    params(
        ("x-session-id" = Uuid, Header, description = "Session id")
    ),
    responses(
        (status = 200, description = "All lines cleared", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn empty_cart(
    State(state): State<AppState>,
    session: SessionContext,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::empty_cart(&state, &session).await?;
    Ok(Json(resp))
}

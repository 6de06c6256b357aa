use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::{self, Actor},
    dto::orders::{CheckoutRequest, OrderDetail, OrderList},
    entity::{
        carts::{ActiveModel as CartActive, Column as CartCol, Entity as Carts},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        sea_orm_active_enums::OrderStatus,
    },
    error::{AppError, AppResult},
    middleware::{auth::AuthUser, session::SessionContext},
    models::Order,
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::{cart_service, customer_service, session_service},
    state::AppState,
};

/// Outcome of a checkout attempt.
#[derive(Debug)]
pub enum CheckoutResult {
    Created(OrderDetail),
    /// The session holds no cart; nothing was written.
    NoOpenCart,
}

/// Outcome of a customer looking up one order.
#[derive(Debug)]
pub enum CustomerOrderLookup {
    Found(OrderDetail),
    /// The order exists but belongs to another customer.
    NotOwned,
}

/// Freeze the session's cart into an order and clear the session's cart binding.
pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    session: &mut SessionContext,
    payload: CheckoutRequest,
) -> AppResult<CheckoutResult> {
    let customer = customer_service::require_customer(&state.orm, user).await?;

    if session.cart_id.is_none() {
        return Ok(CheckoutResult::NoOpenCart);
    }

    let CheckoutRequest {
        ordered_by,
        shipping_address,
        mobile,
        email,
    } = payload;
    let ordered_by = required_field("ordered_by", ordered_by)?;
    let shipping_address = required_field("shipping_address", shipping_address)?;
    let mobile = required_field("mobile", mobile)?;
    let email = email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty());

    // The caller's session may be stale (a double submit, a second tab). Only the stored
    // session, read under lock, decides which cart is still open.
    let txn = state.orm.begin().await?;
    let cart = match cart_service::lock_open_cart(&txn, session.session_id).await? {
        (_, Some(cart)) => cart,
        (current, None) => {
            *session = current;
            return Ok(CheckoutResult::NoOpenCart);
        }
    };

    match cart.customer_id {
        Some(owner) if owner != customer.id => return Err(AppError::Forbidden),
        _ => {}
    }

    let lines = cart_service::load_lines(&txn, cart.id).await?;
    if lines.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let cart = if cart.customer_id.is_none() {
        let mut active: CartActive = cart.into();
        active.customer_id = Set(Some(customer.id));
        active.update(&txn).await?
    } else {
        cart
    };

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        cart_id: Set(cart.id),
        ordered_by: Set(ordered_by),
        shipping_address: Set(shipping_address),
        mobile: Set(mobile),
        email: Set(email),
        subtotal: Set(cart.total),
        discount: Set(0),
        total: Set(cart.total),
        status: Set(OrderStatus::Received),
        created_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;

    let mut cleared = session.clone();
    cleared.cart_id = None;
    session_service::store(&txn, &cleared).await?;

    txn.commit().await?;
    *session = cleared;

    tracing::info!(
        order_id = %order.id,
        cart_id = %cart.id,
        total = order.total,
        "checkout completed"
    );
    audit::record(
        &state.orm,
        Actor::User(user.user_id),
        "checkout",
        "orders",
        serde_json::json!({ "order_id": order.id, "cart_id": cart.id }),
    )
    .await;

    Ok(CheckoutResult::Created(OrderDetail {
        order: order.into(),
        lines,
    }))
}

pub async fn list_customer_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let customer = customer_service::require_customer(&state.orm, user).await?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all().add(CartCol::CustomerId.eq(customer.id));
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status));
    }

    let mut finder = Orders::find().inner_join(Carts).filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await?;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    let meta = Meta::paged(page, limit, total);
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn get_customer_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<CustomerOrderLookup> {
    let customer = customer_service::require_customer(&state.orm, user).await?;

    let found = Orders::find_by_id(id)
        .find_also_related(Carts)
        .one(&state.orm)
        .await?;
    let (order, cart) = match found {
        Some(row) => row,
        None => return Err(AppError::NotFound),
    };

    let owner = cart.and_then(|c| c.customer_id);
    if owner != Some(customer.id) {
        tracing::warn!(order_id = %id, user_id = %user.user_id, "order requested by non-owner");
        return Ok(CustomerOrderLookup::NotOwned);
    }

    let detail = order_detail(&state.orm, order).await?;
    Ok(CustomerOrderLookup::Found(detail))
}

pub(crate) async fn order_detail<C>(conn: &C, order: OrderModel) -> AppResult<OrderDetail>
where
    C: ConnectionTrait,
{
    let lines = cart_service::load_lines(conn, order.cart_id).await?;
    Ok(OrderDetail {
        order: order.into(),
        lines,
    })
}

fn required_field(name: &str, value: String) -> AppResult<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{name} is required")));
    }
    Ok(value)
}

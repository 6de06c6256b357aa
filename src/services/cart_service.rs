use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::sea_query::LockType;
use uuid::Uuid;

use crate::{
    audit::{self, Actor},
    dto::cart::{CartAction, CartLineDetail, CartView},
    entity::{
        cart_lines::{ActiveModel as LineActive, Column as LineCol, Entity as CartLines},
        carts::{ActiveModel as CartActive, Entity as Carts, Model as CartModel},
        orders::{Column as OrderCol, Entity as Orders},
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    middleware::session::SessionContext,
    response::{ApiResponse, Meta},
    services::session_service,
    state::AppState,
};

pub async fn get_cart(
    state: &AppState,
    session: &SessionContext,
) -> AppResult<ApiResponse<CartView>> {
    let current = session_service::load(&state.orm, session.session_id).await?;
    let view = match current.cart_id {
        Some(cart_id) => {
            let cart = Carts::find_by_id(cart_id).one(&state.orm).await?;
            let cart = match cart {
                Some(c) => c,
                None => return Err(AppError::NotFound),
            };
            load_cart_view(&state.orm, cart).await?
        }
        None => CartView::empty(),
    };

    Ok(ApiResponse::success("OK", view, Some(Meta::empty())))
}

/// Add one unit of a product to the session's cart, creating the cart (and binding it into the
/// session) when the session has none.
pub async fn add_item(
    state: &AppState,
    session: &mut SessionContext,
    product_id: Uuid,
) -> AppResult<ApiResponse<CartView>> {
    let txn = state.orm.begin().await?;

    let product = Products::find_by_id(product_id).one(&txn).await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let (mut working, open) = lock_open_cart(&txn, session.session_id).await?;
    let cart = match open {
        Some(cart) => cart,
        None => {
            let cart = CartActive {
                id: Set(Uuid::new_v4()),
                customer_id: Set(None),
                total: Set(0),
                created_at: Set(Utc::now().into()),
            }
            .insert(&txn)
            .await?;
            working.cart_id = Some(cart.id);
            session_service::store(&txn, &working).await?;
            cart
        }
    };

    let existing = CartLines::find()
        .filter(LineCol::CartId.eq(cart.id))
        .filter(LineCol::ProductId.eq(product.id))
        .lock(LockType::Update)
        .one(&txn)
        .await?;

    // Re-adding a product charges the rate captured on the line, keeping
    // subtotal == quantity * rate even if the catalog price moved since.
    let delta = match existing {
        Some(line) => {
            let rate = line.rate;
            let quantity = line.quantity + 1;
            let subtotal = line.subtotal + rate;
            let mut active: LineActive = line.into();
            active.quantity = Set(quantity);
            active.subtotal = Set(subtotal);
            active.update(&txn).await?;
            rate
        }
        None => {
            let rate = product.selling_price;
            LineActive {
                id: Set(Uuid::new_v4()),
                cart_id: Set(cart.id),
                product_id: Set(product.id),
                rate: Set(rate),
                quantity: Set(1),
                subtotal: Set(rate),
                created_at: Set(Utc::now().into()),
            }
            .insert(&txn)
            .await?;
            rate
        }
    };

    let cart = apply_total_delta(&txn, cart, delta).await?;
    let view = load_cart_view(&txn, cart).await?;
    txn.commit().await?;
    *session = working;

    tracing::info!(
        session_id = %session.session_id,
        product_id = %product_id,
        total = view.cart.as_ref().map(|c| c.total).unwrap_or_default(),
        "item added to cart"
    );
    audit::record(
        &state.orm,
        Actor::Session(session.session_id),
        "cart_add",
        "carts",
        serde_json::json!({ "session_id": session.session_id, "product_id": product_id }),
    )
    .await;

    Ok(ApiResponse::success("Added to cart", view, Some(Meta::empty())))
}

/// Increment, decrement or remove one line of the session's cart.
pub async fn adjust_line(
    state: &AppState,
    session: &SessionContext,
    line_id: Uuid,
    action: CartAction,
) -> AppResult<ApiResponse<CartView>> {
    let txn = state.orm.begin().await?;
    let cart = match lock_open_cart(&txn, session.session_id).await? {
        (_, Some(cart)) => cart,
        (_, None) => return Err(AppError::NotFound),
    };

    let line = CartLines::find_by_id(line_id)
        .filter(LineCol::CartId.eq(cart.id))
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let line = match line {
        Some(l) => l,
        None => return Err(AppError::NotFound),
    };

    let delta = match action {
        CartAction::Increment => {
            let rate = line.rate;
            let quantity = line.quantity + 1;
            let subtotal = line.subtotal + rate;
            let mut active: LineActive = line.into();
            active.quantity = Set(quantity);
            active.subtotal = Set(subtotal);
            active.update(&txn).await?;
            rate
        }
        CartAction::Decrement => {
            // Quantity never goes below zero; a line that reaches zero is dropped.
            let quantity = (line.quantity - 1).max(0);
            let delta = -line.rate * i64::from(line.quantity - quantity);
            if quantity == 0 {
                CartLines::delete_by_id(line.id).exec(&txn).await?;
            } else {
                let subtotal = line.subtotal + delta;
                let mut active: LineActive = line.into();
                active.quantity = Set(quantity);
                active.subtotal = Set(subtotal);
                active.update(&txn).await?;
            }
            delta
        }
        CartAction::Remove => {
            let delta = -line.subtotal;
            CartLines::delete_by_id(line.id).exec(&txn).await?;
            delta
        }
    };

    let cart = apply_total_delta(&txn, cart, delta).await?;
    let view = load_cart_view(&txn, cart).await?;
    txn.commit().await?;

    tracing::info!(
        session_id = %session.session_id,
        line_id = %line_id,
        action = ?action,
        "cart line adjusted"
    );
    audit::record(
        &state.orm,
        Actor::Session(session.session_id),
        "cart_adjust",
        "cart_lines",
        serde_json::json!({ "line_id": line_id, "action": action }),
    )
    .await;

    Ok(ApiResponse::success("Cart updated", view, Some(Meta::empty())))
}

/// Drop every line of the session's cart and reset its total. The cart itself stays open.
pub async fn empty_cart(
    state: &AppState,
    session: &SessionContext,
) -> AppResult<ApiResponse<CartView>> {
    let txn = state.orm.begin().await?;
    let cart = match lock_open_cart(&txn, session.session_id).await? {
        (_, Some(cart)) => cart,
        (_, None) => {
            return Ok(ApiResponse::success(
                "Cart is empty",
                CartView::empty(),
                Some(Meta::empty()),
            ));
        }
    };
    let cart_id = cart.id;

    CartLines::delete_many()
        .filter(LineCol::CartId.eq(cart.id))
        .exec(&txn)
        .await?;

    let mut active: CartActive = cart.into();
    active.total = Set(0);
    let cart = active.update(&txn).await?;
    let view = load_cart_view(&txn, cart).await?;
    txn.commit().await?;

    audit::record(
        &state.orm,
        Actor::Session(session.session_id),
        "cart_empty",
        "carts",
        serde_json::json!({ "cart_id": cart_id }),
    )
    .await;

    Ok(ApiResponse::success("Cart emptied", view, Some(Meta::empty())))
}

/// Resolve the session's open cart from the stored session row, locking both rows for the rest
/// of the transaction. The caller's copy of the session is never trusted here: it may predate a
/// checkout. A cart that already backs an order is closed, so the session is reported cartless.
pub(crate) async fn lock_open_cart<C>(
    conn: &C,
    session_id: Uuid,
) -> AppResult<(SessionContext, Option<CartModel>)>
where
    C: ConnectionTrait,
{
    let mut current = session_service::load_for_update(conn, session_id).await?;
    let Some(cart_id) = current.cart_id else {
        return Ok((current, None));
    };

    let cart = lock_cart(conn, cart_id).await?;
    let ordered = Orders::find()
        .filter(OrderCol::CartId.eq(cart.id))
        .count(conn)
        .await?
        > 0;
    if ordered {
        tracing::warn!(%session_id, cart_id = %cart.id, "session still points at an ordered cart");
        current.cart_id = None;
        return Ok((current, None));
    }

    Ok((current, Some(cart)))
}

/// Re-read the cart row under `FOR UPDATE` so concurrent mutations serialize on it.
async fn lock_cart<C>(conn: &C, cart_id: Uuid) -> AppResult<CartModel>
where
    C: ConnectionTrait,
{
    Carts::find_by_id(cart_id)
        .lock(LockType::Update)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)
}

/// Lines of a cart in insertion order, joined with their products.
pub(crate) async fn load_lines<C>(conn: &C, cart_id: Uuid) -> AppResult<Vec<CartLineDetail>>
where
    C: ConnectionTrait,
{
    let rows = CartLines::find()
        .filter(LineCol::CartId.eq(cart_id))
        .find_also_related(Products)
        .order_by_asc(LineCol::CreatedAt)
        .all(conn)
        .await?;

    let lines = rows
        .into_iter()
        .map(|(line, product)| {
            let (product_title, product_slug) = product
                .map(|p| (p.title, p.slug))
                .unwrap_or_default();
            CartLineDetail {
                id: line.id,
                product_id: line.product_id,
                product_title,
                product_slug,
                rate: line.rate,
                quantity: line.quantity,
                subtotal: line.subtotal,
            }
        })
        .collect();

    Ok(lines)
}

async fn apply_total_delta<C>(conn: &C, cart: CartModel, delta: i64) -> AppResult<CartModel>
where
    C: ConnectionTrait,
{
    if delta == 0 {
        return Ok(cart);
    }
    let total = cart.total + delta;
    let mut active: CartActive = cart.into();
    active.total = Set(total);
    Ok(active.update(conn).await?)
}

async fn load_cart_view<C>(conn: &C, cart: CartModel) -> AppResult<CartView>
where
    C: ConnectionTrait,
{
    let lines = load_lines(conn, cart.id).await?;
    Ok(CartView {
        cart: Some(cart.into()),
        lines,
    })
}

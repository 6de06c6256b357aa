use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect, Set,
    sea_query::{LockType, OnConflict},
};
use uuid::Uuid;

use crate::{
    entity::{
        carts::{ActiveModel as CartActive, Entity as Carts},
        customers::{Column as CustomerCol, Entity as Customers},
        sessions::{ActiveModel as SessionActive, Column as SessionCol, Entity as Sessions},
    },
    error::{AppError, AppResult},
    middleware::{auth::AuthUser, session::SessionContext},
    state::AppState,
};

/// Issue a fresh session with no cart.
pub async fn open_session(state: &AppState) -> AppResult<SessionContext> {
    let session = SessionContext::new(Uuid::new_v4());
    store(&state.orm, &session).await?;
    Ok(session)
}

/// Load the session context; an unknown id is an empty session with that id.
pub async fn load<C>(conn: &C, session_id: Uuid) -> AppResult<SessionContext>
where
    C: ConnectionTrait,
{
    let row = Sessions::find_by_id(session_id).one(conn).await?;
    Ok(SessionContext {
        session_id,
        cart_id: row.and_then(|s| s.cart_id),
    })
}

/// Like [`load`], but locks the stored row so concurrent requests on one session take turns.
pub async fn load_for_update<C>(conn: &C, session_id: Uuid) -> AppResult<SessionContext>
where
    C: ConnectionTrait,
{
    let row = Sessions::find_by_id(session_id)
        .lock(LockType::Update)
        .one(conn)
        .await?;
    Ok(SessionContext {
        session_id,
        cart_id: row.and_then(|s| s.cart_id),
    })
}

/// Persist the session's cart binding.
pub async fn store<C>(conn: &C, session: &SessionContext) -> AppResult<()>
where
    C: ConnectionTrait,
{
    let now = Utc::now();
    let active = SessionActive {
        id: Set(session.session_id),
        cart_id: Set(session.cart_id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    Sessions::insert(active)
        .on_conflict(
            OnConflict::column(SessionCol::Id)
                .update_columns([SessionCol::CartId, SessionCol::UpdatedAt])
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    Ok(())
}

/// Link the session's cart to the user's customer profile if the cart has no customer yet.
///
/// Returns whether a link was written. Safe to run on every request: an already linked cart is
/// never touched.
pub async fn bind_cart_to_customer<C>(
    conn: &C,
    session: &SessionContext,
    user: &AuthUser,
) -> AppResult<bool>
where
    C: ConnectionTrait,
{
    let Some(cart_id) = session.cart_id else {
        return Ok(false);
    };

    let customer = Customers::find()
        .filter(CustomerCol::UserId.eq(user.user_id))
        .one(conn)
        .await?;
    let Some(customer) = customer else {
        return Ok(false);
    };

    let cart = Carts::find_by_id(cart_id).one(conn).await?;
    let cart = match cart {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };
    if cart.customer_id.is_some() {
        return Ok(false);
    }

    let mut active: CartActive = cart.into();
    active.customer_id = Set(Some(customer.id));
    active.update(conn).await?;

    Ok(true)
}

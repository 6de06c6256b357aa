use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::{
    dto::customers::CustomerProfile,
    entity::{
        carts::{Column as CartCol, Entity as Carts},
        customers::{Column as CustomerCol, Entity as Customers, Model as CustomerModel},
        orders::{Column as OrderCol, Entity as Orders},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Order,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// The customer profile behind an authenticated user. Users without one (e.g. staff accounts)
/// are forbidden from customer operations.
pub async fn require_customer<C>(conn: &C, user: &AuthUser) -> AppResult<CustomerModel>
where
    C: ConnectionTrait,
{
    Customers::find()
        .filter(CustomerCol::UserId.eq(user.user_id))
        .one(conn)
        .await?
        .ok_or(AppError::Forbidden)
}

pub async fn profile(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CustomerProfile>> {
    let customer = require_customer(&state.orm, user).await?;

    let orders = Orders::find()
        .inner_join(Carts)
        .filter(CartCol::CustomerId.eq(customer.id))
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    Ok(ApiResponse::success(
        "Profile",
        CustomerProfile {
            customer: customer.into(),
            orders,
        },
        Some(Meta::empty()),
    ))
}

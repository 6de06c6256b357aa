#![allow(dead_code)]

use axum_storefront_api::{
    db::{create_orm_conn, run_migrations},
    entity::{
        cart_lines::{self, Entity as CartLines},
        carts::{Entity as Carts, Model as CartModel},
        categories::ActiveModel as CategoryActive,
        customers::{ActiveModel as CustomerActive, Model as CustomerModel},
        products::{ActiveModel as ProductActive, Model as ProductModel},
        users::ActiveModel as UserActive,
    },
    middleware::{auth::AuthUser, session::SessionContext},
    state::AppState,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use tempfile::TempDir;
use uuid::Uuid;

/// Fresh SQLite database in a temp dir, migrated with the real migrator. Keep the `TempDir`
/// alive for the duration of the test.
pub async fn setup_state() -> anyhow::Result<(TempDir, AppState)> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("storefront.db");
    let url = format!("sqlite://{}?mode=rwc", path.display());
    let orm = create_orm_conn(&url).await?;
    run_migrations(&orm).await?;
    Ok((dir, AppState { orm }))
}

pub fn new_session() -> SessionContext {
    SessionContext::new(Uuid::new_v4())
}

pub async fn create_product(
    state: &AppState,
    slug: &str,
    selling_price: i64,
) -> anyhow::Result<ProductModel> {
    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        title: Set(format!("{slug} category")),
        slug: Set(format!("{slug}-category")),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        category_id: Set(category.id),
        title: Set(slug.replace('-', " ")),
        slug: Set(slug.to_string()),
        description: Set(Some("A product for testing".into())),
        marked_price: Set(selling_price),
        selling_price: Set(selling_price),
        view_count: Set(0),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(product)
}

pub async fn create_user(state: &AppState, role: &str, email: &str) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        role: Set(role.into()),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        role: user.role,
    })
}

/// A `user` account with a customer profile.
pub async fn create_customer(
    state: &AppState,
    email: &str,
) -> anyhow::Result<(AuthUser, CustomerModel)> {
    let user = create_user(state, "user", email).await?;
    let customer = CustomerActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        full_name: Set("Test Customer".into()),
        address: Set(None),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;
    Ok((user, customer))
}

pub async fn fetch_cart(state: &AppState, cart_id: Uuid) -> anyhow::Result<CartModel> {
    Carts::find_by_id(cart_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| anyhow::anyhow!("cart {cart_id} missing"))
}

pub async fn fetch_lines(state: &AppState, cart_id: Uuid) -> anyhow::Result<Vec<cart_lines::Model>> {
    Ok(CartLines::find()
        .filter(cart_lines::Column::CartId.eq(cart_id))
        .all(&state.orm)
        .await?)
}

/// Asserts both ledger invariants straight from the tables.
pub async fn assert_ledger_consistent(state: &AppState, cart_id: Uuid) -> anyhow::Result<()> {
    let cart = fetch_cart(state, cart_id).await?;
    let lines = fetch_lines(state, cart_id).await?;
    for line in &lines {
        assert!(line.quantity > 0, "line {} has quantity {}", line.id, line.quantity);
        assert_eq!(
            line.subtotal,
            line.rate * i64::from(line.quantity),
            "subtotal drifted from quantity * rate"
        );
    }
    let sum: i64 = lines.iter().map(|l| l.subtotal).sum();
    assert_eq!(cart.total, sum, "cart total drifted from line subtotals");
    Ok(())
}

mod common;

use axum_storefront_api::{
    error::AppError,
    middleware::session::SessionContext,
    services::{cart_service, session_service},
};
use uuid::Uuid;

use common::{create_customer, create_product, create_user, fetch_cart, new_session};

#[tokio::test]
async fn open_session_round_trips_through_store() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;

    let session = session_service::open_session(&state).await?;
    assert_eq!(session.cart_id, None);

    let loaded = session_service::load(&state.orm, session.session_id).await?;
    assert_eq!(loaded, session);

    let bound = SessionContext {
        session_id: session.session_id,
        cart_id: Some(Uuid::new_v4()),
    };
    session_service::store(&state.orm, &bound).await?;
    let loaded = session_service::load(&state.orm, session.session_id).await?;
    assert_eq!(loaded.cart_id, bound.cart_id);
    Ok(())
}

#[tokio::test]
async fn unknown_session_id_loads_empty() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    let id = Uuid::new_v4();

    let loaded = session_service::load(&state.orm, id).await?;
    assert_eq!(loaded, SessionContext::new(id));
    Ok(())
}

#[tokio::test]
async fn anonymous_cart_survives_login_and_gets_bound() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    let product = create_product(&state, "ferris-mug", 999).await?;
    let mut session = new_session();

    cart_service::add_item(&state, &mut session, product.id).await?;
    let cart_id = session.cart_id.expect("anonymous cart");
    assert_eq!(fetch_cart(&state, cart_id).await?.customer_id, None);

    let (user, customer) = create_customer(&state, "shopper@example.com").await?;
    let session = session_service::load(&state.orm, session.session_id).await?;
    assert_eq!(session.cart_id, Some(cart_id));

    let linked = session_service::bind_cart_to_customer(&state.orm, &session, &user).await?;
    assert!(linked);

    let cart = fetch_cart(&state, cart_id).await?;
    assert_eq!(cart.customer_id, Some(customer.id));
    assert_eq!(cart.total, 999);
    Ok(())
}

#[tokio::test]
async fn binding_twice_writes_once() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    let product = create_product(&state, "ferris-mug", 999).await?;
    let (user, customer) = create_customer(&state, "shopper@example.com").await?;
    let mut session = new_session();
    cart_service::add_item(&state, &mut session, product.id).await?;

    assert!(session_service::bind_cart_to_customer(&state.orm, &session, &user).await?);
    assert!(!session_service::bind_cart_to_customer(&state.orm, &session, &user).await?);

    let cart = fetch_cart(&state, session.cart_id.unwrap()).await?;
    assert_eq!(cart.customer_id, Some(customer.id));
    Ok(())
}

#[tokio::test]
async fn cart_linked_to_one_customer_is_not_rebound() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    let product = create_product(&state, "ferris-mug", 999).await?;
    let (first, first_customer) = create_customer(&state, "first@example.com").await?;
    let (second, _) = create_customer(&state, "second@example.com").await?;
    let mut session = new_session();
    cart_service::add_item(&state, &mut session, product.id).await?;

    assert!(session_service::bind_cart_to_customer(&state.orm, &session, &first).await?);
    assert!(!session_service::bind_cart_to_customer(&state.orm, &session, &second).await?);

    let cart = fetch_cart(&state, session.cart_id.unwrap()).await?;
    assert_eq!(cart.customer_id, Some(first_customer.id));
    Ok(())
}

#[tokio::test]
async fn adds_after_binding_reuse_the_same_cart() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    let mug = create_product(&state, "ferris-mug", 999).await?;
    let hoodie = create_product(&state, "hoodie", 5500).await?;
    let (user, _) = create_customer(&state, "shopper@example.com").await?;
    let mut session = new_session();

    cart_service::add_item(&state, &mut session, mug.id).await?;
    let cart_id = session.cart_id;
    session_service::bind_cart_to_customer(&state.orm, &session, &user).await?;

    cart_service::add_item(&state, &mut session, hoodie.id).await?;
    assert_eq!(session.cart_id, cart_id);
    assert_eq!(fetch_cart(&state, cart_id.unwrap()).await?.total, 6499);
    Ok(())
}

#[tokio::test]
async fn binding_is_skipped_without_cart_or_profile() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    let product = create_product(&state, "ferris-mug", 999).await?;
    let (customer_user, _) = create_customer(&state, "shopper@example.com").await?;
    let staff = create_user(&state, "admin", "staff@example.com").await?;

    // No cart in the session yet.
    let empty = new_session();
    assert!(!session_service::bind_cart_to_customer(&state.orm, &empty, &customer_user).await?);

    // A staff account has no customer profile to link to.
    let mut session = new_session();
    cart_service::add_item(&state, &mut session, product.id).await?;
    assert!(!session_service::bind_cart_to_customer(&state.orm, &session, &staff).await?);
    assert_eq!(fetch_cart(&state, session.cart_id.unwrap()).await?.customer_id, None);
    Ok(())
}

#[tokio::test]
async fn binding_a_missing_cart_is_not_found() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    let (user, _) = create_customer(&state, "shopper@example.com").await?;
    let session = SessionContext {
        session_id: Uuid::new_v4(),
        cart_id: Some(Uuid::new_v4()),
    };

    let err = session_service::bind_cart_to_customer(&state.orm, &session, &user)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use axum_storefront_api::{
    build_app,
    dto::{auth::Claims, orders::CheckoutRequest},
    middleware::{auth::AuthUser, session::SESSION_HEADER},
    services::{
        cart_service,
        order_service::{self, CheckoutResult},
    },
    state::AppState,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use common::{create_customer, create_product, create_user, fetch_cart, new_session};

const SECRET: &str = "test-secret";

fn bearer(user: &AuthUser) -> String {
    // Every test in this binary sets the same value.
    unsafe { std::env::set_var("JWT_SECRET", SECRET) };
    let claims = Claims {
        sub: user.user_id.to_string(),
        role: user.role.clone(),
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("token encodes");
    format!("Bearer {token}")
}

struct Call<'a> {
    method: Method,
    uri: &'a str,
    session: Option<Uuid>,
    auth: Option<String>,
    body: Option<Value>,
}

impl<'a> Call<'a> {
    fn new(method: Method, uri: &'a str) -> Self {
        Self {
            method,
            uri,
            session: None,
            auth: None,
            body: None,
        }
    }

    fn session(mut self, id: Uuid) -> Self {
        self.session = Some(id);
        self
    }

    fn auth(mut self, user: &AuthUser) -> Self {
        self.auth = Some(bearer(user));
        self
    }

    fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    async fn send(self, app: &Router) -> anyhow::Result<(StatusCode, Option<String>, Value)> {
        let mut builder = Request::builder().method(self.method).uri(self.uri);
        if let Some(id) = self.session {
            builder = builder.header(SESSION_HEADER, id.to_string());
        }
        if let Some(token) = self.auth {
            builder = builder.header(header::AUTHORIZATION, token);
        }
        let request = match self.body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = app.clone().oneshot(request).await?;
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, location, body))
    }
}

fn app(state: &AppState) -> Router {
    build_app(state.clone())
}

#[tokio::test]
async fn open_session_returns_usable_id() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    let product = create_product(&state, "ferris-mug", 999).await?;
    let app = app(&state);

    let (status, _, body) = Call::new(Method::POST, "/api/session").send(&app).await?;
    assert_eq!(status, StatusCode::CREATED);
    let session_id: Uuid = body["data"]["session_id"].as_str().unwrap_or_default().parse()?;
    assert!(body["data"]["cart_id"].is_null());

    let (status, _, body) = Call::new(Method::POST, "/api/cart/items")
        .session(session_id)
        .json(json!({ "product_id": product.id }))
        .send(&app)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["cart"]["total"], 999);

    let (_, _, body) = Call::new(Method::GET, "/api/cart")
        .session(session_id)
        .send(&app)
        .await?;
    assert_eq!(body["data"]["lines"][0]["quantity"], 1);
    Ok(())
}

#[tokio::test]
async fn cart_routes_need_a_session_header() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    let app = app(&state);

    let (status, _, body) = Call::new(Method::GET, "/api/cart").send(&app).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap_or_default().contains("x-session-id"));
    Ok(())
}

#[tokio::test]
async fn manage_line_accepts_short_action_names() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    let product = create_product(&state, "ferris-mug", 999).await?;
    let mut session = new_session();
    let view = cart_service::add_item(&state, &mut session, product.id)
        .await?
        .data
        .unwrap();
    let uri = format!("/api/cart/lines/{}", view.lines[0].id);
    let app = app(&state);

    let (status, _, body) = Call::new(Method::POST, &uri)
        .session(session.session_id)
        .json(json!({ "action": "inc" }))
        .send(&app)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["cart"]["total"], 1998);

    let (status, _, body) = Call::new(Method::POST, &uri)
        .session(session.session_id)
        .json(json!({ "action": "rmv" }))
        .send(&app)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["cart"]["total"], 0);
    assert_eq!(body["data"]["lines"], json!([]));
    Ok(())
}

#[tokio::test]
async fn checkout_without_cart_redirects_to_catalog() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    let (user, _) = create_customer(&state, "shopper@example.com").await?;
    let app = app(&state);

    let (status, location, _) = Call::new(Method::POST, "/api/orders/checkout")
        .session(Uuid::new_v4())
        .auth(&user)
        .json(json!({
            "ordered_by": "Ferris Crab",
            "shipping_address": "1 Harbour Road",
            "mobile": "5550100"
        }))
        .send(&app)
        .await?;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/api/products"));
    Ok(())
}

#[tokio::test]
async fn signed_in_request_binds_the_anonymous_cart() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    let product = create_product(&state, "ferris-mug", 999).await?;
    let (user, customer) = create_customer(&state, "shopper@example.com").await?;
    let mut session = new_session();
    cart_service::add_item(&state, &mut session, product.id).await?;
    let app = app(&state);

    let (status, _, _) = Call::new(Method::GET, "/api/products")
        .session(session.session_id)
        .auth(&user)
        .send(&app)
        .await?;
    assert_eq!(status, StatusCode::OK);

    let cart = fetch_cart(&state, session.cart_id.unwrap()).await?;
    assert_eq!(cart.customer_id, Some(customer.id));
    Ok(())
}

#[tokio::test]
async fn foreign_order_redirects_to_profile() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    let product = create_product(&state, "ferris-mug", 999).await?;
    let (owner, _) = create_customer(&state, "owner@example.com").await?;
    let (other, _) = create_customer(&state, "other@example.com").await?;

    let mut session = new_session();
    cart_service::add_item(&state, &mut session, product.id).await?;
    let payload = CheckoutRequest {
        ordered_by: "Owner".into(),
        shipping_address: "2 Dock Street".into(),
        mobile: "5550101".into(),
        email: None,
    };
    let order_id = match order_service::checkout(&state, &owner, &mut session, payload).await? {
        CheckoutResult::Created(detail) => detail.order.id,
        CheckoutResult::NoOpenCart => anyhow::bail!("checkout found no cart"),
    };
    let uri = format!("/api/orders/{order_id}");
    let app = app(&state);

    let (status, _, body) = Call::new(Method::GET, &uri).auth(&owner).send(&app).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["order"]["status"], "Received");

    let (status, location, _) = Call::new(Method::GET, &uri).auth(&other).send(&app).await?;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/api/customers/me"));
    Ok(())
}

#[tokio::test]
async fn unknown_status_string_is_rejected() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    let admin = create_user(&state, "admin", "admin@example.com").await?;
    let app = app(&state);

    let uri = format!("/api/admin/orders/{}/status", Uuid::new_v4());
    let (status, _, _) = Call::new(Method::PATCH, &uri)
        .auth(&admin)
        .json(json!({ "status": "bogus" }))
        .send(&app)
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn register_then_login_reaches_profile() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    unsafe { std::env::set_var("JWT_SECRET", SECRET) };
    let app = app(&state);

    let (status, _, _) = Call::new(Method::POST, "/api/auth/register")
        .json(json!({
            "email": "  New@Example.com ",
            "password": "hunter22",
            "full_name": "New Shopper"
        }))
        .send(&app)
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _, body) = Call::new(Method::POST, "/api/auth/login")
        .json(json!({ "email": "new@example.com", "password": "hunter22" }))
        .send(&app)
        .await?;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap_or_default().to_string();

    let request = Request::builder()
        .uri("/api/customers/me")
        .header(header::AUTHORIZATION, token)
        .body(Body::empty())?;
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await?)?;
    assert_eq!(body["data"]["customer"]["full_name"], "New Shopper");
    assert_eq!(body["data"]["orders"], json!([]));
    Ok(())
}

#[tokio::test]
async fn huge_page_number_returns_an_empty_page() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state().await?;
    create_product(&state, "ferris-mug", 999).await?;
    let app = app(&state);

    let (status, _, body) = Call::new(
        Method::GET,
        "/api/products?page=9223372036854775807&per_page=100",
    )
    .send(&app)
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["meta"]["total"], 1);
    Ok(())
}

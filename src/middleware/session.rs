use axum::{
    extract::{FromRequestParts, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    error::AppError, middleware::auth::AuthUser, services::session_service, state::AppState,
};

pub const SESSION_HEADER: &str = "x-session-id";

/// Per-request session state: the session id and at most one open cart.
///
/// Cart operations take this value explicitly and write back any change to `cart_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub session_id: Uuid,
    pub cart_id: Option<Uuid>,
}

impl SessionContext {
    pub fn new(session_id: Uuid) -> Self {
        Self {
            session_id,
            cart_id: None,
        }
    }
}

/// Reads the `x-session-id` header. `Ok(None)` when absent.
pub fn session_id_from_headers(headers: &HeaderMap) -> Result<Option<Uuid>, AppError> {
    let Some(value) = headers.get(SESSION_HEADER) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| AppError::BadRequest("Invalid x-session-id header".into()))?;
    let id = Uuid::parse_str(value.trim())
        .map_err(|_| AppError::BadRequest("Invalid x-session-id header".into()))?;
    Ok(Some(id))
}

impl FromRequestParts<AppState> for SessionContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session_id = session_id_from_headers(&parts.headers)?
            .ok_or_else(|| AppError::BadRequest("Missing x-session-id header".into()))?;
        session_service::load(&state.orm, session_id).await
    }
}

/// Links the session's cart to the signed-in customer on every request that carries both a
/// session id and a valid bearer token.
pub async fn bind_session_cart(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let headers = request.headers();
    if let (Ok(Some(session_id)), Ok(user)) = (
        session_id_from_headers(headers),
        AuthUser::from_headers(headers),
    ) {
        let result = async {
            let session = session_service::load(&state.orm, session_id).await?;
            session_service::bind_cart_to_customer(&state.orm, &session, &user).await
        }
        .await;
        match result {
            Ok(true) => tracing::info!(%session_id, user_id = %user.user_id, "cart linked to customer"),
            Ok(false) => {}
            Err(err) => tracing::warn!(error = %err, %session_id, "cart binding failed"),
        }
    }

    next.run(request).await
}

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};

use crate::{
    dto::session::SessionData,
    error::AppResult,
    response::{ApiResponse, Meta},
    services::session_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(open_session))
}

#[utoipa::path(
    post,
    path = "/api/session",
    responses(
        (status = 201, description = "New session id to send as x-session-id", body = ApiResponse<SessionData>)
    ),
    tag = "Session"
)]
pub async fn open_session(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<ApiResponse<SessionData>>)> {
    let session = session_service::open_session(&state).await?;
    let data = SessionData {
        session_id: session.session_id,
        cart_id: session.cart_id,
    };
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Session opened", data, Some(Meta::empty()))),
    ))
}

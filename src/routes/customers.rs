use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::customers::CustomerProfile,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::customer_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(my_profile))
}

#[utoipa::path(
    get,
    path = "/api/customers/me",
    responses(
        (status = 200, description = "Customer profile with orders, newest first", body = ApiResponse<CustomerProfile>),
        (status = 403, description = "No customer profile")
    ),
    security(("bearer_auth" = [])),
    tag = "Customers"
)]
pub async fn my_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CustomerProfile>>> {
    let resp = customer_service::profile(&state, &user).await?;
    Ok(Json(resp))
}

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionData {
    pub session_id: Uuid,
    pub cart_id: Option<Uuid>,
}

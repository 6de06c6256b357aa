use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::Value;
use uuid::Uuid;

use crate::{entity::audit_logs::ActiveModel as AuditActive, error::AppResult};

/// Who triggered an audited change. Cart edits happen before sign-in, so they are attributed to
/// the session rather than a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    User(Uuid),
    Session(Uuid),
}

impl Actor {
    fn columns(self) -> (Option<Uuid>, Option<Uuid>) {
        match self {
            Actor::User(id) => (Some(id), None),
            Actor::Session(id) => (None, Some(id)),
        }
    }
}

pub async fn log_audit(
    orm: &DatabaseConnection,
    actor: Actor,
    action: &str,
    resource: &str,
    metadata: Option<Value>,
) -> AppResult<()> {
    let (user_id, session_id) = actor.columns();
    AuditActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        session_id: Set(session_id),
        action: Set(action.to_string()),
        resource: Set(resource.to_string()),
        metadata: Set(metadata),
        created_at: Set(Utc::now().into()),
    }
    .insert(orm)
    .await?;

    Ok(())
}

/// Best-effort audit write; failures are logged and swallowed.
pub async fn record(
    orm: &DatabaseConnection,
    actor: Actor,
    action: &str,
    resource: &str,
    metadata: Value,
) {
    if let Err(err) = log_audit(orm, actor, action, resource, Some(metadata)).await {
        tracing::warn!(error = %err, action, ?actor, "audit log failed");
    }
}

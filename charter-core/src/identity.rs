use serde::{Deserialize, Serialize};
use async_trait::async_trait;
use crate::{CoreError, CoreResult, RemoteResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Agent,
    Customer,
}

/// Authenticated caller, as decoded from the session token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Actor {
    pub id: String,
    pub email: Option<String>,
    pub role: Role,
}

#[async_trait]
pub trait PrivilegeCheck: Send + Sync {
    /// Whether the actor may perform admin lifecycle transitions
    async fn is_admin(&self, actor: &Actor) -> RemoteResult<bool>;
}

/// Trusts the role claim carried by the verified token
pub struct RoleClaimCheck;

#[async_trait]
impl PrivilegeCheck for RoleClaimCheck {
    async fn is_admin(&self, actor: &Actor) -> RemoteResult<bool> {
        Ok(actor.role == Role::Admin)
    }
}

/// Fails closed: no actor, a denied actor and a failing check all reject.
pub async fn require_admin<'a>(
    check: &dyn PrivilegeCheck,
    actor: Option<&'a Actor>,
    action: &str,
) -> CoreResult<&'a Actor> {
    let actor = actor.ok_or_else(|| CoreError::Unauthorized(format!("Sign in to {}", action)))?;

    match check.is_admin(actor).await {
        Ok(true) => Ok(actor),
        Ok(false) => {
            tracing::warn!(actor = %actor.id, action, "Rejected non-admin lifecycle action");
            Err(CoreError::Unauthorized(format!("Only administrators can {}", action)))
        }
        Err(e) => {
            tracing::error!(actor = %actor.id, action, "Privilege check failed: {}", e);
            Err(CoreError::Unauthorized(format!("Only administrators can {}", action)))
        }
    }
}

pub mod booking;
pub mod delivery;
pub mod identity;
pub mod payment;
pub mod repository;
pub mod requests;
pub mod search;

/// Generic text shown when a collaborator fails without an error payload
pub const GENERIC_FAILURE: &str = "The operation could not be completed. Please try again.";

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Not authorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Failures originating at a collaborator boundary
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum RemoteError {
    /// 404-equivalent; distinct from every other failure
    #[error("Resource not found")]
    NotFound,
    /// The collaborator answered with an error payload
    #[error("Request rejected ({status}): {}", message.as_deref().unwrap_or("no details"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },
    #[error("Transport failure: {0}")]
    Transport(String),
}

impl RemoteError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        RemoteError::Rejected {
            status,
            message: Some(message.into()),
        }
    }

    /// User-facing text: the payload's `error` field when there is one,
    /// otherwise `fallback`. Raw transport details never reach the user.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            RemoteError::Rejected { message: Some(msg), .. } if !msg.trim().is_empty() => msg.clone(),
            _ => fallback.to_string(),
        }
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;

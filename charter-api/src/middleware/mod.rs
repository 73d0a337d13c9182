pub mod auth;

pub use auth::{issue_token, staff_auth_middleware, StaffClaims};

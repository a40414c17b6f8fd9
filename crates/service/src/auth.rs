//! Caller identity as supplied by the identity provider.
//!
//! The transport layer verifies the session token and hands the claims
//! over verbatim; nothing in this crate ever takes an identity from a
//! request payload.
use uuid::Uuid;

use crate::errors::ServiceError;

#[derive(Debug, Clone, PartialEq)]
pub struct AuthIdentity {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
}

impl AuthIdentity {
    pub fn require_admin(&self) -> Result<(), ServiceError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(
                "administrative capability required".into(),
            ))
        }
    }
}

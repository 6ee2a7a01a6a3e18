use thiserror::Error;

use crate::model::user::Role;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("No credential is stored, authenticated request was not sent")]
    MissingCredential,
    #[error("Session is degraded (fallback credential), authenticated request was not sent")]
    DegradedSession,
    #[error("Backend rejected the stored credential with status {0}")]
    Unauthorized(u16),
    #[error("No active session")]
    NoSession,
    #[error("Session role {actual} is not one of the required roles {required:?}")]
    InsufficientRole { actual: Role, required: Vec<Role> },
}

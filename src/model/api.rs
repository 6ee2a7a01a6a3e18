use serde::{Deserialize, Serialize};

use crate::model::user::{BackendUser, Role};

/// The response when an error occurs with an API request
#[derive(Serialize, Deserialize)]
pub struct ErrorDto {
    /// The error message
    #[serde(alias = "message")]
    pub error: String,
}

/// Envelope the backend wraps most responses in
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of the backend token exchange request
#[derive(Debug, Serialize)]
pub struct ExchangeRequest<'a> {
    pub email: &'a str,
}

/// Payload of a successful backend token exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeData {
    pub token: String,
    #[serde(default)]
    pub user: Option<BackendUser>,
}

/// Body of a role change request
#[derive(Debug, Serialize)]
pub struct RoleUpdateRequest {
    pub role: Role,
}

//! Factory functions for mock response bodies.
//!
//! Bodies are built as `serde_json::Value` so tests can embed them in larger documents or
//! serve them as-is.

use serde_json::{json, Map, Value};

/// Create a backend user record.
///
/// # Arguments
/// - `id` - Value of the `_id` field
/// - `role` - Role string, omitted from the record when `None`
///
/// # Returns
/// - `Value` - User record with `_id`, `name`, `email` and optionally `role`
pub fn backend_user(id: &str, role: Option<&str>) -> Value {
    let mut user = Map::new();
    user.insert("_id".to_string(), json!(id));
    user.insert("name".to_string(), json!(format!("User {}", id)));
    user.insert("email".to_string(), json!(format!("{}@example.com", id)));
    if let Some(role) = role {
        user.insert("role".to_string(), json!(role));
    }

    Value::Object(user)
}

/// Create a successful token exchange envelope.
pub fn exchange_envelope(token: &str, user: Value) -> Value {
    json!({
        "success": true,
        "data": {
            "token": token,
            "user": user,
        }
    })
}

/// Create a successful listing envelope around `users`.
pub fn listing_envelope(users: Vec<Value>) -> Value {
    json!({
        "success": true,
        "data": users,
    })
}

/// Create an identity provider account response.
///
/// # Arguments
/// - `uid` - Provider user id (`localId`)
/// - `email` - Account email
/// - `display_name` - Display name, reported as empty when `None`
pub fn identity_account(uid: &str, email: &str, display_name: Option<&str>) -> Value {
    json!({
        "kind": "identitytoolkit#SignupNewUserResponse",
        "localId": uid,
        "email": email,
        "displayName": display_name.unwrap_or_default(),
        "idToken": format!("id-token-{}", uid),
        "refreshToken": format!("refresh-token-{}", uid),
        "expiresIn": "3600",
    })
}

/// Create an identity provider error response carrying `code`.
pub fn identity_error(code: &str) -> Value {
    json!({
        "error": {
            "code": 400,
            "message": code,
            "errors": [
                {
                    "message": code,
                    "domain": "global",
                    "reason": "invalid",
                }
            ]
        }
    })
}

use thiserror::Error;

/// Errors reported by the identity provider for create-account and sign-in requests.
///
/// Provider error codes are mapped to dedicated variants where the dashboard shows a specific
/// message; everything else is kept verbatim in [`IdentityError::Provider`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum IdentityError {
    #[error("An account already exists for this email")]
    EmailExists,
    #[error("No account exists for this email")]
    EmailNotFound,
    #[error("The email or password is incorrect")]
    InvalidCredentials,
    #[error("The password is too weak")]
    WeakPassword,
    #[error("This account has been disabled")]
    UserDisabled,
    #[error("Too many attempts, please try again later")]
    TooManyAttempts,
    #[error("Identity provider error: {0}")]
    Provider(String),
}

impl IdentityError {
    /// Maps a provider error message such as `"WEAK_PASSWORD : Password should be..."` to a variant.
    pub fn from_code(message: &str) -> Self {
        let code = message
            .split(|c: char| c == ':' || c.is_whitespace())
            .next()
            .unwrap_or_default();

        match code {
            "EMAIL_EXISTS" => Self::EmailExists,
            "EMAIL_NOT_FOUND" => Self::EmailNotFound,
            "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "INVALID_EMAIL" => {
                Self::InvalidCredentials
            }
            "WEAK_PASSWORD" => Self::WeakPassword,
            "USER_DISABLED" => Self::UserDisabled,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => Self::TooManyAttempts,
            _ => Self::Provider(message.to_string()),
        }
    }
}

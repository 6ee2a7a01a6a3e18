//! Role-gated view shell.
//!
//! Every screen decides whether to render by asking [`can_view`] with the published session;
//! no screen derives role logic of its own.

use crate::{
    error::auth::AuthError,
    model::{session::Session, user::Role},
};

/// Whether `session` may view a screen requiring one of `required`.
///
/// No session never satisfies the gate.
pub fn can_view(session: Option<&Session>, required: &[Role]) -> bool {
    session.is_some_and(|session| required.contains(&session.role))
}

/// Like [`can_view`], but reports why access is refused.
pub fn require(session: Option<&Session>, required: &[Role]) -> Result<(), AuthError> {
    match session {
        None => Err(AuthError::NoSession),
        Some(session) if required.contains(&session.role) => Ok(()),
        Some(session) => Err(AuthError::InsufficientRole {
            actual: session.role,
            required: required.to_vec(),
        }),
    }
}

/// A dashboard screen and the roles allowed to view it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewGuard {
    pub name: &'static str,
    pub roles: &'static [Role],
}

impl ViewGuard {
    pub const fn new(name: &'static str, roles: &'static [Role]) -> Self {
        Self { name, roles }
    }

    pub fn permits(&self, session: Option<&Session>) -> bool {
        can_view(session, self.roles)
    }

    pub fn require(&self, session: Option<&Session>) -> Result<(), AuthError> {
        require(session, self.roles)
    }
}

/// Screens of the back-office dashboard.
pub mod screens {
    use super::ViewGuard;
    use crate::model::user::Role;

    const ALL: &[Role] = &[Role::User, Role::Seller, Role::Moderator, Role::Admin];
    const STAFF: &[Role] = &[Role::Moderator, Role::Admin];

    pub const OVERVIEW: ViewGuard = ViewGuard::new("overview", ALL);
    pub const SUPPORT_CHAT: ViewGuard = ViewGuard::new("support-chat", ALL);
    pub const PRODUCTS: ViewGuard =
        ViewGuard::new("products", &[Role::Seller, Role::Moderator, Role::Admin]);
    pub const CATEGORIES: ViewGuard = ViewGuard::new("categories", STAFF);
    pub const CLIENT_LEADS: ViewGuard = ViewGuard::new("client-leads", STAFF);
    /// Matches the roles allowed to fetch the user listing.
    pub const USERS: ViewGuard = ViewGuard::new("users", &Role::PRIVILEGED);
    pub const ROLE_ASSIGNMENT: ViewGuard = ViewGuard::new("role-assignment", &[Role::Admin]);

    pub const ALL_SCREENS: [ViewGuard; 7] = [
        OVERVIEW,
        SUPPORT_CHAT,
        PRODUCTS,
        CATEGORIES,
        CLIENT_LEADS,
        USERS,
        ROLE_ASSIGNMENT,
    ];
}

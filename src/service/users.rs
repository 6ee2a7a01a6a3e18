//! User administration.
//!
//! Role changes and account removal for the user administration screens. Both operations require
//! an admin session before any request is sent, go through the authenticated HTTP layer, and
//! apply their result to the published user listing.

use dioxus_logger::tracing;
use reqwest::Method;

use crate::{
    error::{auth::AuthError, Error},
    gate::screens,
    http::{error_from_response, ApiClient},
    model::{api::RoleUpdateRequest, user::Role},
    store::{credential::Credential, session::RunTicket},
};

pub struct UserAdminService {
    client: ApiClient,
    users_path: String,
}

impl UserAdminService {
    /// Creates a new instance of UserAdminService.
    ///
    /// # Arguments
    /// - `client` - HTTP client for the backend
    /// - `users_path` - Path of the user collection relative to the backend base URL
    pub fn new(client: ApiClient, users_path: impl Into<String>) -> Self {
        Self {
            client,
            users_path: users_path.into().trim_end_matches('/').to_string(),
        }
    }

    fn user_path(&self, user_id: &str) -> String {
        format!("{}/{}", self.users_path, user_id)
    }

    /// Checks for an admin session and returns the run that published it and its credential.
    fn require_admin(&self) -> Result<(RunTicket, Credential), Error> {
        let store = self.client.store();
        let ticket = store.current_run();
        let session = store.session();
        screens::ROLE_ASSIGNMENT.require(session.as_ref())?;

        let credential = store.credential().ok_or(AuthError::MissingCredential)?;

        Ok((ticket, credential))
    }

    /// Changes the role of a backend user.
    ///
    /// # Arguments
    /// - `user_id` - Backend identifier of the user to change
    /// - `role` - Role to assign
    ///
    /// # Returns
    /// - `Ok(())` - Backend accepted the change and the listing entry was updated
    /// - `Err(Error::AuthError)` - No admin session, no usable credential, or 401/403
    /// - `Err(Error::ApiError)` - Backend refused the change
    /// - `Err(Error::HttpError)` - Transport failure
    pub async fn update_role(&self, user_id: &str, role: Role) -> Result<(), Error> {
        let (ticket, credential) = self.require_admin()?;

        let path = format!("{}/role", self.user_path(user_id));
        let request = self
            .client
            .request(Method::PATCH, &path)
            .json(&RoleUpdateRequest { role });
        let response = self.client.send_with(&credential, request).await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        tracing::info!(user_id = %user_id, role = %role, "Updated user role");

        // A session published while the request was in flight keeps its own listing.
        self.client.store().modify_users(ticket, |users| {
            for user in users
                .iter_mut()
                .filter(|user| user.id().as_deref() == Some(user_id))
            {
                user.role = Some(role);
            }
        });

        Ok(())
    }

    /// Deletes a backend user.
    ///
    /// # Arguments
    /// - `user_id` - Backend identifier of the user to delete
    ///
    /// # Returns
    /// - `Ok(())` - Backend deleted the user and it was removed from the listing
    /// - `Err(Error::AuthError)` - No admin session, no usable credential, or 401/403
    /// - `Err(Error::ApiError)` - Backend refused the deletion
    /// - `Err(Error::HttpError)` - Transport failure
    pub async fn delete_user(&self, user_id: &str) -> Result<(), Error> {
        let (ticket, credential) = self.require_admin()?;

        let request = self
            .client
            .request(Method::DELETE, &self.user_path(user_id));
        let response = self.client.send_with(&credential, request).await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        tracing::info!(user_id = %user_id, "Deleted user");

        self.client.store().modify_users(ticket, |users| {
            users.retain(|user| user.id().as_deref() != Some(user_id))
        });

        Ok(())
    }
}

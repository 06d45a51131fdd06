//! Authentication service.
//!
//! Logs users in against the ticket API and registers unknown users on the
//! fly. The API answers a login for an unknown email with `404` and the
//! error text [`USER_NOT_FOUND`]; that one answer (and no other) triggers a
//! single registration attempt with the same credentials.

mod error;

pub use error::AuthError;

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument, warn};

use ticket_portal_core::{Email, Role};

use crate::api::{ApiError, TicketApiClient};
use crate::models::CurrentUser;

/// Error text the API sends with a 404 login for an unknown email.
pub const USER_NOT_FOUND: &str = "User not found";

/// How a successful login came about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Existing user, authenticated.
    SignedIn(CurrentUser),
    /// Unknown user, registered on the spot. Never an admin.
    Registered(CurrentUser),
}

impl LoginOutcome {
    /// The user to store in the session.
    #[must_use]
    pub fn into_user(self) -> CurrentUser {
        match self {
            Self::SignedIn(user) | Self::Registered(user) => user,
        }
    }
}

/// Authentication service.
pub struct AuthService<'a> {
    api: &'a TicketApiClient,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(api: &'a TicketApiClient) -> Self {
        Self { api }
    }

    /// Log in with email and password, registering the user if the API does
    /// not know the email.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` or `AuthError::EmptyPassword` without
    /// calling the API. Returns `AuthError::InvalidCredentials` if the login is
    /// refused, `AuthError::RegistrationFailed` if the follow-up registration
    /// is refused and `AuthError::Unavailable` if the API cannot be reached.
    #[instrument(skip(self, password))]
    pub async fn login_or_register(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<LoginOutcome, AuthError> {
        let email = Email::parse(email)?;
        if password.expose_secret().is_empty() {
            return Err(AuthError::EmptyPassword);
        }

        match self.api.login(email.as_str(), password).await {
            Ok(response) => {
                // Prefer the address the API has on file; fall back to the submitted one.
                let email = response
                    .email
                    .as_deref()
                    .and_then(|e| Email::parse(e).ok())
                    .unwrap_or(email);
                let user = CurrentUser::new(
                    response.user_id,
                    email,
                    Role::from_admin_flag(response.is_admin),
                );
                info!(user_id = %user.user_id, role = %user.role, "User logged in");
                Ok(LoginOutcome::SignedIn(user))
            }
            Err(e) if e.is_not_found_with(USER_NOT_FOUND) => {
                info!("Unknown email, registering");
                self.register(email, password).await
            }
            Err(ApiError::Rejected { status, message }) => {
                warn!(status = status.as_u16(), "Login refused");
                Err(AuthError::InvalidCredentials(message))
            }
            Err(e) => Err(AuthError::Unavailable(e)),
        }
    }

    async fn register(
        &self,
        email: Email,
        password: &SecretString,
    ) -> Result<LoginOutcome, AuthError> {
        match self.api.register(email.as_str(), password).await {
            Ok(response) => {
                let user = CurrentUser::new(response.user_id, email, Role::User);
                info!(user_id = %user.user_id, "User registered");
                Ok(LoginOutcome::Registered(user))
            }
            Err(ApiError::Rejected { status, message }) => {
                warn!(status = status.as_u16(), "Registration refused");
                Err(AuthError::RegistrationFailed(message))
            }
            Err(e) => Err(AuthError::Unavailable(e)),
        }
    }
}

//! Authentication error types.

use std::borrow::Cow;

use thiserror::Error;

use ticket_portal_core::EmailError;

use crate::api::ApiError;

/// Errors that can occur while logging in or auto-registering.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// No password entered.
    #[error("password is empty")]
    EmptyPassword,

    /// Login refused for any reason other than an unknown user.
    ///
    /// Carries the API's error text when it sent one.
    #[error("invalid credentials")]
    InvalidCredentials(Option<String>),

    /// The user was unknown and the follow-up registration failed.
    #[error("registration failed")]
    RegistrationFailed(Option<String>),

    /// The ticket API could not be reached or answered garbage.
    #[error("ticket API unavailable: {0}")]
    Unavailable(#[source] ApiError),
}

impl AuthError {
    /// Message shown on the login form.
    #[must_use]
    pub fn user_message(&self) -> Cow<'_, str> {
        match self {
            Self::InvalidEmail(e) => Cow::Borrowed(e.user_message()),
            Self::EmptyPassword => Cow::Borrowed("Debes ingresar una contraseña"),
            Self::InvalidCredentials(message) => message
                .as_deref()
                .map_or(Cow::Borrowed("Credenciales inválidas"), Cow::Borrowed),
            Self::RegistrationFailed(message) => message
                .as_deref()
                .map_or(Cow::Borrowed("Error al crear el usuario"), Cow::Borrowed),
            Self::Unavailable(_) => Cow::Borrowed("Error al conectar con el servidor"),
        }
    }
}

//! Ticket REST API client.
//!
//! One method per endpoint. Every call is a single request/response round
//! trip with no retry; a per-request timeout comes from [`ApiConfig`].
//!
//! # Endpoints
//!
//! ```text
//! POST  /login                     authenticate
//! POST  /user                      register
//! GET   /users/{userId}/tickets    list own tickets
//! POST  /ticket                    create ticket
//! GET   /admin/tickets             list all tickets
//! GET   /admin/users               list all users
//! PATCH /ticket/update/{ticketId}  change status
//! PATCH /admin/user/{userId}       change role
//! ```

mod error;
pub mod types;

pub use error::ApiError;

use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use ticket_portal_core::{NewTicket, Ticket, TicketId, TicketStatus, User, UserId};

use crate::config::ApiConfig;
use types::{
    CredentialsBody, ErrorBody, LoginResponse, RegisterResponse, RoleUpdateBody,
    StatusUpdateBody, list_field,
};

/// Ticket REST API client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct TicketApiClient {
    client: Client,
    base_url: Url,
}

impl TicketApiClient {
    /// Create a new ticket API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Authenticate with email and password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` for any non-success status (including the
    /// 404 "User not found" answer), `ApiError::Network` if the API is
    /// unreachable.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, ApiError> {
        let body = CredentialsBody::new(email, password);
        let response = self.send(self.request(Method::POST, "login")?.json(&body)).await?;
        decode(response).await
    }

    /// Register a new user with email and password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` if the API refuses the registration,
    /// `ApiError::Network` if the API is unreachable.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<RegisterResponse, ApiError> {
        let body = CredentialsBody::new(email, password);
        let response = self.send(self.request(Method::POST, "user")?.json(&body)).await?;
        decode(response).await
    }

    // =========================================================================
    // Tickets
    // =========================================================================

    /// List the tickets owned by `user_id`.
    ///
    /// A success response whose `tickets` field is missing, null or not an
    /// array yields an empty list. Tickets that do not decode are left out.
    ///
    /// # Errors
    ///
    /// Returns error if the API is unreachable or answers with a non-success status.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn user_tickets(&self, user_id: &UserId) -> Result<Vec<Ticket>, ApiError> {
        let path = format!("users/{}/tickets", urlencoding::encode(user_id.as_str()));
        self.fetch_list(&path, "tickets").await
    }

    /// Create a ticket.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` with the API's error text if the ticket
    /// is refused, `ApiError::Network` if the API is unreachable.
    #[instrument(skip(self, ticket), fields(user_id = %ticket.user_id))]
    pub async fn create_ticket(&self, ticket: &NewTicket) -> Result<(), ApiError> {
        self.send(self.request(Method::POST, "ticket")?.json(ticket))
            .await
            .map(drop)
    }

    // =========================================================================
    // Administration
    // =========================================================================

    /// List every ticket.
    ///
    /// # Errors
    ///
    /// Returns error if the API is unreachable or answers with a non-success status.
    #[instrument(skip(self))]
    pub async fn all_tickets(&self) -> Result<Vec<Ticket>, ApiError> {
        self.fetch_list("admin/tickets", "tickets").await
    }

    /// List every user.
    ///
    /// # Errors
    ///
    /// Returns error if the API is unreachable or answers with a non-success status.
    #[instrument(skip(self))]
    pub async fn all_users(&self) -> Result<Vec<User>, ApiError> {
        self.fetch_list("admin/users", "users").await
    }

    /// Set the status of a ticket.
    ///
    /// # Errors
    ///
    /// Returns error if the API is unreachable or refuses the update.
    #[instrument(skip(self), fields(ticket_id = %ticket_id, status = %status))]
    pub async fn update_ticket_status(
        &self,
        ticket_id: &TicketId,
        status: &TicketStatus,
    ) -> Result<(), ApiError> {
        let path = format!(
            "ticket/update/{}",
            urlencoding::encode(ticket_id.as_str())
        );
        let body = StatusUpdateBody { status };
        self.send(self.request(Method::PATCH, &path)?.json(&body))
            .await
            .map(drop)
    }

    /// Grant or revoke the admin role of a user.
    ///
    /// # Errors
    ///
    /// Returns error if the API is unreachable or refuses the update.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn set_admin(&self, user_id: &UserId, is_admin: bool) -> Result<(), ApiError> {
        let path = format!("admin/user/{}", urlencoding::encode(user_id.as_str()));
        let body = RoleUpdateBody { is_admin };
        self.send(self.request(Method::PATCH, &path)?.json(&body))
            .await
            .map(drop)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Build a request for an endpoint path relative to the base URL.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.base_url.join(path)?;
        Ok(self.client.request(method, url))
    }

    /// Send a request and turn non-success statuses into `ApiError::Rejected`.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(ApiError::Network)?;
        let status = response.status();

        if status.is_success() {
            debug!(status = status.as_u16(), "Ticket API request succeeded");
            return Ok(response);
        }

        // Error bodies are `{ "error": "..." }` when the API has something to say.
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::into_message);

        warn!(
            status = status.as_u16(),
            error = message.as_deref().unwrap_or(""),
            "Ticket API rejected request"
        );

        Err(ApiError::Rejected { status, message })
    }

    /// GET an endpoint returning `{ "<field>": [...] }`.
    async fn fetch_list<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &str,
    ) -> Result<Vec<T>, ApiError> {
        let response = self.send(self.request(Method::GET, path)?).await?;
        let body: serde_json::Value = response.json().await.unwrap_or_else(|e| {
            warn!(error = %e, "Ticket API list response is not JSON");
            serde_json::Value::Null
        });

        Ok(list_field(body, field).unwrap_or_else(|reason| {
            warn!(field, reason = %reason, "Malformed list payload, treating as empty");
            Vec::new()
        }))
    }
}

/// Decode a success response body.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    Ok(response.json::<T>().await?)
}

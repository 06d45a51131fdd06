//! End-to-end test harness for the ticket portal.
//!
//! Each test starts two servers on ephemeral ports:
//!
//! - [`MockApi`]: an in-process stand-in for the ticket REST API that keeps
//!   users and tickets in memory and records every call it receives.
//! - [`TestPortal`]: the real portal router, configured against the mock.
//!
//! Tests drive the portal with a cookie-keeping `reqwest` client that does
//! not follow redirects, so every redirect can be asserted on.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ticket-portal-integration-tests
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use reqwest::{Client, redirect::Policy};
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

use ticket_portal::config::PortalConfig;
use ticket_portal::state::AppState;

// =============================================================================
// Mock ticket API
// =============================================================================

/// One request received by the mock API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Value,
}

#[derive(Debug, Clone)]
struct MockUser {
    user_id: String,
    email: String,
    password: String,
    is_admin: bool,
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<Call>,
    users: Vec<MockUser>,
    tickets: Vec<Value>,
    next_id: u64,
    tickets_payload: Option<Value>,
    users_payload: Option<Value>,
    fail_updates: bool,
    login_error: Option<(StatusCode, Value)>,
    registration_error: Option<(StatusCode, Value)>,
    create_error: Option<(StatusCode, Value)>,
}

impl MockState {
    fn record(&mut self, method: &'static str, path: String, body: Value) {
        self.calls.push(Call { method, path, body });
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn user_json(user: &MockUser) -> Value {
        json!({ "userId": user.user_id, "email": user.email, "isAdmin": user.is_admin })
    }
}

type Shared = Arc<Mutex<MockState>>;

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

/// In-memory stand-in for the ticket REST API.
#[derive(Clone)]
pub struct MockApi {
    state: Shared,
    url: Url,
}

impl MockApi {
    /// Start the mock API on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let state: Shared = Arc::default();

        let router = Router::new()
            .route("/login", post(login))
            .route("/user", post(register))
            .route("/users/{user_id}/tickets", get(user_tickets))
            .route("/ticket", post(create_ticket))
            .route("/admin/tickets", get(all_tickets))
            .route("/admin/users", get(all_users))
            .route("/ticket/update/{ticket_id}", patch(update_ticket))
            .route("/admin/user/{user_id}", patch(update_user))
            .with_state(Arc::clone(&state));

        let url = serve(router).await;
        Self { state, url }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state poisoned")
    }

    /// Base URL of the mock.
    #[must_use]
    pub fn url(&self) -> Url {
        self.url.clone()
    }

    /// Add a user and return its ID.
    pub fn add_user(&self, email: &str, password: &str, is_admin: bool) -> String {
        let mut state = self.lock();
        let user_id = state.next_id("user");
        state.users.push(MockUser {
            user_id: user_id.clone(),
            email: email.to_string(),
            password: password.to_string(),
            is_admin,
        });
        user_id
    }

    /// Add a ticket owned by `user_id` and return its ID.
    pub fn add_ticket(&self, user_id: &str, title: &str, status: &str) -> String {
        let mut state = self.lock();
        let ticket_id = state.next_id("ticket");
        state.tickets.push(json!({
            "ticketId": ticket_id,
            "userId": user_id,
            "title": title,
            "description": format!("Descripción de {title}"),
            "status": status,
            "createdAt": "2025-01-15T09:30:00Z",
        }));
        ticket_id
    }

    /// Answer every ticket list request with this exact body.
    pub fn set_tickets_payload(&self, payload: Value) {
        self.lock().tickets_payload = Some(payload);
    }

    /// Answer every user list request with this exact body.
    pub fn set_users_payload(&self, payload: Value) {
        self.lock().users_payload = Some(payload);
    }

    /// Make status and role updates fail with a 500.
    pub fn fail_updates(&self, fail: bool) {
        self.lock().fail_updates = fail;
    }

    /// Make every login fail with this status and body.
    pub fn fail_login(&self, status: StatusCode, body: Value) {
        self.lock().login_error = Some((status, body));
    }

    /// Make registration fail with this status and body.
    pub fn fail_registration(&self, status: StatusCode, body: Value) {
        self.lock().registration_error = Some((status, body));
    }

    /// Make ticket creation fail with this status and body.
    pub fn fail_ticket_creation(&self, status: StatusCode, body: Value) {
        self.lock().create_error = Some((status, body));
    }

    /// Current status of a ticket.
    #[must_use]
    pub fn ticket_status(&self, ticket_id: &str) -> Option<String> {
        self.lock()
            .tickets
            .iter()
            .find(|t| t["ticketId"] == ticket_id)
            .and_then(|t| t["status"].as_str().map(String::from))
    }

    /// Current admin flag of a user.
    #[must_use]
    pub fn is_admin(&self, user_id: &str) -> Option<bool> {
        self.lock()
            .users
            .iter()
            .find(|u| u.user_id == user_id)
            .map(|u| u.is_admin)
    }

    /// Every call received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Number of calls with this method and path.
    #[must_use]
    pub fn count(&self, method: &str, path: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }

    /// Forget the calls received so far.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().expect("mock state poisoned");
    state.record("POST", "/login".into(), body.clone());

    if let Some((status, error_body)) = state.login_error.clone() {
        return (status, Json(error_body)).into_response();
    }

    let Ok(credentials) = serde_json::from_value::<Credentials>(body) else {
        return error(StatusCode::BAD_REQUEST, "Email and password required");
    };

    match state.users.iter().find(|u| u.email == credentials.email) {
        None => error(StatusCode::NOT_FOUND, "User not found"),
        Some(user) if user.password != credentials.password => {
            error(StatusCode::UNAUTHORIZED, "Contraseña incorrecta")
        }
        Some(user) => Json(MockState::user_json(user)).into_response(),
    }
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().expect("mock state poisoned");
    state.record("POST", "/user".into(), body.clone());

    if let Some((status, error_body)) = state.registration_error.clone() {
        return (status, Json(error_body)).into_response();
    }

    let Ok(credentials) = serde_json::from_value::<Credentials>(body) else {
        return error(StatusCode::BAD_REQUEST, "Email and password required");
    };

    if state.users.iter().any(|u| u.email == credentials.email) {
        return error(StatusCode::CONFLICT, "User already exists");
    }

    let user_id = state.next_id("user");
    state.users.push(MockUser {
        user_id: user_id.clone(),
        email: credentials.email,
        password: credentials.password,
        is_admin: false,
    });

    (StatusCode::CREATED, Json(json!({ "userId": user_id }))).into_response()
}

async fn user_tickets(State(state): State<Shared>, Path(user_id): Path<String>) -> Response {
    let mut state = state.lock().expect("mock state poisoned");
    state.record("GET", format!("/users/{user_id}/tickets"), Value::Null);

    if let Some(payload) = &state.tickets_payload {
        return Json(payload.clone()).into_response();
    }

    let tickets: Vec<Value> = state
        .tickets
        .iter()
        .filter(|t| t["userId"] == user_id.as_str())
        .cloned()
        .collect();
    Json(json!({ "tickets": tickets })).into_response()
}

async fn create_ticket(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().expect("mock state poisoned");
    state.record("POST", "/ticket".into(), body.clone());

    if let Some((status, error_body)) = state.create_error.clone() {
        return (status, Json(error_body)).into_response();
    }

    let ticket_id = state.next_id("ticket");
    state.tickets.push(json!({
        "ticketId": ticket_id,
        "userId": body["userId"],
        "title": body["title"],
        "description": body["description"],
        "status": "open",
        "createdAt": "2025-01-15T09:30:00Z",
    }));

    (StatusCode::CREATED, Json(json!({ "ticketId": ticket_id }))).into_response()
}

async fn all_tickets(State(state): State<Shared>) -> Response {
    let mut state = state.lock().expect("mock state poisoned");
    state.record("GET", "/admin/tickets".into(), Value::Null);

    let payload = state
        .tickets_payload
        .clone()
        .unwrap_or_else(|| json!({ "tickets": state.tickets }));
    Json(payload).into_response()
}

async fn all_users(State(state): State<Shared>) -> Response {
    let mut state = state.lock().expect("mock state poisoned");
    state.record("GET", "/admin/users".into(), Value::Null);

    let payload = state.users_payload.clone().unwrap_or_else(|| {
        let users: Vec<Value> = state.users.iter().map(MockState::user_json).collect();
        json!({ "users": users })
    });
    Json(payload).into_response()
}

async fn update_ticket(
    State(state): State<Shared>,
    Path(ticket_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().expect("mock state poisoned");
    state.record("PATCH", format!("/ticket/update/{ticket_id}"), body.clone());

    if state.fail_updates {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable");
    }

    match state
        .tickets
        .iter_mut()
        .find(|t| t["ticketId"] == ticket_id.as_str())
    {
        Some(ticket) => {
            ticket["status"] = body["status"].clone();
            StatusCode::OK.into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Ticket not found"),
    }
}

async fn update_user(
    State(state): State<Shared>,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().expect("mock state poisoned");
    state.record("PATCH", format!("/admin/user/{user_id}"), body.clone());

    if state.fail_updates {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable");
    }

    let Some(is_admin) = body["isAdmin"].as_bool() else {
        return error(StatusCode::BAD_REQUEST, "isAdmin must be a boolean");
    };

    match state.users.iter_mut().find(|u| u.user_id == user_id) {
        Some(user) => {
            user.is_admin = is_admin;
            StatusCode::OK.into_response()
        }
        None => error(StatusCode::NOT_FOUND, "User not found"),
    }
}

// =============================================================================
// Portal under test
// =============================================================================

/// The portal router served on an ephemeral port.
pub struct TestPortal {
    pub client: Client,
    base_url: String,
}

impl TestPortal {
    /// Start a portal talking to `api`.
    pub async fn start(api: &MockApi) -> Self {
        Self::start_with_api_url(api.url()).await
    }

    /// Start a portal talking to an arbitrary API URL.
    ///
    /// # Panics
    ///
    /// Panics if the state cannot be built or the listener cannot be bound.
    pub async fn start_with_api_url(api_url: Url) -> Self {
        let state = AppState::new(PortalConfig::for_api(api_url))
            .expect("Failed to build application state");
        let url = serve(ticket_portal::app(state)).await;

        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: url.as_str().trim_end_matches('/').to_string(),
        }
    }

    /// Absolute URL of a portal path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a portal path.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// POST a form to a portal path.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Submit the login form.
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post_form("/login", &[("email", email), ("password", password)])
            .await
    }
}

/// `Location` header of a redirect response.
///
/// # Panics
///
/// Panics if the response is not a redirect.
#[must_use]
pub fn location(response: &reqwest::Response) -> String {
    assert!(
        response.status().is_redirection(),
        "expected a redirect, got {}",
        response.status()
    );
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("redirect without Location header")
        .to_string()
}

/// A URL nothing is listening on.
///
/// # Panics
///
/// Panics if no port can be reserved.
pub async fn unreachable_api_url() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to reserve a port");
    let addr = listener.local_addr().expect("listener without address");
    drop(listener);
    Url::parse(&format!("http://{addr}/")).expect("valid URL")
}

/// Serve `router` on an ephemeral port and return its base URL.
async fn serve(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener without address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server failed");
    });

    Url::parse(&format!("http://{addr}/")).expect("valid URL")
}

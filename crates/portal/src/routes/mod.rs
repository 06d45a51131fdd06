//! HTTP route handlers for the portal.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                   - Login/register page
//! POST /login                              - Login (registers unknown emails)
//! POST /logout                             - Logout
//!
//! # Tickets (requires session)
//! GET  /tickets?status=all|open|closed     - Own tickets
//! POST /tickets                            - Create ticket
//!
//! # Admin (requires admin session)
//! GET  /tickets-admin                      - All tickets and users
//! POST /tickets-admin/tickets/{id}/status  - Toggle ticket status
//! POST /tickets-admin/users/{id}/role      - Toggle admin role
//! ```

pub mod admin;
pub mod auth;
pub mod tickets;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/tickets-admin", get(admin::index))
        .route(
            "/tickets-admin/tickets/{ticket_id}/status",
            post(admin::toggle_ticket_status),
        )
        .route("/tickets-admin/users/{user_id}/role", post(admin::toggle_role))
}

/// Create the main routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(auth::login_page))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/tickets", get(tickets::index).post(tickets::create))
        .merge(admin_routes())
}

//! Admin view: every ticket and user, with status and role toggles.
//!
//! Both toggles redirect back to the view with a notice, so the lists are
//! fetched again exactly once per action whether or not it worked.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use ticket_portal_core::{TicketId, TicketStatus, UserId};

use crate::error::add_breadcrumb;
use crate::middleware::RequireAdmin;
use crate::state::AppState;
use crate::views::{Notice, ShellView, TicketRow, UserRow};

const ADMIN_PATH: &str = "/tickets-admin";

/// Query parameters of the admin view.
#[derive(Debug, Default, Deserialize)]
pub struct AdminQuery {
    pub notice: Option<String>,
}

/// Status toggle form: the status the admin saw.
#[derive(Debug, Deserialize)]
pub struct StatusToggleForm {
    #[serde(default)]
    pub status: String,
}

impl StatusToggleForm {
    /// The status to write. An open ticket closes; anything else reopens.
    #[must_use]
    pub fn next_status(&self) -> TicketStatus {
        let current = Some(self.status.trim())
            .filter(|s| !s.is_empty())
            .map(TicketStatus::parse);
        TicketStatus::toggled(current.as_ref())
    }
}

/// Role toggle form: the role the admin saw.
#[derive(Debug, Deserialize)]
pub struct RoleToggleForm {
    #[serde(default)]
    pub is_admin: String,
}

impl RoleToggleForm {
    /// The `isAdmin` value to write: the negation of what was shown.
    #[must_use]
    pub fn next_is_admin(&self) -> bool {
        !self.is_admin.trim().eq_ignore_ascii_case("true")
    }
}

/// Admin view template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/index.html")]
pub struct AdminTemplate {
    pub shell: ShellView,
    pub tickets: Vec<TicketRow>,
    pub users: Vec<UserRow>,
    pub notice: Option<Notice>,
}

/// Display all tickets and users.
///
/// The two lists are fetched concurrently; either one failing renders as an
/// empty table without affecting the other.
#[instrument(skip(state, admin, query), fields(user_id = %admin.user_id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<AdminQuery>,
) -> impl IntoResponse {
    let api = state.api();
    let (tickets, users) = tokio::join!(api.all_tickets(), api.all_users());

    let tickets = tickets.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load tickets, showing none");
        Vec::new()
    });
    let users = users.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load users, showing none");
        Vec::new()
    });

    AdminTemplate {
        shell: ShellView::new(&state.config().shell, Some(admin.email.as_str())),
        tickets: tickets.iter().map(TicketRow::from).collect(),
        users: users.iter().map(UserRow::from).collect(),
        notice: Notice::from_query(query.notice.as_deref()),
    }
}

/// Toggle a ticket between open and closed.
#[instrument(skip(state, admin, form), fields(user_id = %admin.user_id))]
pub async fn toggle_ticket_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(ticket_id): Path<String>,
    Form(form): Form<StatusToggleForm>,
) -> Redirect {
    let ticket_id = TicketId::new(ticket_id);
    let status = form.next_status();

    add_breadcrumb(
        "admin",
        "Toggle ticket status",
        &[("ticket_id", ticket_id.as_str()), ("status", status.as_str())],
    );

    let notice = match state.api().update_ticket_status(&ticket_id, &status).await {
        Ok(()) => {
            tracing::info!(ticket_id = %ticket_id, status = %status, "Ticket status updated");
            Notice::TicketStatusUpdated
        }
        Err(e) => {
            tracing::warn!(ticket_id = %ticket_id, error = %e, "Ticket status update failed");
            Notice::TicketStatusFailed
        }
    };

    Redirect::to(&notice.redirect_path(ADMIN_PATH))
}

/// Grant or revoke the admin role of a user.
#[instrument(skip(state, admin, form), fields(user_id = %admin.user_id))]
pub async fn toggle_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(user_id): Path<String>,
    Form(form): Form<RoleToggleForm>,
) -> Redirect {
    let target = UserId::new(user_id);
    let is_admin = form.next_is_admin();

    add_breadcrumb(
        "admin",
        "Toggle user role",
        &[
            ("target_user_id", target.as_str()),
            ("is_admin", if is_admin { "true" } else { "false" }),
        ],
    );

    let notice = match state.api().set_admin(&target, is_admin).await {
        Ok(()) => {
            tracing::info!(target_user_id = %target, is_admin, "User role updated");
            Notice::RoleUpdated
        }
        Err(e) => {
            tracing::warn!(target_user_id = %target, error = %e, "User role update failed");
            Notice::RoleFailed
        }
    };

    Redirect::to(&notice.redirect_path(ADMIN_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_form(status: &str) -> StatusToggleForm {
        StatusToggleForm {
            status: status.to_string(),
        }
    }

    #[test]
    fn test_open_closes() {
        assert_eq!(status_form("open").next_status(), TicketStatus::Closed);
        assert_eq!(status_form("OPEN").next_status(), TicketStatus::Closed);
    }

    #[test]
    fn test_everything_else_reopens() {
        for seen in ["closed", "CLOSED", "En espera", ""] {
            assert_eq!(status_form(seen).next_status(), TicketStatus::Open, "{seen}");
        }
    }

    #[test]
    fn test_role_toggle_negates() {
        let form = |v: &str| RoleToggleForm {
            is_admin: v.to_string(),
        };
        assert!(!form("true").next_is_admin());
        assert!(form("false").next_is_admin());
        assert!(form("").next_is_admin());
    }
}

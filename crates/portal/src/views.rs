//! Display helpers shared by the page templates.

use chrono::DateTime;

use ticket_portal_core::{StatusFilter, Ticket, TicketStatus, User};

use crate::config::ShellConfig;

// =============================================================================
// Shell
// =============================================================================

/// Page chrome shown on every page.
#[derive(Debug, Clone)]
pub struct ShellView {
    pub brand_logo_url: String,
    pub footer_logo_url: String,
    pub home_url: String,
    /// Email of the logged-in user, shown in the header.
    pub user_email: Option<String>,
}

impl ShellView {
    #[must_use]
    pub fn new(config: &ShellConfig, user_email: Option<&str>) -> Self {
        Self {
            brand_logo_url: config.brand_logo_url.clone(),
            footer_logo_url: config.footer_logo_url.clone(),
            home_url: config.home_url.clone(),
            user_email: user_email.map(String::from),
        }
    }
}

// =============================================================================
// Notices
// =============================================================================

/// One-shot message carried in the `notice` query parameter after a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    TicketCreated,
    TicketStatusUpdated,
    TicketStatusFailed,
    RoleUpdated,
    RoleFailed,
}

impl Notice {
    /// Parse a query value. Unknown codes are ignored.
    #[must_use]
    pub fn from_query(code: Option<&str>) -> Option<Self> {
        match code? {
            "ticket_created" => Some(Self::TicketCreated),
            "status_updated" => Some(Self::TicketStatusUpdated),
            "status_failed" => Some(Self::TicketStatusFailed),
            "role_updated" => Some(Self::RoleUpdated),
            "role_failed" => Some(Self::RoleFailed),
            _ => None,
        }
    }

    /// Query value.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::TicketCreated => "ticket_created",
            Self::TicketStatusUpdated => "status_updated",
            Self::TicketStatusFailed => "status_failed",
            Self::RoleUpdated => "role_updated",
            Self::RoleFailed => "role_failed",
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::TicketCreated => "Ticket creado",
            Self::TicketStatusUpdated => "Estado del ticket actualizado",
            Self::TicketStatusFailed => "No se pudo actualizar el ticket",
            Self::RoleUpdated => "Rol del usuario actualizado",
            Self::RoleFailed => "No se pudo actualizar el rol",
        }
    }

    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::TicketStatusFailed | Self::RoleFailed)
    }

    /// `path` with this notice appended as a query parameter.
    #[must_use]
    pub fn redirect_path(self, path: &str) -> String {
        let separator = if path.contains('?') { '&' } else { '?' };
        format!("{path}{separator}notice={}", self.code())
    }
}

// =============================================================================
// Tickets
// =============================================================================

/// Coloured status label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: String,
    /// CSS modifier: `open`, `closed` or `other`.
    pub class: &'static str,
}

impl StatusBadge {
    #[must_use]
    pub fn new(status: Option<&TicketStatus>) -> Self {
        match status {
            Some(TicketStatus::Open) => Self {
                label: "Abierto".to_string(),
                class: "open",
            },
            Some(TicketStatus::Closed) => Self {
                label: "Cerrado".to_string(),
                class: "closed",
            },
            Some(TicketStatus::Other(raw)) => Self {
                label: raw.clone(),
                class: "other",
            },
            None => Self {
                label: "Sin estado".to_string(),
                class: "other",
            },
        }
    }
}

/// A ticket row.
#[derive(Debug, Clone)]
pub struct TicketRow {
    pub ticket_id: String,
    pub title: String,
    pub description: String,
    pub badge: StatusBadge,
    pub created_at: Option<String>,
    /// Status the admin saw, posted back with the toggle form.
    pub status_value: String,
    /// Admin status toggle form action.
    pub toggle_path: String,
}

impl From<&Ticket> for TicketRow {
    fn from(ticket: &Ticket) -> Self {
        Self {
            ticket_id: ticket.ticket_id.to_string(),
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            badge: StatusBadge::new(ticket.status.as_ref()),
            created_at: ticket.created_at.as_deref().map(format_created_at),
            status_value: ticket
                .status
                .as_ref()
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
            toggle_path: format!(
                "/tickets-admin/tickets/{}/status",
                urlencoding::encode(ticket.ticket_id.as_str())
            ),
        }
    }
}

/// Format an API timestamp for display.
///
/// RFC 3339 timestamps become `dd/mm/yyyy HH:MM` (UTC); anything else is
/// shown verbatim.
#[must_use]
pub fn format_created_at(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw).map_or_else(
        |_| raw.to_string(),
        |dt| dt.to_utc().format("%d/%m/%Y %H:%M").to_string(),
    )
}

/// One option of the status filter dropdown.
#[derive(Debug, Clone)]
pub struct FilterOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// The filter dropdown with `current` selected.
#[must_use]
pub fn filter_options(current: StatusFilter) -> Vec<FilterOption> {
    StatusFilter::ALL
        .iter()
        .map(|filter| FilterOption {
            value: filter.as_str(),
            label: match filter {
                StatusFilter::All => "Todos",
                StatusFilter::Open => "Abiertos",
                StatusFilter::Closed => "Cerrados",
            },
            selected: *filter == current,
        })
        .collect()
}

// =============================================================================
// Users
// =============================================================================

/// A user row on the admin view.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub user_id: String,
    pub email: String,
    pub is_admin: bool,
    pub role_label: &'static str,
    pub action_label: &'static str,
    /// Role toggle form action.
    pub toggle_path: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id.to_string(),
            email: user.email.to_string(),
            is_admin: user.is_admin,
            role_label: if user.is_admin { "Admin" } else { "Usuario" },
            action_label: if user.is_admin {
                "Quitar admin"
            } else {
                "Hacer admin"
            },
            toggle_path: format!(
                "/tickets-admin/users/{}/role",
                urlencoding::encode(user.user_id.as_str())
            ),
        }
    }
}

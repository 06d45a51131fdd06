//! Ticket status, status filter and user role.
//!
//! The ticket API has historically written statuses in mixed casing
//! (`"open"`, `"CLOSED"`). Statuses are normalized when read: the two known
//! values are matched case-insensitively and always written back lowercase.
//! Anything else is kept verbatim.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lifecycle status of a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TicketStatus {
    /// Ticket is open.
    Open,
    /// Ticket is closed.
    Closed,
    /// Any status string the portal does not know about.
    Other(String),
}

impl TicketStatus {
    /// Parse a status string from the API.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("open") {
            Self::Open
        } else if trimmed.eq_ignore_ascii_case("closed") {
            Self::Closed
        } else {
            Self::Other(raw.to_owned())
        }
    }

    /// Canonical wire form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Other(raw) => raw,
        }
    }

    /// The status an admin toggle moves a ticket to.
    ///
    /// Only an open ticket closes; every other state (closed, unknown or
    /// missing) reopens.
    #[must_use]
    pub fn toggled(current: Option<&Self>) -> Self {
        match current {
            Some(Self::Open) => Self::Closed,
            _ => Self::Open,
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TicketStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TicketStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Status filter on the ticket view.
///
/// Applied to an already-fetched list; never sent to the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Open,
    Closed,
}

impl StatusFilter {
    /// Every filter, in display order.
    pub const ALL: [Self; 3] = [Self::All, Self::Open, Self::Closed];

    /// Parse a query-string value. Unknown or missing values mean `All`.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("open") => Self::Open,
            Some(v) if v.eq_ignore_ascii_case("closed") => Self::Closed,
            _ => Self::All,
        }
    }

    /// Query-string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    /// Whether a ticket with `status` passes this filter.
    #[must_use]
    pub fn matches(self, status: Option<&TicketStatus>) -> bool {
        match self {
            Self::All => true,
            Self::Open => status == Some(&TicketStatus::Open),
            Self::Closed => status == Some(&TicketStatus::Closed),
        }
    }
}

/// Role of a portal user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular user: sees and creates own tickets.
    User,
    /// Administrator: manages all tickets and user roles.
    Admin,
}

impl Role {
    /// Role from the API's `isAdmin` flag.
    #[must_use]
    pub const fn from_admin_flag(is_admin: bool) -> Self {
        if is_admin { Self::Admin } else { Self::User }
    }

    /// Whether this role grants access to the admin view.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

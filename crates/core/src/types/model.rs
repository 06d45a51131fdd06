//! Wire models shared with the ticket API.
//!
//! Field names follow the API's camelCase JSON.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::flag;
use crate::{Email, StatusFilter, TicketId, TicketStatus, UserId};

/// A support ticket as listed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Server-assigned ticket ID.
    pub ticket_id: TicketId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Missing on some admin listings.
    #[serde(default)]
    pub status: Option<TicketStatus>,
    /// Creation timestamp as sent by the API (usually RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// A string field the API may send as `null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A portal user as listed by the admin API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: UserId,
    pub email: Email,
    #[serde(default, deserialize_with = "flag::deserialize")]
    pub is_admin: bool,
}

/// Body of a ticket creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub user_id: UserId,
}

impl StatusFilter {
    /// Tickets passing this filter, in their original order.
    pub fn apply<'a>(self, tickets: &'a [Ticket]) -> impl Iterator<Item = &'a Ticket> + 'a {
        tickets
            .iter()
            .filter(move |ticket| self.matches(ticket.status.as_ref()))
    }
}

//! Request and response bodies for the ticket API.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use ticket_portal_core::types::flag;
use ticket_portal_core::{TicketStatus, UserId};

/// Credentials body for `POST /login` and `POST /user`.
///
/// Borrows the secret only for the duration of serialization.
#[derive(Serialize)]
pub struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

impl<'a> CredentialsBody<'a> {
    pub fn new(email: &'a str, password: &'a SecretString) -> Self {
        Self {
            email,
            password: password.expose_secret(),
        }
    }
}

impl std::fmt::Debug for CredentialsBody<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsBody")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Successful `POST /login` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "flag::deserialize")]
    pub is_admin: bool,
}

/// Successful `POST /user` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: UserId,
}

/// `PATCH /ticket/update/{ticketId}` body.
#[derive(Debug, Serialize)]
pub struct StatusUpdateBody<'a> {
    pub status: &'a TicketStatus,
}

/// `PATCH /admin/user/{userId}` body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleUpdateBody {
    pub is_admin: bool,
}

/// Error body sent with non-success statuses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// The error text, unless it is missing or blank.
    #[must_use]
    pub fn into_message(self) -> Option<String> {
        self.error.filter(|m| !m.trim().is_empty())
    }
}

/// Extract the list stored under `field` of a list response.
///
/// A missing or null field is an empty list, and a field that is not an array
/// is an error describing what was wrong. Items that do not decode are
/// skipped with a warning; the rest are kept.
pub fn list_field<T: DeserializeOwned>(
    mut body: serde_json::Value,
    field: &str,
) -> Result<Vec<T>, String> {
    let items = match body.get_mut(field).map(serde_json::Value::take) {
        None | Some(serde_json::Value::Null) => return Ok(Vec::new()),
        Some(serde_json::Value::Array(items)) => items,
        Some(other) => return Err(format!("`{field}` is not an array: {other}")),
    };

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|e| {
                    warn!(field, index, error = %e, "Skipping list item that does not decode");
                })
                .ok()
        })
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use ticket_portal_core::{Ticket, User};

    #[test]
    fn test_list_field_null_is_empty() {
        let tickets: Vec<Ticket> = list_field(json!({ "tickets": null }), "tickets").unwrap();
        assert!(tickets.is_empty());
    }

    #[test]
    fn test_list_field_missing_is_empty() {
        let tickets: Vec<Ticket> = list_field(json!({}), "tickets").unwrap();
        assert!(tickets.is_empty());
        let tickets: Vec<Ticket> = list_field(json!(null), "tickets").unwrap();
        assert!(tickets.is_empty());
    }

    #[test]
    fn test_list_field_not_an_array() {
        let result: Result<Vec<Ticket>, _> = list_field(json!({ "tickets": "nope" }), "tickets");
        assert!(result.is_err());
    }

    #[test]
    fn test_list_field_skips_bad_items() {
        let body = json!({ "users": [
            { "userId": "1", "email": "a@b.c" },
            { "userId": "2" },
            { "email": "sin-id@b.c" },
            { "userId": "4", "email": "d@e.f", "isAdmin": true }
        ]});
        let users: Vec<User> = list_field(body, "users").unwrap();
        let ids: Vec<_> = users.iter().map(|u| u.user_id.as_str()).collect();
        assert_eq!(ids, ["1", "4"]);
    }

    #[test]
    fn test_list_field_keeps_tickets_around_bad_ones() {
        let body = json!({ "tickets": [
            { "ticketId": "t1", "title": "Wifi del piso 3", "status": "open" },
            { "ticketId": "t2", "title": null },
            { "ticketId": "t3", "title": "Backup", "status": 7 },
            "garbage"
        ]});
        let tickets: Vec<Ticket> = list_field(body, "tickets").unwrap();
        let ids: Vec<_> = tickets.iter().map(|t| t.ticket_id.as_str()).collect();
        assert_eq!(ids, ["t1", "t2"]);
    }

    #[test]
    fn test_list_field_decodes_items() {
        let body = json!({ "tickets": [
            { "ticketId": "t1", "title": "a", "status": "open" },
            { "ticketId": 2, "title": "b" }
        ]});
        let tickets: Vec<Ticket> = list_field(body, "tickets").unwrap();
        assert_eq!(tickets.len(), 2);
        assert_eq!(tickets[1].ticket_id.as_str(), "2");
    }

    #[test]
    fn test_error_body_blank_text_is_no_message() {
        let body: ErrorBody =
            serde_json::from_value(json!({ "error": "Contraseña incorrecta" })).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Contraseña incorrecta"));

        let blanks = [
            json!({ "error": "" }),
            json!({ "error": "  " }),
            json!({ "error": null }),
            json!({}),
        ];
        for raw in blanks {
            let body: ErrorBody = serde_json::from_value(raw).unwrap();
            assert_eq!(body.into_message(), None);
        }
    }

    #[test]
    fn test_login_response_without_email() {
        let response: LoginResponse =
            serde_json::from_value(json!({ "userId": "u1", "isAdmin": true })).unwrap();
        assert_eq!(response.user_id.as_str(), "u1");
        assert_eq!(response.email, None);
        assert!(response.is_admin);
    }

    #[test]
    fn test_update_bodies() {
        let status = TicketStatus::Closed;
        assert_eq!(
            serde_json::to_value(StatusUpdateBody { status: &status }).unwrap(),
            json!({ "status": "closed" })
        );
        assert_eq!(
            serde_json::to_value(RoleUpdateBody { is_admin: false }).unwrap(),
            json!({ "isAdmin": false })
        );
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let password = SecretString::from("hunter2");
        let body = CredentialsBody::new("a@b.c", &password);
        let debug = format!("{body:?}");
        assert!(!debug.contains("hunter2"));
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "email": "a@b.c", "password": "hunter2" })
        );
    }
}

//! Ticket creation form.
//!
//! The title is picked from a fixed list of categories. The extra
//! [`OTHER_CATEGORY`] option switches to a free-text title.

use serde::Deserialize;
use thiserror::Error;

use ticket_portal_core::{NewTicket, UserId};

/// Fixed ticket categories, in display order.
pub const TICKET_CATEGORIES: [&str; 5] = [
    "Falla en el servidor",
    "Problemas de software",
    "Acceso / credenciales",
    "Problemas de red",
    "Error en el sistema / ERP",
];

/// Form value of the free-text title option.
pub const OTHER_CATEGORY: &str = "otro";

/// Validation failures of the ticket form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TicketFormError {
    /// The resolved title is blank.
    #[error("ticket title is empty")]
    EmptyTitle,
    /// The category is neither a known one nor the "other" option.
    #[error("unknown ticket category: {0}")]
    UnknownCategory(String),
    /// The description is blank.
    #[error("ticket description is empty")]
    EmptyDescription,
}

impl TicketFormError {
    /// Message shown above the form.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::UnknownCategory(_) => "Debes ingresar un título",
            Self::EmptyDescription => "Debes ingresar una descripción",
        }
    }
}

/// Submitted ticket form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TicketForm {
    /// Selected category, or [`OTHER_CATEGORY`].
    #[serde(default)]
    pub category: String,
    /// Free-text title, used only with [`OTHER_CATEGORY`].
    #[serde(default)]
    pub custom_title: String,
    #[serde(default)]
    pub description: String,
    /// Status filter of the list the form was submitted from.
    #[serde(default)]
    pub status: String,
}

impl TicketForm {
    /// Whether the free-text title option is selected.
    #[must_use]
    pub fn is_other(&self) -> bool {
        self.category.trim() == OTHER_CATEGORY
    }

    /// The title this form resolves to.
    ///
    /// # Errors
    ///
    /// Returns `EmptyTitle` if nothing usable was entered and
    /// `UnknownCategory` for a category outside the fixed list.
    pub fn resolve_title(&self) -> Result<String, TicketFormError> {
        if self.is_other() {
            let custom = self.custom_title.trim();
            if custom.is_empty() {
                return Err(TicketFormError::EmptyTitle);
            }
            return Ok(custom.to_string());
        }

        let category = self.category.trim();
        if category.is_empty() {
            return Err(TicketFormError::EmptyTitle);
        }

        TICKET_CATEGORIES
            .iter()
            .find(|known| **known == category)
            .map(|known| (*known).to_string())
            .ok_or_else(|| TicketFormError::UnknownCategory(category.to_string()))
    }

    /// Validate the form into a creation request for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure; the title is checked before the
    /// description.
    pub fn validate(&self, user_id: &UserId) -> Result<NewTicket, TicketFormError> {
        let title = self.resolve_title()?;

        if self.description.trim().is_empty() {
            return Err(TicketFormError::EmptyDescription);
        }

        Ok(NewTicket {
            title,
            description: self.description.clone(),
            user_id: user_id.clone(),
        })
    }
}

//! Portal-side models: session state and form input.

pub mod session;
pub mod ticket_form;

pub use session::CurrentUser;
pub use session::keys as session_keys;
pub use ticket_form::{OTHER_CATEGORY, TICKET_CATEGORIES, TicketForm, TicketFormError};

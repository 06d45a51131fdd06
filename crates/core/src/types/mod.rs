//! Core types for the ticket portal.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod flag;
pub mod id;
pub mod model;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use model::{NewTicket, Ticket, User};
pub use status::*;

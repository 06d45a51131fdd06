//! Ticket Portal Core - Shared domain types.
//!
//! This crate provides the types shared by the portal and its tests:
//! - `portal` - Server-rendered ticketing portal
//! - `integration-tests` - Mock ticket API and end-to-end tests
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients,
//! no session handling. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, ticket statuses, roles and the API wire models

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

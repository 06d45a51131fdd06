//! Business logic services for the portal.
//!
//! # Services
//!
//! - `auth` - Login with automatic registration of unknown users

pub mod auth;

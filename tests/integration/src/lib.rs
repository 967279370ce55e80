//! Integration test utilities for the campus server
//!
//! Spawns the real server against PostgreSQL and drives it over HTTP.
//! Sessions are minted with the configured JWT secret since sign-in goes
//! through the external identity provider.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;

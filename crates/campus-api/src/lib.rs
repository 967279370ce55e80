//! # campus-api
//!
//! HTTP server built with Axum: JSON endpoints under `/api`, the sign-in
//! callback, the public invitation page, and the access rules for site pages.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run};
pub use state::AppState;

//! Trigger endpoint for the script runner.
//!
//! Exposes config, state, error handling, routes and the router builder so
//! integration tests and the binary entrypoint use the same stack.

pub mod config;
pub mod error;
pub mod router;
pub mod routes;
pub mod state;
pub mod trigger;

//! HTTP API for searching the catalog and managing embedding providers.
//!
//! Thin handlers over [`crate::search::MovieSearch`]: deserialization,
//! status-code mapping, and response shaping only.

mod movies;
mod providers;
mod server;
mod state;

pub use server::start_http_server;
pub use state::ApiState;

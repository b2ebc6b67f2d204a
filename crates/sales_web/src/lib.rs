//! SalesCast web service
//!
//! Serves the prediction form and the `/predict` JSON endpoint on top of
//! `salescast-core`.

pub mod config;
pub mod page;
pub mod server;

pub use config::{Cli, ConfigError, ServerConfig};
pub use server::{build_router, start_server, AppState, SharedState};

pub mod config;
pub mod error;
pub mod metrics_server;
pub mod observability;
pub mod reports;
pub mod routes;
pub mod state;
pub mod window;

pub use state::AppState;

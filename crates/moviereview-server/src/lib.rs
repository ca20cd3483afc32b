//! MovieReview Server
//!
//! HTTP front end for review sentiment analysis. The classifier is loaded
//! once at startup and injected into handlers through [`AppState`]; a
//! classifier that fails to load leaves the server up and answering 503 on
//! the sentiment endpoint.

pub mod cli;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use cli::Cli;
pub use config::AppConfig;
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;

//! MovieReview Core
//!
//! Types shared by every MovieReview crate.
//!
//! This crate provides:
//! - The `Error` taxonomy used across the classifier and the HTTP surface
//! - A `Result` alias over that error

pub mod error;

pub use error::{Error, ErrorKind, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, ErrorKind, Result};
}

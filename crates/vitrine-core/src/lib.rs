//! Vitrine Core Library
//!
//! Configuration, project layout, and error handling shared by the Vitrine asset
//! pipeline and CLI.

pub mod config;
pub mod error;
pub mod layout;

pub use config::Config;
pub use error::{CoreError, Result};
pub use layout::ProjectLayout;

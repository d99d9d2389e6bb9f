//! Shared types for Geoclock
//!
//! Common types used across the workspace: data models, the error
//! taxonomy, wire types for the spreadsheet sync endpoint, and small
//! utilities.

pub mod cloud;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{CoreError, CoreResult};

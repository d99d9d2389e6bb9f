//! Job Model

use serde::{Deserialize, Serialize};

/// Job catalog entry.
///
/// Users and report accounts reference jobs *by title*, not by id; the
/// title is the durable key the endpoint stores, so renaming a job
/// does not cascade to entities holding the old title string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
}

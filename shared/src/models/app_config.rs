//! App Config Model

use serde::{Deserialize, Serialize};

/// Application configuration.
///
/// Loaded from the local store at startup (defaults when absent),
/// overwritten by admin settings saves and by deep-link bootstrap;
/// `last_updated` is refreshed on every successful pull and drives
/// the staleness indicator in the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Pull/push endpoint (Apps Script style URL)
    pub sync_url: String,
    /// Write-behind endpoint for attendance and registration echoes
    pub google_sheet_link: String,
    pub admin_username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sync_url: String::new(),
            google_sheet_link: String::new(),
            admin_username: "admin".to_string(),
            admin_password: None,
            last_updated: None,
        }
    }
}

impl AppConfig {
    /// Whether a sync endpoint has been configured yet.
    pub fn is_connected(&self) -> bool {
        !self.sync_url.is_empty()
    }
}

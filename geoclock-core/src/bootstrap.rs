//! Deep-link bootstrap
//!
//! First-launch auto-configuration: a query parameter carrying a
//! base64-encoded endpoint URL is decoded once, persisted into the
//! config, and an immediate pull is issued. The caller then strips
//! the parameter from the visible URL (the cleaned query string is
//! returned for exactly that).

use base64::{Engine as _, engine::general_purpose::STANDARD};
use thiserror::Error;

use shared::CoreError;

use crate::state::AppState;
use crate::store::StoreError;
use crate::sync::SyncCoordinator;

/// Query parameter the encoded endpoint arrives in.
pub const DEEP_LINK_PARAM: &str = "cfg";

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("deep link parameter is not valid base64")]
    InvalidEncoding,

    #[error("deep link did not decode to an http(s) URL")]
    NotAUrl,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<BootstrapError> for CoreError {
    fn from(e: BootstrapError) -> Self {
        match e {
            BootstrapError::Store(inner) => inner.into(),
            other => CoreError::Validation(other.to_string()),
        }
    }
}

/// Extract and decode the deep-link endpoint from a raw query string
/// (without the leading `?`). `Ok(None)` when the parameter is
/// absent.
pub fn decode_deep_link(query: &str) -> Result<Option<String>, BootstrapError> {
    let Some(encoded) = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == DEEP_LINK_PARAM)
        .map(|(_, v)| v)
    else {
        return Ok(None);
    };

    let bytes = STANDARD
        .decode(encoded)
        .map_err(|_| BootstrapError::InvalidEncoding)?;
    let url = String::from_utf8(bytes).map_err(|_| BootstrapError::InvalidEncoding)?;
    if !url.starts_with("http") {
        return Err(BootstrapError::NotAUrl);
    }
    Ok(Some(url))
}

/// The query string with the deep-link parameter removed, ready to be
/// written back to the visible URL.
pub fn strip_deep_link(query: &str) -> String {
    query
        .split('&')
        .filter(|pair| {
            pair.split_once('=')
                .map(|(k, _)| k != DEEP_LINK_PARAM)
                .unwrap_or(true)
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Apply a deep link if the query carries one: persist the endpoint
/// into both config URLs and pull immediately. Returns the cleaned
/// query string when a link was applied.
pub async fn apply_deep_link(
    state: &AppState,
    coordinator: &SyncCoordinator,
    query: &str,
) -> Result<Option<String>, BootstrapError> {
    let Some(url) = decode_deep_link(query)? else {
        return Ok(None);
    };

    tracing::info!(endpoint = %url, "Applying deep-link endpoint configuration");
    state.update_config(|config| {
        config.sync_url = url.clone();
        config.google_sheet_link = url.clone();
    })?;

    // Pull errors are flagged, not thrown (same contract as any pull).
    if let Err(e) = coordinator.pull().await {
        tracing::error!(error = %e, "Bootstrap pull failed to persist");
    }

    Ok(Some(strip_deep_link(query)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_the_cfg_parameter() {
        let url = "https://script.example.com/macros/exec";
        let encoded = STANDARD.encode(url);
        let query = format!("foo=1&{DEEP_LINK_PARAM}={encoded}&bar=2");
        assert_eq!(decode_deep_link(&query).unwrap().as_deref(), Some(url));
    }

    #[test]
    fn absent_parameter_is_none() {
        assert_eq!(decode_deep_link("foo=1&bar=2").unwrap(), None);
        assert_eq!(decode_deep_link("").unwrap(), None);
    }

    #[test]
    fn rejects_garbage_and_non_urls() {
        let query = format!("{DEEP_LINK_PARAM}=!!!notbase64!!!");
        assert!(matches!(
            decode_deep_link(&query),
            Err(BootstrapError::InvalidEncoding)
        ));

        let query = format!("{DEEP_LINK_PARAM}={}", STANDARD.encode("ftp://nope"));
        assert!(matches!(decode_deep_link(&query), Err(BootstrapError::NotAUrl)));
    }

    #[test]
    fn strip_removes_only_the_deep_link() {
        let query = format!("foo=1&{DEEP_LINK_PARAM}=abcd&bar=2");
        assert_eq!(strip_deep_link(&query), "foo=1&bar=2");
    }
}

//! Endpoint HTTP client

use async_trait::async_trait;
use reqwest::Client;

use shared::cloud::{OutboxAction, RegistrySnapshot, ReportRow, UpdateSystemRequest};

use super::{SyncConfig, SyncError};

/// The remote endpoint as the core sees it.
///
/// Trait seam so tests (and a future transport change) substitute an
/// in-memory remote without touching the coordinator or the resolver.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// `GET ?action=getData` — full registry snapshot.
    async fn fetch_snapshot(&self) -> Result<RegistrySnapshot, SyncError>;

    /// `POST {action:"updateSystem", ...}` — bulk replace. The
    /// response body is not parsed; HTTP completion is the only
    /// acknowledgment the protocol offers.
    async fn push_system(&self, req: &UpdateSystemRequest) -> Result<(), SyncError>;

    /// One queued optimistic write (`registerUser`,
    /// `updateUserDevice` or `saveAttendance`).
    async fn push_action(&self, action: &OutboxAction) -> Result<(), SyncError>;

    /// `GET ?action=getReportData&user=&pass=` — viewer-scoped rows.
    async fn fetch_report_rows(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Vec<ReportRow>, SyncError>;

    /// Cheap reachability probe (login precondition).
    async fn is_online(&self) -> bool;
}

/// `reqwest`-backed endpoint client.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: Client,
    base_url: String,
}

impl HttpRemote {
    pub fn new(config: &SyncConfig) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RemoteApi for HttpRemote {
    async fn fetch_snapshot(&self) -> Result<RegistrySnapshot, SyncError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("action", "getData")])
            .send()
            .await?;
        Ok(response.json().await?)
    }

    async fn push_system(&self, req: &UpdateSystemRequest) -> Result<(), SyncError> {
        let mut body = serde_json::to_value(req)?;
        body["action"] = "updateSystem".into();
        self.client.post(&self.base_url).json(&body).send().await?;
        Ok(())
    }

    async fn push_action(&self, action: &OutboxAction) -> Result<(), SyncError> {
        self.client.post(&self.base_url).json(action).send().await?;
        Ok(())
    }

    async fn fetch_report_rows(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Vec<ReportRow>, SyncError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("action", "getReportData"),
                ("user", username),
                ("pass", password),
            ])
            .send()
            .await?;

        // The endpoint answers either an array of rows or
        // `{"error": true}` for bad credentials.
        let body: serde_json::Value = response.json().await?;
        if body
            .as_object()
            .is_some_and(|o| o.get("error").and_then(|e| e.as_bool()).unwrap_or(false))
        {
            return Err(SyncError::ReportCredentials);
        }
        serde_json::from_value(body).map_err(|e| SyncError::InvalidResponse(e.to_string()))
    }

    async fn is_online(&self) -> bool {
        self.client.get(&self.base_url).send().await.is_ok()
    }
}

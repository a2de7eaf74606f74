//! Networked store facade
//!
//! Mirrors every [`RosterStore`] call onto rollcall-server over HTTP. Any
//! transport failure or non-success status is returned as an error; nothing
//! is ever defaulted to an empty result.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::RosterStore;
use crate::api::types::{AppendLogRequest, PersonPayload};
use crate::error::RemoteError;
use crate::events::EventLogEntry;
use crate::partition::Partition;
use crate::person::PersonRecord;
use crate::{Error, Result};

const USER_AGENT: &str = concat!("rollcall/", env!("CARGO_PKG_VERSION"));

/// Default bound on a single request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct RemoteStore {
    http_client: reqwest::Client,
    base_url: String,
}

impl RemoteStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Remote(RemoteError::Network(e.to_string())))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::Config("Remote store URL is empty".to_string()));
        }

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-success response into an error
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::from_status(status.as_u16(), &body).into())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let response = self.http_client.get(&url).send().await?;
        let response = Self::check(response).await?;
        response
            .json()
            .await
            .map_err(|e| Error::Remote(RemoteError::Decode(e.to_string())))
    }

    async fn post_json<B: serde::Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let url = self.url(path);
        debug!(url = %url, "POST");
        let response = self.http_client.post(&url).json(body).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl RosterStore for RemoteStore {
    /// Probe the server; the schema lives on the server side
    async fn init(&self) -> Result<()> {
        let response = self.http_client.get(self.url("/health")).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn save_partition(&self, partition: Partition, records: &[PersonRecord]) -> Result<()> {
        let payload: Vec<PersonPayload> = records.iter().map(PersonPayload::from).collect();
        self.post_json(&format!("/individuals/{}", partition), &payload)
            .await
    }

    async fn load_partition(&self, partition: Partition) -> Result<Vec<PersonRecord>> {
        let payload: Vec<PersonPayload> = self
            .get_json(&format!("/individuals/{}", partition))
            .await?;
        Ok(payload.into_iter().map(PersonPayload::into_record).collect())
    }

    async fn append_log(&self, full_name: &str, group: &str, status_text: &str) -> Result<()> {
        let request = AppendLogRequest {
            full_name: full_name.to_string(),
            group: group.to_string(),
            status_text: status_text.to_string(),
        };
        self.post_json("/log", &request).await
    }

    async fn load_log(&self) -> Result<Vec<EventLogEntry>> {
        self.get_json("/log").await
    }

    async fn clear_all(&self) -> Result<()> {
        let response = self.http_client.post(self.url("/clear")).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

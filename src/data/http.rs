//! REST client for the marked-maps API.

use crate::{
    core::config::ApiConfig,
    data::{
        records::{ListQuery, MarkedMapRecord, MarkedMapUpdate, NewMarkedMap},
        store::MarkedMapStore,
    },
    MarkError, Result,
};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;

/// Shared client for callers that don't need a custom timeout or user agent.
/// Building the client once avoids TLS and connection pool setup per request.
static DEFAULT_CLIENT: Lazy<Client> = Lazy::new(Client::new);

const LIST_ROUTE: &str = "marked-maps";

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

/// [`MarkedMapStore`] backed by the `/marked-maps` REST endpoints
#[derive(Debug, Clone)]
pub struct HttpMarkedMapStore {
    client: Client,
    base_url: Url,
}

impl HttpMarkedMapStore {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()
            .map_err(MarkError::Network)?;
        Self::with_client(client, &config.base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| MarkError::Config(format!("invalid api base url {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(MarkError::Config(format!("api base url cannot be a base: {base_url}")).into());
        }
        Ok(Self { client, base_url })
    }

    /// Store using the shared default client
    pub fn with_default_client(base_url: &str) -> Result<Self> {
        Self::with_client(DEFAULT_CLIENT.clone(), base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/marked-maps/{segments..}` with each segment percent-encoded
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push(LIST_ROUTE).extend(segments);
        }
        url
    }

    async fn check(response: Response, id: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = if status == StatusCode::NOT_FOUND {
            String::new()
        } else {
            response.text().await.unwrap_or_default()
        };
        Err(error_for(status, &body, id).into())
    }
}

/// Map a non-success response to an error. The message prefers the body's `error` field.
fn error_for(status: StatusCode, body: &str, id: &str) -> MarkError {
    if status == StatusCode::NOT_FOUND {
        return MarkError::NotFound(id.to_string());
    }
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.to_string());
    log::warn!("marked-maps api returned {}: {}", status, message);
    MarkError::Api {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl MarkedMapStore for HttpMarkedMapStore {
    async fn list(&self, query: &ListQuery) -> Result<Vec<MarkedMapRecord>> {
        let mut url = self.endpoint(&[]);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("todayOnly", if query.today_only { "true" } else { "false" });
            if let Some(q) = query.text() {
                pairs.append_pair("q", q);
            }
        }

        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(MarkError::Network)?;
        let records = Self::check(response, LIST_ROUTE)
            .await?
            .json::<Vec<MarkedMapRecord>>()
            .await
            .map_err(MarkError::Network)?;
        Ok(records)
    }

    async fn for_map(&self, map_id: &str) -> Result<Vec<MarkedMapRecord>> {
        let url = self.endpoint(&["for-map", map_id]);
        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(MarkError::Network)?;
        let records = Self::check(response, map_id)
            .await?
            .json::<Vec<MarkedMapRecord>>()
            .await
            .map_err(MarkError::Network)?;
        log::info!("fetched {} records for map {}", records.len(), map_id);
        Ok(records)
    }

    async fn create(&self, record: NewMarkedMap) -> Result<MarkedMapRecord> {
        record.validate()?;
        let url = self.endpoint(&[]);
        log::debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .json(&record)
            .send()
            .await
            .map_err(MarkError::Network)?;
        let created = Self::check(response, &record.map_id)
            .await?
            .json::<MarkedMapRecord>()
            .await
            .map_err(MarkError::Network)?;
        Ok(created)
    }

    async fn update(&self, id: &str, update: MarkedMapUpdate) -> Result<MarkedMapRecord> {
        let url = self.endpoint(&[id]);
        log::debug!("PUT {}", url);
        let response = self
            .client
            .put(url)
            .json(&update)
            .send()
            .await
            .map_err(MarkError::Network)?;
        let updated = Self::check(response, id)
            .await?
            .json::<MarkedMapRecord>()
            .await
            .map_err(MarkError::Network)?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&[id]);
        log::debug!("DELETE {}", url);
        let response = self.client.delete(url).send().await.map_err(MarkError::Network)?;
        Self::check(response, id).await?;
        Ok(())
    }
}

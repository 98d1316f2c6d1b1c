use crate::error::{ClientError, ClientResult};
use crate::model::HealthStatus;
use reqwest::{header::CONTENT_TYPE, Client, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP access to the data service.
#[derive(Clone, Debug)]
pub struct DashboardClient {
    http: Client,
    base: Url,
}

impl DashboardClient {
    /// `timeout` of `None` means requests may hang forever.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> ClientResult<Self> {
        // Url::join replaces the last path segment unless the base ends in '/'
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base = Url::parse(&normalized).map_err(|e| ClientError::Url {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let http = builder.build()?;
        debug!("Dashboard client for {} (timeout: {:?})", base, timeout);
        Ok(Self { http, base })
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::Url {
                url: format!("{}{}", self.base, path),
                reason: e.to_string(),
            })
    }

    /// `search-users` URL; `name` is attached only for a non-blank query.
    pub fn search_url(&self, query: &str) -> ClientResult<Url> {
        let mut url = self.endpoint("search-users")?;
        let trimmed = query.trim();
        if !trimmed.is_empty() {
            url.query_pairs_mut().append_pair("name", trimmed);
        }
        Ok(url)
    }

    /// GET `url` and decode the body as JSON of any shape. Interpreting the
    /// document is left to the caller.
    async fn get_json(&self, url: Url) -> ClientResult<Value> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.contains("application/json") {
            return Err(ClientError::UnexpectedContentType(content_type));
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn search_users(&self, query: &str) -> ClientResult<Value> {
        let url = self.search_url(query)?;
        self.get_json(url).await
    }

    pub async fn fetch_aggregate(&self) -> ClientResult<Value> {
        let url = self.endpoint("data-all")?;
        self.get_json(url).await
    }

    /// One health probe. Never fails: transport problems become `Unknown`.
    pub async fn pipeline_health(&self) -> HealthStatus {
        let url = match self.endpoint("pipeline-health") {
            Ok(u) => u,
            Err(e) => {
                warn!("Cannot build health URL: {}", e);
                return HealthStatus::Unknown;
            }
        };
        match self.http.get(url).send().await {
            Ok(resp) if resp.status().is_success() => HealthStatus::Passing,
            Ok(resp) => {
                debug!("Pipeline health returned {}", resp.status());
                HealthStatus::Failing
            }
            Err(e) => {
                debug!("Pipeline health request failed: {}", e);
                HealthStatus::Unknown
            }
        }
    }
}

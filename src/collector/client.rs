// src/collector/client.rs
use super::error::CollectionError;
use super::parse::{parse_member_stats, parse_pool_stats};
use crate::config::{ConnectionConfig, RetryConfig};
use crate::health::{MemberStat, PoolFacts};
use crate::retry::{RetryDecision, RetryStrategy};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

/// Anything that can produce pool facts for the aggregator.
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn pool_stats(&self, pool: &str) -> Result<PoolFacts, CollectionError>;

    async fn member_stats(&self, pool: &str) -> Result<Vec<MemberStat>, CollectionError>;
}

/// Client for the load balancer's iControl REST statistics endpoints.
pub struct IControlClient {
    client: Client,
    base_url: Url,
    partition: String,
    user: String,
    password: String,
    retry: RetryStrategy,
}

impl IControlClient {
    pub fn new(config: &ConnectionConfig, retry: RetryConfig) -> Result<Self, CollectionError> {
        if !config.verify_tls {
            warn!(
                host = %config.host,
                "TLS certificate validation is disabled for the management API"
            );
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(CollectionError::Client)?;

        Ok(Self {
            client,
            base_url: base_url(&config.host)?,
            partition: config.partition.clone(),
            user: config.user.clone(),
            password: config.password.clone(),
            retry: RetryStrategy::new(retry),
        })
    }

    /// Stats URL for `pool`; the pool segment is percent-encoded.
    pub fn pool_url(&self, pool: &str, resource: &str) -> Result<Url, CollectionError> {
        let pool_segment = format!("~{}~{}", self.partition, pool);
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(["mgmt", "tm", "ltm", "pool", pool_segment.as_str()])
            .extend(resource.split('/'));
        Ok(url)
    }

    async fn get_json(&self, url: Url) -> Result<Value, CollectionError> {
        let url = &url;
        self.retry
            .execute_with_decision(
                || self.get_json_once(url),
                |err: &CollectionError| {
                    if err.is_retryable() {
                        RetryDecision::Retry
                    } else {
                        RetryDecision::NoRetry
                    }
                },
            )
            .await
    }

    async fn get_json_once(&self, url: &Url) -> Result<Value, CollectionError> {
        debug!(%url, "fetching statistics");

        let transport = |source| CollectionError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .basic_auth(&self.user, Some(&self.password))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollectionError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(transport)?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl StatsSource for IControlClient {
    async fn pool_stats(&self, pool: &str) -> Result<PoolFacts, CollectionError> {
        let body = self.get_json(self.pool_url(pool, "stats")?).await?;
        let facts = parse_pool_stats(&body, &self.partition, pool)?;
        debug!(?facts, "pool statistics collected");
        Ok(facts)
    }

    async fn member_stats(&self, pool: &str) -> Result<Vec<MemberStat>, CollectionError> {
        let body = self.get_json(self.pool_url(pool, "members/stats")?).await?;
        let members = parse_member_stats(&body, &self.partition)?;
        debug!(count = members.len(), "member statistics collected");
        Ok(members)
    }
}

/// Turn `host` into a base URL; a bare host name implies HTTPS.
pub fn base_url(host: &str) -> Result<Url, CollectionError> {
    let host = host.trim();
    let mut url = if host.contains("://") {
        Url::parse(host)?
    } else {
        Url::parse(&format!("https://{host}/"))?
    };

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

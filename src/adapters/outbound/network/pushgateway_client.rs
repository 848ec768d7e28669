use crate::adapters::outbound::network::endpoint::{normalize_base_url, user_agent};
use crate::ports::outbound::{CollectorGroup, MetricsCollector};
use crate::shared::error::MetricsError;
use crate::shared::Result;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

/// PushgatewayClient adapter for a push-accepting metrics collector
///
/// Groups live at `<base>/metrics/job/<job>/instance/<instance>`. `PUT`
/// replaces every metric in the group; `DELETE` drops the group.
pub struct PushgatewayClient {
    client: reqwest::Client,
    base_url: String,
}

impl PushgatewayClient {
    const DELETE_TIMEOUT_SECONDS: u64 = 5;
    const PUT_TIMEOUT_SECONDS: u64 = 30;

    /// Creates a client; `base_url` without a scheme is treated as `http://`.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent())
            .build()?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn group_url(&self, group: &CollectorGroup) -> String {
        format!(
            "{}/metrics/job/{}/instance/{}",
            self.base_url,
            urlencoding::encode(&group.job),
            urlencoding::encode(&group.instance)
        )
    }

    async fn send(&self, request: reqwest::RequestBuilder, endpoint: String) -> Result<()> {
        let response = request
            .send()
            .await
            .map_err(|e| MetricsError::NetworkUnavailable {
                endpoint: endpoint.clone(),
                details: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(MetricsError::CollectorRejected {
                endpoint,
                status: response.status().as_u16(),
            }
            .into());
        }

        Ok(())
    }
}

#[async_trait]
impl MetricsCollector for PushgatewayClient {
    async fn delete_group(&self, group: &CollectorGroup) -> Result<()> {
        let url = self.group_url(group);
        let request = self
            .client
            .delete(&url)
            .timeout(Duration::from_secs(Self::DELETE_TIMEOUT_SECONDS));
        self.send(request, url).await
    }

    async fn replace_group(&self, group: &CollectorGroup, payload: &str) -> Result<()> {
        let url = self.group_url(group);
        let request = self
            .client
            .put(&url)
            .timeout(Duration::from_secs(Self::PUT_TIMEOUT_SECONDS))
            .header(CONTENT_TYPE, "text/plain")
            .body(payload.to_string());
        self.send(request, url).await
    }
}

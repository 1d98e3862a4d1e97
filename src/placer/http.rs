//! HTTP voice API placer
//!
//! Places calls through the hosted voice-calling API as JSON over HTTPS with
//! bearer-token auth.

use crate::call::{CallRequest, CallResponse};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use super::CallPlacer;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Places calls through the voice API over HTTPS
///
/// # Example
///
/// ```rust,no_run
/// use outdial::placer::HttpCallPlacer;
///
/// # fn example() -> outdial::Result<()> {
/// let placer = HttpCallPlacer::builder()
///     .base_url("https://api.vapi.ai")
///     .api_key("sk-…")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpCallPlacer {
    base_url: String,
    api_key: String,
    /// Shared HTTP client (connection pooling, request timeout).
    client: reqwest::Client,
}

impl HttpCallPlacer {
    /// Create a new placer builder
    #[must_use]
    pub fn builder() -> HttpCallPlacerBuilder {
        HttpCallPlacerBuilder::default()
    }

    /// Build a placer from `VOICE_API_URL` and `VOICE_API_KEY`
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("VOICE_API_URL")
            .map_err(|_| Error::Config("env var not found: VOICE_API_URL".into()))?;
        let api_key = std::env::var("VOICE_API_KEY")
            .map_err(|_| Error::Config("env var not found: VOICE_API_KEY".into()))?;
        Self::builder().base_url(base_url).api_key(api_key).build()
    }
}

/// Wire shape of the voice API's call-creation endpoint
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlaceCallBody<'a> {
    assistant_id: &'a str,
    phone_number_id: &'a str,
    customer: Customer<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a serde_json::Value>,
}

#[derive(Serialize)]
struct Customer<'a> {
    name: &'a str,
    number: &'a str,
}

#[async_trait]
impl CallPlacer for HttpCallPlacer {
    async fn place(&self, request: &CallRequest) -> Result<CallResponse> {
        let url = format!("{}/call", self.base_url.trim_end_matches('/'));
        let body = PlaceCallBody {
            assistant_id: &request.assistant_id,
            phone_number_id: &request.phone_number_id,
            customer: Customer {
                name: &request.customer_name,
                number: &request.phone_number,
            },
            metadata: request.metadata.as_ref(),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(
                %url,
                %status,
                number = %request.phone_number,
                body = %body_text,
                "voice API rejected call placement"
            );
            return Err(Error::Placement {
                status: Some(status.as_u16()),
                detail: body_text,
            });
        }

        let call: CallResponse = response.json().await?;
        tracing::debug!(
            call_id = %call.id,
            status = %call.status,
            number = %request.phone_number,
            "call placed"
        );
        Ok(call)
    }
}

/// Builder for [`HttpCallPlacer`]
#[derive(Debug, Default)]
pub struct HttpCallPlacerBuilder {
    base_url: String,
    api_key: String,
    timeout: Option<Duration>,
}

impl HttpCallPlacerBuilder {
    /// Set the API base URL (e.g. `https://api.vapi.ai`)
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the bearer token
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    /// Set the per-request timeout (default 30 seconds)
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the placer
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when `base_url` or `api_key` is missing,
    /// or when the HTTP client cannot be constructed.
    pub fn build(self) -> Result<HttpCallPlacer> {
        if self.base_url.trim().is_empty() {
            return Err(Error::Config("base_url must be set".into()));
        }
        if self.api_key.trim().is_empty() {
            return Err(Error::Config("api_key must be set".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(|e| Error::Config(format!("failed to build http client: {e}")))?;

        Ok(HttpCallPlacer {
            base_url: self.base_url,
            api_key: self.api_key,
            client,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_basic() {
        let placer = HttpCallPlacer::builder()
            .base_url("https://api.vapi.ai")
            .api_key("sk-test")
            .build()
            .unwrap();

        assert_eq!(placer.base_url, "https://api.vapi.ai");
    }

    #[test]
    fn test_builder_missing_base_url() {
        let result = HttpCallPlacer::builder().api_key("sk-test").build();
        assert!(matches!(result.unwrap_err(), Error::Config(_)));
    }

    #[test]
    fn test_builder_missing_api_key() {
        let result = HttpCallPlacer::builder()
            .base_url("https://api.vapi.ai")
            .build();
        assert!(matches!(result.unwrap_err(), Error::Config(_)));
    }

    #[test]
    fn test_from_env_missing() {
        std::env::remove_var("VOICE_API_URL");
        std::env::remove_var("VOICE_API_KEY");
        assert!(HttpCallPlacer::from_env().is_err());
    }

    #[test]
    fn test_body_wire_shape() {
        let request = CallRequest {
            customer_name: "Jordan Reyes".into(),
            phone_number: "+14155550000".into(),
            assistant_id: "asst_01".into(),
            phone_number_id: "line_01".into(),
            metadata: Some(serde_json::json!({"lead_id": "L-1042"})),
        };
        let body = PlaceCallBody {
            assistant_id: &request.assistant_id,
            phone_number_id: &request.phone_number_id,
            customer: Customer {
                name: &request.customer_name,
                number: &request.phone_number,
            },
            metadata: request.metadata.as_ref(),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["assistantId"], "asst_01");
        assert_eq!(json["phoneNumberId"], "line_01");
        assert_eq!(json["customer"]["number"], "+14155550000");
        assert_eq!(json["metadata"]["lead_id"], "L-1042");
    }
}

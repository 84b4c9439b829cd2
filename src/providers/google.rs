use async_trait::async_trait;
use reqwest::{Client, header};
use std::time::Duration;
use url::Url;

use super::{RetryPolicy, Translator, send_with_retry};
use crate::errors::ProviderError;

const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/106.0.0.0 Safari/537.36";

/// Client for the unauthenticated Google Translate web endpoint
#[derive(Debug)]
pub struct GoogleTranslate {
    client: Client,
    endpoint: String,
    source_language: String,
    retry: RetryPolicy,
}

impl GoogleTranslate {
    /// Create a new client; an empty `endpoint` uses the public one
    pub fn new(endpoint: impl Into<String>, retry: RetryPolicy, timeout_secs: u64) -> Self {
        let endpoint = endpoint.into();
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: if endpoint.is_empty() {
                DEFAULT_ENDPOINT.to_string()
            } else {
                endpoint
            },
            source_language: "auto".to_string(),
            retry,
        }
    }

    /// Build the request URL for one text
    ///
    /// The text is sent wrapped in double quotes, which keeps short fragments
    /// from being rephrased.
    pub fn request_url(&self, text: &str, target_language: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint {}: {}", self.endpoint, e)))?;

        url.query_pairs_mut()
            .append_pair("client", "gtx")
            .append_pair("dt", "t")
            .append_pair("sl", &self.source_language)
            .append_pair("tl", target_language)
            .append_pair("q", &format!("\"{}\"", text));

        Ok(url)
    }

    /// Join the translated segments of a response and drop every double quote
    pub fn extract_text(data: &serde_json::Value) -> Result<String, ProviderError> {
        let segments = data
            .get(0)
            .and_then(|v| v.as_array())
            .ok_or_else(|| ProviderError::ParseError("Unexpected Google response shape".to_string()))?;

        let joined: String = segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(|v| v.as_str()))
            .collect();

        Ok(joined.replace('"', ""))
    }
}

#[async_trait]
impl Translator for GoogleTranslate {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        let url = self.request_url(text, target_language)?;

        let response = send_with_retry(self.name(), self.retry, || {
            self.client
                .get(url.clone())
                .header(header::REFERER, "https://translate.google.com/")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded;charset=UTF-8")
                .header(header::USER_AGENT, USER_AGENT)
        })
        .await?;

        let data = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Google response: {}", e)))?;

        Self::extract_text(&data)
    }

    fn name(&self) -> &'static str {
        "Google"
    }
}

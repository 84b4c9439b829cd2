use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{RetryPolicy, Translator, send_with_retry};
use crate::errors::ProviderError;

const FREE_ENDPOINT: &str = "https://api-free.deepl.com";
const PRO_ENDPOINT: &str = "https://api.deepl.com";

/// DeepL client for the authenticated translation API
#[derive(Debug)]
pub struct DeepL {
    /// HTTP client for API requests
    client: Client,
    /// Auth key; free-tier keys end in `:fx`
    auth_key: String,
    /// API base URL without the `/v2/translate` path
    endpoint: String,
    retry: RetryPolicy,
}

/// DeepL translate request
#[derive(Debug, Serialize)]
pub struct DeepLRequest {
    /// Texts to translate
    text: Vec<String>,
    /// Target language code in DeepL form (e.g. `KO`, `ZH`)
    target_lang: String,
}

impl DeepLRequest {
    pub fn new(text: impl Into<String>, target_lang: impl Into<String>) -> Self {
        Self {
            text: vec![text.into()],
            target_lang: target_lang.into(),
        }
    }
}

/// DeepL translate response
#[derive(Debug, Deserialize)]
pub struct DeepLResponse {
    pub translations: Vec<DeepLTranslation>,
}

/// One translated text
#[derive(Debug, Deserialize)]
pub struct DeepLTranslation {
    #[serde(default)]
    pub detected_source_language: Option<String>,
    pub text: String,
}

impl DeepL {
    /// Create a new DeepL client
    ///
    /// An empty `endpoint` selects the free or pro API from the key suffix.
    pub fn new(auth_key: impl Into<String>, endpoint: impl Into<String>, retry: RetryPolicy, timeout_secs: u64) -> Self {
        let auth_key = auth_key.into();
        let endpoint = endpoint.into();
        let endpoint = if endpoint.is_empty() {
            Self::default_endpoint(&auth_key).to_string()
        } else {
            endpoint.trim_end_matches('/').to_string()
        };

        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            auth_key,
            endpoint,
            retry,
        }
    }

    /// Free-tier keys are only accepted by the free endpoint
    pub fn default_endpoint(auth_key: &str) -> &'static str {
        if auth_key.ends_with(":fx") {
            FREE_ENDPOINT
        } else {
            PRO_ENDPOINT
        }
    }

    /// Convert a configured language code to the form DeepL expects
    pub fn target_code(target_language: &str) -> String {
        let upper = target_language.to_uppercase();
        if upper.starts_with("ZH") {
            return "ZH".to_string();
        }
        upper
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a translate request
    pub async fn complete(&self, request: DeepLRequest) -> Result<DeepLResponse, ProviderError> {
        if self.auth_key.is_empty() {
            return Err(ProviderError::AuthenticationError(
                "DeepL auth key is not configured".to_string(),
            ));
        }

        let api_url = format!("{}/v2/translate", self.endpoint);
        let response = send_with_retry(self.name(), self.retry, || {
            self.client
                .post(&api_url)
                .header("Authorization", format!("DeepL-Auth-Key {}", self.auth_key))
                .json(&request)
        })
        .await?;

        response
            .json::<DeepLResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse DeepL response: {}", e)))
    }

    /// Extract the first translated text from a response
    pub fn extract_text(response: &DeepLResponse) -> Result<String, ProviderError> {
        response
            .translations
            .first()
            .map(|t| t.text.clone())
            .ok_or_else(|| ProviderError::ParseError("DeepL returned no translations".to_string()))
    }
}

#[async_trait]
impl Translator for DeepL {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        let request = DeepLRequest::new(text, Self::target_code(target_language));
        let response = self.complete(request).await?;
        Self::extract_text(&response)
    }

    fn name(&self) -> &'static str {
        "DeepL"
    }
}

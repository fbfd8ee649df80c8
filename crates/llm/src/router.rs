use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use textbrief_common::logger::mask_secret;
use textbrief_common::{AppConfig, Result, TextBriefError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::adapter::{ProviderAdapter, UpstreamCall};
use crate::budget::BudgetPolicy;
use crate::prompts::{normalize, system_prompt};
use crate::providers::{AnthropicAdapter, ChatCompletionsAdapter};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::{NormalizedPrompt, ProviderCredentials, SummarizationRequest};

/// Routes a normalized prompt to the adapter registered for the selected provider.
///
/// Exactly one outbound call per invocation. No retries, no caching.
pub struct ProviderRouter {
    adapters: BTreeMap<&'static str, Arc<dyn ProviderAdapter>>,
    transport: Arc<dyn HttpTransport>,
    budget: BudgetPolicy,
    timeout: Duration,
    temperature: f32,
}

impl ProviderRouter {
    /// Create an empty router; vendors are added with [`ProviderRouter::register`]
    pub fn new(transport: Arc<dyn HttpTransport>, budget: BudgetPolicy, timeout: Duration) -> Self {
        Self {
            adapters: BTreeMap::new(),
            transport,
            budget,
            timeout,
            temperature: 0.7,
        }
    }

    /// Router over reqwest with the three built-in vendors
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.request_timeout())?);
        let router = Self::new(transport, BudgetPolicy::from_config(config), config.request_timeout())
            .with_temperature(config.summary_temperature)
            .register(ChatCompletionsAdapter::openai(
                config.openai_api_url.clone(),
                config.openai_model.clone(),
            ))
            .register(ChatCompletionsAdapter::mistral(
                config.mistral_api_url.clone(),
                config.mistral_model.clone(),
            ))
            .register(AnthropicAdapter::new(
                config.anthropic_api_url.clone(),
                config.anthropic_model.clone(),
                config.anthropic_version.clone(),
            ));

        info!("Provider router initialized: {:?}", router.providers());
        Ok(router)
    }

    /// Add (or replace) the adapter for `adapter.id()`
    pub fn register<A: ProviderAdapter + 'static>(mut self, adapter: A) -> Self {
        self.adapters.insert(adapter.id(), Arc::new(adapter));
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Registered provider identifiers, sorted
    pub fn providers(&self) -> Vec<&'static str> {
        self.adapters.keys().copied().collect()
    }

    /// Normalize `request` and execute it
    pub async fn summarize(
        &self,
        credentials: &ProviderCredentials,
        request: &SummarizationRequest,
        cancel: CancellationToken,
    ) -> Result<String> {
        let prompt = normalize(request);
        self.execute_with_cancel(credentials, &prompt, request, cancel)
            .await
    }

    /// Execute without an external cancellation source
    pub async fn execute(
        &self,
        credentials: &ProviderCredentials,
        prompt: &NormalizedPrompt,
        request: &SummarizationRequest,
    ) -> Result<String> {
        self.execute_with_cancel(credentials, prompt, request, CancellationToken::new())
            .await
    }

    /// Execute, racing the upstream call against the timeout and `cancel`
    pub async fn execute_with_cancel(
        &self,
        credentials: &ProviderCredentials,
        prompt: &NormalizedPrompt,
        request: &SummarizationRequest,
        cancel: CancellationToken,
    ) -> Result<String> {
        if credentials.api_key.trim().is_empty() {
            return Err(TextBriefError::MissingCredentials);
        }

        let adapter = self
            .adapters
            .get(credentials.provider.as_str())
            .ok_or_else(|| TextBriefError::UnsupportedProvider(credentials.provider.clone()))?;

        let call = UpstreamCall {
            system: system_prompt(request.mode),
            prompt,
            max_tokens: self.budget.budget_for(request),
            temperature: (!request.mode.is_grammar()).then_some(self.temperature),
        };

        info!(
            "Calling provider - Provider: {}, Mode: {}, Key: {}, Prompt length: {}, Max tokens: {}",
            adapter.id(),
            request.mode,
            mask_secret(&credentials.api_key),
            prompt.as_str().len(),
            call.max_tokens
        );

        let upstream = adapter.build_request(&credentials.api_key, &call)?;

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Provider call cancelled - Provider: {}", adapter.id());
                return Err(TextBriefError::Cancelled);
            }
            sent = tokio::time::timeout(self.timeout, self.transport.send(upstream)) => {
                sent.map_err(|_| {
                    warn!("Provider call timed out - Provider: {}, Timeout: {:?}", adapter.id(), self.timeout);
                    TextBriefError::Timeout(self.timeout)
                })??
            }
        };

        if !response.is_success() {
            let message = adapter
                .extract_error(&response.body)
                .unwrap_or_else(|| format!("HTTP {}", response.status));
            warn!(
                "Provider returned error - Provider: {}, Status: {}, Message: {}",
                adapter.id(),
                response.status,
                message
            );
            return Err(TextBriefError::upstream(adapter.id(), response.status, message));
        }

        let body: serde_json::Value = serde_json::from_str(&response.body).map_err(|e| {
            TextBriefError::malformed(format!("{}: response is not JSON: {}", adapter.id(), e))
        })?;

        let result = adapter.extract_result(&body)?;
        debug!("Provider result received - Provider: {}, Length: {}", adapter.id(), result.len());

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{UpstreamRequest, UpstreamResponse};
    use crate::providers::{ANTHROPIC, MISTRAL, OPENAI};
    use crate::transport::HttpTransport;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Returns a canned response and records every request
    struct StubTransport {
        status: u16,
        body: String,
        seen: Mutex<Vec<UpstreamRequest>>,
    }

    impl StubTransport {
        fn new(status: u16, body: impl Into<String>) -> Arc<Self> {
            Arc::new(Self {
                status,
                body: body.into(),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<UpstreamRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpTransport for StubTransport {
        async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse> {
            self.seen.lock().unwrap().push(request);
            Ok(UpstreamResponse {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }

    /// Never answers
    struct HangingTransport;

    #[async_trait]
    impl HttpTransport for HangingTransport {
        async fn send(&self, _request: UpstreamRequest) -> Result<UpstreamResponse> {
            std::future::pending().await
        }
    }

    /// Reflects the request body back as a 200 response
    struct MirrorTransport;

    #[async_trait]
    impl HttpTransport for MirrorTransport {
        async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse> {
            Ok(UpstreamResponse {
                status: 200,
                body: request.body.to_string(),
            })
        }
    }

    /// Vendor whose result is the prompt it was sent
    struct EchoAdapter;

    impl ProviderAdapter for EchoAdapter {
        fn id(&self) -> &'static str {
            "echo"
        }

        fn build_request(&self, _api_key: &str, call: &UpstreamCall<'_>) -> Result<UpstreamRequest> {
            Ok(UpstreamRequest {
                url: "http://echo.test".to_string(),
                headers: Vec::new(),
                body: json!({ "prompt": call.prompt.as_str() }),
            })
        }

        fn extract_result(&self, body: &Value) -> Result<String> {
            body["prompt"]
                .as_str()
                .map(String::from)
                .ok_or_else(|| TextBriefError::malformed("echo: missing prompt"))
        }
    }

    fn router_with(transport: Arc<dyn HttpTransport>) -> ProviderRouter {
        let config = AppConfig::default();
        ProviderRouter::new(transport, BudgetPolicy::default(), Duration::from_millis(200))
            .register(ChatCompletionsAdapter::openai(config.openai_api_url, config.openai_model))
            .register(ChatCompletionsAdapter::mistral(config.mistral_api_url, config.mistral_model))
            .register(AnthropicAdapter::new(
                config.anthropic_api_url,
                config.anthropic_model,
                config.anthropic_version,
            ))
    }

    fn bullet_request() -> SummarizationRequest {
        SummarizationRequest::new("The cat sat.", "bullet", 0.25, None).unwrap()
    }

    #[tokio::test]
    async fn test_openai_success() {
        let transport = StubTransport::new(
            200,
            r#"{"choices":[{"message":{"role":"assistant","content":"- A cat sat"}}]}"#,
        );
        let router = router_with(transport.clone());
        let request = bullet_request();

        let result = router
            .summarize(&ProviderCredentials::new(OPENAI, "sk-1"), &request, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result, "- A cat sat");
        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].url, "https://api.openai.com/v1/chat/completions");
        // floor(12 * 0.25)
        assert_eq!(calls[0].body["max_tokens"], 3);
        assert_eq!(calls[0].body["messages"][0]["content"], crate::prompts::SUMMARY_SYSTEM_PROMPT);
    }

    #[tokio::test]
    async fn test_anthropic_grammar_uses_fixed_budget_and_editor_persona() {
        let transport = StubTransport::new(200, r#"{"content":[{"type":"text","text":"Looks good."}]}"#);
        let router = router_with(transport.clone());
        let request = SummarizationRequest::grammar("Their going home.").unwrap();
        let prompt = normalize(&request);

        let result = router
            .execute(&ProviderCredentials::new(ANTHROPIC, "ak-1"), &prompt, &request)
            .await
            .unwrap();

        assert_eq!(result, "Looks good.");
        let call = &transport.calls()[0];
        assert_eq!(call.body["max_tokens"], 1024);
        assert_eq!(call.body["system"], crate::prompts::GRAMMAR_SYSTEM_PROMPT);
        assert!(call.body.get("temperature").is_none());
    }

    #[tokio::test]
    async fn test_unsupported_provider() {
        let transport = StubTransport::new(200, "{}");
        let router = router_with(transport.clone());
        let request = bullet_request();

        for provider in ["cohere", "OpenAI", ""] {
            let err = router
                .execute(&ProviderCredentials::new(provider, "key"), &normalize(&request), &request)
                .await
                .unwrap_err();
            assert!(matches!(err, TextBriefError::UnsupportedProvider(p) if p == provider));
        }
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let transport = StubTransport::new(200, "{}");
        let router = router_with(transport.clone());
        let request = bullet_request();

        let err = router
            .execute(&ProviderCredentials::new(MISTRAL, "  "), &normalize(&request), &request)
            .await
            .unwrap_err();
        assert!(matches!(err, TextBriefError::MissingCredentials));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_401_is_propagated() {
        let transport = StubTransport::new(
            401,
            r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#,
        );
        let router = router_with(transport.clone());
        let request = bullet_request();

        let err = router
            .execute(&ProviderCredentials::new(OPENAI, "bad"), &normalize(&request), &request)
            .await
            .unwrap_err();

        match err {
            TextBriefError::Upstream {
                provider,
                status,
                message,
            } => {
                assert_eq!(provider, "openai");
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // no retry
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_result_field_is_malformed() {
        for (provider, body) in [
            (OPENAI, r#"{"choices":[]}"#),
            (MISTRAL, r#"{"choices":[{"message":{}}]}"#),
            (ANTHROPIC, r#"{"content":[]}"#),
            (OPENAI, "not json"),
        ] {
            let router = router_with(StubTransport::new(200, body));
            let request = bullet_request();
            let err = router
                .execute(&ProviderCredentials::new(provider, "k"), &normalize(&request), &request)
                .await
                .unwrap_err();
            assert!(
                matches!(err, TextBriefError::MalformedUpstreamResponse(_)),
                "{provider} {body}: {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_timeout() {
        let router = router_with(Arc::new(HangingTransport));
        let request = bullet_request();

        let err = router
            .execute(&ProviderCredentials::new(OPENAI, "k"), &normalize(&request), &request)
            .await
            .unwrap_err();
        assert!(matches!(err, TextBriefError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_cancellation() {
        let router = router_with(Arc::new(HangingTransport));
        let request = bullet_request();
        let token = CancellationToken::new();

        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });

        let err = router
            .summarize(&ProviderCredentials::new(OPENAI, "k"), &request, token)
            .await
            .unwrap_err();
        assert!(matches!(err, TextBriefError::Cancelled));
    }

    #[tokio::test]
    async fn test_registered_echo_vendor_end_to_end() {
        let router = router_with(Arc::new(MirrorTransport)).register(EchoAdapter);
        assert_eq!(router.providers(), vec!["anthropic", "echo", "mistral", "openai"]);

        let request = bullet_request();
        let result = router
            .summarize(&ProviderCredentials::new("echo", "k"), &request, CancellationToken::new())
            .await
            .unwrap();

        assert!(result.contains("few key points"));
        assert!(result.contains("The cat sat."));
    }
}

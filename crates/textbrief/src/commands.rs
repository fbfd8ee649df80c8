use std::path::Path;

use textbrief_common::logger::mask_secret;
use textbrief_common::{AppConfig, Result, TextBriefError};
use textbrief_extract::DocumentExtractor;
use textbrief_llm::{CancellationToken, ProviderCredentials, ProviderRouter, SummarizationRequest, TextStats};
use tracing::info;

use crate::context::{ApiSettings, ClientContext, HistoryEntry};

/// Where the input text comes from
#[derive(Debug, Clone)]
pub enum Input {
    Text(String),
    File(std::path::PathBuf),
    Stdin,
}

/// Provider overrides given on the command line
#[derive(Debug, Clone, Default)]
pub struct ProviderOverride {
    pub provider: Option<String>,
    pub api_key: Option<String>,
}

/// Resolve the input into plain text, extracting documents when needed
pub async fn read_input(config: &AppConfig, input: Input) -> Result<String> {
    match input {
        Input::Text(text) => Ok(text),
        Input::File(path) => extract_file(config, &path).await,
        Input::Stdin => Ok(std::io::read_to_string(std::io::stdin())?),
    }
}

/// Extract text from a local document
pub async fn extract_file(config: &AppConfig, path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    DocumentExtractor::new(config.extraction_timeout())
        .extract(bytes, &name, None)
        .await
}

/// Saved settings, overridden field by field from the command line
pub fn credentials(settings: &ApiSettings, overrides: ProviderOverride) -> Result<ProviderCredentials> {
    let provider = overrides.provider.unwrap_or_else(|| settings.provider.clone());
    let api_key = overrides.api_key.unwrap_or_else(|| settings.api_key.clone());

    if api_key.trim().is_empty() {
        return Err(TextBriefError::MissingCredentials);
    }

    Ok(ProviderCredentials::new(provider, api_key))
}

/// Run one summarization (or grammar check) and record it in history
pub async fn run_request(
    config: &AppConfig,
    context: &mut ClientContext,
    request: SummarizationRequest,
    overrides: ProviderOverride,
    cancel: CancellationToken,
) -> Result<String> {
    let credentials = credentials(&context.settings, overrides)?;
    let router = ProviderRouter::from_config(config)?;

    let stats = TextStats::of(&request.text);
    info!("Input: {} words, {} sentences", stats.words, stats.sentences);

    let output = router.summarize(&credentials, &request, cancel).await?;

    context.history.record(HistoryEntry::new(
        request.text,
        output.clone(),
        request.mode.as_str(),
    ));
    context.save()?;

    Ok(output)
}

/// Replace saved settings
pub fn set_settings(context: &mut ClientContext, provider: String, api_key: String) -> Result<()> {
    if api_key.trim().is_empty() {
        return Err(TextBriefError::MissingCredentials);
    }

    context.settings = ApiSettings { provider, api_key };
    context.save()?;
    info!(
        "Settings saved - Provider: {}, Key: {}",
        context.settings.provider,
        mask_secret(&context.settings.api_key)
    );
    Ok(())
}

/// Human-readable settings with the key masked
pub fn describe_settings(settings: &ApiSettings) -> String {
    let key = if settings.api_key.is_empty() {
        "(not set)".to_string()
    } else {
        mask_secret(&settings.api_key)
    };
    format!("provider: {}\napi key:  {}", settings.provider, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_overrides() {
        let saved = ApiSettings {
            provider: "anthropic".into(),
            api_key: "ak-saved".into(),
        };

        let creds = credentials(&saved, ProviderOverride::default()).unwrap();
        assert_eq!(creds, ProviderCredentials::new("anthropic", "ak-saved"));

        let creds = credentials(
            &saved,
            ProviderOverride {
                provider: Some("openai".into()),
                api_key: Some("sk-flag".into()),
            },
        )
        .unwrap();
        assert_eq!(creds, ProviderCredentials::new("openai", "sk-flag"));
    }

    #[test]
    fn test_credentials_require_key() {
        assert!(matches!(
            credentials(&ApiSettings::default(), ProviderOverride::default()),
            Err(TextBriefError::MissingCredentials)
        ));
    }

    #[test]
    fn test_set_settings_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut context = ClientContext::load(dir.path()).unwrap();

        set_settings(&mut context, "openai".into(), "sk-123456".into()).unwrap();
        assert!(set_settings(&mut context, "openai".into(), " ".into()).is_err());

        let reloaded = ClientContext::load(dir.path()).unwrap();
        assert_eq!(reloaded.settings.provider, "openai");
        assert_eq!(describe_settings(&reloaded.settings), "provider: openai\napi key:  ****3456");
    }

    #[tokio::test]
    async fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        std::fs::write(&path, "hello").unwrap();

        let text = read_input(&AppConfig::default(), Input::File(path)).await.unwrap();
        assert_eq!(text, "hello");
    }
}

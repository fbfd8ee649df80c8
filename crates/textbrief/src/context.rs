use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use textbrief_common::Result;
use tracing::warn;
use uuid::Uuid;

/// Most recent entries kept in history
pub const MAX_HISTORY: usize = 10;

const SETTINGS_FILE: &str = "settings.json";
const HISTORY_FILE: &str = "history.json";

/// Saved provider selection, same shape as the browser's `apiSettings` blob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSettings {
    pub provider: String,
    pub api_key: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            provider: "mistral".to_string(),
            api_key: String::new(),
        }
    }
}

/// One finished summarization or grammar check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub input_text: String,
    pub output_text: String,
    pub mode: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl HistoryEntry {
    pub fn new(input_text: String, output_text: String, mode: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            input_text,
            output_text,
            mode: mode.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Newest-first list capped at [`MAX_HISTORY`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(MAX_HISTORY);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Client-side state passed explicitly into every command
#[derive(Debug, Clone)]
pub struct ClientContext {
    pub settings: ApiSettings,
    pub history: History,
    dir: PathBuf,
}

impl ClientContext {
    /// Load settings and history from `dir`; missing files yield defaults and
    /// unreadable JSON is discarded with a warning
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            settings: read_json(&dir.join(SETTINGS_FILE))?.unwrap_or_default(),
            history: read_json(&dir.join(HISTORY_FILE))?.unwrap_or_default(),
            dir: dir.to_path_buf(),
        })
    }

    pub fn save(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        fs::write(
            self.dir.join(SETTINGS_FILE),
            serde_json::to_string_pretty(&self.settings)?,
        )?;
        fs::write(
            self.dir.join(HISTORY_FILE),
            serde_json::to_string_pretty(&self.history)?,
        )?;
        Ok(())
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let data = fs::read_to_string(path)?;
    match serde_json::from_str(&data) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!("Ignoring unreadable {}: {}", path.display(), e);
            Ok(None)
        }
    }
}

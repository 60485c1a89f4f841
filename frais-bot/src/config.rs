use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Runtime configuration, layered from an optional TOML file and the
/// process environment (`TELEGRAM_TOKEN`, `GOOGLE_APPLICATION_CREDENTIALS`).
/// Environment values override the file.
#[derive(Debug, Deserialize, Clone)]
pub struct BotConfig {
    /// Bot API token. Required: the process refuses to start without it.
    pub telegram_token: Option<String>,
    /// OCR credentials as a JSON blob. Optional: when absent or unparsable
    /// the bot keeps running with OCR disabled.
    pub google_application_credentials: Option<String>,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub poll: PollConfig,
}

/// OCR call policy. Retries are deliberately a visible knob; the default
/// performs none.
#[derive(Debug, Deserialize, Clone)]
pub struct OcrConfig {
    #[serde(default = "default_ocr_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub max_retries: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_ocr_timeout_secs(),
            max_retries: 0,
        }
    }
}

fn default_ocr_timeout_secs() -> u64 {
    20
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollConfig {
    /// Long-poll timeout passed to the update fetch.
    #[serde(default = "default_poll_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_poll_timeout_secs(),
        }
    }
}

fn default_poll_timeout_secs() -> u64 {
    30
}

/// Contents of the OCR credentials JSON blob.
#[derive(Debug, Clone, Deserialize)]
pub struct VisionCredentials {
    pub api_key: String,
}

impl BotConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let path = config_path
            .map(PathBuf::from)
            .unwrap_or_else(default_config_path);

        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::default())
            .build()?
            .try_deserialize()
    }

    /// Parses the OCR credentials blob. Returns `None` (after logging) when
    /// the blob is absent or unparsable, so OCR degrades instead of the
    /// whole process failing.
    pub fn vision_credentials(&self) -> Option<VisionCredentials> {
        let raw = self.google_application_credentials.as_deref()?;
        match serde_json::from_str(raw) {
            Ok(credentials) => Some(credentials),
            Err(e) => {
                tracing::error!("Failed to parse OCR credentials JSON: {e}");
                None
            }
        }
    }
}

pub fn default_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("frais").join("bot.toml")
    } else {
        PathBuf::from("bot.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn config_from_toml(raw: &str) -> BotConfig {
        Config::builder()
            .add_source(File::from_str(raw, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_apply_without_optional_sections() {
        let config = config_from_toml("telegram_token = \"tok\"");
        assert_eq!(config.telegram_token.as_deref(), Some("tok"));
        assert_eq!(config.ocr.timeout_secs, 20);
        assert_eq!(config.ocr.max_retries, 0);
        assert_eq!(config.poll.timeout_secs, 30);
    }

    #[test]
    fn test_ocr_policy_is_tunable() {
        let config = config_from_toml(
            "telegram_token = \"tok\"\n[ocr]\ntimeout_secs = 5\nmax_retries = 2\n",
        );
        assert_eq!(config.ocr.timeout_secs, 5);
        assert_eq!(config.ocr.max_retries, 2);
    }

    #[test]
    fn test_vision_credentials_parse() {
        let mut config = config_from_toml("telegram_token = \"tok\"");
        config.google_application_credentials =
            Some("{\"api_key\": \"secret\"}".to_string());
        assert_eq!(config.vision_credentials().unwrap().api_key, "secret");
    }

    #[test]
    fn test_invalid_credentials_blob_degrades_to_none() {
        let mut config = config_from_toml("telegram_token = \"tok\"");
        config.google_application_credentials = Some("not json".to_string());
        assert!(config.vision_credentials().is_none());

        config.google_application_credentials = None;
        assert!(config.vision_credentials().is_none());
    }
}

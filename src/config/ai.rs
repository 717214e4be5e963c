use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

pub const DEFAULT_AI_CONFIG_PATH: &str = "config/ai.json";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_MODEL: &str = "OPENAI_MODEL";

fn default_provider() -> String {
    "openai".to_string()
}
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

/// Settings for the translation/summary collaborator.
///
/// The credential lives here and is handed to the client at construction;
/// nothing below `main` reads it from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Only "openai" is supported.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// "ENV" means: read from OPENAI_API_KEY.
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl AiConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading ai config from {}", path.display()))?;
        let mut cfg: AiConfig = serde_json::from_str(&data)
            .with_context(|| format!("parsing ai config {}", path.display()))?;

        cfg.provider = cfg.provider.trim().to_lowercase();
        if cfg.provider != "openai" {
            bail!("Unsupported provider in config: {}", cfg.provider);
        }

        if cfg.api_key.trim().eq_ignore_ascii_case("env") {
            cfg.api_key = env::var(ENV_OPENAI_API_KEY)
                .map_err(|_| anyhow!("Missing {ENV_OPENAI_API_KEY} env var"))?;
        }

        cfg.validate()
    }

    /// Build from OPENAI_API_KEY / OPENAI_MODEL.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(ENV_OPENAI_API_KEY)
            .map_err(|_| anyhow!("Missing {ENV_OPENAI_API_KEY} env var"))?;
        let model = env::var(ENV_OPENAI_MODEL)
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(default_model);
        Self {
            provider: default_provider(),
            api_key,
            model,
            timeout_secs: default_timeout_secs(),
        }
        .validate()
    }

    /// `config/ai.json` when present, otherwise the environment.
    pub fn load_default() -> Result<Self> {
        let p = Path::new(DEFAULT_AI_CONFIG_PATH);
        if p.exists() {
            Self::load_from_file(p)
        } else {
            Self::from_env()
        }
    }

    fn validate(mut self) -> Result<Self> {
        self.api_key = self.api_key.trim().to_string();
        if self.api_key.is_empty() {
            bail!("annotator credential is empty; refusing to run");
        }
        if self.model.trim().is_empty() {
            self.model = default_model();
        }
        if self.timeout_secs == 0 {
            self.timeout_secs = default_timeout_secs();
        }
        Ok(self)
    }
}

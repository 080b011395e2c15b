use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Environment variable that overrides `model.path`.
pub const MODEL_PATH_ENV: &str = "DIGITREC_MODEL_PATH";

#[derive(Deserialize, Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ModelConfig {
    pub path: String,
    /// Multiplier applied to raw 0-255 pixels before they reach the model.
    #[serde(default = "default_input_scale")]
    pub input_scale: f32,
}

fn default_input_scale() -> f32 {
    1.0
}

impl AppConfig {
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Reads the YAML file at `path` and applies environment overrides.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config.with_model_path_override(std::env::var(MODEL_PATH_ENV).ok()))
    }

    pub fn with_model_path_override(mut self, model_path: Option<String>) -> Self {
        if let Some(path) = model_path.filter(|p| !p.is_empty()) {
            self.model.path = path;
        }
        self
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

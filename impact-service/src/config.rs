use serde::Deserialize;
use std::{fs, path::Path};

use crate::engine::{Baseline, EngineOptions, ImpactEngine};

const DEFAULT_CONFIG_PATH: &str = "impact-config.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub uri: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    4
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineOptions,
    #[serde(default)]
    pub baseline: Baseline,
    pub database: Option<DatabaseConfig>,
}

impl AppConfig {
    /// Load from `IMPACT_CONFIG`, or from `impact-config.toml` when present.
    ///
    /// With neither, the built-in defaults apply.
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = match env::var("IMPACT_CONFIG") {
            Ok(path) => path,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => DEFAULT_CONFIG_PATH.to_string(),
            Err(_) => {
                tracing::info!("no config file found, using defaults");
                return Ok(Self::default());
            }
        };

        let contents = fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("failed to read config '{path}': {e}"))?;
        let cfg = Self::from_toml_str(&contents)?;
        tracing::info!(path = %path, "loaded config");
        Ok(cfg)
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        Ok(cfg)
    }

    pub fn build_engine(&self) -> anyhow::Result<ImpactEngine> {
        Ok(ImpactEngine::new(self.baseline.clone(), self.engine.clone())?)
    }
}

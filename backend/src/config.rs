//! Service configuration.
//!
//! Loaded from an optional YAML file, then overridden by command-line flags
//! and their environment variables (`CXP_*`).

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub payables: PayablesConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
    /// Built frontend served as fallback when set
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            cors_origin: default_cors_origin(),
            static_dir: None,
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

fn default_cors_origin() -> String {
    "http://localhost:8080".to_string()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PayablesConfig {
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,
}

impl Default for PayablesConfig {
    fn default() -> Self {
        Self {
            tax_rate: default_tax_rate(),
        }
    }
}

fn default_tax_rate() -> f64 {
    shared::DEFAULT_TAX_RATE
}

/// Values coming from flags or `CXP_*` environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvOverride {
    pub data_dir: Option<PathBuf>,
    pub bind_addr: Option<SocketAddr>,
    pub cors_origin: Option<String>,
    pub tax_rate: Option<f64>,
}

impl Config {
    pub fn load_config(path: Option<impl AsRef<Path>>, env_override: EnvOverride) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(config_path) => {
                let config_file = std::fs::read_to_string(config_path.as_ref()).with_context(|| {
                    format!("Couldn't read config file {}", config_path.as_ref().display())
                })?;
                Self::from_yaml(&config_file)?
            }
            None => Config::default(),
        };

        config.apply_env_override(env_override);
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(contents: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(contents).context("Couldn't parse config file")
    }

    fn apply_env_override(&mut self, env_override: EnvOverride) {
        let EnvOverride {
            data_dir,
            bind_addr,
            cors_origin,
            tax_rate,
        } = env_override;

        if let Some(data_dir) = data_dir {
            self.storage.data_dir = data_dir;
        }
        if let Some(bind_addr) = bind_addr {
            self.server.bind_addr = bind_addr;
        }
        if let Some(cors_origin) = cors_origin {
            self.server.cors_origin = cors_origin;
        }
        if let Some(tax_rate) = tax_rate {
            self.payables.tax_rate = tax_rate;
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        let rate = self.payables.tax_rate;
        if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
            anyhow::bail!("Tax rate must be between 0 and 1, got {}", rate);
        }
        Ok(())
    }
}

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use locator::features::DEFAULT_OVERPASS_URL;
use locator::geocoding::DEFAULT_NOMINATIM_URL;
use locator::geometry::{BUFFER_VERTICES, DEFAULT_BUFFER_RADIUS_M};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub buffer: BufferConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct UpstreamConfig {
    pub nominatim_url: String,
    pub overpass_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BufferConfig {
    pub radius_m: f64,
    pub vertices: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:3000".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            user_agent: "BusinessLocator/1.0".to_string(),
            timeout_secs: 20,
        }
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_BUFFER_RADIUS_M,
            vertices: BUFFER_VERTICES,
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.upstream.timeout_secs == 0 {
            anyhow::bail!("upstream.timeout_secs must be at least 1");
        }
        if !self.buffer.radius_m.is_finite() || self.buffer.radius_m <= 0.0 {
            anyhow::bail!("buffer.radius_m must be positive");
        }
        if self.buffer.vertices < 3 {
            anyhow::bail!("buffer.vertices must be at least 3");
        }
        Ok(())
    }
}

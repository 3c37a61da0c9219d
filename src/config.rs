use serde::Deserialize;
use std::time::Duration;
use crate::error::{Result, VerifyError};

pub const DEFAULT_BASE_URL: &str = "https://dapi.kakao.com";
pub const DEFAULT_THRESHOLD: u8 = 80;

/// Plain environment variable consulted when no key is configured.
pub const FALLBACK_KEY_VAR: &str = "KAKAO_API_KEY";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub geocoder: GeocoderConfig,
    pub validation: ValidationConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeocoderConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ValidationConfig {
    pub threshold: u8,
    pub concurrency: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    pub output_path: String,
}

impl Config {
    /// Layered load: compiled defaults, then the optional file at `path`,
    /// then `CONFIRM_*` environment variables.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let config = config::Config::builder()
            .set_default("geocoder.base_url", DEFAULT_BASE_URL)?
            .set_default("geocoder.timeout_secs", 5_i64)?
            .set_default("validation.threshold", DEFAULT_THRESHOLD as i64)?
            .set_default("validation.concurrency", 1_i64)?
            .set_default("report.output_path", "audit_results.xlsx")?
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("CONFIRM")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate().map_err(|e| anyhow::anyhow!(e.to_string()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.validation.threshold) {
            return Err(VerifyError::Config(format!(
                "validation.threshold must be between 1 and 100, got {}",
                self.validation.threshold
            )));
        }
        if self.validation.concurrency == 0 {
            return Err(VerifyError::Config(
                "validation.concurrency must be at least 1".to_string(),
            ));
        }
        if self.geocoder.timeout_secs == 0 {
            return Err(VerifyError::Config(
                "geocoder.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply command-line overrides and re-check the result.
    pub fn with_overrides(mut self, threshold: Option<u8>, concurrency: Option<usize>) -> Result<Self> {
        if let Some(threshold) = threshold {
            self.validation.threshold = threshold;
        }
        if let Some(concurrency) = concurrency {
            self.validation.concurrency = concurrency;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn api_key(&self) -> Result<String> {
        resolve_api_key(
            self.geocoder.api_key.as_deref(),
            std::env::var(FALLBACK_KEY_VAR).ok(),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.geocoder.timeout_secs)
    }
}

fn resolve_api_key(configured: Option<&str>, fallback: Option<String>) -> Result<String> {
    configured
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .or_else(|| {
            fallback
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty())
        })
        .ok_or_else(|| {
            VerifyError::MissingCredential(format!(
                "geocoding API key not found; set geocoder.api_key, CONFIRM_GEOCODER__API_KEY or {}",
                FALLBACK_KEY_VAR
            ))
        })
}

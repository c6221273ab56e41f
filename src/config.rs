use crate::error::AppError;
use crate::estimate::DEFAULT_EXCHANGE_RATE_JPY;
use crate::models::{PaymentPlan, Region};
use crate::projection::DEFAULT_HORIZON_MONTHS;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

pub const APP_NAME: &str = "logcost";
pub const DEFAULT_SHARE_BASE_URL: &str = "https://logcost.example.com/";

fn app_home_dir() -> Result<PathBuf, AppError> {
    if let Ok(custom) = std::env::var("LOGCOST_HOME") {
        return Ok(PathBuf::from(custom));
    }

    if let Some(dirs) = ProjectDirs::from("com", APP_NAME, APP_NAME) {
        let candidate = dirs.data_local_dir().to_path_buf();
        if fs::create_dir_all(&candidate).is_ok() {
            return Ok(candidate);
        }
    }

    let cwd = std::env::current_dir()?;
    Ok(cwd.join(".logcost"))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub default_plan: PaymentPlan,
    pub default_region: Region,
    pub horizon_months: u32,
    pub exchange_rate_jpy: f64,
    pub share_base_url: String,
    pub rate_overrides: RateOverrides,
}

/// Replacements for built-in rates. Unset fields keep the built-in value.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RateOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_annual_per_million: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_monthly_per_million: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingestion_per_gb: Option<f64>,
    pub retention: Vec<RetentionOverride>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetentionOverride {
    pub region: Region,
    pub plan: PaymentPlan,
    pub days: u32,
    pub per_million: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_plan: PaymentPlan::Annual,
            default_region: Region::Us,
            horizon_months: DEFAULT_HORIZON_MONTHS,
            exchange_rate_jpy: DEFAULT_EXCHANGE_RATE_JPY,
            share_base_url: DEFAULT_SHARE_BASE_URL.into(),
            rate_overrides: RateOverrides::default(),
        }
    }
}

impl AppConfig {
    pub fn share_base_url(&self) -> Result<Url, AppError> {
        Url::parse(&self.share_base_url).map_err(|e| {
            AppError::Config(format!(
                "Invalid share_base_url '{}': {e}",
                self.share_base_url
            ))
        })
    }
}

pub fn config_dir() -> Result<PathBuf, AppError> {
    Ok(app_home_dir()?.join("config"))
}

pub fn config_path() -> Result<PathBuf, AppError> {
    Ok(config_dir()?.join("config.toml"))
}

pub fn ensure_dirs() -> Result<(), AppError> {
    fs::create_dir_all(config_dir()?)?;
    Ok(())
}

fn normalize_config(config: &mut AppConfig) -> Result<bool, AppError> {
    let mut changed = false;

    let trimmed = config.share_base_url.trim();
    if trimmed != config.share_base_url {
        config.share_base_url = trimmed.to_string();
        changed = true;
    }
    config.share_base_url()?;

    if config.horizon_months == 0 {
        return Err(AppError::Config(
            "horizon_months must be at least 1.".into(),
        ));
    }
    if !config.exchange_rate_jpy.is_finite() || config.exchange_rate_jpy <= 0.0 {
        return Err(AppError::Config(format!(
            "exchange_rate_jpy must be a positive number, got {}.",
            config.exchange_rate_jpy
        )));
    }

    let before = config.rate_overrides.retention.len();
    let mut seen: Vec<(Region, PaymentPlan, u32)> = Vec::new();
    config.rate_overrides.retention.retain(|ov| {
        let key = (ov.region, ov.plan, ov.days);
        if seen.contains(&key) {
            false
        } else {
            seen.push(key);
            true
        }
    });
    if config.rate_overrides.retention.len() != before {
        changed = true;
    }

    Ok(changed)
}

pub fn load_config() -> Result<AppConfig, AppError> {
    let path = config_path()?;
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(AppConfig::default());
    }

    let raw = fs::read_to_string(&path)?;
    let mut parsed: AppConfig = toml::from_str(&raw)?;

    // Persist the normalized form so later reads see the same values.
    if normalize_config(&mut parsed)? {
        info!(path = %path.display(), "rewrote normalized config");
        save_config(&parsed)?;
    }

    Ok(parsed)
}

pub fn save_config(config: &AppConfig) -> Result<(), AppError> {
    ensure_dirs()?;
    let path = config_path()?;
    let raw = toml::to_string_pretty(config)?;
    fs::write(path, raw)?;
    Ok(())
}

pub fn ensure_initialized() -> Result<PathBuf, AppError> {
    ensure_dirs()?;
    let cfg_path = config_path()?;
    if !Path::new(&cfg_path).exists() {
        save_config(&AppConfig::default())?;
        info!(path = %cfg_path.display(), "wrote default config");
    }
    Ok(cfg_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let cfg = AppConfig::default();
        let raw = toml::to_string_pretty(&cfg).unwrap();
        let parsed: AppConfig = toml::from_str(&raw).unwrap();
        assert_eq!(parsed, cfg);
        assert!(raw.contains("default_plan = \"annual\""));
        assert!(raw.contains("default_region = \"US\""));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let parsed: AppConfig = toml::from_str(
            r#"
            default_plan = "monthly"

            [[rate_overrides.retention]]
            region = "AP"
            plan = "annual"
            days = 60
            per_million = 5.0
            "#,
        )
        .unwrap();
        assert_eq!(parsed.default_plan, PaymentPlan::Monthly);
        assert_eq!(parsed.default_region, Region::Us);
        assert_eq!(parsed.horizon_months, DEFAULT_HORIZON_MONTHS);
        assert_eq!(parsed.rate_overrides.retention.len(), 1);
        assert!(parsed.rate_overrides.ingestion_per_gb.is_none());
    }

    #[test]
    fn normalize_config_trims_url_and_dedupes_overrides() {
        let row = RetentionOverride {
            region: Region::Us,
            plan: PaymentPlan::Annual,
            days: 7,
            per_million: 1.0,
        };
        let mut cfg = AppConfig {
            share_base_url: "  https://example.com/calc  ".into(),
            rate_overrides: RateOverrides {
                retention: vec![
                    row.clone(),
                    RetentionOverride {
                        per_million: 2.0,
                        ..row.clone()
                    },
                ],
                ..RateOverrides::default()
            },
            ..AppConfig::default()
        };

        assert!(normalize_config(&mut cfg).unwrap());
        assert_eq!(cfg.share_base_url, "https://example.com/calc");
        assert_eq!(cfg.rate_overrides.retention, vec![row]);
        assert!(!normalize_config(&mut cfg).unwrap());
    }

    #[test]
    fn normalize_config_rejects_bad_values() {
        let mut cfg = AppConfig {
            share_base_url: "not a url".into(),
            ..AppConfig::default()
        };
        assert!(normalize_config(&mut cfg).is_err());

        let mut cfg = AppConfig {
            horizon_months: 0,
            ..AppConfig::default()
        };
        assert!(normalize_config(&mut cfg).is_err());

        let mut cfg = AppConfig {
            exchange_rate_jpy: -1.0,
            ..AppConfig::default()
        };
        assert!(normalize_config(&mut cfg).is_err());
    }
}

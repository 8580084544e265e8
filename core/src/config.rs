use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// GST is a flat 10%, stored values are GST-inclusive.
pub const DEFAULT_GST_DIVISOR: f64 = 1.1;

/// Weeks assumed when `test_duration` names no known length.
pub const DEFAULT_MEMBERSHIP_WEEKS: u32 = 26;

fn default_gst_divisor() -> f64 {
    DEFAULT_GST_DIVISOR
}

fn default_membership_weeks() -> u32 {
    DEFAULT_MEMBERSHIP_WEEKS
}

fn default_worker_threads() -> usize {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportConfig {
    /// Gym labels broken out individually in the monthly snapshot.
    /// Matched exactly against `Membership::gym`.
    pub known_gyms: Vec<String>,
    #[serde(default = "default_gst_divisor")]
    pub gst_divisor: f64,
    #[serde(default = "default_membership_weeks")]
    pub default_membership_weeks: u32,
    /// Workers used for the monthly series. 0 or 1 runs sequentially.
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,
}

impl ReportConfig {
    /// Load from the data/ directory.
    /// In tests, use ReportConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = Self::path(data_dir).display().to_string();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: ReportConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;

        if config.gst_divisor <= 0.0 {
            anyhow::bail!("{path}: gst_divisor must be positive, got {}", config.gst_divisor);
        }
        Ok(config)
    }

    /// Like `load`, but a data directory without a config file gets
    /// `default_test()`. A file that exists and is broken is still an error.
    pub fn load_or_default(data_dir: &str) -> anyhow::Result<Self> {
        let path = Self::path(data_dir);
        if !path.exists() {
            log::warn!("{} not found; using built-in defaults", path.display());
            return Ok(Self::default_test());
        }
        Self::load(data_dir)
    }

    pub fn path(data_dir: &str) -> PathBuf {
        PathBuf::from(data_dir).join("reports").join("report_config.json")
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            known_gyms: vec!["Newstead".into(), "Bowen Hills".into(), "Albion".into()],
            gst_divisor: DEFAULT_GST_DIVISOR,
            default_membership_weeks: DEFAULT_MEMBERSHIP_WEEKS,
            worker_threads: 4,
        }
    }
}

//! Run configuration: defaults, optional YAML file, validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::error::{AnalysisError, Result};

pub const DEFAULT_CSV: &str = "Lottery_Powerball_Winning_Numbers__Beginning_2010.csv";
pub const DEFAULT_NUMBERS_COLUMN: &str = "Winning Numbers";
pub const DEFAULT_DATE_COLUMN: &str = "Draw Date";
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";
pub const DEFAULT_MAX_NUMBER: u32 = 69;

/// Everything a run needs to know. Every field has a default so a YAML file
/// only has to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub csv_path: PathBuf,
    pub numbers_column: String,
    pub date_column: String,
    pub date_format: String,
    /// Upper bound of the number domain used by the chi-square test.
    pub max_number: u32,
    pub sections: Vec<usize>,
    /// Top-N size for per-section views.
    pub top_n: usize,
    /// Top-N size for the position-independent view.
    pub overall_top_n: usize,
    pub alpha: f64,
    pub output_dir: PathBuf,
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV),
            numbers_column: DEFAULT_NUMBERS_COLUMN.into(),
            date_column: DEFAULT_DATE_COLUMN.into(),
            date_format: DEFAULT_DATE_FORMAT.into(),
            max_number: DEFAULT_MAX_NUMBER,
            sections: (1..=6).collect(),
            top_n: 5,
            overall_top_n: 10,
            alpha: 0.05,
            output_dir: PathBuf::from("charts"),
            since: None,
            until: None,
        }
    }
}

impl AnalysisConfig {
    /// Config rooted at `csv_path` with every other field defaulted.
    pub fn for_csv(csv_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
            ..Self::default()
        }
    }

    /// Read a YAML config file. Missing keys fall back to defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| AnalysisError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: AnalysisConfig = serde_yaml::from_str(&text).map_err(|e| {
            AnalysisError::InvalidConfig(format!("parsing {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), ?cfg, "loaded config file");
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.numbers_column.trim().is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "numbers_column must not be empty".into(),
            ));
        }
        if self.max_number < 2 {
            return Err(AnalysisError::InvalidConfig(format!(
                "max_number must be at least 2, got {}",
                self.max_number
            )));
        }
        if self.sections.is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "at least one section is required".into(),
            ));
        }
        if self.top_n == 0 || self.overall_top_n == 0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "top_n and overall_top_n must be at least 1, got {} and {}",
                self.top_n, self.overall_top_n
            )));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "alpha must lie in (0, 1), got {}",
                self.alpha
            )));
        }
        if let (Some(since), Some(until)) = (self.since, self.until) {
            if since > until {
                return Err(AnalysisError::InvalidConfig(format!(
                    "since ({}) is after until ({})",
                    since, until
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_powerball_layout() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.csv_path, PathBuf::from(DEFAULT_CSV));
        assert_eq!(cfg.numbers_column, "Winning Numbers");
        assert_eq!(cfg.max_number, 69);
        assert_eq!(cfg.sections, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(cfg.top_n, 5);
        assert_eq!(cfg.overall_top_n, 10);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn yaml_overrides_only_named_keys() -> anyhow::Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "csv_path: draws.csv")?;
        writeln!(tmp, "sections: [1, 3]")?;
        writeln!(tmp, "since: 2015-10-07")?;

        let cfg = AnalysisConfig::from_yaml_file(tmp.path())?;
        assert_eq!(cfg.csv_path, PathBuf::from("draws.csv"));
        assert_eq!(cfg.sections, vec![1, 3]);
        assert_eq!(cfg.since, NaiveDate::from_ymd_opt(2015, 10, 7));
        assert_eq!(cfg.top_n, 5);
        assert_eq!(cfg.numbers_column, DEFAULT_NUMBERS_COLUMN);
        Ok(())
    }

    #[test]
    fn example_file_spells_out_defaults() -> anyhow::Result<()> {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("drawstats.example.yaml");
        assert_eq!(AnalysisConfig::from_yaml_file(&path)?, AnalysisConfig::default());
        Ok(())
    }

    #[test]
    fn rejects_bad_values() {
        let mut cfg = AnalysisConfig::default();
        cfg.sections.clear();
        assert!(matches!(cfg.validate(), Err(AnalysisError::InvalidConfig(_))));

        let mut cfg = AnalysisConfig::default();
        cfg.max_number = 1;
        assert!(cfg.validate().is_err());

        let mut cfg = AnalysisConfig::default();
        cfg.top_n = 0;
        assert!(matches!(cfg.validate(), Err(AnalysisError::InvalidConfig(_))));

        let mut cfg = AnalysisConfig::default();
        cfg.overall_top_n = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = AnalysisConfig::default();
        cfg.alpha = 1.5;
        assert!(cfg.validate().is_err());

        let mut cfg = AnalysisConfig::default();
        cfg.since = NaiveDate::from_ymd_opt(2020, 1, 2);
        cfg.until = NaiveDate::from_ymd_opt(2020, 1, 1);
        assert!(cfg.validate().is_err());
    }
}

//! Pearson chi-square goodness-of-fit of per-section counts against a
//! uniform distribution over `1..=max_number`.

pub mod gamma;

use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::{
    config::{AnalysisConfig, DEFAULT_MAX_NUMBER},
    error::{AnalysisError, Result},
    load::{DrawHistory, DrawRecord},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquareOptions {
    pub max_number: u32,
    pub alpha: f64,
}

impl Default for ChiSquareOptions {
    fn default() -> Self {
        Self {
            max_number: DEFAULT_MAX_NUMBER,
            alpha: 0.05,
        }
    }
}

impl From<&AnalysisConfig> for ChiSquareOptions {
    fn from(cfg: &AnalysisConfig) -> Self {
        Self {
            max_number: cfg.max_number,
            alpha: cfg.alpha,
        }
    }
}

/// Observed count for every number `1..=max_number` at one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedCounts {
    /// `counts[i]` is the count of number `i + 1`.
    pub counts: Vec<u64>,
    /// Draws too short for the section.
    pub skipped: usize,
    /// Draws whose number at the section lies outside `1..=max_number`.
    pub out_of_domain: usize,
}

impl ObservedCounts {
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

pub fn observed_counts(draws: &[DrawRecord], section: usize, max_number: u32) -> ObservedCounts {
    let mut counts = vec![0u64; max_number as usize];
    let mut skipped = 0usize;
    let mut out_of_domain = 0usize;
    for draw in draws {
        match draw.number_at(section) {
            Some(n) if (1..=max_number).contains(&n) => counts[(n - 1) as usize] += 1,
            Some(n) => {
                debug!(section, number = n, "number outside test domain");
                out_of_domain += 1;
            }
            None => skipped += 1,
        }
    }
    ObservedCounts {
        counts,
        skipped,
        out_of_domain,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChiSquareResult {
    pub section: usize,
    pub total_draws: usize,
    pub observed: Vec<u64>,
    /// Uniform expected count per number: `total_draws / max_number`.
    pub expected: f64,
    pub statistic: f64,
    pub degrees_of_freedom: u32,
    pub p_value: f64,
    pub alpha: f64,
    pub significant: bool,
    pub skipped: usize,
    pub out_of_domain: usize,
}

impl ChiSquareResult {
    /// Statistic rounded to two decimals.
    pub fn rounded_statistic(&self) -> f64 {
        (self.statistic * 100.0).round() / 100.0
    }

    pub fn observed_for(&self, number: u32) -> u64 {
        number
            .checked_sub(1)
            .and_then(|i| self.observed.get(i as usize).copied())
            .unwrap_or(0)
    }

    /// `Chi-Square Statistic: <float>` and `P-Value: <float>`.
    pub fn report_lines(&self) -> [String; 2] {
        [
            format!("Chi-Square Statistic: {:.2}", self.statistic),
            format!("P-Value: {}", self.p_value),
        ]
    }
}

/// Test whether the numbers drawn at `section` are uniform over
/// `1..=opts.max_number`. The `significant` flag is informational only.
pub fn chi_square_test(
    draws: &[DrawRecord],
    section: usize,
    opts: &ChiSquareOptions,
) -> Result<ChiSquareResult> {
    if opts.max_number < 2 {
        return Err(AnalysisError::InvalidConfig(format!(
            "chi-square needs max_number >= 2, got {}",
            opts.max_number
        )));
    }
    if draws.is_empty() {
        return Err(AnalysisError::NoDraws);
    }

    let observed = observed_counts(draws, section, opts.max_number);
    if observed.skipped > 0 {
        warn!(
            section,
            skipped = observed.skipped,
            "draws too short for section were skipped"
        );
    }

    let expected = draws.len() as f64 / f64::from(opts.max_number);
    let statistic: f64 = observed
        .counts
        .iter()
        .map(|&o| {
            let diff = o as f64 - expected;
            diff * diff / expected
        })
        .sum();
    let degrees_of_freedom = opts.max_number - 1;
    let p_value = gamma::chi_square_sf(statistic, degrees_of_freedom);
    let significant = p_value < opts.alpha;

    if significant {
        info!(section, p_value, alpha = opts.alpha, "distribution departs from uniform");
    } else {
        info!(section, p_value, alpha = opts.alpha, "no evidence against uniform");
    }

    Ok(ChiSquareResult {
        section,
        total_draws: draws.len(),
        observed: observed.counts,
        expected,
        statistic,
        degrees_of_freedom,
        p_value,
        alpha: opts.alpha,
        significant,
        skipped: observed.skipped,
        out_of_domain: observed.out_of_domain,
    })
}

/// Load `path` with default columns and test one section.
pub fn chi_square_test_path<P: AsRef<Path>>(path: P, section: usize) -> Result<ChiSquareResult> {
    let cfg = AnalysisConfig::for_csv(path.as_ref());
    let history = DrawHistory::load(&cfg)?;
    chi_square_test(history.draws(), section, &ChiSquareOptions::from(&cfg))
}

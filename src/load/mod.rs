// src/load/mod.rs
pub mod date_parser;
pub mod utils;

use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Serialize;
use std::{
    collections::BTreeMap,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

use crate::{
    config::AnalysisConfig,
    error::{AnalysisError, Result},
    stats::{self, ChiSquareOptions, ChiSquareResult},
    tally::{self, FrequencyTable, SectionTally, TopN},
};
use date_parser::parse_draw_date;
use utils::{clean_str, parse_numbers};

/// One historical draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawRecord {
    /// `None` when the file has no date column or the cell did not parse.
    pub date: Option<NaiveDate>,
    /// Winning numbers in field order; position `i` is section `i + 1`.
    pub numbers: Vec<u32>,
}

impl DrawRecord {
    pub fn new(date: Option<NaiveDate>, numbers: Vec<u32>) -> Self {
        Self { date, numbers }
    }

    /// The number drawn at 1-based `section`, if the draw has that many.
    pub fn number_at(&self, section: usize) -> Option<u32> {
        section
            .checked_sub(1)
            .and_then(|idx| self.numbers.get(idx).copied())
    }
}

/// Which CSV columns hold what.
#[derive(Debug, Clone)]
pub struct ColumnSpec<'a> {
    pub numbers: &'a str,
    pub date: Option<&'a str>,
    pub date_format: &'a str,
}

impl<'a> ColumnSpec<'a> {
    pub fn from_config(cfg: &'a AnalysisConfig) -> Self {
        let date = cfg.date_column.trim();
        Self {
            numbers: cfg.numbers_column.as_str(),
            date: (!date.is_empty()).then_some(date),
            date_format: cfg.date_format.as_str(),
        }
    }
}

/// Read every data row of `path` into a [`DrawRecord`], in file order.
#[tracing::instrument(level = "info", skip(path, columns), fields(path = %path.as_ref().display()))]
pub fn load_draws<P: AsRef<Path>>(path: P, columns: &ColumnSpec<'_>) -> Result<Vec<DrawRecord>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(AnalysisError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let headers = rdr.headers()?.clone();
    let numbers_idx = headers
        .iter()
        .position(|h| clean_str(h) == columns.numbers)
        .ok_or_else(|| AnalysisError::MissingColumn {
            column: columns.numbers.to_string(),
            path: path.to_path_buf(),
        })?;
    let date_idx = columns
        .date
        .and_then(|name| headers.iter().position(|h| clean_str(h) == name));
    if columns.date.is_some() && date_idx.is_none() {
        debug!(column = ?columns.date, "date column absent; draws will be undated");
    }

    let mut draws = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let row = idx + 1;
        let record = result?;

        let field = record
            .get(numbers_idx)
            .ok_or_else(|| AnalysisError::MalformedRow {
                row,
                value: record.iter().collect::<Vec<_>>().join(","),
                reason: format!("missing `{}` field", columns.numbers),
            })?;
        let numbers = parse_numbers(field).map_err(|(value, reason)| {
            AnalysisError::MalformedRow { row, value, reason }
        })?;
        if numbers.is_empty() {
            warn!(row, "empty winning-numbers field");
        }

        let date = date_idx
            .and_then(|i| record.get(i))
            .and_then(|raw| {
                let parsed = parse_draw_date(raw, columns.date_format);
                if parsed.is_none() {
                    debug!(row, raw, "unparsable draw date");
                }
                parsed
            });

        draws.push(DrawRecord { date, numbers });
    }

    info!(draws = draws.len(), "loaded draw history");
    Ok(draws)
}

/// Keep draws dated inside the inclusive `[since, until]` window.
/// With no bounds every draw is kept, dated or not; with any bound, undated
/// draws are dropped.
pub fn filter_by_date(
    draws: Vec<DrawRecord>,
    since: Option<NaiveDate>,
    until: Option<NaiveDate>,
) -> Vec<DrawRecord> {
    if since.is_none() && until.is_none() {
        return draws;
    }
    let before = draws.len();
    let mut undated = 0usize;
    let kept: Vec<DrawRecord> = draws
        .into_iter()
        .filter(|d| match d.date {
            Some(date) => {
                since.map_or(true, |s| date >= s) && until.map_or(true, |u| date <= u)
            }
            None => {
                undated += 1;
                false
            }
        })
        .collect();
    if undated > 0 {
        warn!(undated, "dropped undated draws while applying date window");
    }
    info!(
        kept = kept.len(),
        dropped = before - kept.len(),
        ?since,
        ?until,
        "applied date window"
    );
    kept
}

/// The loaded draws plus the operations run over them. Loaded once and
/// shared by every analysis in a run.
#[derive(Debug, Clone)]
pub struct DrawHistory {
    source: PathBuf,
    draws: Vec<DrawRecord>,
}

impl DrawHistory {
    pub fn load(cfg: &AnalysisConfig) -> Result<Self> {
        cfg.validate()?;
        let draws = load_draws(&cfg.csv_path, &ColumnSpec::from_config(cfg))?;
        let draws = filter_by_date(draws, cfg.since, cfg.until);
        Ok(Self {
            source: cfg.csv_path.clone(),
            draws,
        })
    }

    pub fn from_draws(source: impl Into<PathBuf>, draws: Vec<DrawRecord>) -> Self {
        Self {
            source: source.into(),
            draws,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// Largest token count seen in any draw.
    pub fn max_sections(&self) -> usize {
        self.draws.iter().map(|d| d.numbers.len()).max().unwrap_or(0)
    }

    pub fn overall_table(&self) -> FrequencyTable {
        tally::overall_table(&self.draws)
    }

    pub fn top_recurring(&self, n: usize) -> TopN {
        tally::top_recurring(&self.draws, n)
    }

    pub fn top_recurring_by_section(&self, section: usize, n: usize) -> SectionTally {
        tally::top_recurring_by_section(&self.draws, section, n)
    }

    pub fn top_by_sections(&self, sections: &[usize], n: usize) -> BTreeMap<usize, SectionTally> {
        tally::top_by_sections(&self.draws, sections, n)
    }

    pub fn chi_square(&self, section: usize, opts: &ChiSquareOptions) -> Result<ChiSquareResult> {
        stats::chi_square_test(&self.draws, section, opts)
    }
}

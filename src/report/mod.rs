// src/report/mod.rs
use prettytable::{format, Cell, Row, Table};
use serde::Serialize;
use std::{collections::BTreeMap, path::PathBuf};

use crate::{
    load::DrawHistory,
    stats::ChiSquareResult,
    tally::{self, SectionTally, TopN},
};

/// Everything one run produced, for `--json`.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub source: PathBuf,
    pub draws: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<TopN>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub sections: BTreeMap<usize, SectionTally>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub chi_square: Vec<ChiSquareResult>,
    /// Chart files written this run.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub charts: Vec<PathBuf>,
}

impl RunReport {
    pub fn new(history: &DrawHistory) -> Self {
        Self {
            source: history.source().to_path_buf(),
            draws: history.len(),
            ..Self::default()
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn boxed_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(Row::new(
        headers
            .iter()
            .map(|h| Cell::new(h).style_spec("bFg"))
            .collect(),
    ));
    table
}

fn right(value: impl ToString) -> Cell {
    Cell::new(&value.to_string()).style_spec("r")
}

pub fn top_table(view: &TopN) -> Table {
    let mut table = boxed_table(&["Rank", "Number", "Count"]);
    for (rank, e) in view.iter().enumerate() {
        table.add_row(Row::new(vec![right(rank + 1), right(e.number), right(e.count)]));
    }
    table
}

pub fn sections_table(tallies: &BTreeMap<usize, SectionTally>) -> Table {
    let mut table = boxed_table(&["Section", "Draws", "Skipped", "Top numbers (count)"]);
    for tally in tallies.values() {
        let top = tally
            .top
            .iter()
            .map(|e| format!("{} ({})", e.number, e.count))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(Row::new(vec![
            right(tally.section),
            right(tally.tallied),
            right(tally.skipped),
            Cell::new(&top),
        ]));
    }
    table
}

pub fn chi_square_table(results: &[ChiSquareResult]) -> Table {
    let mut table = boxed_table(&[
        "Section",
        "Draws",
        "Expected",
        "Chi-Square",
        "DoF",
        "P-Value",
        "Significant",
    ]);
    for r in results {
        table.add_row(Row::new(vec![
            right(r.section),
            right(r.total_draws),
            right(format!("{:.4}", r.expected)),
            right(format!("{:.2}", r.statistic)),
            right(r.degrees_of_freedom),
            right(r.p_value),
            Cell::new(if r.significant { "yes" } else { "no" }),
        ]));
    }
    table
}

/// One row per number in `1..=max_number`: overall count, then the count
/// at each requested section.
pub fn frequency_matrix(history: &DrawHistory, sections: &[usize], max_number: u32) -> Table {
    let overall = history.overall_table();
    let per_section: Vec<_> = sections
        .iter()
        .map(|&s| tally::section_table(history.draws(), s).table)
        .collect();

    let mut headers = vec!["Number".to_string(), "Overall".to_string()];
    headers.extend(sections.iter().map(|s| format!("S{}", s)));
    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
    let mut table = boxed_table(&header_refs);

    for n in 1..=max_number {
        let mut cells = vec![right(n), right(overall.count(n))];
        cells.extend(per_section.iter().map(|t| right(t.count(n))));
        table.add_row(Row::new(cells));
    }
    table
}

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::{FrequencyTable, TopN};
use crate::load::DrawRecord;

/// Full counts for one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTable {
    pub section: usize,
    pub table: FrequencyTable,
    /// Draws with fewer than `section` numbers; they contribute nothing.
    pub skipped: usize,
}

/// Top-N numbers for one section, plus how many draws fed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionTally {
    pub section: usize,
    pub tallied: usize,
    pub skipped: usize,
    pub top: TopN,
}

/// Tally the number at 1-based `section` of every draw. A section outside a
/// draw's range (including 0) skips that draw; the skip count is returned
/// rather than raised.
pub fn section_table(draws: &[DrawRecord], section: usize) -> SectionTable {
    let mut table = FrequencyTable::new();
    let mut skipped = 0usize;
    for draw in draws {
        match draw.number_at(section) {
            Some(n) => table.record(n),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(section, skipped, "draws too short for section were skipped");
    }
    SectionTable {
        section,
        table,
        skipped,
    }
}

pub fn top_recurring_by_section(draws: &[DrawRecord], section: usize, n: usize) -> SectionTally {
    let SectionTable {
        section,
        table,
        skipped,
    } = section_table(draws, section);
    let top = table.top(n);
    debug!(section, ?top, "section top");
    SectionTally {
        section,
        tallied: draws.len() - skipped,
        skipped,
        top,
    }
}

/// Each section is tallied independently of the others.
pub fn top_by_sections(
    draws: &[DrawRecord],
    sections: &[usize],
    n: usize,
) -> BTreeMap<usize, SectionTally> {
    sections
        .iter()
        .map(|&s| (s, top_recurring_by_section(draws, s, n)))
        .collect()
}

pub mod section;

use serde::Serialize;
use std::collections::HashMap;

use crate::load::DrawRecord;

pub use section::{section_table, top_by_sections, top_recurring_by_section, SectionTable, SectionTally};

/// A number and how often it was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NumberCount {
    pub number: u32,
    pub count: u64,
}

/// Occurrence counts keyed by number, remembering first-encounter order so
/// that ties in a [`TopN`] come out in the order the numbers were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    index: HashMap<u32, usize>,
    entries: Vec<NumberCount>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, number: u32) {
        match self.index.get(&number) {
            Some(&i) => self.entries[i].count += 1,
            None => {
                self.index.insert(number, self.entries.len());
                self.entries.push(NumberCount { number, count: 1 });
            }
        }
    }

    pub fn count(&self, number: u32) -> u64 {
        self.index
            .get(&number)
            .map_or(0, |&i| self.entries[i].count)
    }

    /// Distinct numbers seen.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Entries in first-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = &NumberCount> {
        self.entries.iter()
    }

    /// The `n` most frequent numbers, count-descending. The sort is stable,
    /// so equal counts keep first-encounter order.
    pub fn top(&self, n: usize) -> TopN {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.count.cmp(&a.count));
        sorted.truncate(n);
        TopN(sorted)
    }

    /// Every entry, count-descending.
    pub fn ranked(&self) -> TopN {
        self.top(self.entries.len())
    }
}

impl FromIterator<u32> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut table = FrequencyTable::new();
        for n in iter {
            table.record(n);
        }
        table
    }
}

/// A size-bounded, count-descending view of a [`FrequencyTable`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TopN(Vec<NumberCount>);

impl TopN {
    pub fn entries(&self) -> &[NumberCount] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, number: u32) -> Option<u64> {
        self.0.iter().find(|e| e.number == number).map(|e| e.count)
    }

    /// `(number, count)` pairs, in rank order.
    pub fn pairs(&self) -> Vec<(u32, u64)> {
        self.0.iter().map(|e| (e.number, e.count)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NumberCount> {
        self.0.iter()
    }
}

/// Tally every number of every draw, ignoring position.
pub fn overall_table(draws: &[DrawRecord]) -> FrequencyTable {
    draws
        .iter()
        .flat_map(|d| d.numbers.iter().copied())
        .collect()
}

/// The `n` numbers drawn most often across all positions.
pub fn top_recurring(draws: &[DrawRecord], n: usize) -> TopN {
    overall_table(draws).top(n)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Two copies of `1..=6` followed by `7..=12`.
    pub(crate) fn synthetic_draws() -> Vec<DrawRecord> {
        vec![
            DrawRecord::new(None, vec![1, 2, 3, 4, 5, 6]),
            DrawRecord::new(None, vec![1, 2, 3, 4, 5, 6]),
            DrawRecord::new(None, vec![7, 8, 9, 10, 11, 12]),
        ]
    }

    #[test]
    fn top_recurring_breaks_ties_by_first_seen() {
        let draws = synthetic_draws();
        assert_eq!(top_recurring(&draws, 2).pairs(), vec![(1, 2), (2, 2)]);
    }

    #[test]
    fn top_recurring_is_bounded_and_matches_manual_tally() {
        let draws = vec![
            DrawRecord::new(None, vec![5, 9, 12, 30, 41, 7]),
            DrawRecord::new(None, vec![9, 12, 33, 41, 60, 7]),
            DrawRecord::new(None, vec![12, 18, 41, 52, 66, 3]),
        ];

        for n in 0..20 {
            let top = top_recurring(&draws, n);
            assert!(top.len() <= n);
            for e in top.iter() {
                let manual = draws
                    .iter()
                    .flat_map(|d| d.numbers.iter())
                    .filter(|&&x| x == e.number)
                    .count() as u64;
                assert_eq!(e.count, manual, "count for {}", e.number);
            }
        }

        let top3 = top_recurring(&draws, 3).pairs();
        assert_eq!(top3, vec![(12, 3), (41, 3), (9, 2)]);
    }

    #[test]
    fn top_larger_than_table_returns_everything() {
        let draws = synthetic_draws();
        let top = top_recurring(&draws, 100);
        assert_eq!(top.len(), 12);
        assert_eq!(top.get(7), Some(1));
        assert_eq!(top.get(70), None);
    }

    #[test]
    fn table_counts_and_totals() {
        let table: FrequencyTable = [3u32, 1, 3, 2, 3, 1].into_iter().collect();
        assert_eq!(table.count(3), 3);
        assert_eq!(table.count(1), 2);
        assert_eq!(table.count(9), 0);
        assert_eq!(table.len(), 3);
        assert_eq!(table.total(), 6);
        let order: Vec<u32> = table.iter().map(|e| e.number).collect();
        assert_eq!(order, vec![3, 1, 2]);
        assert_eq!(table.ranked().pairs(), vec![(3, 3), (1, 2), (2, 1)]);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let draws = synthetic_draws();
        assert_eq!(top_recurring(&draws, 5), top_recurring(&draws, 5));
        assert_eq!(overall_table(&draws), overall_table(&draws));
    }

    #[test]
    fn top_n_serializes_as_list() {
        let draws = synthetic_draws();
        let json = serde_json::to_string(&top_recurring(&draws, 1)).unwrap();
        assert_eq!(json, r#"[{"number":1,"count":2}]"#);
    }
}

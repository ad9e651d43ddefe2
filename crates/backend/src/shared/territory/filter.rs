use contracts::shared::territory::TerritoryLevel;

use super::tree_builder::{normalize_key, CounterSelector, LevelSelector};

/// Territory selection of one request. Rows must match every constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerritoryFilter {
    constraints: Vec<(TerritoryLevel, String)>,
}

impl TerritoryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a constraint; `None` or blank values are ignored
    pub fn with(mut self, level: TerritoryLevel, value: Option<&str>) -> Self {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.constraints.push((level, value.to_string()));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    fn matches_keys<'a>(
        &self,
        mut key_of: impl FnMut(TerritoryLevel) -> Option<Option<&'a str>>,
    ) -> bool {
        self.constraints.iter().all(|(level, expected)| match key_of(*level) {
            // filter values are trimmed, so compare against a trimmed key
            Some(raw) => normalize_key(raw).0.trim().eq_ignore_ascii_case(expected),
            // level not part of this row shape
            None => true,
        })
    }

    pub fn matches<R, M>(&self, row: &R, levels: &[LevelSelector<R, M>]) -> bool {
        self.matches_keys(|level| {
            levels
                .iter()
                .find(|s| s.level == level)
                .map(|s| (s.key)(row))
        })
    }

    pub fn matches_counters<R, M>(&self, row: &R, selectors: &[CounterSelector<R, M>]) -> bool {
        self.matches_keys(|level| {
            selectors
                .iter()
                .find(|s| s.level == level)
                .map(|s| (s.key)(row))
        })
    }

    /// Rows matching the filter, in their original order
    pub fn apply<'r, R, M>(&self, rows: &'r [R], levels: &[LevelSelector<R, M>]) -> Vec<&'r R> {
        if self.is_empty() {
            return rows.iter().collect();
        }
        rows.iter().filter(|row| self.matches(*row, levels)).collect()
    }
}

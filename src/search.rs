//! Case-insensitive substring search over every value of every record.
//!
//! Results keep table order and are cut off at a fixed limit. Each result
//! carries a few headline fields picked by column position, since nothing is
//! known about the meaning of the columns.

use serde::Serialize;
use tracing::debug;

use crate::options::DEFAULT_RESULT_LIMIT;
use crate::store::RecordStore;
use crate::table::{Record, Table};

/// Name shown when a record has no usable name-like value.
pub const UNNAMED: &str = "Unnamed";

/// Column positions joined into the summary line.
const SUMMARY_COLUMNS: std::ops::Range<usize> = 2..6;

/// One matching record, projected for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// Position within the returned results.
    pub id: usize,
    /// First value, or `ID<id>` when empty.
    pub code: String,
    /// Second value, else third, else [`UNNAMED`].
    pub name: String,
    /// Non-empty values of columns 2 to 5 joined with ` | `.
    pub summary: String,
    /// Every field as `column: value` lines.
    pub details: String,
    /// The matching record.
    pub record: Record,
}

impl SearchResult {
    fn project(id: usize, record: &Record) -> Self {
        let non_empty = |i: usize| record.value_at(i).filter(|v| !v.is_empty());

        let code = non_empty(0).map_or_else(|| format!("ID{id}"), str::to_string);
        let name = non_empty(1)
            .or_else(|| non_empty(2))
            .unwrap_or(UNNAMED)
            .to_string();
        let summary = SUMMARY_COLUMNS
            .filter_map(non_empty)
            .collect::<Vec<_>>()
            .join(" | ");

        Self {
            id,
            code,
            name,
            summary,
            details: record.details(),
            record: record.clone(),
        }
    }
}

/// Searches tables with a fixed result limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchEngine {
    limit: usize,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(DEFAULT_RESULT_LIMIT)
    }
}

impl SearchEngine {
    /// Create an engine returning at most `limit` results per query.
    pub const fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// The result limit.
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Search a table.
    pub fn search(&self, table: &Table, query: &str) -> Vec<SearchResult> {
        search(table, query, self.limit)
    }

    /// Search the store's active table. An empty store yields no results.
    pub fn search_store(&self, store: &RecordStore, query: &str) -> Vec<SearchResult> {
        store
            .active_table()
            .map(|table| self.search(&table, query))
            .unwrap_or_default()
    }
}

/// Returns true if any value of `record` contains the lower-cased `needle`.
fn matches(record: &Record, needle: &str) -> bool {
    record.values().any(|v| v.to_lowercase().contains(needle))
}

/// Lower-case `query`, or `None` if it is blank.
fn normalize_query(query: &str) -> Option<String> {
    if query.trim().is_empty() {
        None
    } else {
        Some(query.to_lowercase())
    }
}

/// Return the first `limit` records matching `query`, in table order.
pub fn search(table: &Table, query: &str, limit: usize) -> Vec<SearchResult> {
    let Some(needle) = normalize_query(query) else {
        return Vec::new();
    };

    let results: Vec<SearchResult> = table
        .records()
        .iter()
        .filter(|record| matches(record, &needle))
        .take(limit)
        .enumerate()
        .map(|(id, record)| SearchResult::project(id, record))
        .collect();

    debug!(query, searched = table.len(), results = results.len(), "search complete");
    results
}

/// Count every record matching `query`, ignoring any limit.
pub fn count_matches(table: &Table, query: &str) -> usize {
    normalize_query(query).map_or(0, |needle| {
        table
            .records()
            .iter()
            .filter(|record| matches(record, &needle))
            .count()
    })
}

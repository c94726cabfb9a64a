//! Delimiter detection by record yield.
//!
//! Every candidate dialect is used to build a full table from the same
//! lines. The candidate producing the most records wins; on a tie the
//! candidate listed first wins.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::dialect::Dialect;
use crate::error::{Result, ScoutError};
use crate::options::BuildOptions;
use crate::store::RecordStore;
use crate::table::{SourceLine, Table, build_from_source};

/// Number of column names kept in an attempt's header preview.
pub const HEADER_PREVIEW_LEN: usize = 5;

/// The outcome of building a table with one candidate dialect.
#[derive(Debug, Clone, Serialize)]
pub struct DialectAttempt {
    /// The dialect that was tried.
    pub dialect: Dialect,
    /// Whether a table could be built.
    pub success: bool,
    /// The built table.
    #[serde(skip)]
    pub table: Option<Arc<Table>>,
    /// Why the attempt failed.
    pub error: Option<String>,
    /// Number of records accepted.
    pub record_count: usize,
    /// The first few column names.
    pub header_preview: Vec<String>,
}

impl DialectAttempt {
    fn from_result(dialect: Dialect, result: Result<Table>) -> Self {
        match result {
            Ok(table) => Self {
                dialect,
                success: true,
                record_count: table.len(),
                header_preview: table
                    .columns()
                    .iter()
                    .take(HEADER_PREVIEW_LEN)
                    .cloned()
                    .collect(),
                table: Some(Arc::new(table)),
                error: None,
            },
            Err(e) => Self {
                dialect,
                success: false,
                table: None,
                error: Some(e.to_string()),
                record_count: 0,
                header_preview: Vec::new(),
            },
        }
    }

    /// Returns true if this attempt can become the active table.
    pub fn is_selectable(&self) -> bool {
        self.success && self.record_count > 0
    }
}

/// All dialect attempts for one input, with the winner.
#[derive(Debug, Clone, Serialize)]
pub struct Detection {
    /// Attempts in candidate order.
    pub attempts: Vec<DialectAttempt>,
    /// Index of the winning attempt, if any attempt produced a record.
    pub best: Option<usize>,
}

impl Detection {
    /// The winning attempt.
    pub fn best_attempt(&self) -> Result<&DialectAttempt> {
        self.best
            .and_then(|i| self.attempts.get(i))
            .ok_or(ScoutError::NoViableDialect)
    }

    /// The winning attempt's table.
    pub fn best_table(&self) -> Result<Arc<Table>> {
        self.best_attempt()?
            .table
            .clone()
            .ok_or(ScoutError::NoViableDialect)
    }

    /// Make the attempt at `index` the active table of `store`.
    pub fn select(&self, index: usize, store: &RecordStore) -> Result<()> {
        let attempt = self
            .attempts
            .get(index)
            .filter(|a| a.is_selectable())
            .ok_or(ScoutError::InvalidSelection { index })?;
        let table = attempt
            .table
            .clone()
            .ok_or(ScoutError::InvalidSelection { index })?;

        info!(dialect = %attempt.dialect, records = attempt.record_count, "dialect selected");
        store.replace(table);
        Ok(())
    }
}

/// Split text into trimmed, non-empty lines at least `min_line_len` characters long.
pub fn usable_lines(text: &str, min_line_len: usize) -> Vec<SourceLine<'_>> {
    let mut lines = Vec::with_capacity(bytecount::count(text.as_bytes(), b'\n') + 1);
    for (i, line) in text.split('\n').enumerate() {
        let line = line.trim();
        if line.is_empty() || line.chars().count() < min_line_len {
            continue;
        }
        lines.push(SourceLine {
            number: i + 1,
            text: line,
        });
    }
    lines
}

/// Try every candidate dialect against `text`.
///
/// Fails only when fewer than two usable lines exist. Per-candidate failures
/// are kept in the returned attempts.
pub fn detect(text: &str, candidates: &[Dialect], options: &BuildOptions) -> Result<Detection> {
    let lines = usable_lines(text, options.min_line_len);
    if lines.len() < 2 {
        return Err(ScoutError::InsufficientData {
            usable_lines: lines.len(),
        });
    }

    let header = lines[0].text.as_bytes();
    let attempts: Vec<DialectAttempt> = candidates
        .iter()
        .map(|&dialect| {
            let attempt =
                DialectAttempt::from_result(dialect, build_from_source(&lines, dialect, options));
            debug!(
                dialect = %dialect,
                header_hits = bytecount::count(header, dialect.delimiter.as_byte()),
                success = attempt.success,
                records = attempt.record_count,
                error = attempt.error.as_deref(),
                "dialect attempt"
            );
            attempt
        })
        .collect();

    let best = find_best(&attempts);
    match best {
        Some(i) => info!(
            dialect = %attempts[i].dialect,
            records = attempts[i].record_count,
            "best dialect"
        ),
        None => info!(candidates = candidates.len(), "no dialect produced records"),
    }

    Ok(Detection { attempts, best })
}

/// Index of the attempt with the most records, earliest first on ties.
///
/// Returns `None` when no attempt produced a record.
fn find_best(attempts: &[DialectAttempt]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, attempt) in attempts.iter().enumerate() {
        let beats = match best {
            Some(b) => attempt.record_count > attempts[b].record_count,
            None => attempt.record_count > 0,
        };
        if beats {
            best = Some(i);
        }
    }
    best
}

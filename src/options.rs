/// Default number of data lines processed per table.
pub const DEFAULT_LINE_CEILING: usize = 1000;

/// Default number of search results returned.
pub const DEFAULT_RESULT_LIMIT: usize = 20;

/// Row acceptance rule for lines whose field count differs from the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMode {
    /// Accept only rows with exactly as many fields as the header.
    Strict,
    /// Accept rows missing at most `tolerance` trailing fields.
    Lenient { tolerance: usize },
    /// Accept any row with at least `min_fields` fields.
    Permissive { min_fields: usize },
}

impl Default for RowMode {
    fn default() -> Self {
        RowMode::Lenient { tolerance: 2 }
    }
}

impl RowMode {
    /// Permissive mode with the usual minimum of three fields.
    pub const fn permissive() -> Self {
        RowMode::Permissive { min_fields: 3 }
    }

    /// Returns true if a row with `fields` values is kept under a header of
    /// `header_len` columns.
    pub fn accepts(&self, fields: usize, header_len: usize) -> bool {
        match *self {
            RowMode::Strict => fields == header_len,
            RowMode::Lenient { tolerance } => fields.saturating_add(tolerance) >= header_len,
            RowMode::Permissive { min_fields } => fields >= min_fields,
        }
    }
}

/// Options controlling how lines are filtered and turned into records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Row acceptance rule.
    pub row_mode: RowMode,
    /// Lines shorter than this many characters are treated as noise.
    pub min_line_len: usize,
    /// Maximum number of data lines processed after the header.
    pub line_ceiling: usize,
    /// Attach source line number and raw text to each record.
    pub track_origin: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            row_mode: RowMode::default(),
            min_line_len: 0,
            line_ceiling: DEFAULT_LINE_CEILING,
            track_origin: false,
        }
    }
}

//! Scout builder: configuration plus the load pipeline.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::detector::{Detection, detect};
use crate::dialect::{Delimiter, Dialect, TokenizerMode, default_candidates};
use crate::encoding::decode_text;
use crate::error::{Result, ScoutError};
use crate::options::{BuildOptions, DEFAULT_RESULT_LIMIT, RowMode};
use crate::search::{SearchEngine, SearchResult};
use crate::store::RecordStore;

/// Loads delimited text into a [`RecordStore`] and searches it.
///
/// # Example
///
/// ```
/// use csv_scout::{RecordStore, Scout};
///
/// let scout = Scout::new();
/// let store = RecordStore::new();
///
/// scout.load_text("id;name\n1;Boiler\n2;Pump\n", &store).unwrap();
///
/// let results = scout.search(&store, "boil");
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].name, "Boiler");
/// ```
#[derive(Debug, Clone)]
pub struct Scout {
    /// Dialects tried, in order.
    candidates: Vec<Dialect>,
    /// Line filtering and row acceptance.
    options: BuildOptions,
    /// Maximum number of search results.
    result_limit: usize,
}

impl Default for Scout {
    fn default() -> Self {
        Self::new()
    }
}

impl Scout {
    /// Create a Scout trying comma, semicolon, tab and pipe with the naive
    /// tokenizer, in lenient mode.
    pub fn new() -> Self {
        Self {
            candidates: default_candidates(TokenizerMode::Naive),
            options: BuildOptions::default(),
            result_limit: DEFAULT_RESULT_LIMIT,
        }
    }

    /// Replace the candidate dialects.
    pub fn candidates(&mut self, candidates: Vec<Dialect>) -> &mut Self {
        self.candidates = candidates;
        self
    }

    /// Only try `delimiter`, with the quote-aware tokenizer.
    pub fn delimiter(&mut self, delimiter: Delimiter) -> &mut Self {
        self.candidates = vec![Dialect::new(delimiter, TokenizerMode::QuoteAware)];
        self
    }

    /// Use `mode` for every candidate.
    pub fn tokenizer_mode(&mut self, mode: TokenizerMode) -> &mut Self {
        for candidate in &mut self.candidates {
            candidate.mode = mode;
        }
        self
    }

    /// Set the row acceptance rule.
    pub fn row_mode(&mut self, row_mode: RowMode) -> &mut Self {
        self.options.row_mode = row_mode;
        self
    }

    /// Ignore lines shorter than `min_line_len` characters.
    pub fn min_line_len(&mut self, min_line_len: usize) -> &mut Self {
        self.options.min_line_len = min_line_len;
        self
    }

    /// Process at most `line_ceiling` data lines.
    pub fn line_ceiling(&mut self, line_ceiling: usize) -> &mut Self {
        self.options.line_ceiling = line_ceiling;
        self
    }

    /// Return at most `result_limit` search results.
    pub fn result_limit(&mut self, result_limit: usize) -> &mut Self {
        self.result_limit = result_limit;
        self
    }

    /// Attach source line number and raw text to each record.
    pub fn track_origin(&mut self, track_origin: bool) -> &mut Self {
        self.options.track_origin = track_origin;
        self
    }

    /// The current build options.
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// The search engine configured with this Scout's result limit.
    pub fn engine(&self) -> SearchEngine {
        SearchEngine::new(self.result_limit)
    }

    /// Try every candidate against `text` without touching any store.
    pub fn detect(&self, text: &str) -> Result<Detection> {
        if self.candidates.is_empty() {
            return Err(ScoutError::InvalidConfig(
                "at least one candidate dialect is required".to_string(),
            ));
        }
        detect(text, &self.candidates, &self.options)
    }

    /// Detect the dialect of `text` and make the best table active in `store`.
    ///
    /// On error the store keeps its previous table.
    pub fn load_text(&self, text: &str, store: &RecordStore) -> Result<Detection> {
        let detection = self.detect(text)?;
        let table = detection.best_table()?;
        info!(
            dialect = %table.dialect(),
            records = table.len(),
            "loaded table"
        );
        store.replace(table);
        Ok(detection)
    }

    /// Decode `data` and load it.
    pub fn load_bytes(&self, data: &[u8], store: &RecordStore) -> Result<Detection> {
        if data.is_empty() {
            return Err(ScoutError::InsufficientData { usable_lines: 0 });
        }
        self.load_text(&decode_text(data), store)
    }

    /// Read and load the file at `path`.
    pub fn load_path<P: AsRef<Path>>(&self, path: P, store: &RecordStore) -> Result<Detection> {
        let file = open_source(path)?;
        self.load_reader(std::io::BufReader::new(file), store)
    }

    /// Read all of `reader` and load it.
    pub fn load_reader<R: Read>(&self, mut reader: R, store: &RecordStore) -> Result<Detection> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.load_bytes(&data, store)
    }

    /// Fetch `url` and load the body.
    #[cfg(feature = "http")]
    pub fn load_url(&self, url: &str, store: &RecordStore) -> Result<Detection> {
        let data = crate::http::fetch_bytes(url)?;
        self.load_bytes(&data, store)
    }

    /// Search the store's active table.
    pub fn search(&self, store: &RecordStore, query: &str) -> Vec<SearchResult> {
        self.engine().search_store(store, query)
    }
}

/// Open `path` for reading, mapping a missing file to [`ScoutError::FetchFailed`].
pub fn open_source<P: AsRef<Path>>(path: P) -> Result<File> {
    let path = path.as_ref();
    File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            ScoutError::FetchFailed(format!("{} not found", path.display()))
        }
        _ => ScoutError::Io(e),
    })
}

//! csv-scout: load delimited text of unknown dialect and search it
//!
//! Text with an unknown delimiter (comma, semicolon, tab or pipe), possibly
//! quoted and possibly with truncated rows, is turned into an in-memory table
//! of header→value records that can be searched by free-text substring.
//!
//! # Quick Start
//!
//! ```
//! use csv_scout::{RecordStore, Scout};
//!
//! let scout = Scout::new();
//! let store = RecordStore::new();
//!
//! let detection = scout
//!     .load_text("id,name,loc\n1,Boiler,B1\n2,Pump,B1\n", &store)
//!     .unwrap();
//! println!("Delimiter: {}", detection.best_attempt().unwrap().dialect.delimiter);
//!
//! for result in scout.search(&store, "pump") {
//!     println!("{} {} {}", result.code, result.name, result.summary);
//! }
//! ```
//!
//! # How detection works
//!
//! 1. The text is split into trimmed, non-empty lines; at least two are needed.
//! 2. Each candidate delimiter builds a full table from those lines. The
//!    first line is the header and needs two or more distinct names.
//! 3. Rows are kept according to the [`RowMode`]: exact field count, a few
//!    missing trailing fields, or a minimum field count.
//! 4. The candidate with the most records wins; earlier candidates win ties.
//!
//! Search is a case-insensitive substring match over every value, keeping
//! table order and returning at most a configured number of results.

mod detector;
mod dialect;
mod encoding;
mod error;
#[cfg(feature = "http")]
pub mod http;
mod options;
mod scout;
mod search;
mod store;
mod table;
mod tokenizer;

pub use detector::{Detection, DialectAttempt, HEADER_PREVIEW_LEN, detect, usable_lines};
pub use dialect::{DELIMITERS, Delimiter, Dialect, TokenizerMode, default_candidates};
pub use error::{Result, ScoutError};
pub use options::{BuildOptions, DEFAULT_LINE_CEILING, DEFAULT_RESULT_LIMIT, RowMode};
pub use scout::{Scout, open_source};
pub use search::{SearchEngine, SearchResult, UNNAMED, count_matches, search};
pub use store::RecordStore;
pub use table::{Origin, Record, SourceLine, Table, build, build_from_source};
pub use tokenizer::{split_naive, split_quote_aware, strip_quotes, tokenize};

// Re-export for callers that fetch bytes themselves
pub use encoding::{decode_text, is_utf8};

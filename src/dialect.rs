//! Candidate delimiters and the tokenizer mode tried with each of them.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ScoutError;

/// Field delimiter candidates, in the order they are tried by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `\t`
    Tab,
    /// `|`
    Pipe,
}

/// Default candidate order (comma first, as the most common).
pub const DELIMITERS: &[Delimiter] = &[
    Delimiter::Comma,
    Delimiter::Semicolon,
    Delimiter::Tab,
    Delimiter::Pipe,
];

impl Delimiter {
    /// Returns the delimiter byte.
    pub const fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
            Delimiter::Tab => b'\t',
            Delimiter::Pipe => b'|',
        }
    }

    /// Returns the delimiter character.
    pub const fn as_char(&self) -> char {
        self.as_byte() as char
    }

    /// Short human-readable name.
    pub const fn label(&self) -> &'static str {
        match self {
            Delimiter::Comma => "Comma (,)",
            Delimiter::Semicolon => "Semicolon (;)",
            Delimiter::Tab => "Tab",
            Delimiter::Pipe => "Pipe (|)",
        }
    }

    /// Describes the file format this delimiter usually indicates.
    pub const fn description(&self) -> &'static str {
        match self {
            Delimiter::Comma => "Standard CSV",
            Delimiter::Semicolon => "European-style CSV",
            Delimiter::Tab => "TSV",
            Delimiter::Pipe => "Pipe-separated values",
        }
    }

    /// Look up a delimiter by its byte value.
    pub fn from_byte(byte: u8) -> Option<Self> {
        DELIMITERS.iter().copied().find(|d| d.as_byte() == byte)
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Comma => write!(f, "comma"),
            Delimiter::Semicolon => write!(f, "semicolon"),
            Delimiter::Tab => write!(f, "tab"),
            Delimiter::Pipe => write!(f, "pipe"),
        }
    }
}

impl FromStr for Delimiter {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "comma" | "," => Ok(Delimiter::Comma),
            "semicolon" | ";" => Ok(Delimiter::Semicolon),
            "tab" | "\t" | "\\t" => Ok(Delimiter::Tab),
            "pipe" | "|" => Ok(Delimiter::Pipe),
            other => Err(ScoutError::InvalidConfig(format!(
                "unsupported delimiter {other:?} (expected comma, semicolon, tab or pipe)"
            ))),
        }
    }
}

/// How a line is split into fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerMode {
    /// Split on every delimiter, then strip surrounding quotes.
    ///
    /// Delimiters inside quoted fields are not protected.
    #[default]
    Naive,
    /// Track quoted spans so delimiters inside quotes stay in the field.
    QuoteAware,
}

/// A candidate dialect: a delimiter plus the tokenizer mode used with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Dialect {
    /// Field delimiter.
    pub delimiter: Delimiter,
    /// Tokenizer mode.
    pub mode: TokenizerMode,
}

impl Dialect {
    /// Create a new dialect.
    pub const fn new(delimiter: Delimiter, mode: TokenizerMode) -> Self {
        Self { delimiter, mode }
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::new(Delimiter::Comma, TokenizerMode::QuoteAware)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            TokenizerMode::Naive => write!(f, "{}", self.delimiter),
            TokenizerMode::QuoteAware => write!(f, "{} (quote-aware)", self.delimiter),
        }
    }
}

/// Build the candidate list for every default delimiter with the given mode.
pub fn default_candidates(mode: TokenizerMode) -> Vec<Dialect> {
    DELIMITERS
        .iter()
        .map(|&delimiter| Dialect::new(delimiter, mode))
        .collect()
}

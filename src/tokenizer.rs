//! Line tokenizers.

use crate::dialect::{Delimiter, TokenizerMode};

const QUOTE: char = '"';

/// Split one line into fields using the given delimiter and mode.
pub fn tokenize(line: &str, delimiter: Delimiter, mode: TokenizerMode) -> Vec<String> {
    match mode {
        TokenizerMode::Naive => split_naive(line, delimiter),
        TokenizerMode::QuoteAware => split_quote_aware(line, delimiter),
    }
}

/// Split on every delimiter occurrence, then strip quotes and trim each token.
pub fn split_naive(line: &str, delimiter: Delimiter) -> Vec<String> {
    line.split(delimiter.as_char())
        .map(|token| strip_quotes(token).trim().to_string())
        .collect()
}

/// Split outside of quoted spans only.
///
/// Every `"` toggles the quoted state and is dropped. Doubled quotes are not
/// collapsed into a literal quote.
pub fn split_quote_aware(line: &str, delimiter: Delimiter) -> Vec<String> {
    let delimiter = delimiter.as_char();
    let mut fields = Vec::new();
    let mut current_field = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        if c == QUOTE {
            in_quotes = !in_quotes;
            continue;
        }

        if c == delimiter && !in_quotes {
            fields.push(current_field.trim().to_string());
            current_field.clear();
        } else {
            current_field.push(c);
        }
    }

    fields.push(current_field.trim().to_string());
    fields
}

/// Remove one leading and one trailing `"` when both are present.
pub fn strip_quotes(token: &str) -> &str {
    token
        .strip_prefix(QUOTE)
        .and_then(|rest| rest.strip_suffix(QUOTE))
        .unwrap_or(token)
}

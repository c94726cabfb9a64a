//! Building header→value records from tokenized lines.

use foldhash::{HashMap, HashMapExt};
use serde::{Serialize, Serializer};
use tracing::{debug, trace};

use crate::dialect::Dialect;
use crate::error::{Result, ScoutError};
use crate::options::BuildOptions;
use crate::tokenizer::tokenize;

/// A usable line of source text with its 1-based line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// 1-based line number in the source text.
    pub number: usize,
    /// Trimmed line content.
    pub text: &'a str,
}

/// Where a record came from in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Origin {
    /// 1-based line number.
    pub line_number: usize,
    /// The untokenized line.
    pub raw: String,
}

/// One row of the table: column name to value, in column order.
///
/// Every column of the owning table is present; missing values are empty
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Record {
    #[serde(serialize_with = "serialize_fields")]
    fields: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    origin: Option<Origin>,
}

fn serialize_fields<S: Serializer>(
    fields: &[(String, String)],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_map(fields.iter().map(|(k, v)| (k, v)))
}

impl Record {
    /// Create a record from ordered `(column, value)` pairs.
    ///
    /// A repeated column keeps its first position and takes the last value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut fields: Vec<(String, String)> = Vec::new();
        for (key, value) in pairs {
            let key = key.into();
            let value = value.into();
            match fields.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => fields.push((key, value)),
            }
        }
        Self {
            fields,
            origin: None,
        }
    }

    /// Get the value of a column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == column)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate over values in column order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, v)| v.as_str())
    }

    /// Returns the value at a column position, if any.
    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(|(_, v)| v.as_str())
    }

    /// Number of columns.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no columns.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns true if at least one value is non-empty.
    pub fn has_content(&self) -> bool {
        self.fields.iter().any(|(_, v)| !v.is_empty())
    }

    /// Source location, if origin tracking was enabled.
    pub fn origin(&self) -> Option<&Origin> {
        self.origin.as_ref()
    }

    /// All fields as `column: value` lines.
    pub fn details(&self) -> String {
        self.fields
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Records sharing one header, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    dialect: Dialect,
    header: Vec<String>,
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Table {
    /// The dialect the table was built with.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Header names as they appear in the source, duplicates included.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Distinct column names in first-occurrence order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The records.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no record was accepted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Build a table from lines, the first of which is the header.
///
/// Lines are numbered by their position in `lines`.
pub fn build(lines: &[&str], dialect: Dialect, options: &BuildOptions) -> Result<Table> {
    let numbered: Vec<SourceLine<'_>> = lines
        .iter()
        .enumerate()
        .map(|(i, text)| SourceLine {
            number: i + 1,
            text,
        })
        .collect();
    build_from_source(&numbered, dialect, options)
}

/// Build a table from numbered source lines, the first of which is the header.
pub fn build_from_source(
    lines: &[SourceLine<'_>],
    dialect: Dialect,
    options: &BuildOptions,
) -> Result<Table> {
    let Some((header_line, data_lines)) = lines.split_first() else {
        return Err(ScoutError::NoHeader {
            delimiter: dialect.delimiter,
            columns: 0,
        });
    };

    // The tokenizer has already stripped quotes and trimmed each name.
    let header = tokenize(header_line.text, dialect.delimiter, dialect.mode);

    let (columns, sources) = resolve_columns(&header);
    let named_columns = columns.iter().filter(|c| !c.is_empty()).count();
    if named_columns < 2 {
        return Err(ScoutError::NoHeader {
            delimiter: dialect.delimiter,
            columns: named_columns,
        });
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for line in data_lines.iter().take(options.line_ceiling) {
        let values = tokenize(line.text, dialect.delimiter, dialect.mode);

        if !options.row_mode.accepts(values.len(), header.len()) {
            trace!(
                line = line.number,
                fields = values.len(),
                expected = header.len(),
                "skipping row with mismatched field count"
            );
            skipped += 1;
            continue;
        }

        let fields: Vec<(String, String)> = columns
            .iter()
            .zip(&sources)
            .map(|(column, &source)| {
                let value = values.get(source).cloned().unwrap_or_default();
                (column.clone(), value)
            })
            .collect();

        let mut record = Record {
            fields,
            origin: None,
        };

        if !record.has_content() {
            trace!(line = line.number, "skipping empty row");
            skipped += 1;
            continue;
        }

        if options.track_origin {
            record.origin = Some(Origin {
                line_number: line.number,
                raw: line.text.to_string(),
            });
        }

        records.push(record);
    }

    if data_lines.len() > options.line_ceiling {
        debug!(
            ceiling = options.line_ceiling,
            ignored = data_lines.len() - options.line_ceiling,
            "line ceiling reached"
        );
    }

    debug!(
        dialect = %dialect,
        columns = columns.len(),
        records = records.len(),
        skipped,
        "built table"
    );

    Ok(Table {
        dialect,
        header,
        columns,
        records,
    })
}

/// Collapse duplicate header names.
///
/// Returns the distinct names in first-occurrence order and, for each, the
/// header position its value is read from (the last occurrence).
fn resolve_columns(header: &[String]) -> (Vec<String>, Vec<usize>) {
    let mut slots: HashMap<&str, usize> = HashMap::with_capacity(header.len());
    let mut columns = Vec::with_capacity(header.len());
    let mut sources = Vec::with_capacity(header.len());

    for (position, name) in header.iter().enumerate() {
        match slots.get(name.as_str()) {
            Some(&slot) => sources[slot] = position,
            None => {
                slots.insert(name.as_str(), columns.len());
                columns.push(name.clone());
                sources.push(position);
            }
        }
    }

    (columns, sources)
}

//! csv-scout CLI - load delimited text and search it

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use csv_scout::{
    Delimiter, Detection, RecordStore, RowMode, Scout, ScoutError, SearchResult, TokenizerMode,
    count_matches,
};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Load a delimited text file of unknown dialect and search every field.
///
/// Comma, semicolon, tab and pipe are tried; the delimiter yielding the most
/// records is used.
#[derive(Parser, Debug)]
#[command(name = "csv-scout")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file, `-` for stdin, or an http(s) URL
    source: String,

    /// Search terms (each one is searched separately)
    queries: Vec<String>,

    /// Only try this delimiter (comma, semicolon, tab, pipe or the character)
    #[arg(short = 'd', long)]
    delimiter: Option<Delimiter>,

    /// Keep delimiters inside double-quoted fields
    #[arg(long)]
    quote_aware: bool,

    /// Only keep rows with exactly as many fields as the header
    #[arg(long, conflicts_with_all = ["tolerance", "min_fields"])]
    strict: bool,

    /// Number of missing trailing fields a row may have (default: 2)
    #[arg(long, conflicts_with = "min_fields")]
    tolerance: Option<usize>,

    /// Keep any row with at least this many fields
    #[arg(long)]
    min_fields: Option<usize>,

    /// Ignore lines shorter than this many characters
    #[arg(long, default_value = "0")]
    min_line_len: usize,

    /// Maximum number of results per query
    #[arg(short = 'n', long, default_value = "20")]
    limit: usize,

    /// Maximum number of data lines read
    #[arg(long, default_value = "1000")]
    ceiling: usize,

    /// Use this dialect attempt instead of the best one
    #[arg(long)]
    select: Option<usize>,

    /// Print every dialect attempt
    #[arg(long)]
    attempts: bool,

    /// Record the source line of each record
    #[arg(long)]
    origin: bool,

    /// Output format: text (default), json, or csv
    #[arg(short = 'f', long, default_value = "text")]
    format: OutputFormat,

    /// Show every field of each result
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "run failed");
            eprintln!("Error processing {}: {}", args.source, e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn configure(args: &Args) -> Scout {
    let mut scout = Scout::new();

    if let Some(delimiter) = args.delimiter {
        scout.delimiter(delimiter);
    }
    if args.quote_aware {
        scout.tokenizer_mode(TokenizerMode::QuoteAware);
    }

    let row_mode = if args.strict {
        RowMode::Strict
    } else if let Some(min_fields) = args.min_fields {
        RowMode::Permissive { min_fields }
    } else if let Some(tolerance) = args.tolerance {
        RowMode::Lenient { tolerance }
    } else {
        RowMode::default()
    };

    scout
        .row_mode(row_mode)
        .min_line_len(args.min_line_len)
        .line_ceiling(args.ceiling)
        .result_limit(args.limit)
        .track_origin(args.origin);
    scout
}

fn run(args: &Args) -> Result<(), ScoutError> {
    let scout = configure(args);
    let store = RecordStore::new();

    let detection = load(&scout, &args.source, &store)?;
    if let Some(index) = args.select {
        detection.select(index, &store)?;
    }

    let mut out = io::stdout().lock();
    if args.attempts || args.queries.is_empty() {
        print_attempts(&mut out, &detection, &store, args.format)?;
    }

    if args.queries.is_empty() {
        return Ok(());
    }
    let Some(table) = store.active_table() else {
        return Err(ScoutError::NoViableDialect);
    };

    if args.format == OutputFormat::Csv {
        let batches: Vec<(&str, Vec<SearchResult>)> = args
            .queries
            .iter()
            .map(|query| (query.as_str(), scout.search(&store, query)))
            .collect();
        return print_csv_results(&mut out, table.columns(), &batches);
    }

    for query in &args.queries {
        let results = scout.search(&store, query);
        let total = count_matches(&table, query);
        match args.format {
            OutputFormat::Json => print_json_results(&mut out, query, &results, total)?,
            _ => print_text_results(&mut out, query, &results, total, args.verbose)?,
        }
    }

    Ok(())
}

fn load(scout: &Scout, source: &str, store: &RecordStore) -> Result<Detection, ScoutError> {
    if source == "-" {
        return scout.load_reader(io::stdin().lock(), store);
    }

    #[cfg(feature = "http")]
    if csv_scout::http::is_url(source) {
        return scout.load_url(source, store);
    }

    #[cfg(not(feature = "http"))]
    if source.starts_with("http://") || source.starts_with("https://") {
        return Err(ScoutError::FetchFailed(
            "URL sources need the `http` feature".to_string(),
        ));
    }

    scout.load_path(Path::new(source), store)
}

fn print_attempts(
    out: &mut impl Write,
    detection: &Detection,
    store: &RecordStore,
    format: OutputFormat,
) -> Result<(), ScoutError> {
    if format == OutputFormat::Json {
        let json = serde_json::json!({
            "attempts": detection.attempts,
            "best": detection.best,
            "records": store.record_count(),
        });
        writeln!(out, "{json}")?;
        return Ok(());
    }

    for (i, attempt) in detection.attempts.iter().enumerate() {
        let marker = if detection.best == Some(i) { '*' } else { ' ' };
        let d = attempt.dialect.delimiter;
        if attempt.success {
            writeln!(
                out,
                "{marker} [{i}] {} - {}: {} records, columns: {}",
                d.label(),
                d.description(),
                attempt.record_count,
                attempt.header_preview.join(", ")
            )?;
        } else {
            writeln!(
                out,
                "{marker} [{i}] {} - {}: failed ({})",
                d.label(),
                d.description(),
                attempt.error.as_deref().unwrap_or("unknown error")
            )?;
        }
    }
    writeln!(out, "Active records: {}", store.record_count())?;
    writeln!(out)?;
    Ok(())
}

fn print_text_results(
    out: &mut impl Write,
    query: &str,
    results: &[SearchResult],
    total: usize,
    verbose: bool,
) -> Result<(), ScoutError> {
    writeln!(out, "Query: {query} ({} of {total} matches)", results.len())?;
    for result in results {
        writeln!(out, "  {}. {}  {}", result.id + 1, result.code, result.name)?;
        if !result.summary.is_empty() {
            writeln!(out, "     {}", result.summary)?;
        }
        if verbose {
            if let Some(origin) = result.record.origin() {
                writeln!(out, "     line {}: {}", origin.line_number, origin.raw)?;
            }
            for line in result.details.lines() {
                writeln!(out, "       {line}")?;
            }
        }
    }
    writeln!(out)?;
    Ok(())
}

fn print_json_results(
    out: &mut impl Write,
    query: &str,
    results: &[SearchResult],
    total: usize,
) -> Result<(), ScoutError> {
    let json = serde_json::json!({
        "query": query,
        "total": total,
        "results": results,
    });
    writeln!(out, "{json}")?;
    Ok(())
}

/// Write all queries' results as one CSV table with a leading `query` column.
fn print_csv_results(
    out: &mut impl Write,
    columns: &[String],
    batches: &[(&str, Vec<SearchResult>)],
) -> Result<(), ScoutError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(std::iter::once("query").chain(columns.iter().map(String::as_str)))?;
    for (query, results) in batches {
        for result in results {
            writer.write_record(std::iter::once(*query).chain(result.record.values()))?;
        }
    }
    writer.flush()?;
    Ok(())
}

//! Integration tests for csv-scout

use csv_scout::{
    BuildOptions, Delimiter, Dialect, Record, RecordStore, RowMode, Scout, ScoutError,
    SearchEngine, TokenizerMode, build, count_matches, default_candidates, detect, search,
    tokenize,
};
use std::io::Cursor;
use std::io::Write;
use tempfile::NamedTempFile;

const PLANT: &str = "id,name,loc\n1,Boiler,B1\n2,Pump,B1\n";

#[test]
fn test_boiler_scenario() {
    let scout = Scout::new();
    let store = RecordStore::new();
    scout.load_text(PLANT, &store).unwrap();

    let results = scout.search(&store, "boiler");

    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].record,
        Record::from_pairs([("id", "1"), ("name", "Boiler"), ("loc", "B1")])
    );
}

#[test]
fn test_short_row_with_tolerance_one() {
    let mut scout = Scout::new();
    scout.row_mode(RowMode::Lenient { tolerance: 1 });
    let store = RecordStore::new();
    scout.load_text("id,name,loc\n1,Boiler,B1\n3,Fan\n", &store).unwrap();

    let table = store.active_table().unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.records()[1].get("id"), Some("3"));
    assert_eq!(table.records()[1].get("loc"), Some(""));
}

#[test]
fn test_all_candidates_fail() {
    let scout = Scout::new();
    let store = RecordStore::new();

    let result = scout.load_text("first\nsecond\nthird\n", &store);

    assert!(matches!(result, Err(ScoutError::NoViableDialect)));
    assert!(!store.is_loaded());
}

#[test]
fn test_detect_each_delimiter() {
    let cases = [
        ("name,age,city\nAlice,30,NYC\nBob,25,LA\n", Delimiter::Comma),
        ("name;age;city\nAlice;30;NYC\nBob;25;LA\n", Delimiter::Semicolon),
        ("name\tage\tcity\nAlice\t30\tNYC\nBob\t25\tLA\n", Delimiter::Tab),
        ("name|age|city\nAlice|30|NYC\nBob|25|LA\n", Delimiter::Pipe),
    ];

    for (text, expected) in cases {
        let detection = Scout::new().detect(text).unwrap();
        assert_eq!(
            detection.best_attempt().unwrap().dialect.delimiter,
            expected,
            "text: {text:?}"
        );
    }
}

#[test]
fn test_best_has_maximum_record_count() {
    let text = "a;b,c\n1;2\n3;4\n5,6\n";
    let detection = detect(
        text,
        &default_candidates(TokenizerMode::Naive),
        &BuildOptions {
            row_mode: RowMode::Strict,
            ..BuildOptions::default()
        },
    )
    .unwrap();

    let best = detection.best_attempt().unwrap();
    let max = detection
        .attempts
        .iter()
        .map(|a| a.record_count)
        .max()
        .unwrap();
    assert_eq!(best.record_count, max);
    assert_eq!(best.dialect.delimiter, Delimiter::Semicolon);
}

#[test]
fn test_attempt_summaries() {
    let detection = Scout::new().detect("a|b|c|d|e|f\n1|2|3|4|5|6\n").unwrap();

    assert_eq!(detection.attempts.len(), 4);
    let pipe = &detection.attempts[3];
    assert!(pipe.success);
    assert_eq!(pipe.record_count, 1);
    assert_eq!(pipe.header_preview, vec!["a", "b", "c", "d", "e"]);

    let comma = &detection.attempts[0];
    assert!(!comma.success);
    assert!(comma.error.as_deref().unwrap().contains("comma"));
}

#[test]
fn test_well_formed_rows_keep_values() {
    let lines = ["\"code\",\"label\",\"site\"", "\"A-1\", Valve ,North", "B-2,Tank,\"South\""];
    let table = build(
        &lines,
        Dialect::new(Delimiter::Comma, TokenizerMode::Naive),
        &BuildOptions::default(),
    )
    .unwrap();

    let values: Vec<Vec<&str>> = table
        .records()
        .iter()
        .map(|r| r.values().collect())
        .collect();
    assert_eq!(values, vec![vec!["A-1", "Valve", "North"], vec!["B-2", "Tank", "South"]]);
}

#[test]
fn test_quote_aware_preserves_embedded_delimiter() {
    for delimiter in [Delimiter::Comma, Delimiter::Semicolon, Delimiter::Pipe] {
        let d = delimiter.as_char();
        let line = format!("\"left{d}right\"{d}next");
        assert_eq!(
            tokenize(&line, delimiter, TokenizerMode::QuoteAware),
            vec![format!("left{d}right"), "next".to_string()]
        );
    }
}

#[test]
fn test_search_is_bounded_ordered_filter() {
    let mut text = String::from("id,name,group\n");
    for i in 0..60 {
        let group = if i % 3 == 0 { "Alpha" } else { "beta" };
        text.push_str(&format!("{i},unit {i},{group}\n"));
    }
    let mut scout = Scout::new();
    scout.result_limit(7);
    let store = RecordStore::new();
    scout.load_text(&text, &store).unwrap();
    let table = store.active_table().unwrap();

    let results = scout.search(&store, "ALPHA");

    assert_eq!(results.len(), 7);
    assert_eq!(count_matches(&table, "alpha"), 20);
    let positions: Vec<usize> = results
        .iter()
        .map(|r| table.records().iter().position(|t| *t == r.record).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    for result in &results {
        assert!(
            result
                .record
                .values()
                .any(|v| v.to_lowercase().contains("alpha"))
        );
    }
}

#[test]
fn test_empty_and_oversized_queries() {
    let store = RecordStore::new();
    let scout = Scout::new();
    assert!(scout.search(&store, "boiler").is_empty());

    scout.load_text(PLANT, &store).unwrap();
    assert!(scout.search(&store, "").is_empty());
    assert!(scout.search(&store, "a much longer query than any value").is_empty());
}

#[test]
fn test_default_limit_is_twenty() {
    let mut text = String::from("id,name\n");
    for i in 0..50 {
        text.push_str(&format!("{i},pump {i}\n"));
    }
    let store = RecordStore::new();
    Scout::new().load_text(&text, &store).unwrap();

    let engine = SearchEngine::default();
    assert_eq!(engine.search_store(&store, "pump").len(), 20);
    let table = store.active_table().unwrap();
    assert_eq!(search(&table, "pump", 50).len(), 50);
}

#[test]
fn test_line_ceiling_default() {
    let mut text = String::from("id,name\n");
    for i in 0..1200 {
        text.push_str(&format!("{i},row\n"));
    }
    let store = RecordStore::new();
    Scout::new().load_text(&text, &store).unwrap();

    assert_eq!(store.record_count(), 1000);
}

#[test]
fn test_noise_lines_filtered() {
    let mut scout = Scout::new();
    scout.min_line_len(4);
    let store = RecordStore::new();
    scout
        .load_text("id,name\n--\n1,Boiler\n;\n2,Pump\n", &store)
        .unwrap();

    assert_eq!(store.record_count(), 2);
}

#[test]
fn test_reload_replaces_table() {
    let scout = Scout::new();
    let store = RecordStore::new();
    scout.load_text(PLANT, &store).unwrap();
    scout.load_text("tag;kind\nT1;fan\n", &store).unwrap();

    let table = store.active_table().unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.dialect().delimiter, Delimiter::Semicolon);
    assert!(scout.search(&store, "boiler").is_empty());
}

#[test]
fn test_manual_selection() {
    // Pipe wins on record count; comma is picked by hand.
    let text = "a,b|c\n1,2|3\n4|5\n6|7\n";
    let mut scout = Scout::new();
    scout.row_mode(RowMode::Strict);
    let store = RecordStore::new();
    let detection = scout.load_text(text, &store).unwrap();
    assert_eq!(
        store.active_table().unwrap().dialect().delimiter,
        Delimiter::Pipe
    );

    detection.select(0, &store).unwrap();
    assert_eq!(
        store.active_table().unwrap().dialect().delimiter,
        Delimiter::Comma
    );
}

#[test]
fn test_origin_tracking() {
    let mut scout = Scout::new();
    scout.track_origin(true);
    let store = RecordStore::new();
    scout.load_text("id,name\n\n1,line3\n", &store).unwrap();

    let results = scout.search(&store, "line3");
    let origin = results[0].record.origin().unwrap();
    assert_eq!(origin.line_number, 3);
    assert_eq!(origin.raw, "1,line3");
    // Origin data is not searchable.
    assert!(scout.search(&store, "1,line3").is_empty());
}

#[test]
fn test_windows_line_endings() {
    let store = RecordStore::new();
    Scout::new()
        .load_text("name,age\r\nAlice,30\r\nBob,25\r\n", &store)
        .unwrap();

    let table = store.active_table().unwrap();
    assert_eq!(table.records()[1].get("age"), Some("25"));
}

#[test]
fn test_load_from_reader() {
    let store = RecordStore::new();
    Scout::new()
        .load_reader(Cursor::new(PLANT.as_bytes().to_vec()), &store)
        .unwrap();

    assert_eq!(store.record_count(), 2);
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "id\tname\tloc").unwrap();
    writeln!(temp_file, "1\tBoiler\tB1").unwrap();
    writeln!(temp_file, "2\tPump\tB2").unwrap();
    temp_file.flush().unwrap();

    let store = RecordStore::new();
    let detection = Scout::new().load_path(temp_file.path(), &store).unwrap();

    assert_eq!(
        detection.best_attempt().unwrap().dialect.delimiter,
        Delimiter::Tab
    );
    assert_eq!(store.record_count(), 2);
}

#[test]
fn test_missing_file_is_fetch_failure() {
    let store = RecordStore::new();
    let result = Scout::new().load_path("/no/such/file.csv", &store);
    assert!(matches!(result, Err(ScoutError::FetchFailed(_))));
}

#[test]
fn test_utf8_bom_and_non_ascii() {
    let mut data = vec![0xEF, 0xBB, 0xBF];
    data.extend_from_slice("코드,이름\nF-1,보일러\nF-2,펌프\n".as_bytes());

    let scout = Scout::new();
    let store = RecordStore::new();
    scout.load_bytes(&data, &store).unwrap();

    let table = store.active_table().unwrap();
    assert_eq!(table.columns(), ["코드", "이름"]);
    assert_eq!(scout.search(&store, "펌프")[0].code, "F-2");
}

#[test]
fn test_build_idempotent() {
    let lines = ["a|b|c", "1|2|3", "4|5", "|||"];
    let dialect = Dialect::new(Delimiter::Pipe, TokenizerMode::QuoteAware);
    let options = BuildOptions::default();

    assert_eq!(
        build(&lines, dialect, &options).unwrap(),
        build(&lines, dialect, &options).unwrap()
    );
}

#[test]
fn test_damaged_utf8_stays_searchable() {
    let rows = "코드,이름,위치\nF-1,보일러,지하\nF-2,펌프,1층\nF-3,환풍기,";
    let scout = Scout::new();

    // Final character cut off mid-sequence.
    let mut truncated = rows.as_bytes().to_vec();
    truncated.extend_from_slice(&"지".as_bytes()[..2]);
    let store = RecordStore::new();
    scout.load_bytes(&truncated, &store).unwrap();
    assert_eq!(
        store.active_table().unwrap().columns(),
        ["코드", "이름", "위치"]
    );
    assert_eq!(scout.search(&store, "보일러").len(), 1);

    // Stray invalid byte between rows.
    let mut stray = "코드,이름\nF-1,보일러\n".as_bytes().to_vec();
    stray.push(0xFF);
    stray.extend_from_slice("\nF-2,펌프\n".as_bytes());
    let store = RecordStore::new();
    scout.load_bytes(&stray, &store).unwrap();
    assert_eq!(store.active_table().unwrap().columns(), ["코드", "이름"]);
    assert_eq!(scout.search(&store, "펌프")[0].code, "F-2");
}

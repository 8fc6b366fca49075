//! Tests for the log entry scanner

mod common;

use dialog_flow::{FlowError, LogEntryScanner};
use dialog_types::{LogConfig, Relation};
use std::io::Cursor;

fn scan(log: &str) -> (Vec<Result<dialog_types::Entry, FlowError>>, dialog_flow::ScanStats) {
    let mut scanner = LogEntryScanner::new(Cursor::new(log.to_string()), &LogConfig::default())
        .expect("scanner patterns compile");
    let items: Vec<_> = scanner.by_ref().collect();
    (items, scanner.stats().clone())
}

#[test]
fn test_sample_log_entries_and_counters() {
    let (items, stats) = scan(common::SAMPLE_LOG);
    let entries: Vec<_> = items.into_iter().map(|e| e.unwrap()).collect();

    assert_eq!(entries.len(), 10);
    assert_eq!(stats.entries, 10);
    assert_eq!(stats.error_entries, 1);
    assert_eq!(stats.rejected_entries, 1);
    assert_eq!(stats.skipped_lines, 3);
    assert_eq!(stats.stray_lines, 0);

    let first = &entries[0];
    assert_eq!(first.kind, "R");
    assert_eq!(first.timestamp, "10:00:01.00");
    assert_eq!(first.relation, Relation::Sent);
    assert_eq!(first.other, "TEXTTAGGER");
    assert_eq!(first.body, "(TELL :RECEIVER IM :CONTENT (WORDS \"hello\"))");
    assert_eq!(first.line, 3);

    assert_eq!(entries[1].relation, Relation::Received);
    assert_eq!(entries[1].line, 6);
    assert!(entries.iter().all(|e| e.kind != "ERROR"));
    assert!(entries.iter().all(|e| !e.body.starts_with("(SORRY ")));
}

#[test]
fn test_multiline_body_is_joined() {
    let log = "<R T=\"00:00:01.0\" S=\"IM\">\n(TELL\n :RECEIVER DAGENT\n :CONTENT (X))\n</R>\n";
    let (items, _) = scan(log);
    assert_eq!(items.len(), 1);
    let entry = items.into_iter().next().unwrap().unwrap();
    assert_eq!(entry.body, "(TELL\n :RECEIVER DAGENT\n :CONTENT (X))");
}

#[test]
fn test_empty_body_and_crlf_lines() {
    let log = "<S T=\"00:00:01.0\" R=\"IM\">\r\n</S>\r\n";
    let (items, stats) = scan(log);
    let entry = items.into_iter().next().unwrap().unwrap();
    assert_eq!(entry.body, "");
    assert_eq!(entry.other, "IM");
    assert_eq!(stats.entries, 1);
}

#[test]
fn test_unterminated_entry_is_malformed() {
    let log = "<R T=\"00:00:01.0\" S=\"IM\">\n(TELL :RECEIVER DAGENT)\n<R T=\"00:00:02.0\" S=\"IM\">\n";
    let (items, _) = scan(log);
    assert_eq!(items.len(), 1);
    match &items[0] {
        Err(FlowError::MalformedLogEntry { line, reason }) => {
            assert_eq!(*line, 1);
            assert!(reason.contains("never closed"));
        }
        other => panic!("expected MalformedLogEntry, got {other:?}"),
    }
}

#[test]
fn test_scanner_stops_after_error() {
    let log = "<R T=\"00:00:01.0\" S=\"IM\">\n";
    let mut scanner =
        LogEntryScanner::new(Cursor::new(log.to_string()), &LogConfig::default()).unwrap();
    assert!(matches!(scanner.next(), Some(Err(_))));
    assert!(scanner.next().is_none());
}

#[test]
fn test_stray_lines_are_skipped_and_counted() {
    let log = "garbage before\n<R T=\"00:00:01.0\" S=\"IM\">\n(X)\n</R>\n  indented noise\n";
    let (items, stats) = scan(log);
    assert_eq!(items.len(), 1);
    assert!(items[0].is_ok());
    assert_eq!(stats.stray_lines, 2);
}

#[test]
fn test_custom_error_kind() {
    let config = LogConfig {
        error_kind: "FAULT".to_string(),
        ..LogConfig::default()
    };
    let log = "<FAULT T=\"00:00:01.0\" S=\"IM\">\n(X)\n</FAULT>\n<ERROR T=\"00:00:02.0\" S=\"IM\">\n(Y)\n</ERROR>\n";
    let mut scanner = LogEntryScanner::new(Cursor::new(log.to_string()), &config).unwrap();
    let entries: Vec<_> = scanner.by_ref().map(|e| e.unwrap()).collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, "ERROR");
    assert_eq!(scanner.stats().error_entries, 1);
}

#[test]
fn test_latin1_byte_in_body_is_decoded_lossily() {
    let mut log = b"<R T=\"00:00:01.0\" S=\"IM\">\r\n(TELL :RECEIVER DAGENT :CONTENT (WORDS \"caf".to_vec();
    log.push(0xE9);
    log.extend_from_slice(b"\"))\r\n</R>\r\n");

    let mut scanner = LogEntryScanner::new(Cursor::new(log), &LogConfig::default()).unwrap();
    let entries: Vec<_> = scanner.by_ref().map(|e| e.unwrap()).collect();

    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0].body,
        "(TELL :RECEIVER DAGENT :CONTENT (WORDS \"caf\u{FFFD}\"))"
    );
    assert_eq!(scanner.stats().entries, 1);
}

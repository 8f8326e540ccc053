#![allow(dead_code)]

use tablegrep::Dataset;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

pub fn customers() -> Dataset {
    Dataset::from_records(
        vec!["Name", "Plan", "Status"],
        vec![
            vec![Some("Alice"), Some("Premium"), Some("Active")],
            vec![Some("Bob"), Some("Standard"), Some("Inactive")],
            vec![Some("Charlie"), Some("Premium"), Some("Active")],
            vec![Some("Dora"), Some("Premium"), Some("Inactive")],
        ],
    )
}

pub fn keywords() -> Dataset {
    Dataset::from_records(
        vec!["Keyword", "Note"],
        vec![
            vec![Some("  premium "), Some("")],
            vec![Some("alice"), None],
            vec![Some("premium"), Some("dup")],
        ],
    )
}

pub fn indexes(rows: &[tablegrep::ResultRow]) -> Vec<usize> {
    rows.iter().map(|row| row.index).collect()
}

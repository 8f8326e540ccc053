#![allow(dead_code)]
//! Shared fixtures for `search-table` integration tests.

use search_table::*;

pub fn sample_dataset() -> Dataset {
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

pub fn sample_cache() -> CellCache {
    CellCache::build(&sample_dataset())
}

pub fn insensitive() -> SearchOptions {
    SearchOptions::default()
}

pub fn run(cache: &CellCache, query: &str, options: SearchOptions) -> Vec<usize> {
    evaluate_query(cache, query, &options, &ColumnSelection::All).unwrap()
}

pub fn run_in(cache: &CellCache, query: &str, options: SearchOptions, columns: &[usize]) -> Vec<usize> {
    let selection = ColumnSelection::from_indexes(columns.iter().copied(), cache.column_count());
    evaluate_query(cache, query, &options, &selection).unwrap()
}

pub fn table(headers: &[&str], rows: &[&[&str]]) -> (Dataset, CellCache) {
    let records: Vec<Vec<Option<&str>>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| Some(*cell)).collect())
        .collect();
    let dataset = Dataset::from_records(headers.to_vec(), records);
    let cache = CellCache::build(&dataset);
    (dataset, cache)
}

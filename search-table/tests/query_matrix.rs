//! Boolean query evaluation over the four-row customer table.

mod common;

use common::*;
use search_table::*;

#[test]
fn single_operand_substring() {
    let cache = sample_cache();
    assert_eq!(run(&cache, "premium", insensitive()), [0, 2, 3]);
    assert_eq!(run(&cache, "active", insensitive()), [0, 1, 2, 3]);
    assert_eq!(run(&cache, "zzz", insensitive()), Vec::<usize>::new());
}

#[test]
fn and_not_combination() {
    let cache = sample_cache();
    assert_eq!(run(&cache, "premium AND NOT Bob", insensitive()), [0, 2, 3]);
    assert_eq!(run(&cache, "premium AND NOT inactive", insensitive()), [0, 2]);
}

#[test]
fn implicit_operands_without_operator_fail() {
    let cache = sample_cache();
    let err = evaluate_query(&cache, "alice bob", &insensitive(), &ColumnSelection::All).unwrap_err();
    assert_eq!(err, SearchError::InvalidBooleanExpression);
}

#[test]
fn or_and_precedence() {
    let cache = sample_cache();
    // AND binds tighter: alice OR (bob AND premium)
    assert_eq!(run(&cache, "alice OR bob AND premium", insensitive()), [0]);
    assert_eq!(run(&cache, "(alice OR bob) AND standard", insensitive()), [1]);
}

#[test]
fn lowercase_keywords_are_operators() {
    let cache = sample_cache();
    assert_eq!(run(&cache, "alice or dora", insensitive()), [0, 3]);
    assert_eq!(run(&cache, "not premium", insensitive()), [1]);
}

#[test]
fn quoted_keyword_is_an_operand() {
    let (_, cache) = table(&["Text"], &[&["this and that"], &["this or that"]]);
    assert_eq!(run(&cache, "\"and\"", insensitive()), [0]);
    assert_eq!(run(&cache, "\"this or\"", insensitive()), [1]);
}

#[test]
fn case_sensitivity() {
    let cache = sample_cache();
    let sensitive = SearchOptions::new(true, false);
    assert_eq!(run(&cache, "premium", sensitive), Vec::<usize>::new());
    assert_eq!(run(&cache, "Premium", sensitive), [0, 2, 3]);
    assert_eq!(run(&cache, "PREMIUM", insensitive()), [0, 2, 3]);
}

#[test]
fn exact_match_compares_whole_cells() {
    let cache = sample_cache();
    let exact = SearchOptions::new(false, true);
    assert_eq!(run(&cache, "active", exact), [0, 2]);
    assert_eq!(run(&cache, "prem", exact), Vec::<usize>::new());
    assert_eq!(run(&cache, "active", insensitive()), [0, 1, 2, 3]);
    let exact_sensitive = SearchOptions::new(true, true);
    assert_eq!(run(&cache, "active", exact_sensitive), Vec::<usize>::new());
    assert_eq!(run(&cache, "Active", exact_sensitive), [0, 2]);
}

#[test]
fn column_restriction() {
    let cache = sample_cache();
    assert_eq!(run_in(&cache, "premium", insensitive(), &[1]), [0, 2, 3]);
    assert_eq!(run_in(&cache, "alice", insensitive(), &[1, 2]), Vec::<usize>::new());
    assert_eq!(run_in(&cache, "alice", insensitive(), &[0]), [0]);
}

#[test]
fn restriction_by_key() {
    let dataset = sample_dataset();
    let cache = CellCache::build(&dataset);
    let selection = ColumnSelection::from_keys(["col.Status"], dataset.columns());
    let rows = evaluate_query(&cache, "inactive", &insensitive(), &selection).unwrap();
    assert_eq!(rows, [1, 3]);
    assert_eq!(selection.describe(dataset.columns()), "Status");
}

#[test]
fn blank_query_returns_every_row() {
    let cache = sample_cache();
    assert_eq!(run(&cache, "", insensitive()), [0, 1, 2, 3]);
    assert_eq!(run(&cache, "   ", insensitive()), [0, 1, 2, 3]);
}

#[test]
fn syntax_errors_surface() {
    let cache = sample_cache();
    for query in ["(alice", "alice)", ")("] {
        let err = evaluate_query(&cache, query, &insensitive(), &ColumnSelection::All).unwrap_err();
        assert!(matches!(err, SearchError::Syntax(_)), "{query}: {err:?}");
    }
    for query in ["AND", "alice AND", "NOT", "()"] {
        let err = evaluate_query(&cache, query, &insensitive(), &ColumnSelection::All).unwrap_err();
        assert_eq!(err, SearchError::InvalidBooleanExpression, "{query}");
    }
}

#[test]
fn malformed_query_fails_on_empty_table() {
    let cache = CellCache::build(&Dataset::default());
    let err = evaluate_query(&cache, "a b", &insensitive(), &ColumnSelection::All).unwrap_err();
    assert_eq!(err, SearchError::InvalidBooleanExpression);
    assert_eq!(run(&cache, "a", insensitive()), Vec::<usize>::new());
}

#[test]
fn results_are_ascending_and_repeatable() {
    let cache = sample_cache();
    for query in ["premium OR bob", "NOT alice", "(a OR e) AND NOT standard", "i"] {
        let first = run(&cache, query, insensitive());
        assert!(first.windows(2).all(|pair| pair[0] < pair[1]), "{query}");
        assert_eq!(first, run(&cache, query, insensitive()), "{query}");
    }
}

#[test]
fn double_negation_and_tautology() {
    let cache = sample_cache();
    assert_eq!(
        run(&cache, "NOT NOT premium", insensitive()),
        run(&cache, "premium", insensitive())
    );
    assert_eq!(run(&cache, "bob OR NOT bob", insensitive()), [0, 1, 2, 3]);
    assert_eq!(run(&cache, "bob AND NOT bob", insensitive()), Vec::<usize>::new());
}

#[test]
fn empty_cells_never_match() {
    let (_, cache) = table(&["A", "B"], &[&["", "x"], &["y"]]);
    assert_eq!(run(&cache, "NOT x", insensitive()), [1]);
    assert_eq!(run_in(&cache, "y OR x", insensitive(), &[1]), [0]);
}

#[test]
fn match_row_respects_restriction() {
    let cache = sample_cache();
    let options = insensitive();
    assert!(match_row(&cache, 0, "alice", &options, &[]));
    assert!(!match_row(&cache, 0, "alice", &options, &[1, 2]));
    assert!(!match_row(&cache, 0, "", &options, &[]));
    assert!(!match_row(&cache, 42, "alice", &options, &[]));
}

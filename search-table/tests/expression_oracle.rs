//! Cross-checks `evaluate` against direct boolean evaluation of generated
//! expressions, row by row, using `match_row` for the leaves.

mod common;

use common::*;
use search_table::*;

#[derive(Clone)]
enum Expr {
    Term(&'static str),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    fn render(&self) -> String {
        match self {
            Expr::Term(term) => term.to_string(),
            Expr::Not(inner) => format!("NOT ({})", inner.render()),
            Expr::And(left, right) => format!("({}) AND ({})", left.render(), right.render()),
            Expr::Or(left, right) => format!("({}) OR ({})", left.render(), right.render()),
        }
    }

    fn holds(&self, cache: &CellCache, row: usize, options: &SearchOptions, columns: &[usize]) -> bool {
        match self {
            Expr::Term(term) => match_row(cache, row, term, options, columns),
            Expr::Not(inner) => !inner.holds(cache, row, options, columns),
            Expr::And(left, right) => {
                left.holds(cache, row, options, columns) && right.holds(cache, row, options, columns)
            }
            Expr::Or(left, right) => {
                left.holds(cache, row, options, columns) || right.holds(cache, row, options, columns)
            }
        }
    }
}

const TERMS: [&str; 5] = ["premium", "Bob", "active", "in", "zzz"];

fn leaves() -> Vec<Expr> {
    TERMS.iter().map(|&term| Expr::Term(term)).collect()
}

fn grow(parts: &[Expr], atoms: &[Expr]) -> Vec<Expr> {
    let mut out = Vec::new();
    for part in parts {
        out.push(Expr::Not(Box::new(part.clone())));
        for atom in atoms {
            out.push(Expr::And(Box::new(part.clone()), Box::new(atom.clone())));
            out.push(Expr::Or(Box::new(atom.clone()), Box::new(part.clone())));
        }
    }
    out
}

fn expressions() -> Vec<Expr> {
    let atoms = leaves();
    let level1 = grow(&atoms, &atoms);
    let level2 = grow(&level1, &atoms);
    atoms.into_iter().chain(level1).chain(level2).collect()
}

fn check_all(options: SearchOptions, columns: &[usize]) {
    let cache = sample_cache();
    let selection = ColumnSelection::from_indexes(columns.iter().copied(), cache.column_count());
    let restriction = selection.indexes(cache.column_count());
    for expr in expressions() {
        let query = expr.render();
        let rows = evaluate_query(&cache, &query, &options, &selection).unwrap();
        let expected: Vec<usize> = (0..cache.len())
            .filter(|&row| expr.holds(&cache, row, &options, &restriction))
            .collect();
        assert_eq!(rows, expected, "{query} with {options:?} on {columns:?}");
    }
}

#[test]
fn generated_queries_agree_with_direct_evaluation() {
    check_all(insensitive(), &[]);
}

#[test]
fn generated_queries_agree_case_sensitive() {
    check_all(SearchOptions::new(true, false), &[]);
}

#[test]
fn generated_queries_agree_exact() {
    check_all(SearchOptions::new(false, true), &[]);
}

#[test]
fn generated_queries_agree_on_restricted_columns() {
    check_all(insensitive(), &[1, 2]);
    check_all(SearchOptions::new(false, true), &[0]);
}

#[test]
fn unparenthesized_precedence_matches_direct_evaluation() {
    let cache = sample_cache();
    let options = insensitive();
    // NOT binds tighter than AND, which binds tighter than OR.
    let expr = Expr::Or(
        Box::new(Expr::Term("bob")),
        Box::new(Expr::And(
            Box::new(Expr::Not(Box::new(Expr::Term("premium")))),
            Box::new(Expr::Term("active")),
        )),
    );
    let rows = run(&cache, "bob OR NOT premium AND active", options);
    let expected: Vec<usize> = (0..cache.len())
        .filter(|&row| expr.holds(&cache, row, &options, &[]))
        .collect();
    assert_eq!(rows, expected);
}

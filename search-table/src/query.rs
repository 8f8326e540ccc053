use crate::{CellCache, ColumnSelection, SearchOptions};
use query_syntax::{CompileError, Operator, Token, compile_to_postfix, tokenize};
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error(transparent)]
    Syntax(#[from] CompileError),
    /// The postfix program does not reduce to exactly one value, e.g. two
    /// operands with no operator between them.
    #[error("invalid boolean expression")]
    InvalidBooleanExpression,
}

/// Whether `keyword` occurs in row `row`, looking only at `column_indexes`
/// (every column when the slice is empty).
///
/// Rows outside the cache and blank keywords never match. Empty cells are
/// skipped.
pub fn match_row(
    cache: &CellCache,
    row: usize,
    keyword: &str,
    options: &SearchOptions,
    column_indexes: &[usize],
) -> bool {
    let Some(cells) = cache.row(row, options.case_sensitive) else {
        return false;
    };
    cells_match(cells, &options.normalize(keyword), options, column_indexes)
}

// `needle` is already normalized for `options`.
fn cells_match(
    cells: &[String],
    needle: &str,
    options: &SearchOptions,
    column_indexes: &[usize],
) -> bool {
    if needle.is_empty() {
        return false;
    }
    let hit = |cell: &String| !cell.is_empty() && options.cell_matches(cell, needle);
    if column_indexes.is_empty() {
        cells.iter().any(hit)
    } else {
        column_indexes
            .iter()
            .filter_map(|&index| cells.get(index))
            .any(hit)
    }
}

/// Row indexes, in dataset order, whose cells satisfy the boolean query in
/// `tokens`. An empty token list selects every row.
///
/// The column restriction is resolved once and applies to every operand.
pub fn evaluate(
    cache: &CellCache,
    tokens: &[Token],
    options: &SearchOptions,
    selection: &ColumnSelection,
) -> Result<Vec<usize>, SearchError> {
    if tokens.is_empty() {
        return Ok((0..cache.len()).collect());
    }

    let start = Instant::now();
    let program = compile_to_postfix(tokens)?;
    // Checked up front so a malformed query fails even on an empty table.
    check_arity(&program)?;

    // Operands are folded once here rather than once per row.
    let program: Vec<Token> = program
        .into_iter()
        .map(|token| match token {
            Token::Operand(keyword) => Token::Operand(options.normalize(&keyword).into_owned()),
            operator => operator,
        })
        .collect();
    let columns = selection.indexes(cache.column_count());
    let mut stack = Vec::with_capacity(program.len());
    let mut matches = Vec::new();
    for row in 0..cache.len() {
        let Some(cells) = cache.row(row, options.case_sensitive) else {
            continue;
        };
        let keep = run_program(&program, &mut stack, |needle| {
            cells_match(cells, needle, options, &columns)
        })?;
        if keep {
            matches.push(row);
        }
    }

    debug!(
        "Evaluated {} postfix tokens over {} rows: {} matches, time: {:?}",
        program.len(),
        cache.len(),
        matches.len(),
        start.elapsed()
    );
    Ok(matches)
}

/// Tokenizes `query` and evaluates it. See [`evaluate`].
pub fn evaluate_query(
    cache: &CellCache,
    query: &str,
    options: &SearchOptions,
    selection: &ColumnSelection,
) -> Result<Vec<usize>, SearchError> {
    evaluate(cache, &tokenize(query), options, selection)
}

/// Verifies that the postfix program never pops from an empty stack and
/// leaves exactly one value behind.
pub fn check_arity(program: &[Token]) -> Result<(), SearchError> {
    let mut depth = 0usize;
    for token in program {
        match token {
            Token::Operand(_) => depth += 1,
            Token::Operator(op) => {
                let arity = op.arity();
                if arity == 0 || depth < arity {
                    return Err(SearchError::InvalidBooleanExpression);
                }
                depth = depth - arity + 1;
            }
        }
    }
    if depth == 1 {
        Ok(())
    } else {
        Err(SearchError::InvalidBooleanExpression)
    }
}

// Stack machine for one row. `stack` is reused across rows to avoid
// reallocating.
fn run_program(
    program: &[Token],
    stack: &mut Vec<bool>,
    mut operand: impl FnMut(&str) -> bool,
) -> Result<bool, SearchError> {
    stack.clear();
    for token in program {
        match token {
            Token::Operand(keyword) => stack.push(operand(keyword)),
            Token::Operator(Operator::Not) => {
                let value = pop(stack)?;
                stack.push(!value);
            }
            Token::Operator(Operator::And) => {
                let right = pop(stack)?;
                let left = pop(stack)?;
                stack.push(left && right);
            }
            Token::Operator(Operator::Or) => {
                let right = pop(stack)?;
                let left = pop(stack)?;
                stack.push(left || right);
            }
            Token::Operator(Operator::Open | Operator::Close) => {
                return Err(SearchError::InvalidBooleanExpression);
            }
        }
    }
    let result = pop(stack)?;
    if !stack.is_empty() {
        return Err(SearchError::InvalidBooleanExpression);
    }
    Ok(result)
}

fn pop(stack: &mut Vec<bool>) -> Result<bool, SearchError> {
    stack.pop().ok_or(SearchError::InvalidBooleanExpression)
}

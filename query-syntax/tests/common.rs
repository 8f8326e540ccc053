#![allow(dead_code)]
//! Shared helpers for `query-syntax` integration tests.

use query_syntax::*;

pub fn values(tokens: &[Token]) -> Vec<String> {
    tokens.iter().map(|token| token.value().to_string()).collect()
}

pub fn tokens_of(input: &str) -> Vec<String> {
    values(&tokenize(input))
}

pub fn postfix_of(input: &str) -> Vec<String> {
    values(&compile_to_postfix(&tokenize(input)).unwrap())
}

pub fn compile_err(input: &str) -> CompileError {
    compile_to_postfix(&tokenize(input)).unwrap_err()
}

pub fn operand_is(token: &Token, expected: &str) {
    match token {
        Token::Operand(value) => assert_eq!(value, expected),
        other => panic!("expected Operand, got: {other:?}"),
    }
}

pub fn operator_is(token: &Token, expected: Operator) {
    match token {
        Token::Operator(op) => assert_eq!(*op, expected),
        other => panic!("expected Operator, got: {other:?}"),
    }
}

/// Runs a postfix program over fixed truth values, mirroring how the table
/// evaluator consumes it. Returns `None` when the stack does not end with
/// exactly one value.
pub fn run_postfix(postfix: &[Token], truth: impl Fn(&str) -> bool) -> Option<bool> {
    let mut stack = Vec::new();
    for token in postfix {
        match token {
            Token::Operand(value) => stack.push(truth(value)),
            Token::Operator(Operator::Not) => {
                let value = stack.pop()?;
                stack.push(!value);
            }
            Token::Operator(Operator::And) => {
                let right = stack.pop()?;
                let left = stack.pop()?;
                stack.push(left && right);
            }
            Token::Operator(Operator::Or) => {
                let right = stack.pop()?;
                let left = stack.pop()?;
                stack.push(left || right);
            }
            Token::Operator(other) => panic!("grouping token left in postfix: {other:?}"),
        }
    }
    let result = stack.pop()?;
    stack.is_empty().then_some(result)
}

//! Test helpers for asserting expression parser outcomes.
use super::{compile, parse};
use crate::ast::Expr;
use crate::errors::ExpressionError;
use crate::eval::Predicate;

pub(crate) fn parse_ok(expression: &str) -> Expr {
    match parse(expression) {
        Ok(expr) => expr,
        Err(err) => panic!("expression should parse: {err}"),
    }
}

pub(crate) fn parse_err(expression: &str) -> ExpressionError {
    match parse(expression) {
        Ok(expr) => panic!("expression parsing should fail, got {expr:?}"),
        Err(err) => err,
    }
}

pub(crate) fn compile_ok(expression: &str) -> Predicate {
    match compile(expression) {
        Ok(predicate) => predicate,
        Err(err) => panic!("expression should compile: {err}"),
    }
}

//! Cutting normalized statements into subroutines.

use std::mem;

use crate::ir::{Statement, Subroutine};

/// Split `statements` into runs, each starting at a labeled statement.
///
/// Expects normalized input: the first statement must be labeled, or
/// [`Subroutine::new`] panics.
pub fn split_into_subroutines(statements: Vec<Statement>) -> Vec<Subroutine> {
    let mut subroutines = Vec::new();
    let mut block: Vec<Statement> = Vec::new();

    for statement in statements {
        if statement.label.is_some() && !block.is_empty() {
            subroutines.push(Subroutine::new(mem::take(&mut block)));
        }
        block.push(statement);
    }

    if !block.is_empty() {
        subroutines.push(Subroutine::new(block));
    }

    subroutines
}

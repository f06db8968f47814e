//! Human-readable rendering of statement lists.
//!
//! Used in tests and debug output. Labels are right-aligned in a column as
//! wide as the largest label; continuation lines are indented under the
//! statement text:
//!
//! ```text
//! 0: if CheckSomething()
//!    is false, jump to 2
//!  : DoSomething()
//! 2: Finalize()
//! ```

use std::fmt::Write;

use crate::ir::{Statement, StatementKind};

/// Render `statements`, one per line (plus continuation lines).
///
/// Returns an empty string for an empty list.
pub fn dump(statements: &[Statement]) -> String {
    let width = statements
        .iter()
        .filter_map(|statement| statement.label)
        .max()
        .map_or(0, |label| label.raw().to_string().len());
    let indent = " ".repeat(width + 2);

    let mut out = String::new();
    for (i, statement) in statements.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        match statement.label {
            Some(label) => {
                let _ = write!(out, "{label:>width$}: ");
            }
            None => {
                let _ = write!(out, "{:width$}: ", "");
            }
        }
        out.push_str(&indent_but_first_line(&dump_kind(&statement.kind), &indent));
    }
    out
}

fn dump_kind(kind: &StatementKind) -> String {
    match kind {
        StatementKind::Command(code) => code.to_string(),
        StatementKind::If {
            condition,
            on_true,
            on_false,
        } => {
            let mut lines = Vec::with_capacity(3);
            if condition.is_multiline() {
                lines.push(format!(
                    "if\n  {}",
                    indent_but_first_line(condition.as_str(), "  ")
                ));
            } else {
                lines.push(format!("if {condition}"));
            }
            if let Some(target) = on_true {
                lines.push(format!("is true, jump to {target}"));
            }
            if let Some(target) = on_false {
                lines.push(format!("is false, jump to {target}"));
            }
            lines.join("\n")
        }
        StatementKind::Jump { target } => format!("jump {target}"),
        StatementKind::Yield => "yield".to_owned(),
        StatementKind::Noop { comment: None } => "noop".to_owned(),
        StatementKind::Noop {
            comment: Some(comment),
        } => format!("noop - {comment}"),
    }
}

/// Indent every line of `text` but the first by `indent`.
///
/// Empty lines stay empty. Handy for splicing multi-line fragments into a
/// template whose first line is already positioned.
pub fn indent_but_first_line(text: &str, indent: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(indent);
            }
        }
        out.push_str(line);
    }
    out
}

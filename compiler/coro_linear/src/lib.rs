//! Linearization of suspending control flows.
//!
//! Turns a flow (`coro_flow::Node`s with explicit `Yield` suspension points)
//! into [`Subroutine`]s: the states of a hand-written state machine for
//! targets without native generators.
//!
//! # Pipeline
//!
//! ```text
//! flow ─ linearize ─► statements (every statement labeled, no-ops at joins)
//!      ─ compress  ─► statements (only jump targets labeled, no-ops folded)
//!      ─ normalize ─► statements (entry + resume points labeled, 0..n)
//!      ─ split     ─► subroutines
//! ```
//!
//! Each pass is a pure function over its own buffers; nothing is shared
//! between calls.
//!
//! # Guarantees
//!
//! For every pair of adjacent subroutines `(s, t)` returned by
//! [`linearize_to_subroutines`], `t.label() == s.label().next()`, and every
//! `Jump`/`If` target names one of the returned subroutines.
//!
//! # Tracing
//!
//! Passes log summaries at `debug` level and the linearizer logs every
//! emitted statement at `trace` level, e.g.
//! `RUST_LOG=coro_linear=debug`. No subscriber is installed here.

mod compress;
mod dump;
mod finalize;
pub mod ir;
mod linearize;
mod split;
mod stack;

pub use compress::{compress, fold_noops, remove_redundant_labels};
pub use dump::{dump, indent_but_first_line};
pub use finalize::normalize_labels;
pub use ir::{Label, Statement, StatementKind, Subroutine, SubroutineError};
pub use linearize::linearize;
pub use split::split_into_subroutines;

use coro_flow::Node;

/// Linearize `flow` and split it into subroutines, one per state.
///
/// An empty flow yields no subroutines.
pub fn linearize_to_subroutines(flow: &[Node]) -> Vec<Subroutine> {
    if flow.is_empty() {
        return Vec::new();
    }

    let statements = linearize(flow);
    let emitted = statements.len();

    let mut statements = compress(statements);
    normalize_labels(&mut statements);
    let kept = statements.len();

    let subroutines = split_into_subroutines(statements);

    debug_assert!(
        subroutines
            .windows(2)
            .all(|pair| pair[0].label().next() == pair[1].label()),
        "subroutine labels must increase by exactly one",
    );

    tracing::debug!(
        nodes = flow.len(),
        emitted,
        kept,
        subroutines = subroutines.len(),
        "linearized flow"
    );
    subroutines
}

//! Compression of the raw linear IR.
//!
//! The linearizer labels every statement and leaves a `Noop` at every join
//! point. Two passes shrink that down without changing meaning:
//!
//! 1. [`remove_redundant_labels`]: clear the labels no `Jump`/`If` targets.
//! 2. [`fold_noops`]: remove no-ops, moving their labels onto the statement
//!    that follows them and rewiring every target accordingly.
//!
//! A trailing run of no-ops has no statement to hand its label to, so it
//! collapses to a single labeled `Noop`.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::ir::{Label, Statement};

/// Run both compression passes.
pub fn compress(mut statements: Vec<Statement>) -> Vec<Statement> {
    remove_redundant_labels(&mut statements);
    fold_noops(statements)
}

/// Collect every label targeted by a `Jump` or an `If`.
pub(crate) fn collect_targets(statements: &[Statement]) -> FxHashSet<Label> {
    statements.iter().flat_map(Statement::targets).collect()
}

/// Clear the label of every statement that is never a target.
///
/// Returns the number of labels cleared.
pub fn remove_redundant_labels(statements: &mut [Statement]) -> usize {
    let live = collect_targets(statements);

    let mut cleared = 0;
    for statement in statements.iter_mut() {
        if statement.label.is_some_and(|label| !live.contains(&label)) {
            statement.label = None;
            cleared += 1;
        }
    }

    tracing::debug!(cleared, live = live.len(), "removed redundant labels");
    cleared
}

/// Remove no-ops and rewire the targets that pointed at them.
///
/// Unlabeled no-ops are dropped outright. A run of labeled no-ops is
/// folded into the first real statement after it: that statement takes the
/// label of the first no-op if it has none of its own, and every label of
/// the run is renamed to the statement's label.
pub fn fold_noops(statements: Vec<Statement>) -> Vec<Statement> {
    let total = statements.len();

    let mut renames: FxHashMap<Label, Label> = FxHashMap::default();
    let mut result = Vec::with_capacity(total);

    // Current run of labeled no-ops: the first one (kept if the run turns
    // out to be trailing) and the labels of all of them.
    let mut run_head: Option<Statement> = None;
    let mut run_labels: SmallVec<[Label; 4]> = SmallVec::new();

    for mut statement in statements {
        if statement.is_noop() {
            let Some(label) = statement.label else {
                continue;
            };
            if run_head.is_none() {
                run_head = Some(statement);
            }
            run_labels.push(label);
            continue;
        }

        if let Some(&first) = run_labels.first() {
            let canonical = *statement.label.get_or_insert(first);
            for label in run_labels.drain(..) {
                renames.insert(label, canonical);
            }
            run_head = None;
        }
        result.push(statement);
    }

    if let Some(head) = run_head {
        if let Some((&canonical, rest)) = run_labels.split_first() {
            for &label in rest {
                renames.insert(label, canonical);
            }
        }
        result.push(head);
    }

    rewire(&mut result, &renames);

    tracing::debug!(
        removed = total - result.len(),
        renamed = renames.len(),
        "folded no-ops"
    );
    result
}

/// Rewrite every target through `renames`. Labels not in the table are
/// left as they are.
pub(crate) fn rewire(statements: &mut [Statement], renames: &FxHashMap<Label, Label>) {
    if renames.is_empty() {
        return;
    }
    for statement in statements {
        statement.retarget(|target| renames.get(&target).copied().unwrap_or(target));
    }
}

#[cfg(test)]
mod tests;

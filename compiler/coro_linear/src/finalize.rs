//! Label normalization, the last pass before splitting.
//!
//! After compression, labels are sparse and only mark jump targets. The
//! state machine additionally needs an entry state and a resume state
//! after every `Yield`, and renderers want state numbers `0..n` in order.

use rustc_hash::FxHashMap;

use crate::compress::rewire;
use crate::ir::{Label, Statement};

/// Make labels dense, increasing, and present wherever a subroutine starts.
///
/// - The first statement is labeled (entry point).
/// - The statement following every `Yield` is labeled (resume point).
/// - All labels are renumbered to `0..n` in order of appearance, and every
///   target is rewritten accordingly.
pub fn normalize_labels(statements: &mut [Statement]) {
    if statements.is_empty() {
        return;
    }

    // Synthesized labels start above every existing one so that they
    // cannot collide before renumbering.
    let mut spare = statements
        .iter()
        .filter_map(|statement| statement.label)
        .max()
        .map_or(Label::new(0), Label::next);

    let mut synthesized = 0usize;
    let mut needs_label = true;
    for statement in statements.iter_mut() {
        if needs_label && statement.label.is_none() {
            statement.label = Some(spare);
            spare = spare.next();
            synthesized += 1;
        }
        needs_label = statement.is_yield();
    }

    let mut renames: FxHashMap<Label, Label> = FxHashMap::default();
    let mut next = Label::new(0);
    for statement in statements.iter_mut() {
        if let Some(old) = statement.label {
            renames.insert(old, next);
            statement.label = Some(next);
            next = next.next();
        }
    }

    debug_assert!(
        statements
            .iter()
            .flat_map(Statement::targets)
            .all(|target| renames.contains_key(&target)),
        "dangling jump target after compression",
    );
    rewire(statements, &renames);

    tracing::debug!(
        synthesized,
        labels = next.raw(),
        "normalized labels"
    );
}

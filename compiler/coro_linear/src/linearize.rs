//! Flow → linear IR lowering.
//!
//! Recursively expands the nested flow into one flat list of statements.
//! Every emitted statement gets a fresh label, so the raw output is fully
//! labeled; compression later clears the labels nobody jumps to.
//!
//! # Lowering rules
//!
//! ```text
//! IfTrue(c, body, else)          IfTrue(c, body)
//!   L0: if c, false -> L2          L0: if c, false -> L1
//!       <body>                         <body>
//!       jump L3                    L1: noop
//!   L2: <else>
//!   L3: noop
//!
//! For(init, c, step, body)       While(c, body)
//!       <init>                     L0: if c, false -> L1
//!   L0: if c, false -> L1              <body>
//!       <body>                         jump L0
//!       <step>                     L1: noop
//!       jump L0
//!   L1: noop
//! ```
//!
//! `IfFalse` swaps the roles of `on_true` and `on_false` so that the
//! condition is emitted as written.
//!
//! Branch targets that lie ahead are forward-patched: the branch slot is
//! reserved (its label is fixed at that point) and the real statement is
//! written into the slot once the destination label is known.

use coro_flow::{Code, Conditional, ForLoop, Node, WhileLoop};

use crate::ir::{Label, Statement, StatementKind};
use crate::stack::ensure_sufficient_stack;

/// Lower a flow into a fully labeled statement list, starting at label 0.
///
/// Deterministic and total over well-formed flows.
pub fn linearize(flow: &[Node]) -> Vec<Statement> {
    let mut linearizer = Linearizer::new();
    linearizer.lower_sequence(flow);
    linearizer.finish()
}

/// Which target of a conditional skips its body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Polarity {
    /// `IfTrue`: the body runs when the condition holds; skip on false.
    SkipOnFalse,
    /// `IfFalse`: the body runs when the condition fails; skip on true.
    SkipOnTrue,
}

/// In-progress statement list and label counter.
struct Linearizer {
    statements: Vec<Statement>,
    next_label: u32,
}

impl Linearizer {
    fn new() -> Self {
        Self {
            statements: Vec::new(),
            next_label: 0,
        }
    }

    fn finish(self) -> Vec<Statement> {
        self.statements
    }

    // Emission

    /// Append a statement at a fresh label and return its index.
    fn emit(&mut self, kind: StatementKind) -> usize {
        let label = Label::new(self.next_label);
        self.next_label += 1;
        tracing::trace!(label = label.raw(), kind = kind.name(), "emit");
        self.statements.push(Statement::labeled(label, kind));
        self.statements.len() - 1
    }

    /// Reserve a labeled slot for a branch whose targets are not known yet.
    ///
    /// The slot holds a bare `Noop` until [`patch`](Self::patch) fills it.
    fn reserve(&mut self) -> usize {
        self.emit(StatementKind::Noop { comment: None })
    }

    /// Fill a slot obtained from [`reserve`](Self::reserve).
    fn patch(&mut self, slot: usize, kind: StatementKind) {
        let statement = &mut self.statements[slot];
        assert!(
            matches!(statement.kind, StatementKind::Noop { comment: None }),
            "patching a slot that was not reserved: {:?}",
            statement.kind,
        );
        statement.kind = kind;
    }

    /// Label of the statement at `index`.
    fn label_at(&self, index: usize) -> Label {
        match self.statements[index].label {
            Some(label) => label,
            None => unreachable!("the linearizer labels every statement it emits"),
        }
    }

    /// Label the next emitted statement will receive.
    #[inline]
    fn peek_label(&self) -> Label {
        Label::new(self.next_label)
    }

    // Lowering

    fn lower_sequence(&mut self, nodes: &[Node]) {
        for node in nodes {
            self.lower_node(node);
        }
    }

    fn lower_node(&mut self, node: &Node) {
        ensure_sufficient_stack(|| match node {
            Node::Command(code) => {
                self.emit(StatementKind::Command(code.clone()));
            }
            Node::Yield => {
                self.emit(StatementKind::Yield);
            }
            Node::IfTrue(conditional) => self.lower_conditional(conditional, Polarity::SkipOnFalse),
            Node::IfFalse(conditional) => self.lower_conditional(conditional, Polarity::SkipOnTrue),
            Node::For(for_loop) => self.lower_for(for_loop),
            Node::While(while_loop) => self.lower_while(while_loop),
        });
    }

    /// Lower `IfTrue`/`IfFalse`.
    ///
    /// The body always follows the branch directly, so the branch only
    /// needs the target that skips the body: the else branch if there is
    /// one, the join point otherwise.
    fn lower_conditional(&mut self, conditional: &Conditional, polarity: Polarity) {
        let branch = self.reserve();

        self.lower_sequence(conditional.body.nodes());

        let skip_to = if let Some(or_else) = &conditional.or_else {
            let jump_over_else = self.reserve();

            let else_label = self.peek_label();
            self.lower_sequence(or_else);

            let done = self.emit(StatementKind::Noop { comment: None });
            let done_label = self.label_at(done);
            self.patch(jump_over_else, StatementKind::Jump { target: done_label });

            else_label
        } else {
            let done = self.emit(StatementKind::Noop { comment: None });
            self.label_at(done)
        };

        self.patch(branch, branch_kind(&conditional.condition, polarity, skip_to));
    }

    /// Lower a `For` loop. Shares the loop skeleton with `While`.
    fn lower_for(&mut self, for_loop: &ForLoop) {
        if let Some(init) = &for_loop.init {
            self.emit(StatementKind::Command(init.clone()));
        }
        self.lower_loop(
            &for_loop.condition,
            &for_loop.body,
            for_loop.iteration.as_ref(),
        );
    }

    fn lower_while(&mut self, while_loop: &WhileLoop) {
        self.lower_loop(&while_loop.condition, &while_loop.body, None);
    }

    fn lower_loop(&mut self, condition: &Code, body: &[Node], iteration: Option<&Code>) {
        let check = self.reserve();
        let check_label = self.label_at(check);

        self.lower_sequence(body);

        if let Some(iteration) = iteration {
            self.emit(StatementKind::Command(iteration.clone()));
        }
        self.emit(StatementKind::Jump {
            target: check_label,
        });

        let done = self.emit(StatementKind::Noop { comment: None });
        let done_label = self.label_at(done);

        self.patch(
            check,
            branch_kind(condition, Polarity::SkipOnFalse, done_label),
        );
    }
}

/// Build the `If` that jumps to `skip_to` when the body must not run.
fn branch_kind(condition: &Code, polarity: Polarity, skip_to: Label) -> StatementKind {
    let (on_true, on_false) = match polarity {
        Polarity::SkipOnFalse => (None, Some(skip_to)),
        Polarity::SkipOnTrue => (Some(skip_to), None),
    };
    StatementKind::If {
        condition: condition.clone(),
        on_true,
        on_false,
    }
}

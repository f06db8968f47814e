//! Rendering linearized flows as state machines.
//!
//! A target language plugs in by implementing [`StateMachineBackend`]; the
//! driver [`render_state_machine`] linearizes the flow and asks the backend
//! for one text fragment per statement, per case and for the outer dispatch.
//!
//! The generated artifact keeps one integer state field. Each call of the
//! generated step function runs the case for the current state until it
//! suspends (`return`) or falls through to the next case; a jump assigns the
//! state and re-enters the dispatch.
//!
//! [`CppBackend`] is the reference backend for C-family targets.

mod cpp;
mod emitter;

pub use cpp::{CppBackend, CppConfig};
pub use emitter::{Emitter, StringEmitter};

use coro_flow::{Code, Node};
use coro_linear::{linearize_to_subroutines, Label, StatementKind, Subroutine};

/// Targets of an `If` as seen by a backend.
///
/// A branch with no target at all cannot be expressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchArms {
    /// Jump when the condition holds, fall through otherwise.
    OnTrue(Label),
    /// Jump when the condition fails, fall through otherwise.
    OnFalse(Label),
    /// Jump in either case.
    Both { on_true: Label, on_false: Label },
}

impl BranchArms {
    /// Build the arms from the optional targets of an `If`.
    ///
    /// Returns `None` if both targets are absent.
    pub fn from_targets(on_true: Option<Label>, on_false: Option<Label>) -> Option<Self> {
        match (on_true, on_false) {
            (Some(on_true), Some(on_false)) => Some(Self::Both { on_true, on_false }),
            (Some(on_true), None) => Some(Self::OnTrue(on_true)),
            (None, Some(on_false)) => Some(Self::OnFalse(on_false)),
            (None, None) => None,
        }
    }
}

/// Where execution continues after a `Yield`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resume {
    /// Resume at the given subroutine.
    Next(Label),
    /// Nothing follows; the state is set to a sentinel no case handles.
    Exhausted(Label),
}

/// Language-specific rendering of state machine fragments.
///
/// Every method returns a self-contained fragment without leading
/// indentation; nesting is the backend's own business in [`case`] and
/// [`dispatch`].
///
/// [`case`]: StateMachineBackend::case
/// [`dispatch`]: StateMachineBackend::dispatch
pub trait StateMachineBackend {
    /// Opaque code, emitted verbatim.
    fn command(&self, code: &Code) -> String;

    /// A conditional jump.
    fn branch(&self, condition: &Code, arms: BranchArms) -> String;

    /// An unconditional jump to `target`.
    fn jump(&self, target: Label) -> String;

    /// A suspension point.
    fn suspend(&self, resume: Resume) -> String;

    /// A no-op, with its comment if any.
    fn noop(&self, comment: Option<&Code>) -> String;

    /// Falling off the end of the flow: store `sentinel` and return.
    fn exhaust(&self, sentinel: Label) -> String;

    /// One case of the dispatch, with an already rendered `body`.
    fn case(&self, label: Label, body: &str) -> String;

    /// The dispatch loop over rendered `cases`, including the fault arm for
    /// states outside `0..cases.len()`.
    fn dispatch(&self, cases: &[String]) -> String;

    /// Rendering of a flow without any statements.
    fn empty(&self) -> String;
}

/// Linearize `flow` and render it with `backend`.
pub fn render_state_machine<B>(backend: &B, flow: &[Node]) -> String
where
    B: StateMachineBackend + ?Sized,
{
    if flow.is_empty() {
        return backend.empty();
    }

    let subroutines = linearize_to_subroutines(flow);

    let cases: Vec<String> = subroutines
        .iter()
        .enumerate()
        .map(|(index, subroutine)| {
            let body = render_subroutine(backend, subroutine, subroutines.get(index + 1));
            backend.case(subroutine.label(), &body)
        })
        .collect();

    tracing::debug!(cases = cases.len(), "rendered state machine");
    backend.dispatch(&cases)
}

/// Render the statements of one subroutine, blocks separated by a blank line.
fn render_subroutine<B: StateMachineBackend + ?Sized>(
    backend: &B,
    subroutine: &Subroutine,
    next: Option<&Subroutine>,
) -> String {
    let mut blocks: Vec<String> = Vec::with_capacity(subroutine.len() + 1);

    for statement in subroutine {
        let block = match &statement.kind {
            StatementKind::Command(code) => backend.command(code),
            StatementKind::If {
                condition,
                on_true,
                on_false,
            } => match BranchArms::from_targets(*on_true, *on_false) {
                Some(arms) => backend.branch(condition, arms),
                None => unreachable!("subroutines reject if-statements without targets"),
            },
            StatementKind::Jump { target } => backend.jump(*target),
            StatementKind::Yield => backend.suspend(match next {
                Some(next) => Resume::Next(next.label()),
                None => Resume::Exhausted(subroutine.label().next()),
            }),
            StatementKind::Noop { comment } => backend.noop(comment.as_ref()),
        };
        blocks.push(block);
    }

    if next.is_none()
        && !matches!(
            subroutine.last().kind,
            StatementKind::Yield | StatementKind::Jump { .. }
        )
    {
        blocks.push(backend.exhaust(subroutine.label().next()));
    }

    blocks.join("\n\n")
}

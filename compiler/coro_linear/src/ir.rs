//! Linear IR: labeled statements and subroutines.
//!
//! The linearizer lowers a flow into a flat list of [`Statement`]s with
//! explicit jump targets. After compression and label normalization the
//! list is cut into [`Subroutine`]s, one per state of the generated state
//! machine.
//!
//! A [`Label`] names a statement that control can enter other than by
//! falling through from its predecessor: a jump or branch target, the
//! entry point, or the resume point after a `Yield`.

use std::fmt;

use coro_flow::Code;
use smallvec::{smallvec, SmallVec};

use crate::dump::dump;

// ── Labels ──────────────────────────────────────────────────────────

/// Label of a statement, i.e. a valid entry or resume point.
///
/// After normalization, labels are dense and increasing: the subroutines
/// of one flow are labeled `0..n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Label(u32);

impl Label {
    /// Create a label from a raw value.
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw `u32` value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Get the label as `usize` (for indexing into `Vec`s).
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The label immediately after this one.
    #[inline]
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// ── Statements ──────────────────────────────────────────────────────

/// What a statement does.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum StatementKind {
    /// Opaque code without jumps.
    Command(Code),
    /// Conditional jump. An absent target means "fall through".
    ///
    /// At least one of the targets is present once linearization is done.
    If {
        condition: Code,
        on_true: Option<Label>,
        on_false: Option<Label>,
    },
    /// Unconditional jump.
    Jump { target: Label },
    /// Suspend; resume at the next statement.
    Yield,
    /// Placeholder carrying a label. Folded away during compression,
    /// except for a trailing one.
    Noop { comment: Option<Code> },
}

impl StatementKind {
    /// Short name of the statement kind, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            StatementKind::Command(_) => "command",
            StatementKind::If { .. } => "if",
            StatementKind::Jump { .. } => "jump",
            StatementKind::Yield => "yield",
            StatementKind::Noop { .. } => "noop",
        }
    }
}

/// A statement of the linear IR, optionally labeled.
///
/// An unlabeled statement can only be reached by falling through from the
/// statement before it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Statement {
    pub label: Option<Label>,
    pub kind: StatementKind,
}

impl Statement {
    /// Create an unlabeled statement.
    pub fn new(kind: StatementKind) -> Self {
        Self { label: None, kind }
    }

    /// Create a labeled statement.
    pub fn labeled(label: Label, kind: StatementKind) -> Self {
        Self {
            label: Some(label),
            kind,
        }
    }

    /// Returns `true` if this is a `Yield`.
    #[inline]
    pub fn is_yield(&self) -> bool {
        matches!(self.kind, StatementKind::Yield)
    }

    /// Returns `true` if this is a `Noop`.
    #[inline]
    pub fn is_noop(&self) -> bool {
        matches!(self.kind, StatementKind::Noop { .. })
    }

    /// Labels this statement may transfer control to (besides falling
    /// through).
    pub fn targets(&self) -> SmallVec<[Label; 2]> {
        match &self.kind {
            StatementKind::Jump { target } => smallvec![*target],
            StatementKind::If {
                on_true, on_false, ..
            } => on_true.iter().chain(on_false.iter()).copied().collect(),
            StatementKind::Command(_) | StatementKind::Yield | StatementKind::Noop { .. } => {
                SmallVec::new()
            }
        }
    }

    /// Rewrite every target through `rename`.
    ///
    /// The statement's own label is left untouched.
    pub fn retarget(&mut self, mut rename: impl FnMut(Label) -> Label) {
        match &mut self.kind {
            StatementKind::Jump { target } => *target = rename(*target),
            StatementKind::If {
                on_true, on_false, ..
            } => {
                if let Some(target) = on_true {
                    *target = rename(*target);
                }
                if let Some(target) = on_false {
                    *target = rename(*target);
                }
            }
            StatementKind::Command(_) | StatementKind::Yield | StatementKind::Noop { .. } => {}
        }
    }
}

// ── Subroutines ─────────────────────────────────────────────────────

/// A statement list that cannot form a [`Subroutine`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubroutineError {
    #[error("empty subroutines are ill-defined")]
    Empty,
    #[error("the first statement of a subroutine must carry a label")]
    UnlabeledEntry,
    #[error("only the first statement of subroutine {0} may carry a label")]
    InnerLabel(Label),
    #[error("if-statement without any target in subroutine {0}")]
    UntargetedIf(Label),
}

/// The statements executed between two consecutive resumptions of the
/// state machine.
///
/// Only the first statement carries a label; it is the subroutine's label.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "cache",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Statement>", into = "Vec<Statement>")
)]
pub struct Subroutine {
    label: Label,
    statements: Vec<Statement>,
}

#[allow(clippy::len_without_is_empty, reason = "subroutines are never empty")]
impl Subroutine {
    /// Freeze `statements` into a subroutine.
    ///
    /// # Panics
    ///
    /// Panics if `statements` is empty, if the first statement has no label,
    /// if any later statement has one, or if an `If` has neither target.
    pub fn new(statements: Vec<Statement>) -> Self {
        match Self::try_new(statements) {
            Ok(subroutine) => subroutine,
            Err(err) => panic!("{err}"),
        }
    }

    /// Freeze `statements` into a subroutine, reporting a violated contract
    /// instead of panicking.
    pub fn try_new(statements: Vec<Statement>) -> Result<Self, SubroutineError> {
        let Some(first) = statements.first() else {
            return Err(SubroutineError::Empty);
        };
        let Some(label) = first.label else {
            return Err(SubroutineError::UnlabeledEntry);
        };
        if statements.iter().skip(1).any(|s| s.label.is_some()) {
            return Err(SubroutineError::InnerLabel(label));
        }
        let untargeted = statements.iter().any(|s| {
            matches!(
                s.kind,
                StatementKind::If {
                    on_true: None,
                    on_false: None,
                    ..
                }
            )
        });
        if untargeted {
            return Err(SubroutineError::UntargetedIf(label));
        }
        Ok(Self { label, statements })
    }

    /// The label of the subroutine (of its first statement).
    #[inline]
    pub fn label(&self) -> Label {
        self.label
    }

    /// All statements, the labeled one first.
    #[inline]
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// The labeled entry statement.
    #[inline]
    pub fn first(&self) -> &Statement {
        &self.statements[0]
    }

    /// The final statement of the subroutine.
    #[inline]
    pub fn last(&self) -> &Statement {
        // Non-empty by construction.
        &self.statements[self.statements.len() - 1]
    }

    /// Number of statements, at least one.
    #[inline]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Iterate over the statements.
    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.statements.iter()
    }

    /// Consume the subroutine, returning its statements.
    pub fn into_statements(self) -> Vec<Statement> {
        self.statements
    }

    /// Render the subroutine for debugging. See [`dump`].
    pub fn dump(&self) -> String {
        dump(&self.statements)
    }
}

impl TryFrom<Vec<Statement>> for Subroutine {
    type Error = SubroutineError;

    fn try_from(statements: Vec<Statement>) -> Result<Self, Self::Error> {
        Self::try_new(statements)
    }
}

impl From<Subroutine> for Vec<Statement> {
    fn from(subroutine: Subroutine) -> Self {
        subroutine.statements
    }
}

impl<'a> IntoIterator for &'a Subroutine {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}

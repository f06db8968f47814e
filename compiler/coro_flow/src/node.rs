//! Flow nodes: the closed set of control-flow constructs.
//!
//! Only suspension control flow is modeled here. A [`Node::Command`] may
//! still contain ordinary branches and loops in target-language code, as
//! long as none of them suspends.

use crate::{Code, FlowError};

// ── Nodes ───────────────────────────────────────────────────────────

/// A single node of a flow.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    /// Opaque code that does not suspend.
    Command(Code),
    /// Execute the body if the condition holds.
    IfTrue(Conditional),
    /// Execute the body if the condition does *not* hold.
    ///
    /// Kept apart from [`Node::IfTrue`] so that renderers never need to
    /// double-negate the condition.
    IfFalse(Conditional),
    /// C-style loop with optional initialization and iteration steps.
    For(ForLoop),
    /// Loop while the condition holds.
    While(WhileLoop),
    /// Suspension point. The yielded value, if any, is set up by the
    /// surrounding commands.
    Yield,
}

impl Node {
    /// Create a command node from text, trimming surrounding whitespace.
    pub fn command(code: impl AsRef<str>) -> Self {
        Node::Command(Code::new(code))
    }

    /// Create an if-true node without an else branch.
    ///
    /// # Panics
    ///
    /// Panics if `body` is empty.
    pub fn if_true(condition: impl AsRef<str>, body: Vec<Node>) -> Self {
        Node::IfTrue(Conditional::new(condition, body_or_panic(body), None))
    }

    /// Create an if-true node with an else branch.
    ///
    /// # Panics
    ///
    /// Panics if `body` is empty.
    pub fn if_true_else(condition: impl AsRef<str>, body: Vec<Node>, or_else: Vec<Node>) -> Self {
        Node::IfTrue(Conditional::new(
            condition,
            body_or_panic(body),
            Some(or_else),
        ))
    }

    /// Create an if-false node without an else branch.
    ///
    /// # Panics
    ///
    /// Panics if `body` is empty.
    pub fn if_false(condition: impl AsRef<str>, body: Vec<Node>) -> Self {
        Node::IfFalse(Conditional::new(condition, body_or_panic(body), None))
    }

    /// Create an if-false node with an else branch, taken when the
    /// condition holds.
    ///
    /// # Panics
    ///
    /// Panics if `body` is empty.
    pub fn if_false_else(condition: impl AsRef<str>, body: Vec<Node>, or_else: Vec<Node>) -> Self {
        Node::IfFalse(Conditional::new(
            condition,
            body_or_panic(body),
            Some(or_else),
        ))
    }

    /// Create a while-loop node.
    pub fn while_loop(condition: impl AsRef<str>, body: Vec<Node>) -> Self {
        Node::While(WhileLoop::new(condition, body))
    }
}

impl From<ForLoop> for Node {
    fn from(for_loop: ForLoop) -> Self {
        Node::For(for_loop)
    }
}

impl From<WhileLoop> for Node {
    fn from(while_loop: WhileLoop) -> Self {
        Node::While(while_loop)
    }
}

fn body_or_panic(nodes: Vec<Node>) -> Body {
    match Body::new(nodes) {
        Ok(body) => body,
        Err(err) => panic!("{err}"),
    }
}

// ── Bodies ──────────────────────────────────────────────────────────

/// Non-empty sequence of nodes executed by a conditional.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "cache",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Node>", into = "Vec<Node>")
)]
pub struct Body(Vec<Node>);

impl Body {
    /// Wrap `nodes`, rejecting an empty sequence.
    pub fn new(nodes: Vec<Node>) -> Result<Self, FlowError> {
        if nodes.is_empty() {
            return Err(FlowError::EmptyBody);
        }
        Ok(Self(nodes))
    }

    /// The nodes of the body, never empty.
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.0
    }
}

impl TryFrom<Vec<Node>> for Body {
    type Error = FlowError;

    fn try_from(nodes: Vec<Node>) -> Result<Self, Self::Error> {
        Self::new(nodes)
    }
}

impl From<Body> for Vec<Node> {
    fn from(body: Body) -> Self {
        body.0
    }
}

// ── Compound nodes ──────────────────────────────────────────────────

/// Shared shape of [`Node::IfTrue`] and [`Node::IfFalse`].
///
/// The condition must not suspend.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Conditional {
    pub condition: Code,
    pub body: Body,
    /// Executed when the body is not. May be empty.
    pub or_else: Option<Vec<Node>>,
}

impl Conditional {
    /// Create a conditional, trimming the condition.
    pub fn new(condition: impl AsRef<str>, body: Body, or_else: Option<Vec<Node>>) -> Self {
        Self {
            condition: Code::new(condition),
            body,
            or_else,
        }
    }
}

/// C-style loop: `for (init; condition; iteration) { body }`.
///
/// None of `init`, `condition` and `iteration` may suspend.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ForLoop {
    pub init: Option<Code>,
    pub condition: Code,
    pub iteration: Option<Code>,
    pub body: Vec<Node>,
}

impl ForLoop {
    /// Create a loop with only a condition and a body.
    pub fn new(condition: impl AsRef<str>, body: Vec<Node>) -> Self {
        Self {
            init: None,
            condition: Code::new(condition),
            iteration: None,
            body,
        }
    }

    /// Set the code executed once before the first condition check.
    #[must_use]
    pub fn with_init(mut self, init: impl AsRef<str>) -> Self {
        self.init = Some(Code::new(init));
        self
    }

    /// Set the code executed after every pass through the body.
    #[must_use]
    pub fn with_iteration(mut self, iteration: impl AsRef<str>) -> Self {
        self.iteration = Some(Code::new(iteration));
        self
    }
}

/// `while (condition) { body }`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct WhileLoop {
    pub condition: Code,
    pub body: Vec<Node>,
}

impl WhileLoop {
    /// Create a while-loop, trimming the condition.
    pub fn new(condition: impl AsRef<str>, body: Vec<Node>) -> Self {
        Self {
            condition: Code::new(condition),
            body,
        }
    }
}

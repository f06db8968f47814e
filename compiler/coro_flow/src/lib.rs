//! Structured control flows with suspension points.
//!
//! A *flow* is an ordered sequence of [`Node`]s describing a computation that
//! suspends at explicit [`Node::Yield`] points. Code generators build flows
//! for target languages without native coroutines; `coro_linear` then turns
//! a flow into the states of a hand-written state machine.
//!
//! The code carried by a flow is opaque text ([`Code`]). It is never parsed
//! or executed, only moved around and eventually printed verbatim by a
//! renderer.
//!
//! # Invariants
//!
//! Conditional bodies are never empty: a conditional with nothing to do is
//! ill-formed. [`Body::new`] rejects empty bodies with [`FlowError`]; the
//! convenience constructors on [`Node`] panic instead, since an empty body
//! there is a bug in whatever produced the flow.

mod code;
mod node;

pub use code::Code;
pub use node::{Body, Conditional, ForLoop, Node, WhileLoop};

/// Error raised when a flow is constructed from ill-formed parts.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    /// A conditional was given an empty body.
    #[error(
        "a conditional must execute at least one node in its body; \
         reformulate the flow instead of emitting an empty branch"
    )]
    EmptyBody,
}

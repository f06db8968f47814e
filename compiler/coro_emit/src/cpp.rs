//! C-family backend.
//!
//! Renders the state machine as a `while (true) switch (state) { ... }`
//! loop meant to be the body of a step method. Cases fall through into
//! the next case when a subroutine neither jumps nor suspends.

use coro_flow::Code;
use coro_linear::Label;

use crate::emitter::{Emitter, StringEmitter};
use crate::{BranchArms, Resume, StateMachineBackend};

/// Options of the C-family backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CppConfig {
    /// Name of the integer member holding the state.
    pub state_member: String,
    /// One level of indentation.
    pub indent: String,
    /// Conditions longer than this go on their own line.
    pub wrap_width: usize,
}

impl Default for CppConfig {
    fn default() -> Self {
        Self {
            state_member: "state_".to_owned(),
            indent: "  ".to_owned(),
            wrap_width: 50,
        }
    }
}

impl CppConfig {
    /// Set the name of the state member.
    #[must_use]
    pub fn with_state_member(mut self, state_member: impl Into<String>) -> Self {
        self.state_member = state_member.into();
        self
    }

    /// Set the unit of one indentation level.
    #[must_use]
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Set the length above which conditions are wrapped.
    #[must_use]
    pub fn with_wrap_width(mut self, wrap_width: usize) -> Self {
        self.wrap_width = wrap_width;
        self
    }
}

/// Backend producing C++ (and, modulo the fault arm, C-like) code.
#[derive(Clone, Debug, Default)]
pub struct CppBackend {
    config: CppConfig,
}

impl CppBackend {
    /// Create a backend rendering with `config`.
    pub fn new(config: CppConfig) -> Self {
        Self { config }
    }

    /// The options this backend renders with.
    pub fn config(&self) -> &CppConfig {
        &self.config
    }

    fn assign(&self, label: Label) -> String {
        format!("{} = {label};", self.config.state_member)
    }

    fn wraps(&self, condition: &Code) -> bool {
        condition.is_multiline() || condition.len() > self.config.wrap_width
    }

    fn emit_default_arm(&self, out: &mut StringEmitter) {
        let unit = self.config.indent.as_str();
        let member = self.config.state_member.as_str();

        out.emit("default:");
        for (depth, line) in [
            (1, "throw std::logic_error(".to_owned()),
            (2, "common::Concat(".to_owned()),
            (3, format!("\"Invalid {member}: \",")),
            (3, format!("std::to_string({member})")),
            (2, ")".to_owned()),
            (1, ");".to_owned()),
        ] {
            out.emit_newline();
            out.emit_indent(unit, depth);
            out.emit(&line);
        }
    }
}

impl StateMachineBackend for CppBackend {
    fn command(&self, code: &Code) -> String {
        code.as_str().to_owned()
    }

    fn branch(&self, condition: &Code, arms: BranchArms) -> String {
        let unit = self.config.indent.as_str();
        let shown = match arms {
            BranchArms::OnFalse(_) => format!("!({condition})"),
            BranchArms::OnTrue(_) | BranchArms::Both { .. } => condition.as_str().to_owned(),
        };

        let mut out = StringEmitter::new();
        if self.wraps(condition) {
            out.emit("if (");
            out.emit_newline();
            out.emit_block(&shown, unit, 1);
            out.emit_newline();
            out.emit(") {");
        } else {
            out.emit(&format!("if ({shown}) {{"));
        }
        out.emit_newline();

        match arms {
            BranchArms::OnTrue(target) | BranchArms::OnFalse(target) => {
                out.emit_indent(unit, 1);
                out.emit(&self.assign(target));
                out.emit_newline();
                out.emit_indent(unit, 1);
                out.emit("continue;");
                out.emit_newline();
                out.emit("}");
            }
            BranchArms::Both { on_true, on_false } => {
                out.emit_indent(unit, 1);
                out.emit(&self.assign(on_true));
                out.emit_newline();
                out.emit("} else {");
                out.emit_newline();
                out.emit_indent(unit, 1);
                out.emit(&self.assign(on_false));
                out.emit_newline();
                out.emit("}");
                out.emit_newline();
                out.emit("continue;");
            }
        }
        out.output()
    }

    fn jump(&self, target: Label) -> String {
        format!("{}\ncontinue;", self.assign(target))
    }

    fn suspend(&self, resume: Resume) -> String {
        match resume {
            Resume::Next(label) => format!("{}\nreturn;", self.assign(label)),
            Resume::Exhausted(sentinel) => {
                format!("{}  // Invalidate state\nreturn;", self.assign(sentinel))
            }
        }
    }

    fn noop(&self, comment: Option<&Code>) -> String {
        let Some(comment) = comment else {
            return "// Noop".to_owned();
        };
        comment
            .as_str()
            .lines()
            .map(|line| {
                if line.is_empty() {
                    "//".to_owned()
                } else {
                    format!("// {line}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn exhaust(&self, sentinel: Label) -> String {
        format!(
            "// We invalidate the state since we reached the end of the routine.\n{}\nreturn;",
            self.assign(sentinel)
        )
    }

    fn case(&self, label: Label, body: &str) -> String {
        let mut out = StringEmitter::with_capacity(body.len() + 16);
        out.emit(&format!("case {label}: {{"));
        out.emit_newline();
        out.emit_block(body, &self.config.indent, 1);
        out.emit_newline();
        out.emit("}");
        out.output()
    }

    fn dispatch(&self, cases: &[String]) -> String {
        let unit = self.config.indent.as_str();

        let mut arms = StringEmitter::new();
        for case in cases {
            arms.emit(case);
            arms.emit_newline();
            arms.emit_newline();
        }
        self.emit_default_arm(&mut arms);

        let mut out = StringEmitter::with_capacity(arms.len() * 2);
        out.emit("while (true) {");
        out.emit_newline();
        out.emit_indent(unit, 1);
        out.emit(&format!("switch ({}) {{", self.config.state_member));
        out.emit_newline();
        out.emit_block(arms.as_str(), unit, 2);
        out.emit_newline();
        out.emit_indent(unit, 1);
        out.emit("}");
        out.emit_newline();
        out.emit("}");
        out.output()
    }

    fn empty(&self) -> String {
        "// Intentionally empty.".to_owned()
    }
}

#[cfg(test)]
mod tests;

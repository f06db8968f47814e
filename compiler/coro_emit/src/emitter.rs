//! Output Emitter
//!
//! Text sink used by backends to assemble rendered fragments.

/// Trait for emitting rendered output.
///
/// Backends write their fragments to an emitter; the driver never touches
/// the text directly.
pub trait Emitter {
    /// Emit a text fragment.
    fn emit(&mut self, text: &str);

    /// Emit a newline (Unix-style `\n`).
    fn emit_newline(&mut self);

    /// Emit `unit` repeated `depth` times.
    fn emit_indent(&mut self, unit: &str, depth: usize);

    /// Emit `text` with every non-empty line indented `depth` times.
    ///
    /// Empty lines stay empty so that blank separators carry no trailing
    /// whitespace.
    fn emit_block(&mut self, text: &str, unit: &str, depth: usize) {
        for (index, line) in text.lines().enumerate() {
            if index > 0 {
                self.emit_newline();
            }
            if !line.is_empty() {
                self.emit_indent(unit, depth);
                self.emit(line);
            }
        }
    }
}

/// String-based emitter for in-memory rendering.
#[derive(Debug, Default)]
pub struct StringEmitter {
    buffer: String,
}

impl StringEmitter {
    /// Create a new string emitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: String::with_capacity(capacity),
        }
    }

    /// Get the current buffer contents without consuming.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Get the current length of the buffer.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Get the rendered output.
    pub fn output(self) -> String {
        self.buffer
    }
}

impl Emitter for StringEmitter {
    fn emit(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn emit_newline(&mut self) {
        self.buffer.push('\n');
    }

    fn emit_indent(&mut self, unit: &str, depth: usize) {
        for _ in 0..depth {
            self.buffer.push_str(unit);
        }
    }
}

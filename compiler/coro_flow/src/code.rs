//! Opaque code fragments.

use std::fmt;

/// A fragment of target-language code, stripped of surrounding whitespace.
///
/// The engine treats code as uninterpreted text. Fragments may span
/// multiple lines; renderers indent continuation lines themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Code(String);

impl Code {
    /// Create a code fragment, trimming leading and trailing whitespace.
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(text.as_ref().trim().to_owned())
    }

    /// Get the text of the fragment.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the fragment spans more than one line.
    #[inline]
    pub fn is_multiline(&self) -> bool {
        self.0.contains('\n')
    }

    /// Length of the fragment in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the fragment holds no text.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Code {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Code {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Code {
    fn from(text: String) -> Self {
        // Avoid reallocating when there is nothing to trim.
        if text.trim().len() == text.len() {
            Self(text)
        } else {
            Self::new(text)
        }
    }
}

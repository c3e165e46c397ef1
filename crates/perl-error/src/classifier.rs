//! Error-kind classification for parser diagnostics.
//!
//! The parser makes no attempt to reproduce any specific interpreter's error
//! wording byte-for-byte; downstream consumers (diagnostics panels, test
//! assertions) compare error *kind* and *position* instead. This module maps
//! every [`ParseError`] variant onto the coarse kind taxonomy observed at the
//! parser boundary.

use crate::ParseError;

/// Coarse classification of a [`ParseError`], independent of its message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Primary/infix dispatch found no applicable rule.
    UnexpectedToken,
    /// Unclosed string, regex, heredoc, or format.
    MissingTerminator,
    /// Prototype or signature argument-count enforcement failed.
    BadArgCount,
    /// Illegal chaining of comparison operators.
    ChainingError,
    /// An operator other than assignment/comma applied to a declared reference.
    DeclaredReferenceMisuse,
    /// A feature-gated construct used without its feature enabled.
    FeatureDisabled,
    /// `use VERSION`, a module version check, or a class `:isa` version check failed.
    VersionMismatch,
    /// A `BEGIN` (or other immediate-phase) block threw during compilation.
    BeginFailed,
    /// Construct recognized but deliberately unimplemented.
    NotImplemented,
    /// Anything not covered by the above (lexer failures, recursion limits, etc).
    Other,
}

impl ParseError {
    /// Classify this error into the coarse kind taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::UnexpectedToken { .. } => ErrorKind::UnexpectedToken,
            ParseError::UnclosedDelimiter { .. } => ErrorKind::MissingTerminator,
            ParseError::BadArgCount { .. } => ErrorKind::BadArgCount,
            ParseError::ChainingError { .. } => ErrorKind::ChainingError,
            ParseError::DeclaredReferenceMisuse { .. } => ErrorKind::DeclaredReferenceMisuse,
            ParseError::FeatureDisabled { .. } => ErrorKind::FeatureDisabled,
            ParseError::VersionMismatch { .. } => ErrorKind::VersionMismatch,
            ParseError::BeginFailed { .. } => ErrorKind::BeginFailed,
            ParseError::NotImplemented { .. } => ErrorKind::NotImplemented,
            ParseError::SyntaxError { message, .. } => {
                // A handful of syntax errors are raised as plain SyntaxError for
                // constructs that predate their own variant; sniff the message so
                // older call sites still classify correctly.
                if message.contains("terminator") || message.contains("Unterminated") {
                    ErrorKind::MissingTerminator
                } else {
                    ErrorKind::Other
                }
            }
            _ => ErrorKind::Other,
        }
    }

    /// Whether this error kind aborts the current compilation unit.
    ///
    /// Every parser error is fatal; the only recovered condition (format
    /// argument-line fallback to a string literal) never surfaces as a
    /// [`ParseError`] in the first place.
    pub fn is_fatal(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_chaining_error() {
        let err = ParseError::chaining("<=>", "<=>", 0);
        assert_eq!(err.kind(), ErrorKind::ChainingError);
    }

    #[test]
    fn classifies_bad_arg_count() {
        let err = ParseError::bad_arg_count("add", 3, 1, 2, 0);
        assert_eq!(err.kind(), ErrorKind::BadArgCount);
    }

    #[test]
    fn classifies_unclosed_delimiter_as_missing_terminator() {
        let err = ParseError::UnclosedDelimiter { delimiter: '"' };
        assert_eq!(err.kind(), ErrorKind::MissingTerminator);
    }

    #[test]
    fn unrelated_errors_fall_back_to_other() {
        assert_eq!(ParseError::RecursionLimit.kind(), ErrorKind::Other);
    }
}

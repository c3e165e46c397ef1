//! Heredoc content collector.
//!
//! Re-exports [`perl_heredoc`]: heredoc bodies are collected from raw source
//! bytes after the statement containing the `<<LABEL` declaration has been
//! parsed, not by re-lexing tokens, so the collector lives in its own crate
//! and is shared rather than duplicated here.

pub use perl_heredoc::{
    CollectionResult, HeredocContent, PendingHeredoc, QuoteKind, Span, collect_all,
};

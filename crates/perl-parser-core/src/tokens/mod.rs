//! Token stream adapter used by the statement and expression parsers.
//!
//! ```rust
//! use perl_parser_core::tokens::token_stream::TokenStream;
//!
//! let mut stream = TokenStream::new("my $x = 1;");
//! let _ = stream.peek();
//! ```

/// Token stream adapter bridging perl-lexer to the parser's `Token`/`TokenKind` vocabulary.
pub mod token_stream;

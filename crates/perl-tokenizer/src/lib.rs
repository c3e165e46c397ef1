//! Token stream utilities for the parser.
//!
//! Bridges [`perl_lexer`]'s low-level, mode-tracking tokenizer to the
//! parser-facing [`Token`]/[`TokenKind`] vocabulary, adding bounded
//! lookahead and the character-level cursor operations the statement and
//! expression parsers need for raw-delimiter scanning.

#![deny(unsafe_code)]
#![cfg_attr(test, allow(clippy::panic, clippy::unwrap_used, clippy::expect_used))]
#![warn(rust_2018_idioms)]

pub mod token_stream;

pub use perl_token::{Token, TokenKind};
pub use token_stream::TokenStream;

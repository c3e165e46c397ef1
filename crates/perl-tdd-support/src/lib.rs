//! Panic-on-failure test helpers.
//!
//! Workspace lints deny `unwrap`/`expect` everywhere, including tests. These
//! helpers give tests an equivalent, clippy-compliant way to fail loudly on
//! an unexpected `Err`/`None`.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(missing_docs)]

mod must;

pub use must::{must, must_err, must_some};

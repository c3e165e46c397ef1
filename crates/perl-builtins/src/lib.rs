//! Builtin symbol metadata for the Perl parser and LSP tooling.
//!
//! Two complementary views of the same ~200 core operators:
//!
//! - [`builtin_signatures`] gives human-oriented call shapes (`"print
//!   FILEHANDLE LIST"`) used for hover text and signature help.
//! - [`builtin_signatures_phf`] gives the machine-oriented prototype string
//!   (`"$;$"`, `"\\@"`, `None` for "no prototype, general list") that the
//!   parser's prototype engine consults when sizing an unparenthesized list
//!   operator's argument collection and when reporting a bad-argument-count
//!   diagnostic.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

/// Descriptive, completion-oriented call-shape signatures for built-ins.
pub mod builtin_signatures;
/// Static core-op prototype table used for argument-count enforcement.
pub mod builtin_signatures_phf;

pub use builtin_signatures::{BuiltinSignature, create_builtin_signatures};
pub use builtin_signatures_phf::{OVERRIDABLE_CORE_OPS, core_op_prototype, is_overridable_core_op};

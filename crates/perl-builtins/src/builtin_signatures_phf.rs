//! Static core-op prototype table (the "Parser Tables" core-op prototype map).
//!
//! Maps a built-in name to the prototype string Perl itself reports for it
//! (see `perldoc -f <name>` / `prototype("CORE::<name>")`), using the
//! alphabet `$ @ % & * _ + ; \X \[XYZ]` described by the prototype engine.
//! An entry mapped to `None` means the built-in has **no** prototype and is
//! parsed as a general list operator (e.g. `print`, `push`, `sort`) rather
//! than through prototype-driven argument collection.
//!
//! This table is deliberately a representative subset of the ~200 core
//! operators, not exhaustive, mirroring the scope of
//! [`crate::builtin_signatures`]: named-unary operators, the common
//! two/three-arg builtins, and the handful of reference-taking builtins
//! (`push`, `keys`, …) whose prototype is the main reason callers care about
//! this table at all.

use phf::phf_map;

/// Core-op name to prototype string, `None` for general-list/no-prototype.
pub static CORE_OP_PROTOTYPES: phf::Map<&'static str, Option<&'static str>> = phf_map! {
    // Named unary operators: one scalar argument, defaulting to `$_` when
    // called bare (the `_` prototype character covers the "defaults to $_"
    // cases specifically; plain `$` ones still accept a bare call but
    // without the implicit-$_ semantics modeled here).
    "abs" => Some("_"),
    "chr" => Some("_"),
    "cos" => Some("_"),
    "defined" => Some(";\\[$@%&]"),
    "exp" => Some("_"),
    "hex" => Some("_"),
    "int" => Some("_"),
    "lc" => Some("_"),
    "lcfirst" => Some("_"),
    "length" => Some("_"),
    "log" => Some("_"),
    "oct" => Some("_"),
    "ord" => Some("_"),
    "quotemeta" => Some("_"),
    "ref" => Some(";$"),
    "sin" => Some("_"),
    "sqrt" => Some("_"),
    "uc" => Some("_"),
    "ucfirst" => Some("_"),
    "exists" => Some("\\[$@%&]"),

    // File tests and handle-ish unaries.
    "alarm" => Some(";$"),
    "chdir" => Some(";$"),
    "chroot" => Some(";$"),
    "rand" => Some(";$"),
    "srand" => Some(";$"),
    "umask" => Some(";$"),
    "caller" => Some(";$"),
    "readlink" => Some(";$"),
    "rmdir" => Some(";$"),
    "stat" => Some(";$"),
    "lstat" => Some(";$"),
    "close" => Some(";*"),
    "closedir" => Some("*"),
    "fileno" => Some("*"),
    "eof" => Some(";*"),
    "tell" => Some(";*"),
    "lock" => Some("\\[$@%&]"),
    "prototype" => Some("_"),
    "study" => Some(";_"),

    // Two- and three-argument builtins.
    "atan2" => Some("$$"),
    "crypt" => Some("$$"),
    "index" => Some("$$;$"),
    "rindex" => Some("$$;$"),
    "substr" => Some("$$;$$"),
    "sprintf" => Some("$@"),
    "pack" => Some("$@"),
    "bless" => Some("$;$"),
    "seek" => Some("*$$"),
    "sysseek" => Some("*$$"),
    "vec" => Some("$$$"),
    "waitpid" => Some("$$"),
    "kill" => Some("@"),
    "link" => Some("$$"),
    "symlink" => Some("$$"),
    "rename" => Some("$$"),
    "opendir" => Some("*$"),
    "binmode" => Some("*;$"),
    "open" => Some("*;$@"),

    // Reference-taking list ops: the whole reason callers consult this
    // table rather than always parsing a bare comma list.
    "push" => Some("\\@@"),
    "pop" => Some(";\\@"),
    "shift" => Some(";\\@"),
    "unshift" => Some("\\@@"),
    "splice" => Some("\\@;$$@"),
    "keys" => Some("\\[%@]"),
    "values" => Some("\\[%@]"),
    "each" => Some("\\[%@]"),

    // General list operators: no prototype, parsed as a bare comma list.
    "print" => None,
    "printf" => None,
    "say" => None,
    "sort" => None,
    "map" => None,
    "grep" => None,
    "join" => None,
    "split" => None,
    "reverse" => None,
    "die" => None,
    "warn" => None,
    "return" => None,
    "wantarray" => None,
    "chomp" => None,
    "chop" => None,
    "delete" => None,
    "local" => None,
    "system" => None,
    "exec" => None,
    "unlink" => None,
    "chmod" => None,
    "chown" => None,
};

/// Core-op names that `CORE::GLOBAL::<name>` subroutines may override.
///
/// Syntax-level keywords (declarators, control structures, phase blocks)
/// are never function calls and so are never overridable; everything else
/// in [`CORE_OP_PROTOTYPES`] is.
pub static OVERRIDABLE_CORE_OPS: phf::Set<&'static str> = phf::phf_set! {
    "abs", "chr", "cos", "defined", "exp", "hex", "int", "lc", "lcfirst",
    "length", "log", "oct", "ord", "quotemeta", "ref", "sin", "sqrt", "uc",
    "ucfirst", "exists", "alarm", "chdir", "chroot", "rand", "srand",
    "umask", "caller", "readlink", "rmdir", "stat", "lstat", "close",
    "closedir", "fileno", "eof", "tell", "lock", "prototype", "study",
    "atan2", "crypt", "index", "rindex", "substr", "sprintf", "pack",
    "bless", "seek", "sysseek", "vec", "waitpid", "kill", "link", "symlink",
    "rename", "opendir", "binmode", "open", "push", "pop", "shift",
    "unshift", "splice", "keys", "values", "each", "print", "printf", "say",
    "sort", "map", "grep", "join", "split", "reverse", "die", "warn",
    "wantarray", "chomp", "chop", "delete", "system", "exec", "unlink",
    "chmod", "chown",
};

/// Look up a core op's prototype string.
///
/// Returns `None` both when the name isn't a known core op and when it is
/// one with no prototype (general list); callers that need to distinguish
/// "unknown" from "known, no prototype" should consult [`CORE_OP_PROTOTYPES`]
/// directly.
pub fn core_op_prototype(name: &str) -> Option<&'static str> {
    CORE_OP_PROTOTYPES.get(name).copied().flatten()
}

/// Whether `name` is a core op that `CORE::GLOBAL::name` may replace.
pub fn is_overridable_core_op(name: &str) -> bool {
    OVERRIDABLE_CORE_OPS.contains(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_unary_has_prototype() {
        assert_eq!(core_op_prototype("abs"), Some("_"));
        assert_eq!(core_op_prototype("length"), Some("_"));
    }

    #[test]
    fn list_ops_have_no_prototype() {
        assert_eq!(CORE_OP_PROTOTYPES.get("print"), Some(&None));
        assert_eq!(core_op_prototype("print"), None);
    }

    #[test]
    fn unknown_name_is_none() {
        assert_eq!(core_op_prototype("not_a_builtin"), None);
    }

    #[test]
    fn reference_taking_ops_use_backslash_prototypes() {
        assert_eq!(core_op_prototype("push"), Some("\\@@"));
        assert_eq!(core_op_prototype("keys"), Some("\\[%@]"));
    }

    #[test]
    fn overridable_set_excludes_syntax_keywords() {
        assert!(is_overridable_core_op("abs"));
        assert!(!is_overridable_core_op("my"));
        assert!(!is_overridable_core_op("if"));
    }
}

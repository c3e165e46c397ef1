//! Splits the raw lexeme of a quote-like operator token (`m//`, `s///`,
//! `tr///`, bare `/.../`) into its component sections.
//!
//! The lexer hands the parser one opaque token per quote-like operator —
//! delimiter scanning already happened there. This module re-parses that
//! same text to separate pattern/replacement/modifier sections, since the
//! AST stores them independently rather than as one opaque string. See
//! `engine::parser::expressions::quotes` for the token-stream-driven
//! variant used when the lexer did not pre-scan the operator (`q`, `qq`,
//! `qw`, `qx`, `qr`).

use std::fmt;

/// Matching close delimiter for a bracket-style opening delimiter.
/// Symmetric delimiters (`/`, `|`, `,`, `!`, `#`, ...) close on themselves.
fn closing_delimiter(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        '<' => '>',
        other => other,
    }
}

fn is_bracket_delimiter(open: char) -> bool {
    matches!(open, '(' | '[' | '{' | '<')
}

/// Strip a known operator-name prefix (`m`, `s`, `tr`, `y`, `qr`) from the
/// front of `text`, provided the following character is a plausible
/// delimiter (not alphanumeric/underscore/whitespace). Bare regex literals
/// (`/foo/`) have no prefix at all.
fn strip_prefix<'a>(text: &'a str, names: &[&str]) -> &'a str {
    for name in names {
        if let Some(rest) = text.strip_prefix(name) {
            match rest.chars().next() {
                Some(c) if !c.is_alphanumeric() && c != '_' && !c.is_whitespace() => return rest,
                _ => continue,
            }
        }
    }
    text
}

/// Scans one delimited section starting at `rest[0]` (the opening
/// delimiter) and returns `(content, remainder_after_closing_delimiter)`.
/// Handles nested bracket delimiters and backslash-escaped closing
/// delimiters in symmetric delimiters.
fn scan_section(rest: &str) -> Option<(String, &str)> {
    let mut chars = rest.char_indices();
    let (_, open) = chars.next()?;
    let close = closing_delimiter(open);
    let bracketed = is_bracket_delimiter(open);

    let mut depth = 1usize;
    let mut content = String::new();
    let mut escaped = false;

    for (idx, c) in chars {
        if escaped {
            content.push(c);
            escaped = false;
            continue;
        }
        if c == '\\' && !bracketed {
            // Inside symmetric delimiters a backslash escapes the delimiter
            // itself; preserve the backslash so the stored pattern still
            // round-trips through a regex engine.
            content.push(c);
            escaped = true;
            continue;
        }
        if bracketed && c == open {
            depth += 1;
            content.push(c);
            continue;
        }
        if c == close {
            depth -= 1;
            if depth == 0 {
                let consumed = idx + c.len_utf8();
                return Some((content, &rest[consumed..]));
            }
        }
        content.push(c);
    }
    None
}

/// Scans trailing modifier letters after the final delimiter.
fn scan_modifiers(rest: &str) -> (String, &str) {
    let end = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_alphabetic())
        .map(|(idx, _)| idx)
        .unwrap_or(rest.len());
    (rest[..end].to_string(), &rest[end..])
}

/// Splits a bare or `m`/`qr`-prefixed regex literal into `(pattern, pattern, modifiers)`.
///
/// The pattern is returned twice: callers historically distinguish a
/// "display" copy from the copy handed to [`crate::engine::regex_validator`]
/// so later stages may normalize one without disturbing the other, but both
/// currently hold identical text.
pub fn extract_regex_parts(text: &str) -> (String, String, String) {
    let rest = strip_prefix(text, &["qr", "m"]);
    match scan_section(rest) {
        Some((pattern, after)) => {
            // A second bracket section after a non-symmetric first section
            // (`qr{pat}{mods-as-brackets}`) never occurs in practice; any
            // remainder here is the modifier tail.
            let (modifiers, _) = scan_modifiers(after);
            (pattern.clone(), pattern, modifiers)
        }
        None => (String::new(), String::new(), String::new()),
    }
}

/// Reasons a substitution operator's raw text fails strict validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubstitutionError {
    /// A modifier letter outside the accepted set (`g i m s x o e r`).
    InvalidModifier(char),
    /// No delimiter followed the `s`.
    MissingDelimiter,
    /// The pattern section could not be scanned (unterminated delimiter).
    MissingPattern,
    /// The replacement section could not be scanned (unterminated delimiter).
    MissingReplacement,
    /// The replacement section's closing delimiter was never found.
    MissingClosingDelimiter,
}

impl fmt::Display for SubstitutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubstitutionError::InvalidModifier(c) => write!(f, "invalid modifier '{c}'"),
            SubstitutionError::MissingDelimiter => write!(f, "missing delimiter after 's'"),
            SubstitutionError::MissingPattern => write!(f, "missing pattern"),
            SubstitutionError::MissingReplacement => write!(f, "missing replacement"),
            SubstitutionError::MissingClosingDelimiter => write!(f, "missing closing delimiter"),
        }
    }
}

const VALID_SUBST_MODIFIERS: &str = "gimsxoer";

/// Splits `s/pattern/replacement/modifiers` (or bracketed `s{pat}{repl}mods`)
/// into `(pattern, replacement, modifiers)`, validating that every modifier
/// letter is one Perl actually recognizes for `s///`.
pub fn extract_substitution_parts_strict(
    text: &str,
) -> Result<(String, String, String), SubstitutionError> {
    let rest = strip_prefix(text, &["s"]);
    if rest.is_empty() || rest == text {
        return Err(SubstitutionError::MissingDelimiter);
    }

    let first_char = rest.chars().next().ok_or(SubstitutionError::MissingDelimiter)?;
    let (pattern, after_pattern) = scan_section(rest).ok_or(SubstitutionError::MissingPattern)?;

    let replacement_source = if is_bracket_delimiter(first_char) {
        // Bracket-delimited substitutions use a fresh bracket pair for the
        // replacement, skipping any whitespace between the two groups.
        after_pattern.trim_start()
    } else {
        after_pattern
    };

    if replacement_source.is_empty() {
        return Err(SubstitutionError::MissingReplacement);
    }

    let (replacement, after_replacement) = if is_bracket_delimiter(first_char) {
        scan_section(replacement_source).ok_or(SubstitutionError::MissingClosingDelimiter)?
    } else {
        // Symmetric delimiter: the replacement runs to the next unescaped
        // occurrence of the same delimiter, same as the pattern section.
        let synthetic = format!("{first_char}{replacement_source}");
        scan_section(&synthetic).ok_or(SubstitutionError::MissingClosingDelimiter)?
    };

    let (modifiers, _) = scan_modifiers(after_replacement);
    for c in modifiers.chars() {
        if !VALID_SUBST_MODIFIERS.contains(c) {
            return Err(SubstitutionError::InvalidModifier(c));
        }
    }

    Ok((pattern, replacement, modifiers))
}

/// Splits `tr/search/replace/modifiers` (or `y///`, or bracketed form) into
/// `(search, replace, modifiers)`. Transliteration modifiers (`c d s r`)
/// are not validated here; the `tr` list-expansion semantics belong to a
/// later compilation stage, not parsing.
pub fn extract_transliteration_parts(text: &str) -> (String, String, String) {
    let rest = strip_prefix(text, &["tr", "y"]);
    let Some(first_char) = rest.chars().next() else {
        return (String::new(), String::new(), String::new());
    };

    let Some((search, after_search)) = scan_section(rest) else {
        return (String::new(), String::new(), String::new());
    };

    let replace_source = if is_bracket_delimiter(first_char) {
        after_search.trim_start()
    } else {
        after_search
    };

    let replace_result = if is_bracket_delimiter(first_char) {
        scan_section(replace_source)
    } else {
        let synthetic = format!("{first_char}{replace_source}");
        scan_section(&synthetic)
    };

    match replace_result {
        Some((replace, after_replace)) => {
            let (modifiers, _) = scan_modifiers(after_replace);
            (search, replace, modifiers)
        }
        None => (search, String::new(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_regex_splits_pattern_and_modifiers() {
        let (pattern, body, modifiers) = extract_regex_parts("/foo.*bar/gi");
        assert_eq!(pattern, "foo.*bar");
        assert_eq!(body, "foo.*bar");
        assert_eq!(modifiers, "gi");
    }

    #[test]
    fn bracketed_qr_splits_pattern() {
        let (pattern, _, modifiers) = extract_regex_parts("qr{[a-z]+}i");
        assert_eq!(pattern, "[a-z]+");
        assert_eq!(modifiers, "i");
    }

    #[test]
    fn substitution_symmetric_delimiter() {
        let (pattern, replacement, modifiers) =
            extract_substitution_parts_strict("s/foo/bar/g").unwrap();
        assert_eq!(pattern, "foo");
        assert_eq!(replacement, "bar");
        assert_eq!(modifiers, "g");
    }

    #[test]
    fn substitution_bracketed_delimiter() {
        let (pattern, replacement, modifiers) =
            extract_substitution_parts_strict("s{foo}{bar}gi").unwrap();
        assert_eq!(pattern, "foo");
        assert_eq!(replacement, "bar");
        assert_eq!(modifiers, "gi");
    }

    #[test]
    fn substitution_rejects_invalid_modifier() {
        let err = extract_substitution_parts_strict("s/foo/bar/z").unwrap_err();
        assert_eq!(err, SubstitutionError::InvalidModifier('z'));
    }

    #[test]
    fn substitution_escaped_delimiter_preserved() {
        let (pattern, replacement, _) =
            extract_substitution_parts_strict(r"s/foo\/bar/baz/").unwrap();
        assert_eq!(pattern, r"foo\/bar");
        assert_eq!(replacement, "baz");
    }

    #[test]
    fn transliteration_symmetric_delimiter() {
        let (search, replace, modifiers) = extract_transliteration_parts("tr/a-z/A-Z/d");
        assert_eq!(search, "a-z");
        assert_eq!(replace, "A-Z");
        assert_eq!(modifiers, "d");
    }

    #[test]
    fn transliteration_y_alias() {
        let (search, replace, _) = extract_transliteration_parts("y/abc/xyz/");
        assert_eq!(search, "abc");
        assert_eq!(replace, "xyz");
    }
}

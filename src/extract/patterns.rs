//! Compiled patterns for the email candidate passes

use crate::extract::tld::has_known_tld;
use regex::Regex;
use std::sync::LazyLock;

/// `local@domain.tld` with no surrounding context; boundaries are checked by
/// [`strict_matches`] since the regex engine has no lookaround
pub static STRICT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

/// Same charset as [`STRICT`], bounded by RFC part lengths, no boundary checks
pub static LOOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]{1,64}@[A-Za-z0-9.-]{1,253}\.[A-Za-z]{2,}").unwrap()
});

/// Optional whitespace around `@` and `.`, e.g. `name @ domain . com`
pub static SPACED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+\s*@\s*[A-Za-z0-9.-]+\s*\.\s*[A-Za-z]{2,}\b").unwrap()
});

/// Any run of `@`/whitespace and `.`/whitespace separators; most matches are
/// discarded once whitespace is removed. Groups: local, separator, domain,
/// separator, TLD
pub static AGGRESSIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z0-9._%+-]+)([@\s]+)([A-Za-z0-9.-]+)([.\s]+)([A-Za-z]{2,})").unwrap()
});

pub static MAILTO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)mailto:([A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,})").unwrap()
});

/// `Email: addr`, `Contact addr` and similar; captures the address only
pub static CONTEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:email|e-mail|contact|mail|reach)\s*:?\s*([A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,})",
    )
    .unwrap()
});

/// Three-group patterns run on the untouched text; each match becomes
/// `local@domain.tld`
pub static STRUCTURED: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b([a-zA-Z0-9._+-]+)\s*\[at\]\s*([a-zA-Z0-9.-]+)\s*\[dot\]\s*([a-zA-Z]{2,})\b",
        r"(?i)\b([a-zA-Z0-9._+-]+)\s*\(at\)\s*([a-zA-Z0-9.-]+)\s*\(dot\)\s*([a-zA-Z]{2,})\b",
        r"(?i)\b([a-zA-Z0-9._+-]+)\s*\{at\}\s*([a-zA-Z0-9.-]+)\s*\{dot\}\s*([a-zA-Z]{2,})\b",
        r"(?i)\b([a-zA-Z0-9._+-]+)\s*<at>\s*([a-zA-Z0-9.-]+)\s*<dot>\s*([a-zA-Z]{2,})\b",
        r"(?i)\b([a-zA-Z0-9._+-]+)\s+at\s+([a-zA-Z0-9.-]+)\s+dot\s+([a-zA-Z]{2,})\b",
        r"\b([a-zA-Z0-9._+-]+)\s+AT\s+([a-zA-Z0-9.-]+)\s+DOT\s+([a-zA-Z]{2,})\b",
        r"(?i)\b([a-zA-Z0-9._+-]+)\s*\[at\]\s*([a-zA-Z0-9.-]+)\s*\.\s*([a-zA-Z]{2,})\b",
        r"(?i)\b([a-zA-Z0-9._+-]+)\s*\(at\)\s*([a-zA-Z0-9.-]+)\s*\.\s*([a-zA-Z]{2,})\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Literal substitutions applied in order to build the de-obfuscated copy
pub const OBFUSCATION_MAP: &[(&str, &str)] = &[
    ("[at]", "@"),
    ("(at)", "@"),
    ("{at}", "@"),
    ("<at>", "@"),
    (" at ", "@"),
    (" [at] ", "@"),
    (" (at) ", "@"),
    (" {at} ", "@"),
    ("[AT]", "@"),
    ("(AT)", "@"),
    ("{AT}", "@"),
    ("<AT>", "@"),
    (" AT ", "@"),
    (" [AT] ", "@"),
    (" (AT) ", "@"),
    (" {AT} ", "@"),
    ("[At]", "@"),
    ("(At)", "@"),
    ("{At}", "@"),
    ("<At>", "@"),
    ("[dot]", "."),
    ("(dot)", "."),
    ("{dot}", "."),
    ("<dot>", "."),
    (" dot ", "."),
    (" [dot] ", "."),
    (" (dot) ", "."),
    (" {dot} ", "."),
    ("[DOT]", "."),
    ("(DOT)", "."),
    ("{DOT}", "."),
    ("<DOT>", "."),
    (" DOT ", "."),
    (" [DOT] ", "."),
    (" (DOT) ", "."),
    (" {DOT} ", "."),
    ("[Dot]", "."),
    ("(Dot)", "."),
    ("{Dot}", "."),
    ("<Dot>", "."),
];

/// Applies every [`OBFUSCATION_MAP`] substitution to `text`
pub fn deobfuscate(text: &str) -> String {
    OBFUSCATION_MAP
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Matches of [`STRICT`] that are not embedded in a longer token
///
/// A match is dropped if it is preceded by a word character or one of
/// `.+-`, or followed by a word character or one of `.-`.
pub fn strict_matches(text: &str) -> Vec<&str> {
    STRICT
        .find_iter(text)
        .filter(|m| {
            let after = text[m.end()..].chars().next();
            let bad_before = char_before(text, m.start())
                .is_some_and(|c| is_word_char(c) || matches!(c, '.' | '+' | '-'));
            let bad_after = after.is_some_and(|c| is_word_char(c) || matches!(c, '.' | '-'));
            !bad_before && !bad_after
        })
        .map(|m| m.as_str())
        .collect()
}

/// Matches of [`LOOSE`] that start at the beginning of a token
///
/// The tail of a longer run such as `user0@acme.comuser1@acme.com` is left
/// over after the first match and would otherwise become `1@acme.com`.
pub fn loose_matches(text: &str) -> Vec<&str> {
    LOOSE
        .find_iter(text)
        .filter(|m| !char_before(text, m.start()).is_some_and(is_local_char))
        .map(|m| m.as_str())
        .collect()
}

/// Matches of [`SPACED`] that start at the beginning of a token
pub fn spaced_matches(text: &str) -> Vec<&str> {
    SPACED
        .find_iter(text)
        .filter(|m| !char_before(text, m.start()).is_some_and(is_local_char))
        .map(|m| m.as_str())
        .collect()
}

/// Matches of [`AGGRESSIVE`] with whitespace removed
///
/// A match must stand alone: nothing from a word, `.` or `@` before it and
/// no word character after it. A match is also dropped when its domain
/// already ends in a known TLD and only whitespace separates it from the
/// trailing letters, as in `info@acme.com. At our office`.
pub fn aggressive_matches(text: &str) -> Vec<String> {
    AGGRESSIVE
        .captures_iter(text)
        .filter_map(|caps| {
            let m = caps.get(0)?;
            let bad_before = char_before(text, m.start())
                .is_some_and(|c| is_word_char(c) || matches!(c, '.' | '@'));
            let bad_after = text[m.end()..].chars().next().is_some_and(is_word_char);
            if bad_before || bad_after {
                return None;
            }

            let domain = caps[3].trim_end_matches('.').to_ascii_lowercase();
            let spaced_tld = caps[4].chars().any(char::is_whitespace);
            if spaced_tld && domain.contains('.') && has_known_tld(&domain) {
                return None;
            }

            let joined: String = m.as_str().chars().filter(|c| !c.is_whitespace()).collect();
            (joined.contains('@') && joined.contains('.')).then_some(joined)
        })
        .collect()
}

fn char_before(text: &str, index: usize) -> Option<char> {
    text[..index].chars().next_back()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_local_char(c: char) -> bool {
    is_word_char(c) || matches!(c, '.' | '%' | '+' | '-')
}

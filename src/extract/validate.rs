//! Cleaning and false-positive suppression for email candidates

use super::tld::has_known_tld;

/// Characters stripped from both ends of a candidate
const SURROUNDING_PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '(', ')', '<', '>', '[', ']', '{', '}', '"', '\'',
];

/// Address length bounds, inclusive
const MIN_EMAIL_LEN: usize = 5;
const MAX_EMAIL_LEN: usize = 254;

/// File extensions that show up in asset names shaped like addresses
/// (`logo@2x.png`, `bundle@1.0.js`)
const FILE_EXTENSIONS: &[&str] = &[
    // Images
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".bmp", ".ico",
    // Video
    ".mp4", ".avi", ".mov", ".wmv", ".flv", ".webm", ".mkv", ".mpeg", ".mpg",
    // Audio
    ".mp3", ".wav", ".flac", ".aac", ".ogg", ".wma", ".m4a",
    // Web
    ".css", ".js", ".json", ".xml", ".html", ".htm",
    // Documents
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx",
    // Archives
    ".zip", ".rar", ".tar", ".gz", ".7z",
    // Executables
    ".exe", ".dll", ".bin", ".iso",
];

/// Domains used in sample and template addresses
const PLACEHOLDER_DOMAINS: &[&str] = &["example.com", "test.com", "domain.com", "yoursite.com"];

/// Fragments that only appear in sample addresses
const PLACEHOLDER_STRINGS: &[&str] = &["sampleemail", "youremail", "example@"];

/// Strips surrounding punctuation, deletes whitespace, and lowercases
///
/// Returns None if the result cannot be an address: wrong length, missing
/// `.`, or anything other than exactly one `@` with text on both sides.
pub fn clean_candidate(raw: &str) -> Option<String> {
    let collapsed: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let cleaned = collapsed
        .trim_matches(SURROUNDING_PUNCTUATION)
        .to_lowercase();

    let len = cleaned.chars().count();
    if !(MIN_EMAIL_LEN..=MAX_EMAIL_LEN).contains(&len) || !cleaned.contains('.') {
        return None;
    }

    let (local, domain) = cleaned.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }

    Some(cleaned)
}

/// Returns true if a cleaned candidate survives false-positive suppression
/// and TLD validation
///
/// `allow_placeholder_domain` relaxes only the placeholder-domain check; it
/// is set for addresses that were reconstructed from an obfuscated spelling
/// and never appeared in plain form, since a sample address is never
/// written obfuscated.
pub fn is_acceptable(cleaned: &str, allow_placeholder_domain: bool) -> bool {
    if FILE_EXTENSIONS.iter().any(|ext| cleaned.contains(ext)) {
        return false;
    }

    if PLACEHOLDER_STRINGS.iter().any(|s| cleaned.contains(s)) {
        return false;
    }

    if !allow_placeholder_domain && PLACEHOLDER_DOMAINS.iter().any(|d| cleaned.contains(d)) {
        return false;
    }

    match cleaned.rsplit_once('@') {
        Some((_, domain)) => has_known_tld(domain),
        None => false,
    }
}

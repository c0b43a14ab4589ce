//! Email extraction for Contact-Trawler
//!
//! This module turns arbitrary text into a set of validated email addresses:
//! - Candidate generation by several independent regex passes
//! - De-obfuscation of `[at]`/`(dot)` style spellings
//! - Cleaning, false-positive suppression and TLD validation
//!
//! It also hosts the contact-form detector, which works on parsed HTML.

mod form;
mod patterns;
mod tld;
mod validate;

pub use form::{has_contact_form, inspect_form, FormFields};
pub use tld::{has_known_tld, TWO_PART_TLDS, VALID_TLDS};
pub use validate::{clean_candidate, is_acceptable};

use std::collections::{BTreeSet, HashSet};

use patterns::{
    aggressive_matches, deobfuscate, loose_matches, spaced_matches, strict_matches, CONTEXT,
    MAILTO, STRUCTURED,
};

/// The pass that produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    /// Standalone `local@domain.tld`
    Strict,
    /// Same shape, allowed inside longer tokens
    Loose,
    /// Whitespace around the separators
    Spaced,
    /// `mailto:` targets
    Mailto,
    /// Address following an `Email:`-style keyword
    Context,
    /// Any plain pass re-run on the substituted copy of the text
    Substituted,
    /// Three-part obfuscated spelling reassembled from the original text
    Structured,
}

impl Pass {
    /// Returns true for passes that reconstruct an address from an
    /// obfuscated spelling
    pub fn is_deobfuscated(&self) -> bool {
        matches!(self, Pass::Substituted | Pass::Structured)
    }
}

/// A raw substring suspected of being an email address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub raw: String,
    pub pass: Pass,
}

impl Candidate {
    fn new(raw: impl Into<String>, pass: Pass) -> Self {
        Self {
            raw: raw.into(),
            pass,
        }
    }
}

/// Extracts validated, lowercased email addresses from arbitrary text
///
/// Every candidate pass runs over the whole input and the results are
/// merged, so the output does not depend on pass order.
///
/// # Arguments
///
/// * `text` - Raw text, HTML, script source, or attribute values
///
/// # Returns
///
/// The set of addresses that survived cleaning and validation, sorted
///
/// # Examples
///
/// ```
/// use contact_trawler::extract::extract_emails;
///
/// let found = extract_emails("Write to sales@company.com or jane [at] company [dot] org");
/// assert!(found.contains("sales@company.com"));
/// assert!(found.contains("jane@company.org"));
/// ```
pub fn extract_emails(text: &str) -> BTreeSet<String> {
    if text.is_empty() {
        return BTreeSet::new();
    }

    let candidates = collect_candidates(text);

    // Addresses that appear in plain form anywhere in the text
    let plain: HashSet<String> = candidates
        .iter()
        .filter(|c| !c.pass.is_deobfuscated())
        .filter_map(|c| clean_candidate(&c.raw))
        .collect();

    candidates
        .iter()
        .filter_map(|c| {
            let cleaned = clean_candidate(&c.raw)?;
            let relaxed = c.pass.is_deobfuscated() && !plain.contains(&cleaned);
            is_acceptable(&cleaned, relaxed).then_some(cleaned)
        })
        .collect()
}

/// Runs every candidate pass over `text`
pub fn collect_candidates(text: &str) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    // Step 1: Plain passes over the original text
    plain_passes(text, &mut candidates, None);

    // Step 2: Plain passes over the substituted copy
    let substituted = deobfuscate(text);
    if substituted != text {
        plain_passes(&substituted, &mut candidates, Some(Pass::Substituted));
    }

    // Step 3: Structured patterns over the original text
    for pattern in STRUCTURED.iter() {
        for caps in pattern.captures_iter(text) {
            candidates.push(Candidate::new(
                format!("{}@{}.{}", &caps[1], &caps[2], &caps[3]),
                Pass::Structured,
            ));
        }
    }

    candidates
}

/// Strict, loose, spaced, mailto and context passes; `tag` overrides the
/// pass recorded on each candidate
fn plain_passes(text: &str, out: &mut Vec<Candidate>, tag: Option<Pass>) {
    let pass = |p: Pass| tag.unwrap_or(p);

    for m in strict_matches(text) {
        out.push(Candidate::new(m, pass(Pass::Strict)));
    }

    for m in loose_matches(text) {
        out.push(Candidate::new(m, pass(Pass::Loose)));
    }

    for m in spaced_matches(text) {
        out.push(Candidate::new(m, pass(Pass::Spaced)));
    }

    for joined in aggressive_matches(text) {
        out.push(Candidate::new(joined, pass(Pass::Spaced)));
    }

    for caps in MAILTO.captures_iter(text) {
        out.push(Candidate::new(&caps[1], pass(Pass::Mailto)));
    }

    for caps in CONTEXT.captures_iter(text) {
        out.push(Candidate::new(&caps[1], pass(Pass::Context)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        assert!(extract_emails("").is_empty());
    }

    #[test]
    fn test_plain_address() {
        let found = extract_emails("Questions? hello@acme.io");
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["hello@acme.io"]);
    }

    #[test]
    fn test_lowercases_and_dedups() {
        let found = extract_emails("Info@Acme.com, info@acme.com, INFO@ACME.COM");
        assert_eq!(found.len(), 1);
        assert!(found.contains("info@acme.com"));
    }

    #[test]
    fn test_bracket_obfuscation() {
        let found = extract_emails("Reach me at jane [at] example [dot] com");
        assert!(found.contains("jane@example.com"));
    }

    #[test]
    fn test_mixed_separators() {
        let found = extract_emails("john (at) example . org");
        assert!(found.contains("john@example.org"));
    }

    #[test]
    fn test_word_obfuscation() {
        assert!(extract_emails("mail bob AT acme DOT net").contains("bob@acme.net"));
        assert!(extract_emails("mail bob at acme dot net").contains("bob@acme.net"));
    }

    #[test]
    fn test_curly_and_angle_obfuscation() {
        assert!(extract_emails("ann{at}acme{dot}com").contains("ann@acme.com"));
        assert!(extract_emails("ann <at> acme <dot> com").contains("ann@acme.com"));
    }

    #[test]
    fn test_spaced_separators() {
        assert!(extract_emails("sales @ acme . com").contains("sales@acme.com"));
    }

    #[test]
    fn test_invalid_tld_rejected() {
        assert!(extract_emails("user@notreal.zzzzz").is_empty());
    }

    #[test]
    fn test_two_part_tld_accepted() {
        assert!(extract_emails("user@company.co.uk").contains("user@company.co.uk"));
    }

    #[test]
    fn test_file_name_rejected() {
        assert!(extract_emails("icon@2x.json").is_empty());
        assert!(extract_emails(r#"<img src="logo@2x.png">"#).is_empty());
    }

    #[test]
    fn test_placeholder_rejected() {
        assert!(extract_emails("contact test@example.com").is_empty());
        assert!(extract_emails(r#"<input placeholder="youremail@acme.com">"#).is_empty());
    }

    #[test]
    fn test_plain_placeholder_not_rescued_by_substitution() {
        // The " at " substitution leaves the plain address unchanged
        let found = extract_emails("look at test@example.com");
        assert!(found.is_empty());
    }

    #[test]
    fn test_mailto_in_markup() {
        let found = extract_emails(r#"<a href="mailto:press@acme.org?subject=Hi">Press</a>"#);
        assert!(found.contains("press@acme.org"));
    }

    #[test]
    fn test_context_keyword() {
        assert!(extract_emails("E-mail:billing@acme.de").contains("billing@acme.de"));
    }

    #[test]
    fn test_adjacent_addresses_do_not_leak_fragments() {
        let text = (0..8)
            .map(|i| format!("user{}@acme.com", i))
            .collect::<Vec<_>>()
            .join(" ");
        let found = extract_emails(&text);
        assert_eq!(found.len(), 8);
        assert!(found.iter().all(|e| e.starts_with("user")));
    }

    #[test]
    fn test_sentence_after_address_not_joined() {
        let found = extract_emails("Email info@acme.com. At our office we answer fast.");
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["info@acme.com"]);
    }

    #[test]
    fn test_run_together_addresses_yield_no_fragments() {
        let found = extract_emails("user0@acme.comuser1@acme.com");
        assert!(found.is_empty(), "unexpected: {:?}", found);
    }

    #[test]
    fn test_deterministic() {
        let text = "a@acme.com b [at] acme [dot] com c(at)acme.org";
        assert_eq!(extract_emails(text), extract_emails(text));
    }

    #[test]
    fn test_candidates_tagged_with_pass() {
        let candidates = collect_candidates("jane [at] acme [dot] com");
        assert!(candidates
            .iter()
            .any(|c| c.pass == Pass::Structured && c.raw == "jane@acme.com"));
        assert!(candidates.iter().all(|c| c.pass.is_deobfuscated()));
    }
}

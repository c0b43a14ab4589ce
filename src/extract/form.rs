//! Contact-form detection on parsed HTML

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static FORM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("form").unwrap());
static FIELD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("input, textarea").unwrap());

static EMAIL_HINT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)email").unwrap());
static NAME_HINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)name|first|last|full.*name").unwrap());
static MESSAGE_HINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)message|subject|comment|inquiry").unwrap());

/// Which kinds of fields a single `<form>` contains
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormFields {
    pub email: bool,
    pub name: bool,
    pub message: bool,
}

impl FormFields {
    /// A form counts as a contact form when it asks for both an email and a name
    pub fn is_contact_form(&self) -> bool {
        self.email && self.name
    }
}

/// Returns true if any `<form>` in the document asks for an email and a name
///
/// # Examples
///
/// ```
/// use scraper::Html;
/// use contact_trawler::extract::has_contact_form;
///
/// let doc = Html::parse_document(
///     r#"<form><input type="email"><input placeholder="Your name"></form>"#,
/// );
/// assert!(has_contact_form(&doc));
/// ```
pub fn has_contact_form(document: &Html) -> bool {
    document
        .select(&FORM)
        .any(|form| inspect_form(form).is_contact_form())
}

/// Classifies the input and textarea fields of one form
pub fn inspect_form(form: ElementRef<'_>) -> FormFields {
    let mut fields = FormFields::default();

    for field in form.select(&FIELD) {
        let attrs = field.value();
        let hint = |attr: &str, re: &Regex| attrs.attr(attr).is_some_and(|v| re.is_match(v));

        if attrs.attr("type").is_some_and(|t| t.eq_ignore_ascii_case("email"))
            || hint("name", &EMAIL_HINT)
            || hint("placeholder", &EMAIL_HINT)
        {
            fields.email = true;
        }

        if hint("name", &NAME_HINT) || hint("placeholder", &NAME_HINT) || hint("id", &NAME_HINT) {
            fields.name = true;
        }

        if hint("name", &MESSAGE_HINT) || hint("placeholder", &MESSAGE_HINT) {
            fields.message = true;
        }
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(html: &str) -> bool {
        has_contact_form(&Html::parse_document(html))
    }

    #[test]
    fn test_email_and_name_fields() {
        assert!(detect(
            r#"<form><input type="email" name="addr"><input placeholder="Full name"></form>"#
        ));
    }

    #[test]
    fn test_name_attribute_hints() {
        assert!(detect(
            r#"<form><input name="user_email"><input name="first"><textarea name="message"></textarea></form>"#
        ));
    }

    #[test]
    fn test_name_by_id() {
        assert!(detect(
            r#"<form><input placeholder="E-Mail or Email"><input id="lastname"></form>"#
        ));
    }

    #[test]
    fn test_message_only_form() {
        assert!(!detect(
            r#"<form><textarea name="message"></textarea><input type="submit"></form>"#
        ));
    }

    #[test]
    fn test_email_without_name() {
        assert!(!detect(
            r#"<form><input type="email"><textarea name="comment"></textarea></form>"#
        ));
    }

    #[test]
    fn test_fields_split_across_forms() {
        assert!(!detect(
            r#"<form><input type="email"></form><form><input name="name"></form>"#
        ));
    }

    #[test]
    fn test_no_forms() {
        assert!(!detect("<p>Call us</p>"));
    }

    #[test]
    fn test_inspect_reports_message() {
        let doc = Html::parse_document(
            r#"<form><input type="EMAIL"><input name="name"><textarea placeholder="Your inquiry"></textarea></form>"#,
        );
        let form = doc.select(&FORM).next().unwrap();
        assert_eq!(
            inspect_form(form),
            FormFields {
                email: true,
                name: true,
                message: true
            }
        );
    }
}

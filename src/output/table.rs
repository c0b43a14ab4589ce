//! Plain-text result table for terminal output

use crate::output::BatchResult;

const URL_WIDTH: usize = 40;

/// Formats one block per site: a header line, then its emails indented
pub fn format_results_table(batch: &BatchResult) -> String {
    let mut out = String::new();

    for site in &batch.sites {
        let marker = if site.has_emails() {
            "+"
        } else if site.status.is_success() {
            " "
        } else {
            "!"
        };
        let form = if site.has_contact_form { " [form]" } else { "" };

        out.push_str(&format!(
            "{} {:<width$} {}{}\n",
            marker,
            truncate(&site.url, URL_WIDTH),
            site.status,
            form,
            width = URL_WIDTH
        ));
        for email in &site.emails {
            out.push_str(&format!("    {}\n", email));
        }
    }

    out
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::SiteResult;
    use crate::state::SiteStatus;
    use std::time::Duration;

    #[test]
    fn test_table_lists_emails_under_site() {
        let mut site = SiteResult::failed(
            "https://acme.com",
            SiteStatus::Success {
                total: 1,
                shown: 1,
                sources: 1,
                elapsed: Duration::from_secs(2),
            },
        );
        site.emails = vec!["info@acme.com".to_string()];
        site.has_contact_form = true;
        let batch = BatchResult {
            sites: vec![
                site,
                SiteResult::failed("bad", SiteStatus::Failed("Invalid URL".to_string())),
            ],
            duration: Duration::from_secs(2),
        };

        let table = format_results_table(&batch);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("+ https://acme.com"));
        assert!(lines[0].ends_with("[form]"));
        assert_eq!(lines[1], "    info@acme.com");
        assert!(lines[2].starts_with("! bad"));
        assert!(lines[2].contains("Error - Invalid URL"));
    }

    #[test]
    fn test_truncate_long_urls() {
        let long = format!("https://{}.com", "a".repeat(60));
        let cut = truncate(&long, 20);
        assert_eq!(cut.chars().count(), 20);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate("short", 20), "short");
    }
}

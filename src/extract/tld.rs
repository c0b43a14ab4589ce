//! Top-level domain tables used to validate email candidates

/// Generic and country-code top-level domains accepted as the last label
pub const VALID_TLDS: &[&str] = &[
    // Generic
    "com", "org", "net", "edu", "gov", "mil", "int", "info", "biz", "name", "pro", "museum",
    "coop", "aero", "xxx", "jobs", "mobi", "travel", "tel",
    // Country codes
    "ac", "ad", "ae", "af", "ag", "ai", "al", "am", "an", "ao", "aq", "ar", "as", "at", "au",
    "aw", "ax", "az", "ba", "bb", "bd", "be", "bf", "bg", "bh", "bi", "bj", "bm", "bn", "bo",
    "br", "bs", "bt", "bv", "bw", "by", "bz", "ca", "cc", "cd", "cf", "cg", "ch", "ci", "ck",
    "cl", "cm", "cn", "co", "cr", "cs", "cu", "cv", "cx", "cy", "cz", "de", "dj", "dk", "dm",
    "do", "dz", "ec", "ee", "eg", "eh", "er", "es", "et", "eu", "fi", "fj", "fk", "fm", "fo",
    "fr", "ga", "gb", "gd", "ge", "gf", "gg", "gh", "gi", "gl", "gm", "gn", "gp", "gq", "gr",
    "gs", "gt", "gu", "gw", "gy", "hk", "hm", "hn", "hr", "ht", "hu", "id", "ie", "il", "im",
    "in", "io", "iq", "ir", "is", "it", "je", "jm", "jo", "jp", "ke", "kg", "kh", "ki", "km",
    "kn", "kp", "kr", "kw", "ky", "kz", "la", "lb", "lc", "li", "lk", "lr", "ls", "lt", "lu",
    "lv", "ly", "ma", "mc", "md", "me", "mg", "mh", "mk", "ml", "mm", "mn", "mo", "mp", "mq",
    "mr", "ms", "mt", "mu", "mv", "mw", "mx", "my", "mz", "na", "nc", "ne", "nf", "ng", "ni",
    "nl", "no", "np", "nr", "nu", "nz", "om", "pa", "pe", "pf", "pg", "ph", "pk", "pl", "pm",
    "pn", "pr", "ps", "pt", "pw", "py", "qa", "re", "ro", "rs", "ru", "rw", "sa", "sb", "sc",
    "sd", "se", "sg", "sh", "si", "sj", "sk", "sl", "sm", "sn", "so", "sr", "st", "su", "sv",
    "sy", "sz", "tc", "td", "tf", "tg", "th", "tj", "tk", "tl", "tm", "tn", "to", "tp", "tr",
    "tt", "tv", "tw", "tz", "ua", "ug", "uk", "um", "us", "uy", "uz", "va", "vc", "ve", "vg",
    "vi", "vn", "vu", "wf", "ws", "ye", "yt", "za", "zm", "zw",
];

/// Suffixes spanning two labels that are accepted as a whole
pub const TWO_PART_TLDS: &[&str] = &[
    "co.uk", "org.uk", "ac.uk", "gov.uk", "com.au", "org.au", "net.au", "edu.au", "co.nz",
    "org.nz", "net.nz", "co.in", "org.in", "net.in", "co.za", "org.za", "net.za", "com.br",
    "org.br", "net.br", "com.mx", "org.mx", "net.mx",
];

/// Returns true if the domain part of an address ends in a known TLD
///
/// The last label must be a known single-label TLD, or the last two labels
/// joined must be a known two-part TLD such as `co.uk`.
pub fn has_known_tld(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let last = labels[labels.len() - 1];
    if VALID_TLDS.contains(&last) {
        return true;
    }

    let two_part = labels[labels.len() - 2..].join(".");
    TWO_PART_TLDS.contains(&two_part.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_tld() {
        assert!(has_known_tld("company.com"));
        assert!(has_known_tld("mail.company.org"));
    }

    #[test]
    fn test_country_tld() {
        assert!(has_known_tld("firma.de"));
        assert!(has_known_tld("startup.io"));
    }

    #[test]
    fn test_two_part_tld() {
        assert!(has_known_tld("company.co.uk"));
        assert!(has_known_tld("shop.com.au"));
    }

    #[test]
    fn test_unknown_tld() {
        assert!(!has_known_tld("notreal.zzzzz"));
        assert!(!has_known_tld("site.local"));
    }

    #[test]
    fn test_no_dot() {
        assert!(!has_known_tld("localhost"));
    }
}

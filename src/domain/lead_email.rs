use std::sync::LazyLock;

use regex::Regex;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email shape regex"));

/// An address that at least looks like `local@domain.tld`. Nothing checks
/// that it is deliverable.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadEmail(String);

impl LeadEmail {
    pub fn parse(s: &str) -> Option<LeadEmail> {
        let s = s.trim();
        match EMAIL_SHAPE.is_match(s) {
            true => Some(LeadEmail(s.to_string())),
            false => None,
        }
    }
}

impl AsRef<str> for LeadEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LeadEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Longest document key the platform accepts.
pub const SLUG_MAX_LEN: usize = 36;

static SLUG_RE: OnceLock<Regex> = OnceLock::new();
static SLUG_PUNCT_RE: OnceLock<Regex> = OnceLock::new();

fn slug_regex() -> &'static Regex {
    SLUG_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$")
            .unwrap_or_else(|error| panic!("slug regex failed to compile: {error}"))
    })
}

fn punct_regex() -> &'static Regex {
    SLUG_PUNCT_RE.get_or_init(|| {
        Regex::new(r"[^a-z0-9\s]+")
            .unwrap_or_else(|error| panic!("slug punctuation regex failed to compile: {error}"))
    })
}

/// Apply the platform's custom id rules. `what` names the value in the error.
pub(crate) fn check_custom_id(what: &str, value: &str) -> Result<(), DomainError> {
    if value.is_empty() {
        return Err(DomainError::Validation(format!("{what} is required")));
    }
    if value.len() > SLUG_MAX_LEN {
        return Err(DomainError::Validation(format!(
            "{what} must be at most {SLUG_MAX_LEN} characters"
        )));
    }
    if !slug_regex().is_match(value) {
        return Err(DomainError::Validation(format!(
            "{what} '{value}' may only contain letters, digits, '.', '-' and '_' and must start with a letter or digit"
        )));
    }
    Ok(())
}

/// Post key. Unique within the collection and immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Validate a caller-supplied slug against the platform's document id rules.
    pub fn parse(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        check_custom_id("slug", &value)?;
        Ok(Self(value))
    }

    /// Derive a slug from a post title the way the authoring form does:
    /// punctuation runs and whitespace become dashes.
    pub fn from_title(title: &str) -> Result<Self, DomainError> {
        let lowered = title.trim().to_lowercase();
        let dashed = punct_regex().replace_all(&lowered, "-");
        let mut slug: String = dashed
            .chars()
            .map(|c| if c.is_whitespace() { '-' } else { c })
            .filter(|c| c.is_ascii())
            .take(SLUG_MAX_LEN)
            .collect();

        let start = slug
            .find(|c: char| c.is_ascii_alphanumeric())
            .unwrap_or(slug.len());
        slug.drain(..start);

        Self::parse(slug)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Slug {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_document_ids() {
        assert!(Slug::parse("hello-world").is_ok());
        assert!(Slug::parse("Post_2024.v1").is_ok());
    }

    #[test]
    fn test_parse_rejects_bad_ids() {
        assert!(Slug::parse("").is_err());
        assert!(Slug::parse("-leading").is_err());
        assert!(Slug::parse("has space").is_err());
        assert!(Slug::parse("a".repeat(SLUG_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn test_from_title() {
        let slug = Slug::from_title("  Hello, World!  ").unwrap();
        assert_eq!(slug.as_str(), "hello--world-");

        let slug = Slug::from_title("Rust & Appwrite tips").unwrap();
        assert_eq!(slug.as_str(), "rust---appwrite-tips");
    }

    #[test]
    fn test_from_title_truncates() {
        let slug = Slug::from_title(&"word ".repeat(20)).unwrap();
        assert_eq!(slug.as_str().len(), SLUG_MAX_LEN);
    }

    #[test]
    fn test_from_title_without_alphanumerics_fails() {
        assert!(Slug::from_title("!!!").is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Result<Slug, _> = serde_json::from_str("\"first-post\"");
        assert!(ok.is_ok());

        let bad: Result<Slug, _> = serde_json::from_str("\"_hidden\"");
        assert!(bad.is_err());
    }
}

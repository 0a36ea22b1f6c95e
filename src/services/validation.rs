//! Form validation
//!
//! Every form the site accepts is checked field by field. All failures are
//! collected so the client can mark each offending input at once.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{ContentError, FieldError};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

/// Check an email address
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

/// Check for an absolute http(s) URL with a host
pub fn is_valid_url(value: &str) -> bool {
    match reqwest::Url::parse(value.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

/// Accumulates field errors for one form submission
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, field: &str, message: &str) {
        // First failure per field wins.
        if !self.errors.iter().any(|e| e.field == field) {
            self.errors.push(FieldError::new(field, message));
        }
    }

    /// Non-blank after trimming
    pub fn required(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        self.min_chars(field, value, 1, message)
    }

    /// At least `min` characters after trimming
    pub fn min_chars(&mut self, field: &str, value: &str, min: usize, message: &str) -> &mut Self {
        if value.trim().chars().count() < min {
            self.push(field, message);
        }
        self
    }

    pub fn email(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        if !is_valid_email(value) {
            self.push(field, message);
        }
        self
    }

    /// Blank is accepted, anything else must be an email address
    pub fn optional_email(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        if !value.trim().is_empty() {
            self.email(field, value, message);
        }
        self
    }

    pub fn url(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        if !is_valid_url(value) {
            self.push(field, message);
        }
        self
    }

    /// Blank is accepted, anything else must be an absolute URL
    pub fn optional_url(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        if !value.trim().is_empty() {
            self.url(field, value, message);
        }
        self
    }

    pub fn at_least<T: PartialOrd>(&mut self, field: &str, value: T, min: T, message: &str) -> &mut Self {
        if value < min {
            self.push(field, message);
        }
        self
    }

    pub fn at_most<T: PartialOrd>(&mut self, field: &str, value: T, max: T, message: &str) -> &mut Self {
        if value > max {
            self.push(field, message);
        }
        self
    }

    /// Record an arbitrary failure
    pub fn reject(&mut self, field: &str, message: &str) -> &mut Self {
        self.push(field, message);
        self
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// `Ok` when nothing failed, otherwise `ContentError::Validation`
    pub fn finish(self) -> Result<(), ContentError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ContentError::Validation(self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email(" jane.doe+sheds@mail.example.org "));
        assert!(!is_valid_email("jane"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane doe@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_url() {
        assert!(is_valid_url("https://www.youtube.com/watch?v=abc"));
        assert!(is_valid_url("http://example.com"));
        assert!(!is_valid_url("youtube.com/watch"));
        assert!(!is_valid_url("ftp://example.com/file"));
        assert!(!is_valid_url(""));
    }

    #[test]
    fn test_collects_every_failing_field() {
        let mut v = Validator::new();
        v.required("title", "  ", "Title is required")
            .required("color", "Red", "Color is required")
            .email("email", "nope", "Please enter a valid email address")
            .at_least("rating", 0, 1, "Rating is required");

        let fields: Vec<_> = v.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "email", "rating"]);
        assert!(matches!(v.finish(), Err(ContentError::Validation(e)) if e.len() == 3));
    }

    #[test]
    fn test_first_failure_per_field_wins() {
        let mut v = Validator::new();
        v.at_least("rating", 9, 1, "Rating is required")
            .at_most("rating", 9, 5, "Rating cannot exceed 5")
            .at_most("rating", 9, 6, "other");
        assert_eq!(v.errors().len(), 1);
        assert_eq!(v.errors()[0].message, "Rating cannot exceed 5");
    }

    #[test]
    fn test_min_chars_counts_characters() {
        let mut v = Validator::new();
        v.min_chars("description", "ééééééééé", 10, "Too short");
        assert_eq!(v.errors().len(), 1);

        let mut v = Validator::new();
        v.min_chars("description", "éééééééééé", 10, "Too short");
        assert!(v.finish().is_ok());
    }

    #[test]
    fn test_optional_fields_accept_blank() {
        let mut v = Validator::new();
        v.optional_email("email", "", "bad")
            .optional_url("facebook_url", "   ", "bad");
        assert!(v.finish().is_ok());

        let mut v = Validator::new();
        v.optional_email("email", "x@", "bad");
        assert!(v.finish().is_err());
    }
}

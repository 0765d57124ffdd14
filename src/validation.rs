use regex::Regex;

use crate::errors::{NodeError, NodeResult};

pub struct InputValidator;

impl InputValidator {
    /// Check a destination URL before any network I/O is attempted.
    pub fn validate_destination_url(url: &str) -> NodeResult<()> {
        let trimmed = url.trim();

        if trimmed.is_empty() {
            return Err(NodeError::validation(
                "destination_url",
                "Destination URL cannot be empty",
            ));
        }

        if trimmed.len() > 2048 {
            return Err(NodeError::validation(
                "destination_url",
                "Destination URL too long (max 2048 characters)",
            ));
        }

        let scheme_pattern = Regex::new(r"^https?://\S+$").unwrap();
        if !scheme_pattern.is_match(trimmed) {
            return Err(NodeError::validation(
                "destination_url",
                "Destination URL must be an http:// or https:// URL",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_url_rejected() {
        assert!(InputValidator::validate_destination_url("").is_err());
        assert!(InputValidator::validate_destination_url("   ").is_err());
    }

    #[test]
    fn test_presigned_urls_accepted() {
        let url = "https://bucket.oss-cn-hangzhou.example.com/renders/out.png?Expires=1700000000&Signature=abc123";
        assert!(InputValidator::validate_destination_url(url).is_ok());
        assert!(InputValidator::validate_destination_url("http://localhost:9000/put").is_ok());
    }

    #[test]
    fn test_surrounding_whitespace_tolerated() {
        assert!(InputValidator::validate_destination_url("  https://example.com/put  ").is_ok());
    }

    #[test]
    fn test_non_http_schemes_rejected() {
        assert!(InputValidator::validate_destination_url("ftp://example.com/put").is_err());
        assert!(InputValidator::validate_destination_url("not a url").is_err());
        assert!(InputValidator::validate_destination_url("https:// spaced.example.com").is_err());
    }

    #[test]
    fn test_oversized_url_rejected() {
        let url = format!("https://example.com/{}", "a".repeat(2048));
        let result = InputValidator::validate_destination_url(&url);
        assert!(matches!(
            result,
            Err(NodeError::Validation { field, .. }) if field == "destination_url"
        ));
    }
}

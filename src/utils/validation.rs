use crate::utils::error::{Result, RunnerError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: &str, reason: impl Into<String>) -> RunnerError {
    RunnerError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(
            field_name,
            url_str,
            format!("Invalid URL format: {}", e),
        )),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

/// Relative path inside the remote store: no leading slash, no `..` segments.
pub fn validate_remote_path(field_name: &str, path: &str) -> Result<()> {
    validate_non_empty_string(field_name, path)?;

    if path.starts_with('/') {
        return Err(invalid(field_name, path, "Path must be relative"));
    }
    if path.split('/').any(|segment| segment == ".." || segment.is_empty()) {
        return Err(invalid(
            field_name,
            path,
            "Path cannot contain empty or '..' segments",
        ));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }
    Ok(())
}

pub fn validate_email(field_name: &str, address: &str) -> Result<()> {
    let Some((local, domain)) = address.split_once('@') else {
        return Err(invalid(field_name, address, "Missing '@'"));
    };

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(invalid(field_name, address, "Not a valid email address"));
    }
    if address.chars().any(char::is_whitespace) {
        return Err(invalid(field_name, address, "Email cannot contain whitespace"));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            &value.to_string(),
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("base_url", "https://example.com").is_ok());
        assert!(validate_url("base_url", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("base_url", "").is_err());
        assert!(validate_url("base_url", "invalid-url").is_err());
        assert!(validate_url("base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_remote_path() {
        assert!(validate_remote_path("path", "github/token").is_ok());
        assert!(validate_remote_path("path", "announcements/test.txt").is_ok());
        assert!(validate_remote_path("path", "/github/token").is_err());
        assert!(validate_remote_path("path", "a/../b").is_err());
        assert!(validate_remote_path("path", "a//b").is_err());
        assert!(validate_remote_path("path", "  ").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("to", "someone@example.org").is_ok());
        assert!(validate_email("to", "someone.example.org").is_err());
        assert!(validate_email("to", "@example.org").is_err());
        assert!(validate_email("to", "someone@localhost").is_err());
        assert!(validate_email("to", "some one@example.org").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("timeout_secs", 30u64, 1, 600).is_ok());
        assert!(validate_range("timeout_secs", 0u64, 1, 600).is_err());
    }
}

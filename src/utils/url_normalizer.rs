//! Long URL normalization.
//!
//! Accepts scheme-less input ("example.com/a") by assuming HTTPS, then
//! validates the result is a well-formed HTTP(S) URL.

use url::Url;

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,
}

/// Prefixes `https://` when no HTTP(S) scheme is present.
pub fn ensure_protocol(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Normalizes a long URL to a canonical form.
///
/// 1. Prefix `https://` when no scheme is present
/// 2. Parse; reject anything that is not well-formed HTTP(S)
/// 3. Require the host to be an IP address or a dotted domain
///
/// # Errors
///
/// Returns [`UrlNormalizationError::InvalidFormat`] for unparseable input and
/// [`UrlNormalizationError::UnsupportedProtocol`] for non-HTTP(S) schemes
/// (`javascript:`, `data:`, `file:` and friends never pass).
pub fn normalize_long_url(input: &str) -> Result<String, UrlNormalizationError> {
    let candidate = ensure_protocol(input);

    let url = Url::parse(&candidate)
        .map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlNormalizationError::UnsupportedProtocol),
    }

    match url.host() {
        Some(url::Host::Domain(domain)) if !is_plausible_domain(domain) => {
            return Err(UrlNormalizationError::InvalidFormat(format!(
                "invalid host: {domain}"
            )));
        }
        Some(_) => {}
        None => {
            return Err(UrlNormalizationError::InvalidFormat(
                "missing host".to_string(),
            ));
        }
    }

    Ok(url.to_string())
}

/// A named host must look like a public domain: dotted labels of
/// `[A-Za-z0-9-]` with a non-empty TLD. The url crate itself accepts far
/// looser hosts (`ht!tp`, single labels), which are useless as redirect
/// targets.
fn is_plausible_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();

    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

/// Re-validates an already stored long URL before redirecting.
pub fn is_valid_redirect_target(url: &str) -> bool {
    Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_protocol_adds_https() {
        assert_eq!(ensure_protocol("example.com"), "https://example.com");
    }

    #[test]
    fn test_ensure_protocol_keeps_existing_scheme() {
        assert_eq!(ensure_protocol("http://example.com"), "http://example.com");
        assert_eq!(
            ensure_protocol("https://example.com"),
            "https://example.com"
        );
    }

    #[test]
    fn test_normalize_schemeless_path() {
        let result = normalize_long_url("example.com/a/very/long/path").unwrap();
        assert_eq!(result, "https://example.com/a/very/long/path");
    }

    #[test]
    fn test_normalize_preserves_query() {
        let result = normalize_long_url("https://example.com/search?q=rust&lang=en").unwrap();
        assert_eq!(result, "https://example.com/search?q=rust&lang=en");
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        // The url crate happily parses "ht!tp" as a host, so the domain
        // plausibility check has to catch it.
        assert!(matches!(
            normalize_long_url("ht!tp://///"),
            Err(UrlNormalizationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_normalize_rejects_dotless_host() {
        assert!(normalize_long_url("localhost:8080/path").is_err());
        assert!(normalize_long_url("https://intranet").is_err());
    }

    #[test]
    fn test_normalize_accepts_ip_hosts() {
        assert!(normalize_long_url("http://192.0.2.7/path").is_ok());
    }

    #[test]
    fn test_normalize_rejects_javascript_scheme() {
        // "javascript:alert(1)" has a scheme, so no https prefix is added.
        assert!(matches!(
            normalize_long_url("javascript:alert(1)"),
            Err(UrlNormalizationError::InvalidFormat(_)) | Err(UrlNormalizationError::UnsupportedProtocol)
        ));
    }

    #[test]
    fn test_normalize_empty_input() {
        assert!(normalize_long_url("").is_err());
    }

    #[test]
    fn test_redirect_target_validation() {
        assert!(is_valid_redirect_target("https://example.com/path"));
        assert!(!is_valid_redirect_target("not a url"));
        assert!(!is_valid_redirect_target("file:///etc/passwd"));
    }
}

//! URL validation helpers used before any store interaction.
//!
//! All three helpers are pure functions:
//! - [`is_valid_url`] - syntax check for absolute HTTP(S) URLs
//! - [`is_forbidden_domain`] - denylist check against the service's own domains
//! - [`enforce_secure_scheme`] - rewrites the URL to `https://`

use url::{Host, Url};

/// Errors that can occur while validating a URL.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must contain a host name")]
    MissingHost,
}

/// Parses `input` as an absolute HTTP(S) URL.
///
/// A missing scheme is accepted (`example.com/path` parses as
/// `https://example.com/path`). Hosts must be an IP address, `localhost`,
/// or a dotted domain name.
///
/// # Errors
///
/// - [`UrlValidationError::InvalidFormat`] for malformed input or whitespace
/// - [`UrlValidationError::UnsupportedProtocol`] for non-HTTP(S) schemes
/// - [`UrlValidationError::MissingHost`] when no usable host is present
pub fn parse_url(input: &str) -> Result<Url, UrlValidationError> {
    if input.is_empty() || input.chars().any(char::is_whitespace) {
        return Err(UrlValidationError::InvalidFormat(
            "URL must be non-empty and contain no whitespace".to_string(),
        ));
    }

    let candidate = if input.contains("://") {
        input.to_string()
    } else if has_non_http_scheme(input) {
        return Err(UrlValidationError::UnsupportedProtocol);
    } else {
        format!("https://{input}")
    };

    let url = Url::parse(&candidate).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    match url.host() {
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => Ok(url),
        Some(Host::Domain(domain)) if domain == "localhost" || is_dotted_domain(domain) => Ok(url),
        _ => Err(UrlValidationError::MissingHost),
    }
}

/// Returns `true` if `input` is a valid absolute HTTP(S) URL.
///
/// # Examples
///
/// ```ignore
/// assert!(is_valid_url("https://example.com"));
/// assert!(is_valid_url("example.com/page"));
/// assert!(!is_valid_url("not a url"));
/// ```
pub fn is_valid_url(input: &str) -> bool {
    parse_url(input).is_ok()
}

/// Returns `true` if the host of `input` matches any entry of `denylist`.
///
/// Matching ignores scheme, a leading `www.`, path and letter case. An entry
/// with a port (`localhost:3000`) only matches that port, with `http`/`https`
/// default ports filled in; an entry without one matches every port.
/// Unparseable input is never reported as forbidden; validity is checked
/// separately by [`is_valid_url`].
pub fn is_forbidden_domain(input: &str, denylist: &[String]) -> bool {
    let Ok(url) = parse_url(input) else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = strip_www(&host.to_ascii_lowercase()).to_string();
    let port = url.port_or_known_default();

    denylist
        .iter()
        .map(|entry| DeniedHost::parse(entry))
        .any(|denied| {
            !denied.host.is_empty()
                && denied.host == host
                && denied.port.is_none_or(|p| Some(p) == port)
        })
}

/// Rewrites `input` to use the `https` scheme.
///
/// `http://` is upgraded, `https://` is kept and a missing scheme is added.
/// The rest of the URL is preserved verbatim.
pub fn enforce_secure_scheme(input: &str) -> String {
    if starts_with_ignore_case(input, "https://") {
        format!("https://{}", &input["https://".len()..])
    } else if starts_with_ignore_case(input, "http://") {
        format!("https://{}", &input["http://".len()..])
    } else {
        format!("https://{input}")
    }
}

/// A denylist entry reduced to host and optional port.
struct DeniedHost {
    host: String,
    port: Option<u16>,
}

impl DeniedHost {
    /// Parses entries such as `https://www.Example.com:8080/x` or `[::1]:3000`.
    ///
    /// An unparseable port is ignored, so the entry still denies the host.
    fn parse(entry: &str) -> Self {
        let without_scheme = entry
            .split_once("://")
            .map_or(entry, |(_, rest)| rest)
            .trim();
        let authority = without_scheme.split('/').next().unwrap_or(without_scheme);

        let (host, port) = if authority.starts_with('[') {
            match authority.find(']') {
                Some(end) => (
                    &authority[..=end],
                    authority[end + 1..].strip_prefix(':'),
                ),
                None => (authority, None),
            }
        } else {
            match authority.split_once(':') {
                Some((host, port)) => (host, Some(port)),
                None => (authority, None),
            }
        };

        Self {
            host: strip_www(&host.to_ascii_lowercase()).to_string(),
            port: port.and_then(|p| p.parse().ok()),
        }
    }
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

fn starts_with_ignore_case(input: &str, prefix: &str) -> bool {
    input
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn is_dotted_domain(domain: &str) -> bool {
    let domain = domain.trim_end_matches('.');
    domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
}

/// Detects `mailto:x`, `javascript:x` and similar scheme-only forms, while
/// still letting `host:port/path` through.
fn has_non_http_scheme(input: &str) -> bool {
    let Some((scheme, rest)) = input.split_once(':') else {
        return false;
    };
    let looks_like_port = rest
        .split('/')
        .next()
        .is_some_and(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));

    !looks_like_port
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

//! Caller identity extraction for rate limiting.

use axum::http::HeaderMap;
use std::net::SocketAddr;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Identity used when neither the socket nor the headers name a client.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Resolves the identity a request is rate-limited under.
///
/// By default this is the peer socket IP. When `behind_proxy` is set, the
/// first `X-Forwarded-For` entry (or `X-Real-IP`) is preferred, falling back
/// to the peer address when neither header is usable.
///
/// Ports are never part of the identity, so reconnecting from a new source
/// port does not reset the quota. Requests without any usable source share
/// the [`UNKNOWN_CLIENT`] identity.
pub fn client_id(headers: &HeaderMap, peer: Option<SocketAddr>, behind_proxy: bool) -> String {
    if behind_proxy && let Some(ip) = forwarded_ip(headers) {
        return ip;
    }

    peer.map_or_else(|| UNKNOWN_CLIENT.to_string(), |addr| addr.ip().to_string())
}

fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    let from_forwarded = headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let from_real_ip = || {
        headers
            .get(X_REAL_IP)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    from_forwarded.or_else(from_real_ip).map(str::to_string)
}

//! Request extractors.

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use std::convert::Infallible;
use std::net::SocketAddr;

use crate::state::AppState;
use crate::utils::client_ip::client_id;

/// Identity of the caller for rate limiting.
///
/// Resolved from the peer socket address, or from proxy headers when the
/// service is configured as running behind a trusted proxy.
#[derive(Debug, Clone)]
pub struct ClientId(pub String);

impl FromRequestParts<AppState> for ClientId {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = ConnectInfo::<SocketAddr>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|ConnectInfo(addr)| addr);

        Ok(ClientId(client_id(&parts.headers, peer, state.behind_proxy)))
    }
}

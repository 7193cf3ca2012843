//! Client address extractor for public routes.

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use std::convert::Infallible;
use std::net::SocketAddr;

use crate::app::AppState;

/// Best-effort client address.
///
/// With `trust_proxy_headers` on: first `X-Forwarded-For` hop, then
/// `X-Real-IP`, then the socket peer. Otherwise only the socket peer is
/// used, since any client can set those headers. `"unknown"` when nothing
/// is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    pub fn from_parts(headers: &HeaderMap, peer: Option<SocketAddr>, trust_proxy: bool) -> Self {
        let peer_ip = || peer.map(|p| p.ip().to_string());
        if !trust_proxy {
            return Self(peer_ip().unwrap_or_else(|| "unknown".to_string()));
        }

        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        let real_ip = || {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let ip = forwarded
            .or_else(real_ip)
            .map(str::to_string)
            .or_else(peer_ip)
            .unwrap_or_else(|| "unknown".to_string());

        Self(ip)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(Self::from_parts(
            &parts.headers,
            peer,
            state.config.security.trust_proxy_headers,
        ))
    }
}

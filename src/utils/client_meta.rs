// src/utils/client_meta.rs

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{header, request::Parts},
};

use crate::utils::sanitize::truncate_chars;

/// Longest user-agent string kept on an attempt row.
pub const USER_AGENT_MAX: usize = 255;

/// Audit metadata sourced from the transport, never from the request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientMeta {
    pub ip: Option<IpAddr>,
    pub user_agent: Option<String>,
}

impl ClientMeta {
    /// Binary form of the address: 4 bytes for IPv4, 16 for IPv6.
    pub fn ip_bytes(&self) -> Option<Vec<u8>> {
        self.ip.map(|ip| match ip {
            IpAddr::V4(v4) => v4.octets().to_vec(),
            IpAddr::V6(v6) => v6.octets().to_vec(),
        })
    }
}

impl<S> FromRequestParts<S> for ClientMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(|ua| truncate_chars(ua, USER_AGENT_MAX))
            .filter(|ua| !ua.is_empty());

        Ok(ClientMeta { ip, user_agent })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn ip_bytes_match_address_family() {
        let v4 = ClientMeta {
            ip: Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7))),
            user_agent: None,
        };
        assert_eq!(v4.ip_bytes(), Some(vec![10, 0, 0, 7]));

        let v6 = ClientMeta {
            ip: Some(IpAddr::V6(Ipv6Addr::LOCALHOST)),
            user_agent: None,
        };
        assert_eq!(v6.ip_bytes().map(|b| b.len()), Some(16));
        assert_eq!(ClientMeta::default().ip_bytes(), None);
    }

    #[tokio::test]
    async fn extracts_peer_and_truncated_agent() {
        let long_agent = "x".repeat(400);
        let mut req = Request::builder()
            .header(header::USER_AGENT, long_agent)
            .body(())
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 168, 1, 2], 5555))));
        let (mut parts, _) = req.into_parts();

        let meta = ClientMeta::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(meta.ip, Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 2))));
        assert_eq!(meta.user_agent.map(|ua| ua.len()), Some(USER_AGENT_MAX));
    }

    #[tokio::test]
    async fn missing_transport_data_is_none() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        let meta = ClientMeta::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(meta, ClientMeta::default());
    }
}

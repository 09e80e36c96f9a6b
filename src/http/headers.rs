//! Header rewrite rules applied on the proxy hop.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers before a message crosses the hop
//! - Fold the client IP into the `X-Forwarded-For` chain
//! - Name the forwarding headers used across the crate

use std::net::IpAddr;

use axum::http::{HeaderMap, HeaderValue};

/// Hop-by-hop headers. They describe the connection between two peers, not
/// the message, and must not travel past the proxy in either direction.
/// <https://www.w3.org/Protocols/rfc2616/rfc2616-sec13.html>
pub const HOP_BY_HOP_HEADERS: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
];

/// Chain of client IPs, one entry per proxy hop.
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Host the client originally addressed, captured before the rewrite.
pub const X_FORWARDED_HOST: &str = "x-forwarded-host";

/// Remove every hop-by-hop header, however the sender spelled it.
/// Lookups are case-insensitive, and removal covers repeated lines.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP_HEADERS {
        headers.remove(name);
    }
}

/// Append `client_ip` to the `X-Forwarded-For` chain.
///
/// Prior entries may arrive spread over several header lines; they are
/// folded into a single comma-separated list with the new IP last, so the
/// full chain survives a request that crossed several proxies.
pub fn append_forwarded_for(headers: &mut HeaderMap, client_ip: IpAddr) {
    let prior: Vec<&str> = headers
        .get_all(X_FORWARDED_FOR)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect();

    let chain = if prior.is_empty() {
        client_ip.to_string()
    } else {
        format!("{}, {}", prior.join(", "), client_ip)
    };

    if let Ok(value) = HeaderValue::from_str(&chain) {
        headers.insert(X_FORWARDED_FOR, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn strips_hop_by_hop_regardless_of_case() {
        let mut headers = HeaderMap::new();
        headers.insert("Connection", HeaderValue::from_static("keep-alive"));
        headers.insert("Keep-Alive", HeaderValue::from_static("timeout=5"));
        headers.insert("Proxy-Authorization", HeaderValue::from_static("Basic x"));
        headers.insert("TE", HeaderValue::from_static("trailers"));
        headers.insert("x-request-id", HeaderValue::from_static("abc"));

        strip_hop_by_hop(&mut headers);

        for name in HOP_BY_HOP_HEADERS {
            assert!(!headers.contains_key(name), "{name} survived the strip");
        }
        assert_eq!(headers.get("x-request-id").unwrap(), "abc");
    }

    #[test]
    fn strips_repeated_hop_by_hop_lines() {
        let mut headers = HeaderMap::new();
        headers.append("connection", HeaderValue::from_static("keep-alive"));
        headers.append("connection", HeaderValue::from_static("upgrade"));

        strip_hop_by_hop(&mut headers);

        assert!(!headers.contains_key("connection"));
    }

    #[test]
    fn first_hop_writes_bare_client_ip() {
        let mut headers = HeaderMap::new();

        append_forwarded_for(&mut headers, ip("1.2.3.4"));

        assert_eq!(headers.get(X_FORWARDED_FOR).unwrap(), "1.2.3.4");
    }

    #[test]
    fn later_hops_append_to_the_chain() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("9.9.9.9"));

        append_forwarded_for(&mut headers, ip("1.2.3.4"));

        assert_eq!(headers.get(X_FORWARDED_FOR).unwrap(), "9.9.9.9, 1.2.3.4");
    }

    #[test]
    fn folds_multiple_prior_lines_into_one() {
        let mut headers = HeaderMap::new();
        headers.append(X_FORWARDED_FOR, HeaderValue::from_static("9.9.9.9"));
        headers.append(X_FORWARDED_FOR, HeaderValue::from_static("8.8.8.8"));

        append_forwarded_for(&mut headers, ip("1.2.3.4"));

        let values: Vec<_> = headers.get_all(X_FORWARDED_FOR).iter().collect();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0], "9.9.9.9, 8.8.8.8, 1.2.3.4");
    }

    #[test]
    fn ipv6_clients_are_recorded_unbracketed() {
        let mut headers = HeaderMap::new();

        append_forwarded_for(&mut headers, ip("::1"));

        assert_eq!(headers.get(X_FORWARDED_FOR).unwrap(), "::1");
    }
}

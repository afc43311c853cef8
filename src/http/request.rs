//! Request snapshots.
//!
//! A [`RequestSnapshot`] is the request as the handlers see it: method,
//! path, multi-valued query and headers, body text and the resolved client
//! address. It is built once per request and never mutated afterwards.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, request::Parts, HeaderMap, Method, Request};

use crate::error::AppError;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_REAL_IP: &str = "x-real-ip";

/// Key → values in declaration order.
pub type MultiMap = BTreeMap<String, Vec<String>>;

/// Where the client address was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressSource {
    ForwardedFor,
    RealIp,
    SocketAddress,
}

impl AddressSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressSource::ForwardedFor => "X-Forwarded-For",
            AddressSource::RealIp => "X-Real-IP",
            AddressSource::SocketAddress => "RemoteAddr",
        }
    }
}

impl std::fmt::Display for AddressSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved client address and the source it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddress {
    pub address: String,
    pub source: AddressSource,
}

/// Resolve the client address.
///
/// Precedence: `X-Forwarded-For`, then `X-Real-IP`, then the socket peer.
/// Header values are used verbatim; a forwarded-for chain is not split.
pub fn resolve_client_address(headers: &HeaderMap, peer: Option<SocketAddr>) -> ClientAddress {
    if let Some(address) = first_non_empty(headers, X_FORWARDED_FOR) {
        return ClientAddress {
            address,
            source: AddressSource::ForwardedFor,
        };
    }
    if let Some(address) = first_non_empty(headers, X_REAL_IP) {
        return ClientAddress {
            address,
            source: AddressSource::RealIp,
        };
    }
    ClientAddress {
        address: peer.map_or_else(|| crate::discovery::UNKNOWN.to_string(), |p| p.to_string()),
        source: AddressSource::SocketAddress,
    }
}

fn first_non_empty(headers: &HeaderMap, name: &str) -> Option<String> {
    let value = headers.get(name)?;
    let value = String::from_utf8_lossy(value.as_bytes());
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Socket peer recorded by `into_make_service_with_connect_info`.
pub fn peer_address<B>(request: &Request<B>) -> Option<SocketAddr> {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
}

/// Immutable description of one inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSnapshot {
    pub method: String,
    pub path: String,
    pub query: MultiMap,
    pub headers: MultiMap,
    pub body: String,
    pub client_address: String,
    pub address_source: AddressSource,
}

impl RequestSnapshot {
    /// Consume a request, reading its body if one was declared.
    pub async fn capture(request: Request<Body>) -> Result<Self, AppError> {
        let peer = peer_address(&request);
        let (parts, body) = request.into_parts();

        let body = if expects_body(&parts.headers) {
            let bytes = axum::body::to_bytes(body, usize::MAX)
                .await
                .map_err(AppError::Body)?;
            String::from_utf8_lossy(&bytes).into_owned()
        } else {
            String::new()
        };

        Ok(Self::from_parts(&parts, peer, body))
    }

    /// Build a snapshot from request head and an already-read body.
    pub fn from_parts(parts: &Parts, peer: Option<SocketAddr>, body: String) -> Self {
        let client = resolve_client_address(&parts.headers, peer);
        Self {
            method: parts.method.to_string(),
            path: parts.uri.path().to_string(),
            query: parse_query(parts.uri.query().unwrap_or_default()),
            headers: collect_headers(&parts.headers),
            body,
            client_address: client.address,
            address_source: client.source,
        }
    }
}

/// Whether the request head declares a body.
///
/// A positive `Content-Length` or any `Transfer-Encoding` counts.
pub fn expects_body(headers: &HeaderMap) -> bool {
    if headers.contains_key(header::TRANSFER_ENCODING) {
        return true;
    }
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .is_some_and(|len| len > 0)
}

/// Methods whose semantics include a request body.
pub fn method_allows_body(method: &Method) -> bool {
    ![
        Method::GET,
        Method::HEAD,
        Method::OPTIONS,
        Method::TRACE,
        Method::CONNECT,
    ]
    .contains(method)
}

/// Parse a query string, keeping repeated keys in order.
pub fn parse_query(query: &str) -> MultiMap {
    let mut params = MultiMap::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        params
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }
    params
}

/// Group header values by canonical name, in the order they arrived.
pub fn collect_headers(headers: &HeaderMap) -> MultiMap {
    let mut grouped = MultiMap::new();
    for (name, value) in headers {
        grouped
            .entry(canonical_header_name(name.as_str()))
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    grouped
}

/// `x-forwarded-for` → `X-Forwarded-For`.
pub fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    let mut word = first.to_ascii_uppercase().to_string();
                    word.push_str(&chars.as_str().to_ascii_lowercase());
                    word
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> Option<SocketAddr> {
        Some("10.1.1.1:43210".parse().unwrap())
    }

    #[test]
    fn forwarded_for_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("203.0.113.7"));
        headers.insert(X_REAL_IP, HeaderValue::from_static("198.51.100.2"));

        let client = resolve_client_address(&headers, peer());
        assert_eq!(client.address, "203.0.113.7");
        assert_eq!(client.source, AddressSource::ForwardedFor);
    }

    #[test]
    fn real_ip_beats_socket() {
        let mut headers = HeaderMap::new();
        headers.insert(X_REAL_IP, HeaderValue::from_static("198.51.100.2"));

        let client = resolve_client_address(&headers, peer());
        assert_eq!(client.address, "198.51.100.2");
        assert_eq!(client.source, AddressSource::RealIp);
    }

    #[test]
    fn socket_peer_is_last_resort() {
        let client = resolve_client_address(&HeaderMap::new(), peer());
        assert_eq!(client.address, "10.1.1.1:43210");
        assert_eq!(client.source, AddressSource::SocketAddress);
    }

    #[test]
    fn empty_forwarded_for_is_skipped() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static(""));
        headers.insert(X_REAL_IP, HeaderValue::from_static("198.51.100.2"));

        assert_eq!(resolve_client_address(&headers, peer()).source, AddressSource::RealIp);
    }

    #[test]
    fn missing_peer_is_unknown() {
        let client = resolve_client_address(&HeaderMap::new(), None);
        assert_eq!(client.address, "unknown");
    }

    #[test]
    fn query_keeps_repeated_keys_in_order() {
        let query = parse_query("b=2&a=1&b=3&empty=&space=a%20b");
        assert_eq!(query["b"], vec!["2", "3"]);
        assert_eq!(query["a"], vec!["1"]);
        assert_eq!(query["empty"], vec![""]);
        assert_eq!(query["space"], vec!["a b"]);
    }

    #[test]
    fn headers_are_grouped_under_canonical_names() {
        let mut headers = HeaderMap::new();
        headers.append("x-test", HeaderValue::from_static("one"));
        headers.append("x-test", HeaderValue::from_static("two"));
        headers.append("accept", HeaderValue::from_static("*/*"));

        let grouped = collect_headers(&headers);
        assert_eq!(grouped["X-Test"], vec!["one", "two"]);
        assert_eq!(grouped["Accept"], vec!["*/*"]);
    }

    #[test]
    fn canonical_names() {
        assert_eq!(canonical_header_name("x-real-ip"), "X-Real-Ip");
        assert_eq!(canonical_header_name("content-type"), "Content-Type");
        assert_eq!(canonical_header_name("USER-AGENT"), "User-Agent");
    }

    #[test]
    fn body_expectation_follows_declared_length() {
        let mut headers = HeaderMap::new();
        assert!(!expects_body(&headers));

        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("0"));
        assert!(!expects_body(&headers));

        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("7"));
        assert!(expects_body(&headers));

        let mut chunked = HeaderMap::new();
        chunked.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        assert!(expects_body(&chunked));
    }

    #[test]
    fn body_methods() {
        assert!(method_allows_body(&Method::POST));
        assert!(method_allows_body(&Method::PUT));
        assert!(method_allows_body(&Method::DELETE));
        assert!(!method_allows_body(&Method::GET));
        assert!(!method_allows_body(&Method::HEAD));
    }

    #[tokio::test]
    async fn capture_reads_declared_body() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/submit?tag=a&tag=b")
            .header(header::CONTENT_LENGTH, "7")
            .header("x-test", "v")
            .extension(ConnectInfo::<SocketAddr>("127.0.0.1:5000".parse().unwrap()))
            .body(Body::from(r#"{"a":1}"#))
            .unwrap();

        let snapshot = RequestSnapshot::capture(request).await.unwrap();
        assert_eq!(snapshot.method, "POST");
        assert_eq!(snapshot.path, "/submit");
        assert_eq!(snapshot.query["tag"], vec!["a", "b"]);
        assert_eq!(snapshot.headers["X-Test"], vec!["v"]);
        assert_eq!(snapshot.body, r#"{"a":1}"#);
        assert_eq!(snapshot.client_address, "127.0.0.1:5000");
        assert_eq!(snapshot.address_source, AddressSource::SocketAddress);
    }

    #[tokio::test]
    async fn capture_skips_undeclared_body() {
        let request = Request::builder()
            .uri("/")
            .body(Body::from("ignored"))
            .unwrap();

        let snapshot = RequestSnapshot::capture(request).await.unwrap();
        assert!(snapshot.body.is_empty());
    }
}

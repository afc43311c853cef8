//! `/` in echo mode: the request mirrored back as JSON.

use axum::extract::Request;
use axum::http::{header, Method};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::discovery;
use crate::error::AppError;
use crate::http::request::{method_allows_body, MultiMap, RequestSnapshot};

/// Top-level echo document.
#[derive(Debug, Serialize)]
pub struct EchoResponse {
    /// Hostname of the pod that answered.
    pub hostname: String,
    pub request: EchoRequest,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EchoRequest {
    pub method: String,
    pub path: String,
    pub query: MultiMap,
    pub headers: MultiMap,
    pub body: String,
    pub remote_address: String,
}

impl EchoResponse {
    /// Build the echo document. The body is dropped for methods that carry none.
    pub fn new(snapshot: RequestSnapshot, hostname: String) -> Self {
        let body = match snapshot.method.parse::<Method>() {
            Ok(method) if method_allows_body(&method) => snapshot.body,
            _ => String::new(),
        };

        Self {
            hostname,
            request: EchoRequest {
                method: snapshot.method,
                path: snapshot.path,
                query: snapshot.query,
                headers: snapshot.headers,
                body,
                remote_address: snapshot.client_address,
            },
        }
    }
}

/// Mirror the request back as indented JSON.
pub async fn echo(request: Request) -> Result<Response, AppError> {
    let snapshot = RequestSnapshot::capture(request).await?;
    let document = EchoResponse::new(snapshot, discovery::hostname());
    let json = serde_json::to_string_pretty(&document)?;

    Ok(([(header::CONTENT_TYPE, "application/json")], json).into_response())
}

//! Transport seam: everything above this module talks to the server through [`Connection`].

pub mod config;
pub mod http;

#[cfg(test)]
pub(crate) mod mock;

use std::collections::HashMap;
use std::fmt;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use crate::common::error::{ArangoError, Result};
use crate::common::response::ResponseStruct;

pub use config::ClientConfig;
pub use http::{Authentication, HttpConnection};

/// HTTP methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    HEAD,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::HEAD => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outgoing request, path relative to the connection endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
}

impl Request {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Request {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_json_body<T: Serialize + ?Sized>(mut self, data: &T) -> Result<Self> {
        let body = serde_json::to_vec(data).map_err(ArangoError::Encode)?;
        self.headers
            .insert("content-type".to_string(), "application/json".to_string());
        self.body = Some(body);
        Ok(self)
    }

    pub fn get_query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Request body parsed back into JSON, if any.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_slice(body).ok())
    }
}

/// Raw response as returned by the transport
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status_code: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status_code: u16) -> Self {
        Response {
            status_code,
            body: Vec::new(),
        }
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn code(&self) -> u16 {
        self.status_code
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Decodes the body into `T`. An empty body decodes as `null`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        if self.body.is_empty() {
            return serde_json::from_value(serde_json::Value::Null).map_err(ArangoError::Decode);
        }
        serde_json::from_slice(&self.body).map_err(ArangoError::Decode)
    }

    /// Maps a non-success response to a typed error. Bodies that are not a
    /// JSON envelope (proxies, HTML error pages) still yield an API error.
    pub fn as_arango_error(&self) -> ArangoError {
        let envelope: ResponseStruct = serde_json::from_slice(&self.body).unwrap_or_default();
        envelope.as_arango_error_with_code(self.status_code)
    }
}

/// A connection to an ArangoDB endpoint.
///
/// Implementations own transport concerns (TLS, auth headers, timeouts,
/// retries). Dropping the returned future must abort the request.
#[async_trait]
pub trait Connection: Send + Sync + fmt::Debug {
    async fn call(&self, request: Request) -> Result<Response>;
}

pub async fn call_get(connection: &dyn Connection, url: &str) -> Result<Response> {
    connection.call(Request::new(HttpMethod::GET, url)).await
}

pub async fn call_delete(connection: &dyn Connection, url: &str) -> Result<Response> {
    connection.call(Request::new(HttpMethod::DELETE, url)).await
}

pub async fn call_put<B: Serialize + ?Sized>(
    connection: &dyn Connection,
    url: &str,
    body: &B,
) -> Result<Response> {
    let request = Request::new(HttpMethod::PUT, url).with_json_body(body)?;
    connection.call(request).await
}

pub async fn call_post<B: Serialize + ?Sized>(
    connection: &dyn Connection,
    url: &str,
    body: &B,
) -> Result<Response> {
    let request = Request::new(HttpMethod::POST, url).with_json_body(body)?;
    connection.call(request).await
}

pub async fn call_patch<B: Serialize + ?Sized>(
    connection: &dyn Connection,
    url: &str,
    body: &B,
) -> Result<Response> {
    let request = Request::new(HttpMethod::PATCH, url).with_json_body(body)?;
    connection.call(request).await
}

use std::time::Duration;
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use url::Url;
use crate::common::error::{ArangoError, Result};
use super::config::ClientConfig;
use super::{Connection, HttpMethod, Request, Response};

/// Credentials attached to every request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Authentication {
    #[default]
    None,
    Basic {
        username: String,
        password: Option<String>,
    },
    Jwt(String),
}

/// `reqwest`-backed [`Connection`] to a single endpoint
#[derive(Debug, Clone)]
pub struct HttpConnection {
    client: reqwest::Client,
    endpoint: Url,
    authentication: Authentication,
}

impl HttpConnection {
    pub fn new(endpoint: &str) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(HttpConnection {
            client,
            endpoint: Url::parse(endpoint)?,
            authentication: Authentication::None,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(HttpConnection {
            client,
            endpoint: Url::parse(&config.endpoint)?,
            authentication: config.authentication(),
        })
    }

    pub fn with_authentication(mut self, authentication: Authentication) -> Self {
        self.authentication = authentication;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Endpoint joined with the request path; any base path on the endpoint is kept.
    fn build_url(&self, request: &Request) -> Result<Url> {
        let base = self.endpoint.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{}{}", base, request.path))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::GET => reqwest::Method::GET,
        HttpMethod::POST => reqwest::Method::POST,
        HttpMethod::PUT => reqwest::Method::PUT,
        HttpMethod::DELETE => reqwest::Method::DELETE,
        HttpMethod::PATCH => reqwest::Method::PATCH,
        HttpMethod::HEAD => reqwest::Method::HEAD,
    }
}

#[async_trait]
impl Connection for HttpConnection {
    async fn call(&self, request: Request) -> Result<Response> {
        let url = self.build_url(&request)?;
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), url);

        builder = match &self.authentication {
            Authentication::None => builder,
            Authentication::Basic { username, password } => {
                builder.basic_auth(username, password.as_deref())
            }
            Authentication::Jwt(token) => builder.bearer_auth(token),
        };

        for (key, value) in &request.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| ArangoError::validation(format!("invalid header name '{}': {}", key, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ArangoError::validation(format!("invalid header value for '{}': {}", key, e)))?;
            builder = builder.header(name, value);
        }

        if let Some(body) = request.body {
            if !request.headers.contains_key("content-type") {
                builder = builder.header(CONTENT_TYPE, "application/json");
            }
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status_code = response.status().as_u16();
        let body = response.bytes().await?;

        tracing::debug!(
            method = request.method.as_str(),
            path = %request.path,
            status = status_code,
            "arangodb call"
        );

        Ok(Response::new(status_code).with_body(body.to_vec()))
    }
}

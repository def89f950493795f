use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use crate::common::error::{ArangoError, Result};
use super::{Connection, HttpMethod, Request, Response};

#[derive(Debug, Clone)]
enum Reply {
    Response(Response),
    TransportError(String),
}

/// Scripted in-memory connection. Replies registered for the same
/// method and path are served in order; the last one repeats.
#[derive(Debug, Default)]
pub struct MockConnection {
    routes: Mutex<HashMap<(HttpMethod, String), VecDeque<Reply>>>,
    requests: Mutex<Vec<Request>>,
    delay: Option<Duration>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn on(&self, method: HttpMethod, path: &str, status: u16, body: Value) -> &Self {
        let body = serde_json::to_vec(&body).unwrap();
        self.push(method, path, Reply::Response(Response::new(status).with_body(body)))
    }

    pub fn on_error(&self, method: HttpMethod, path: &str, status: u16, error_num: u32, message: &str) -> &Self {
        self.on(
            method,
            path,
            status,
            json!({"error": true, "code": status, "errorNum": error_num, "errorMessage": message}),
        )
    }

    pub fn on_transport_error(&self, method: HttpMethod, path: &str, message: &str) -> &Self {
        self.push(method, path, Reply::TransportError(message.to_string()))
    }

    fn push(&self, method: HttpMethod, path: &str, reply: Reply) -> &Self {
        self.routes
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> Request {
        self.requests.lock().last().cloned().expect("no request recorded")
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn call(&self, request: Request) -> Result<Response> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let key = (request.method, request.path.clone());
        self.requests.lock().push(request);

        let reply = {
            let mut routes = self.routes.lock();
            match routes.get_mut(&key) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::TransportError(message)) => Err(ArangoError::transport(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                message,
            ))),
            None => {
                let body = json!({
                    "error": true,
                    "code": 404,
                    "errorNum": 404,
                    "errorMessage": format!("no mock for {} {}", key.0, key.1)
                });
                Ok(Response::new(404).with_body(serde_json::to_vec(&body).unwrap()))
            }
        }
    }
}

//! Scripted transport for exercising the client without a backend.
//!
//! Replies are queued per `(method, path)`. Each request pops the next queued
//! reply; the last one is sticky and keeps answering once the queue is down
//! to it. Unscripted routes answer `404 {"detail": "Not Found"}`. Every request
//! is logged so tests can assert on what was sent and how often.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use serde_json::Value;

use crate::api::{HttpRequest, HttpResponse, Method, Transport};
use crate::error::ApiError;

#[derive(Debug, Clone)]
enum Reply {
    Response(HttpResponse),
    NetworkError(String),
}

type Hook = Box<dyn Fn(&HttpRequest)>;

#[derive(Default)]
struct MockState {
    routes: RefCell<HashMap<(Method, String), VecDeque<Reply>>>,
    log: RefCell<Vec<HttpRequest>>,
    hooks: RefCell<Vec<Hook>>,
}

/// Clones share routes and the request log.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Rc<MockState>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a JSON reply.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        self.respond_raw(method, path, status, &body.to_string());
    }

    pub fn respond_raw(&self, method: Method, path: &str, status: u16, body: &str) {
        self.push(method, path, Reply::Response(HttpResponse::new(status, body)));
    }

    /// Queues a successful download.
    pub fn respond_bytes(&self, method: Method, path: &str, status: u16, bytes: Vec<u8>) {
        self.push(method, path, Reply::Response(HttpResponse::binary(status, bytes)));
    }

    /// Queues a transport-level failure.
    pub fn fail(&self, method: Method, path: &str, message: &str) {
        self.push(method, path, Reply::NetworkError(message.to_string()));
    }

    /// Runs `hook` on every request just before its reply is produced.
    pub fn on_send(&self, hook: impl Fn(&HttpRequest) + 'static) {
        self.state.hooks.borrow_mut().push(Box::new(hook));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.log.borrow().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.state
            .log
            .borrow()
            .iter()
            .filter(|request| request.method == method && request.path == path)
            .count()
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        self.state
            .routes
            .borrow_mut()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    fn next_reply(&self, method: Method, path: &str) -> Option<Reply> {
        let mut routes = self.state.routes.borrow_mut();
        let queue = routes.get_mut(&(method, path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.state.log.borrow_mut().push(request.clone());
        for hook in self.state.hooks.borrow().iter() {
            hook(&request);
        }

        match self.next_reply(request.method, &request.path) {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::NetworkError(message)) => Err(ApiError::Network(message)),
            None => Ok(HttpResponse::new(404, r#"{"detail":"Not Found"}"#)),
        }
    }
}

//! HTTP plumbing shared by every resource.
//!
//! `Transport` is the seam between the client core and the platform: the
//! browser implements it with `fetch`, tests with a scripted mock. It only
//! fails when no response was obtained; interpreting status codes is the job
//! of `ApiClient`, which also resolves paths against the configured base URL
//! and attaches the bearer token from the session. Nothing here retries.
//!
//! A `401` on a request that carried a token means the token is no longer
//! accepted: the session is cleared and the expiry hook, if any, is told.

use std::cell::RefCell;
use std::fmt;

use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::requests::UploadFile;
use crate::session::{Session, SessionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded` fields.
    Form(Vec<(String, String)>),
    /// A single file part under `field`.
    Multipart { field: String, file: UploadFile },
}

/// How a successful response body should be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseKind {
    #[default]
    Text,
    /// Raw bytes, for downloads. Error bodies are still read as text.
    Binary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Path relative to the base URL, including any query string.
    pub path: String,
    /// Fully resolved URL.
    pub url: String,
    pub bearer: Option<String>,
    pub body: RequestBody,
    pub expect: ResponseKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    /// Filled instead of `body` for a successful `Binary` request.
    pub bytes: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            bytes: Vec::new(),
        }
    }

    pub fn binary(status: u16, bytes: Vec<u8>) -> Self {
        Self {
            status,
            body: String::new(),
            bytes,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn decode<R: DeserializeOwned>(&self) -> Result<R, ApiError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Sends the request. `Err` means no HTTP response was obtained; every
    /// status code, including 4xx/5xx, comes back as `Ok`.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

type ExpiryHook = Box<dyn Fn()>;

pub struct ApiClient<T, S> {
    transport: T,
    session: Session<S>,
    config: ApiConfig,
    on_expired: RefCell<Option<ExpiryHook>>,
}

impl<T: Transport, S: SessionStore> ApiClient<T, S> {
    pub fn new(transport: T, session: Session<S>, config: ApiConfig) -> Self {
        Self {
            transport,
            session,
            config,
            on_expired: RefCell::new(None),
        }
    }

    /// Registers the callback run after a token was rejected. Replaces any
    /// earlier one.
    pub fn on_session_expired(&self, hook: impl Fn() + 'static) {
        *self.on_expired.borrow_mut() = Some(Box::new(hook));
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.send(Method::Get, path, RequestBody::Empty)
            .await?
            .decode()
    }

    /// GET for a file download.
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .dispatch(Method::Get, path, RequestBody::Empty, ResponseKind::Binary)
            .await?;
        Ok(response.bytes)
    }

    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let body = serde_json::to_value(body)
            .map_err(|err| ApiError::validation(format!("Could not encode request: {err}")))?;
        self.send(Method::Post, path, RequestBody::Json(body))
            .await?
            .decode()
    }

    pub async fn post_empty<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.send(Method::Post, path, RequestBody::Empty)
            .await?
            .decode()
    }

    pub async fn post_form<R: DeserializeOwned>(
        &self,
        path: &str,
        fields: Vec<(String, String)>,
    ) -> Result<R, ApiError> {
        self.send(Method::Post, path, RequestBody::Form(fields))
            .await?
            .decode()
    }

    pub async fn post_multipart<R: DeserializeOwned>(
        &self,
        path: &str,
        file: UploadFile,
    ) -> Result<R, ApiError> {
        let body = RequestBody::Multipart {
            field: "file".to_string(),
            file,
        };
        self.send(Method::Post, path, body).await?.decode()
    }

    /// DELETE; the body of a successful response (usually 204) is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(Method::Delete, path, RequestBody::Empty).await?;
        Ok(())
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<HttpResponse, ApiError> {
        self.dispatch(method, path, body, ResponseKind::Text).await
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        expect: ResponseKind,
    ) -> Result<HttpResponse, ApiError> {
        let request = HttpRequest {
            method,
            path: path.to_string(),
            url: self.config.url(path),
            bearer: self.session.token(),
            body,
            expect,
        };
        debug!("{} {}", method, request.url);
        let authenticated = request.bearer.is_some();

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!("{method} {path} failed: {err}");
                return Err(err);
            }
        };

        if response.is_success() {
            Ok(response)
        } else {
            let err = ApiError::from_response(response.status, &response.body);
            warn!("{method} {path} -> {}: {err}", response.status);
            if authenticated && err.is_unauthorized() {
                self.expire_session();
            }
            Err(err)
        }
    }
}

impl<T, S: SessionStore> ApiClient<T, S> {
    fn expire_session(&self) {
        warn!("token rejected, clearing session");
        self.session.clear();
        if let Some(hook) = self.on_expired.borrow().as_ref() {
            hook();
        }
    }
}

/// Percent-encodes a query parameter value. Unreserved characters pass
/// through, every other UTF-8 byte becomes `%XX`.
pub fn encode_query_value(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use futures::executor::block_on;
    use serde_json::json;

    use super::*;
    use crate::model::Job;
    use crate::session::MemoryStore;
    use crate::test_harness::MockTransport;

    fn client(transport: MockTransport, store: MemoryStore) -> ApiClient<MockTransport, MemoryStore> {
        ApiClient::new(
            transport,
            Session::new(store),
            ApiConfig::with_base_url(Some("http://api.test")),
        )
    }

    #[test]
    fn attaches_stored_bearer_token() {
        let transport = MockTransport::new();
        transport.respond(Method::Get, "/jobs/j-1", 200, json!({
            "id": "j-1", "job_type": "evidence_run", "status": "RUNNING",
            "progress": 3, "total_controls": 8
        }));
        let store = MemoryStore::new();
        Session::new(store.clone()).store_token("secret");

        let api = client(transport.clone(), store);
        let job: Job = block_on(api.get("/jobs/j-1")).unwrap();

        assert_eq!(job.progress, 3);
        let sent = transport.requests();
        assert_eq!(sent[0].bearer.as_deref(), Some("secret"));
        assert_eq!(sent[0].url, "http://api.test/jobs/j-1");
    }

    #[test]
    fn non_success_surfaces_detail_without_retry() {
        let transport = MockTransport::new();
        transport.respond(Method::Post, "/jobs/j-1/run", 400, json!({
            "detail": "Job cannot be run in RUNNING status"
        }));
        let api = client(transport.clone(), MemoryStore::new());

        let err = block_on(api.post_empty::<Job>("/jobs/j-1/run")).unwrap_err();

        assert_eq!(err.message(), "Job cannot be run in RUNNING status");
        assert_eq!(transport.count(Method::Post, "/jobs/j-1/run"), 1);
    }

    #[test]
    fn rejected_token_clears_session_and_notifies() {
        let transport = MockTransport::new();
        transport.respond(Method::Get, "/documents", 401, json!({
            "detail": "Could not validate credentials"
        }));
        let store = MemoryStore::new();
        Session::new(store.clone()).store_token("stale");
        let api = client(transport, store.clone());
        let expired = Rc::new(Cell::new(0));
        let seen = expired.clone();
        api.on_session_expired(move || seen.set(seen.get() + 1));

        let err = block_on(api.get::<serde_json::Value>("/documents")).unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(expired.get(), 1);
        assert_eq!(store.get("token"), None);
    }

    #[test]
    fn anonymous_unauthorized_is_just_an_error() {
        let transport = MockTransport::new();
        transport.respond(Method::Post, "/auth/login", 401, json!({
            "detail": "Incorrect email or password"
        }));
        let api = client(transport, MemoryStore::new());
        let expired = Rc::new(Cell::new(0));
        let seen = expired.clone();
        api.on_session_expired(move || seen.set(seen.get() + 1));

        let err = block_on(api.post_form::<serde_json::Value>("/auth/login", Vec::new())).unwrap_err();

        assert_eq!(err.message(), "Incorrect email or password");
        assert_eq!(expired.get(), 0);
    }

    #[test]
    fn network_failure_is_passed_through() {
        let transport = MockTransport::new();
        transport.fail(Method::Get, "/documents", "connection refused");
        let api = client(transport, MemoryStore::new());

        let err = block_on(api.get::<serde_json::Value>("/documents")).unwrap_err();
        assert_eq!(err, ApiError::Network("connection refused".into()));
    }

    #[test]
    fn undecodable_success_body_is_a_decode_error() {
        let transport = MockTransport::new();
        transport.respond_raw(Method::Get, "/jobs/j-1", 200, "not json");
        let api = client(transport, MemoryStore::new());

        let err = block_on(api.get::<Job>("/jobs/j-1")).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn delete_accepts_empty_no_content() {
        let transport = MockTransport::new();
        transport.respond_raw(Method::Delete, "/documents/d-1", 204, "");
        let api = client(transport, MemoryStore::new());

        assert!(block_on(api.delete("/documents/d-1")).is_ok());
    }

    #[test]
    fn get_bytes_asks_for_a_binary_body() {
        let transport = MockTransport::new();
        transport.respond_bytes(Method::Get, "/reports/demo", 200, b"%PDF-1.4".to_vec());
        let api = client(transport.clone(), MemoryStore::new());

        let bytes = block_on(api.get_bytes("/reports/demo")).unwrap();

        assert_eq!(bytes, b"%PDF-1.4");
        assert_eq!(transport.requests()[0].expect, ResponseKind::Binary);
    }

    #[test]
    fn failed_download_reports_the_detail() {
        let transport = MockTransport::new();
        transport.respond(Method::Get, "/reports/demo", 500, json!({
            "detail": "Report generation failed"
        }));
        let api = client(transport, MemoryStore::new());

        let err = block_on(api.get_bytes("/reports/demo")).unwrap_err();
        assert_eq!(err.message(), "Report generation failed");
    }

    #[test]
    fn query_values_are_percent_encoded() {
        assert_eq!(encode_query_value("Acme Corporation"), "Acme%20Corporation");
        assert_eq!(encode_query_value("R&D / Ops"), "R%26D%20%2F%20Ops");
        assert_eq!(encode_query_value("Zürich"), "Z%C3%BCrich");
        assert_eq!(encode_query_value("plain-name_1.0~"), "plain-name_1.0~");
    }
}

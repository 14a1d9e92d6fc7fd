//! Platform-neutral core of the ShieldAgent compliance client.
//!
//! The browser frontend renders dashboards; everything that decides *what* it
//! renders lives here so it can be exercised without a browser:
//!
//! - `model`: the wire types returned by the compliance backend.
//! - `requests`: payloads the client sends (login, registration, job creation, uploads).
//! - `api`: the `Transport` contract and the `ApiClient` that attaches the bearer
//!   token and normalizes error messages.
//! - `session`: token, user and onboarding flag held in an injected `SessionStore`.
//! - `cache`: the query cache keyed by resource identity, with prefix invalidation.
//! - `resources`: per-resource capabilities (auth, documents, jobs, controls).
//! - `jobs`: the job lifecycle and the `JobPoller` that follows one job to a
//!   terminal status.
//! - `transform`: pure reshaping of evidence/job/control payloads into the
//!   dashboard view models.
//! - `demo`: the static sample analysis behind the demo tour.
//! - `timer`: the clock/sleep abstraction the poller and cache run on.

pub mod api;
pub mod cache;
pub mod config;
pub mod demo;
pub mod error;
pub mod format;
pub mod jobs;
pub mod model;
pub mod requests;
pub mod resources;
pub mod session;
#[cfg(any(test, feature = "test-harness"))]
pub mod test_harness;
pub mod timer;
pub mod transform;

pub use api::{ApiClient, HttpRequest, HttpResponse, Method, RequestBody, ResponseKind, Transport};
pub use config::ApiConfig;
pub use error::ApiError;
pub use jobs::{JobPoller, JobStatus, PollOutcome, PollUpdate};
pub use resources::ComplianceClient;
pub use session::{MemoryStore, Session, SessionStore};
pub use timer::{CancelToken, ManualTimer, Timer};

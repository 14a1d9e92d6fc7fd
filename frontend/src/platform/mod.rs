//! Browser implementations of the client core's seams: `fetch` transport,
//! `localStorage` session store, `setTimeout` timer and a console logger.

use std::ops::Deref;
use std::rc::Rc;

use common::{ApiConfig, ComplianceClient};

mod logger;
mod storage;
mod timer;
mod transport;

pub use logger::init_logger;
pub use storage::BrowserStorage;
pub use timer::BrowserTimer;
pub use transport::FetchTransport;

pub type Client = ComplianceClient<FetchTransport, BrowserStorage, BrowserTimer>;

/// Shared handle passed down through props. Two handles are equal when they
/// point at the same client.
#[derive(Clone)]
pub struct ClientHandle(Rc<Client>);

impl ClientHandle {
    pub fn new() -> Self {
        let config = ApiConfig::with_base_url(option_env!("SHIELDAGENT_API_URL"));
        log::info!("using API at {}", config.base_url);
        Self(Rc::new(ComplianceClient::new(
            FetchTransport,
            BrowserStorage,
            BrowserTimer,
            config,
        )))
    }
}

impl Deref for ClientHandle {
    type Target = Client;

    fn deref(&self) -> &Client {
        &self.0
    }
}

impl PartialEq for ClientHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

//! The signed-in session: bearer token, cached user profile and the one-time
//! onboarding flag.
//!
//! All three live in durable client storage. Rather than reading that storage
//! ambiently, the client is handed a `Session` over an injected
//! `SessionStore`: the browser backs it with `localStorage`, tests with
//! `MemoryStore`. The token is read from the store on every request, so a
//! logout takes effect for the very next call.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, warn};

use crate::model::User;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const ONBOARDING_KEY: &str = "shieldagent_onboarding_complete";

/// Durable string key/value storage.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.borrow().contains_key(key)
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.borrow_mut().remove(key);
    }
}

pub struct Session<S> {
    store: S,
}

impl<S: SessionStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|token| !token.is_empty())
    }

    /// The stored profile. A profile that no longer parses is treated as a
    /// corrupt session and both token and user are discarded.
    pub fn user(&self) -> Option<User> {
        let raw = self.store.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!("discarding unreadable stored user: {err}");
                self.clear();
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some() && self.user().is_some()
    }

    pub fn store_token(&self, token: &str) {
        self.store.set(TOKEN_KEY, token);
    }

    pub fn store_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(json) => self.store.set(USER_KEY, &json),
            Err(err) => warn!("could not persist user profile: {err}"),
        }
    }

    /// Logout: forgets token and user. The onboarding flag survives.
    pub fn clear(&self) {
        debug!("clearing session");
        self.store.remove(TOKEN_KEY);
        self.store.remove(USER_KEY);
    }

    pub fn onboarding_complete(&self) -> bool {
        self.store.get(ONBOARDING_KEY).as_deref() == Some("true")
    }

    pub fn complete_onboarding(&self) {
        self.store.set(ONBOARDING_KEY, "true");
    }

    pub fn reset_onboarding(&self) {
        self.store.remove(ONBOARDING_KEY);
    }
}

use common::SessionStore;
use web_sys::Storage;

/// `window.localStorage`. When storage is unavailable (private mode, blocked
/// cookies) reads come back empty and writes are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

impl SessionStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = local_storage() {
            if storage.set_item(key, value).is_err() {
                log::warn!("could not persist {key}");
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = local_storage() {
            storage.remove_item(key).ok();
        }
    }
}

use wasm_bindgen::JsValue;
use web_sys::Storage;

use crate::{SessionStore, StoreError};

/// A [SessionStore] backed by the window's `localStorage`.
#[derive(Clone, Debug)]
pub struct LocalSessionStore {
    storage: Storage,
}

impl LocalSessionStore {
    /// Opens the current window's `localStorage`. Fails with
    /// [`StoreError::Unavailable`] outside a window (workers) or when the
    /// browser denies access.
    pub fn open() -> Result<Self, StoreError> {
        let window = web_sys::window().ok_or(StoreError::Unavailable)?;
        let storage = window
            .local_storage()
            .map_err(backend_error)?
            .ok_or(StoreError::Unavailable)?;

        Ok(Self { storage })
    }

    /// Like [`LocalSessionStore::open`], but absent storage is `None` so the
    /// result can be used directly as an (empty) [SessionStore].
    pub fn open_if_available() -> Option<Self> {
        match Self::open() {
            Ok(store) => Some(store),
            Err(error) => {
                tracing::warn!(%error, "localStorage is not available");
                None
            }
        }
    }
}

fn backend_error(value: JsValue) -> StoreError {
    StoreError::Backend(format!("{value:?}"))
}

impl SessionStore for LocalSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage.get_item(key).map_err(backend_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage.set_item(key, value).map_err(backend_error)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.storage.remove_item(key).map_err(backend_error)
    }
}

#[cfg(test)]
mod tests {
    use wasm_bindgen_test::wasm_bindgen_test;

    use crate::{LocalSessionStore, SessionStore};

    wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn it_round_trips_through_local_storage() {
        let store = LocalSessionStore::open().unwrap();

        store.set("motorchain_test", "value").unwrap();
        assert_eq!(
            store.get("motorchain_test").unwrap(),
            Some("value".to_owned())
        );

        store.remove("motorchain_test").unwrap();
        assert_eq!(store.get("motorchain_test").unwrap(), None);
    }
}

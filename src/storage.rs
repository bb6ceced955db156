//! Durable client storage for the session token.

#[cfg(test)]
use std::{cell::RefCell, collections::HashMap, rc::Rc};

use web_sys::Storage;

/// The single `localStorage` key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

pub trait TokenStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// `window.localStorage`. Every call is a no-op when storage is unavailable
/// (private browsing, sandboxed iframes).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl TokenStorage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?
            .get_item(key)
            .ok()
            .flatten()
            .filter(|value| !value.is_empty())
    }

    fn set(&self, key: &str, value: &str) {
        match Self::storage() {
            Some(storage) => {
                if storage.set_item(key, value).is_err() {
                    log::warn!("could not write {key} to localStorage");
                }
            }
            None => log::warn!("localStorage is unavailable, {key} will not persist"),
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            if storage.remove_item(key).is_err() {
                log::warn!("could not remove {key} from localStorage");
            }
        }
    }
}

/// In-memory storage; clones share the same map.
#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

#[cfg(test)]
impl TokenStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryStorage, TokenStorage, TOKEN_KEY};

    #[test]
    fn clones_share_items() {
        let storage = MemoryStorage::default();
        let clone = storage.clone();

        storage.set(TOKEN_KEY, "abc");

        assert_eq!(clone.get(TOKEN_KEY).as_deref(), Some("abc"));

        clone.remove(TOKEN_KEY);

        assert_eq!(storage.get(TOKEN_KEY), None);
    }
}

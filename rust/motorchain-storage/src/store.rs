use std::sync::Arc;

use motorchain_common::ConditionalSync;

use crate::StoreError;

/// A [SessionStore] is a facade over a string key-value store such as
/// `localStorage`. Access is synchronous, and implementations use interior
/// mutability so a store can be shared by reference.
pub trait SessionStore: ConditionalSync {
    /// Retrieve the value (if any) stored against the given key
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Store the given value against the given key
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Remove the value stored against the given key, if any
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<T> SessionStore for Arc<T>
where
    T: SessionStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        T::get(self, key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        T::set(self, key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        T::remove(self, key)
    }
}

/// An absent store reads as empty. Writes fail, removals are no-ops since
/// there is nothing to remove.
impl<T> SessionStore for Option<T>
where
    T: SessionStore,
{
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            Some(store) => store.get(key),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            Some(store) => store.set(key, value),
            None => Err(StoreError::Unavailable),
        }
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match self {
            Some(store) => store.remove(key),
            None => Ok(()),
        }
    }
}

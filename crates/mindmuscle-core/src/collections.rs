use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, warn};

use crate::error::ValidationError;
use crate::store::KeyValueStore;

/// Load the collection stored under `key`.
///
/// Absent, blank, unreadable or malformed entries all come back as an empty
/// collection; the failure is logged, never returned.
pub fn load_collection<T, S>(store: &S, key: &str) -> Vec<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!(key, error = %err, "failed to read collection; starting empty");
            return Vec::new();
        }
    };
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(items) => items,
        Err(err) => {
            warn!(key, error = %err, "corrupt collection data; starting empty");
            Vec::new()
        }
    }
}

/// Replace the stored collection under `key` with `items`.
///
/// Returns whether the write landed. Failures are logged and otherwise
/// ignored; the in-memory collection stays authoritative.
pub fn persist_collection<T, S>(store: &mut S, key: &str, items: &[T]) -> bool
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let raw = match serde_json::to_string(items) {
        Ok(raw) => raw,
        Err(err) => {
            error!(key, error = %err, "failed to serialize collection");
            return false;
        }
    };
    match store.set(key, &raw) {
        Ok(()) => true,
        Err(err) => {
            error!(key, error = %err, "failed to persist collection; changes kept in memory only");
            false
        }
    }
}

/// Order-preserving removal by position.
pub fn remove_at<T>(
    items: &mut Vec<T>,
    index: usize,
    collection: &'static str,
) -> Result<T, ValidationError> {
    check_index(items, index, collection)?;
    Ok(items.remove(index))
}

pub fn check_index<T>(
    items: &[T],
    index: usize,
    collection: &'static str,
) -> Result<(), ValidationError> {
    if index >= items.len() {
        return Err(ValidationError::NoSuchEntry {
            collection,
            index,
            len: items.len(),
        });
    }
    Ok(())
}

use crate::CoreResult;

use std::future::Future;

/// Durable string key-value persistence service.
///
/// A missing key is `Ok(None)`, not an error.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> impl Future<Output = CoreResult<Option<String>>> + Send;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: String) -> impl Future<Output = CoreResult<()>> + Send;
}

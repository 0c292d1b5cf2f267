use dashmap::DashMap;
use std::sync::Arc;

/// Thread-safe in-memory map of code -> original_url sitting in front of the
/// `urls` table.
///
/// Rows are never updated or deleted once written, so an entry can be
/// cached indefinitely. It is filled lazily by lookups and by fresh inserts.
#[derive(Clone, Debug, Default)]
pub struct LinkCache {
    inner: Arc<DashMap<String, String>>,
}

impl LinkCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, code: impl Into<String>, original_url: impl Into<String>) {
        self.inner.insert(code.into(), original_url.into());
    }

    /// Look up a code. Returns a clone of the original URL if present.
    pub fn get(&self, code: &str) -> Option<String> {
        self.inner.get(code).map(|v| v.clone())
    }
}

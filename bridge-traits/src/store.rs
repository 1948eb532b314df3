//! Document store bridge.
//!
//! The catalog is read from a managed document database. The core only needs
//! one capability from it: list every document of a named collection. Field
//! values are passed through as JSON so that store-specific types (timestamps,
//! references) can be decoded by the consumer.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single document as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Store-assigned document identifier.
    pub id: String,
    /// Raw document fields.
    pub fields: Map<String, Value>,
}

impl Document {
    /// Create a document with no fields.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Attach a field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Borrow a field as a string, if present and a string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// Read access to the remote document store.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::store::DocumentStore;
///
/// async fn count_podcasts(store: &dyn DocumentStore) -> usize {
///     store.list_all("podcasts").await.map(|docs| docs.len()).unwrap_or(0)
/// }
/// ```
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Return every document in `collection`. The sequence is finite and fully
    /// resolved when the future completes.
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>>;
}

//! # API Log Store
//!
//! Bounded in-memory record of provider calls, shown on the developer log page.
//! Requests are redacted on the way in; the store never holds card data.

use crate::redact::sanitize;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Number of entries kept before the oldest are evicted
pub const DEFAULT_CAPACITY: usize = 50;

/// One provider call as seen by the relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiLogEntry {
    /// Short random identifier
    pub id: String,

    /// Milliseconds since the Unix epoch
    pub ts: i64,

    /// Endpoint label, e.g. `POST /payments`
    pub endpoint: String,

    /// Redacted request body
    pub request: Option<Value>,

    /// Raw provider response
    pub response: Option<Value>,

    /// Error text if the call failed
    pub error: Option<String>,
}

/// Shared handle to the log; clones see the same entries.
#[derive(Debug, Clone)]
pub struct ApiLogStore {
    entries: Arc<Mutex<VecDeque<ApiLogEntry>>>,
    capacity: usize,
}

impl ApiLogStore {
    /// Create a store holding the last [`DEFAULT_CAPACITY`] entries
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a store with a custom bound
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity + 1))),
            capacity,
        }
    }

    /// Record a provider call and return the stored entry.
    pub fn append(
        &self,
        endpoint: impl Into<String>,
        request: Option<&Value>,
        response: Option<Value>,
        error: Option<String>,
    ) -> ApiLogEntry {
        let entry = ApiLogEntry {
            id: short_id(),
            ts: Utc::now().timestamp_millis(),
            endpoint: endpoint.into(),
            request: request.map(sanitize),
            response,
            error,
        };

        let mut entries = self.lock();
        entries.push_back(entry.clone());
        while entries.len() > self.capacity {
            entries.pop_front();
        }

        entry
    }

    /// Snapshot of all entries, oldest first
    pub fn list(&self) -> Vec<ApiLogEntry> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // A panic while holding the lock cannot leave the deque half-updated.
    fn lock(&self) -> MutexGuard<'_, VecDeque<ApiLogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ApiLogStore {
    fn default() -> Self {
        Self::new()
    }
}

fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redact::REDACTED;
    use serde_json::json;
    use std::thread;

    #[test]
    fn test_append_builds_entry() {
        let store = ApiLogStore::new();
        let before = Utc::now().timestamp_millis();

        let entry = store.append(
            "POST /payments",
            Some(&json!({"paymentMethod": {"encryptedCardNumber": "abc"}})),
            Some(json!({"resultCode": "Authorised"})),
            None,
        );

        assert_eq!(entry.id.len(), 8);
        assert!(entry.ts >= before);
        assert_eq!(entry.endpoint, "POST /payments");
        assert_eq!(
            entry.request.as_ref().unwrap()["paymentMethod"]["encryptedCardNumber"],
            REDACTED
        );
        assert_eq!(entry.response, Some(json!({"resultCode": "Authorised"})));
        assert!(entry.error.is_none());
        assert_eq!(store.list(), vec![entry]);
    }

    #[test]
    fn test_absent_request_stays_absent() {
        let store = ApiLogStore::new();
        let entry = store.append("POST /paymentMethods", None, None, Some("boom".into()));

        assert!(entry.request.is_none());
        assert!(entry.response.is_none());
        assert_eq!(entry.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_keeps_last_fifty_in_order() {
        let store = ApiLogStore::new();

        for i in 0..120 {
            store.append(format!("call {}", i), Some(&json!({"i": i})), None, None);
        }

        let entries = store.list();
        assert_eq!(entries.len(), DEFAULT_CAPACITY);
        for (offset, entry) in entries.iter().enumerate() {
            assert_eq!(entry.endpoint, format!("call {}", 70 + offset));
        }
    }

    #[test]
    fn test_list_is_stable_without_appends() {
        let store = ApiLogStore::with_capacity(3);
        store.append("a", None, None, None);
        store.append("b", None, None, None);

        assert_eq!(store.list(), store.list());
        assert_eq!(store.len(), 2);
        assert_eq!(store.capacity(), 3);
    }

    #[test]
    fn test_clones_share_entries() {
        let store = ApiLogStore::new();
        let handle = store.clone();
        handle.append("POST /payments/details", None, None, None);

        assert!(!store.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_concurrent_appends_respect_bound() {
        let store = ApiLogStore::new();

        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let store = store.clone();
                thread::spawn(move || {
                    for i in 0..40 {
                        store.append(format!("{}-{}", worker, i), None, None, None);
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }

        let entries = store.list();
        assert_eq!(entries.len(), DEFAULT_CAPACITY);

        // Each worker's surviving entries keep their relative order.
        for worker in 0..8 {
            let seq: Vec<usize> = entries
                .iter()
                .filter_map(|e| {
                    let (w, i) = e.endpoint.split_once('-')?;
                    (w == worker.to_string()).then(|| i.parse().unwrap())
                })
                .collect();
            assert!(seq.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_entry_serializes_with_wire_names() {
        let store = ApiLogStore::new();
        let entry = store.append("POST /payments", None, None, None);
        let value = serde_json::to_value(&entry).unwrap();

        for key in ["id", "ts", "endpoint", "request", "response", "error"] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert!(value["request"].is_null());
    }
}

//! Calculation history storage.
//!
//! A [`HistoryStore`] persists calculation records and hands them back
//! newest first for display. The core only ships the in-memory store; front
//! ends provide durable ones (the CLI keeps a JSON-lines file).

use crate::record::{CalculationRecord, Operation};
use crate::value::Value;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A stored calculation, as returned by [`HistoryStore::recent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub expression: String,
    #[serde(with = "crate::value::serde_value")]
    pub result: Value,
    pub timestamp: DateTime<Utc>,
    /// Who saved the entry; `None` for stores without an owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operations: Option<Vec<Operation>>,
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt history record on line {line}: {message}")]
    Corrupt { line: usize, message: String },

    #[error("history store unavailable: {0}")]
    Unavailable(String),
}

pub trait HistoryStore {
    /// Persist one calculation, assigning its id and timestamp.
    fn save(
        &mut self,
        record: &CalculationRecord,
        operations: Option<Vec<Operation>>,
    ) -> Result<HistoryEntry, HistoryError>;

    /// Up to `limit` entries, newest first.
    fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>, HistoryError>;

    /// Up to `limit` entries saved by `user`, newest first.
    fn recent_for_user(&self, user: &str, limit: usize) -> Result<Vec<HistoryEntry>, HistoryError> {
        Ok(self
            .recent(usize::MAX)?
            .into_iter()
            .filter(|entry| entry.user.as_deref() == Some(user))
            .take(limit)
            .collect())
    }
}

#[derive(Debug, Default)]
pub struct MemoryHistory {
    entries: Vec<HistoryEntry>,
    user: Option<String>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp every entry saved from now on with `user`.
    pub fn with_user(mut self, user: Option<String>) -> Self {
        self.user = user;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl HistoryStore for MemoryHistory {
    fn save(
        &mut self,
        record: &CalculationRecord,
        operations: Option<Vec<Operation>>,
    ) -> Result<HistoryEntry, HistoryError> {
        let entry = HistoryEntry {
            id: self.entries.len() as u64 + 1,
            expression: record.expression.clone(),
            result: record.result,
            timestamp: Utc::now(),
            user: self.user.clone(),
            operations,
        };
        self.entries.push(entry.clone());
        Ok(entry)
    }

    fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>, HistoryError> {
        Ok(self.entries.iter().rev().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(expression: &str, result: f64) -> CalculationRecord {
        CalculationRecord {
            expression: expression.to_string(),
            result,
        }
    }

    #[test]
    fn test_memory_history_assigns_ids() {
        let mut store = MemoryHistory::new();
        let first = store.save(&record("3 + 4 = 7", 7.0), None).unwrap();
        let second = store.save(&record("7 × 2 = 14", 14.0), None).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(second.timestamp >= first.timestamp);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_recent_is_newest_first() {
        let mut store = MemoryHistory::new();
        for n in 1..=5 {
            store.save(&record(&format!("{} + 0 = {}", n, n), n as f64), None).unwrap();
        }

        let recent = store.recent(3).unwrap();
        let ids: Vec<u64> = recent.iter().map(|entry| entry.id).collect();
        assert_eq!(ids, [5, 4, 3]);
        assert_eq!(store.recent(50).unwrap().len(), 5);
    }

    #[test]
    fn test_recent_for_user() {
        let mut alice = MemoryHistory::new().with_user(Some("alice".to_string()));
        alice.save(&record("1 + 1 = 2", 2.0), None).unwrap();
        alice.save(&record("2 + 2 = 4", 4.0), None).unwrap();

        let mut shared = alice.with_user(Some("bob".to_string()));
        shared.save(&record("3 + 3 = 6", 6.0), None).unwrap();

        let alice_entries = shared.recent_for_user("alice", 10).unwrap();
        let ids: Vec<u64> = alice_entries.iter().map(|entry| entry.id).collect();
        assert_eq!(ids, [2, 1]);
        assert_eq!(shared.recent_for_user("bob", 10).unwrap().len(), 1);
        assert!(shared.recent_for_user("carol", 10).unwrap().is_empty());
        assert_eq!(shared.recent_for_user("alice", 1).unwrap().len(), 1);
    }

    #[test]
    fn test_entry_with_infinite_result_reads_back() {
        let mut store = MemoryHistory::new();
        let entry = store.save(&record("10 ^ 400 = Infinity", f64::INFINITY), None).unwrap();

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains(r#""result":"Infinity""#));
        assert!(!json.contains("user"));

        let back: HistoryEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}

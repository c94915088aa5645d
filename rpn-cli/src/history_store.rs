// Durable calculation history for the CLI
//
// STORAGE FORMAT:
// One JSON object per line (HistoryEntry), appended in id order. Ids are
// assigned from the last id already in the file, so they keep increasing
// across sessions. A line that fails to parse is reported with its line
// number instead of being skipped.

use rpn_core::history::{HistoryEntry, HistoryError, HistoryStore};
use rpn_core::{CalculationRecord, Operation, RecordSink, SinkError};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub struct JsonlHistory {
    path: PathBuf,
    last_id: u64,
    user: Option<String>,
}

impl JsonlHistory {
    /// Open (or prepare to create) the history file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, HistoryError> {
        let path = path.into();
        let last_id = read_entries(&path)?
            .iter()
            .map(|entry| entry.id)
            .max()
            .unwrap_or(0);
        Ok(Self {
            path,
            last_id,
            user: None,
        })
    }

    /// Stamp every entry saved from now on with `user`.
    pub fn with_user(mut self, user: Option<String>) -> Self {
        self.user = user;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonlHistory {
    fn save(
        &mut self,
        record: &CalculationRecord,
        operations: Option<Vec<Operation>>,
    ) -> Result<HistoryEntry, HistoryError> {
        let entry = HistoryEntry {
            id: self.last_id + 1,
            expression: record.expression.clone(),
            result: record.result,
            timestamp: chrono::Utc::now(),
            user: self.user.clone(),
            operations,
        };

        let mut line = serde_json::to_string(&entry)
            .map_err(|e| HistoryError::Unavailable(e.to_string()))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;

        self.last_id = entry.id;
        debug!(target: "rpn::cli", id = entry.id, path = %self.path.display(), "history entry saved");
        Ok(entry)
    }

    fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>, HistoryError> {
        let mut entries = read_entries(&self.path)?;
        entries.reverse();
        entries.truncate(limit);
        Ok(entries)
    }
}

// A missing file is an empty history
fn read_entries(path: &Path) -> Result<Vec<HistoryEntry>, HistoryError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|e| HistoryError::Corrupt {
                line: index + 1,
                message: e.to_string(),
            })
        })
        .collect()
}

// RUST CONCEPT: Channel-backed sink
// The machine only ever sends; the file is written by a separate blocking
// task, so a slow disk never holds up the prompt
pub struct ChannelSink {
    tx: UnboundedSender<CalculationRecord>,
}

impl RecordSink for ChannelSink {
    fn notify(&mut self, record: &CalculationRecord) -> Result<(), SinkError> {
        self.tx
            .send(record.clone())
            .map_err(|_| SinkError("history writer has stopped".to_string()))
    }
}

/// Start the writer task for `store`.
///
/// The task runs until every [`ChannelSink`] handed out is dropped; await the
/// handle afterwards to be sure all records reached the file.
pub fn spawn_writer<S>(mut store: S) -> (ChannelSink, JoinHandle<()>)
where
    S: HistoryStore + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<CalculationRecord>();
    let handle = tokio::task::spawn_blocking(move || {
        while let Some(record) = rx.blocking_recv() {
            if let Err(e) = store.save(&record, None) {
                warn!(target: "rpn::cli", error = %e, expression = %record.expression, "failed to save history entry");
            }
        }
    });
    (ChannelSink { tx }, handle)
}

//! JSONL file writer for usage records.
//!
//! Each [`UsageRecord`] is serialized as a single JSON line with an
//! RFC3339 `timestamp`, appended through a buffered writer.

use chrono::{DateTime, SecondsFormat};
use conclave_domain::UsageRecord;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL usage log that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlUsageLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlUsageLog {
    /// Open the log for appending at the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create usage log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open usage log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a JSON line.
    pub fn append(&self, record: &UsageRecord) {
        let timestamp = DateTime::from_timestamp_millis(record.timestamp_ms as i64)
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
            .unwrap_or_default();

        let line = match serde_json::to_value(record) {
            Ok(serde_json::Value::Object(mut map)) => {
                map.insert(
                    "timestamp".to_string(),
                    serde_json::Value::String(timestamp),
                );
                serde_json::Value::Object(map).to_string()
            }
            Ok(other) => other.to_string(),
            Err(e) => {
                warn!("Could not serialize usage record: {}", e);
                return;
            }
        };

        let mut writer = self.writer.lock().expect("usage log writer poisoned");
        if let Err(e) = writeln!(writer, "{}", line) {
            warn!("Could not write usage record: {}", e);
        }
    }

    /// Append every record in the slice, then flush.
    pub fn append_all(&self, records: &[UsageRecord]) {
        for record in records {
            self.append(record);
        }
        self.flush();
    }

    /// Flush buffered lines to disk.
    pub fn flush(&self) {
        let mut writer = self.writer.lock().expect("usage log writer poisoned");
        if let Err(e) = writer.flush() {
            warn!("Could not flush usage log: {}", e);
        }
    }
}

impl Drop for JsonlUsageLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conclave_domain::{Family, UsageLedger};

    #[test]
    fn test_append_writes_one_json_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usage.jsonl");

        let ledger = UsageLedger::default();
        ledger.record(Family::DeepSeek, "deepseek-chat", 100, 50);
        ledger.record(Family::Xai, "grok-3", 10, 5);

        let log = JsonlUsageLog::new(&path).unwrap();
        log.append_all(&ledger.history());
        drop(log);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["family"], "deepseek");
        assert_eq!(first["input_tokens"], 100);
        assert!(first["timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_reopening_appends_rather_than_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usage.jsonl");
        let ledger = UsageLedger::default();
        let record = ledger.record(Family::Mistral, "mistral-large-latest", 1, 1);

        for _ in 0..2 {
            let log = JsonlUsageLog::new(&path).unwrap();
            log.append(&record);
            log.flush();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("logs").join("usage.jsonl");
        assert!(JsonlUsageLog::new(&path).is_some());
        assert!(path.exists() || path.parent().unwrap().exists());
    }
}

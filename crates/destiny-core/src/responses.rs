//! Response store - every finished ritual's birth record, kept as a single
//! JSON array.
//!
//! Layout:
//!   <data_dir>/responses.json   - `[{ "id", "createdAt", ...fields }]`
//!
//! IDs are the creation time in Unix milliseconds, bumped past the previous
//! record's id when two appends land in the same millisecond. The whole
//! array is rewritten on every append; two concurrent writers can lose one
//! another's record.

use crate::error::Result;
use crate::io;
use crate::sink::{RecordSink, SubmittedRecord};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResponse {
    pub id: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone)]
pub struct ResponseStore {
    path: PathBuf,
}

// ---------------------------------------------------------------------------
// Internal file I/O
// ---------------------------------------------------------------------------

fn load_all(path: &Path) -> Result<Vec<StoredResponse>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&content)?)
}

fn save_all(path: &Path, responses: &[StoredResponse]) -> Result<()> {
    let content = serde_json::to_string_pretty(responses)?;
    io::atomic_write(path, content.as_bytes())
}

fn next_id(responses: &[StoredResponse], now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis();
    let last = responses
        .last()
        .and_then(|r| r.id.parse::<i64>().ok())
        .unwrap_or(i64::MIN);
    millis.max(last.saturating_add(1)).to_string()
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

impl ResponseStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record built from `fields`. Returns the stored record.
    pub fn append(&self, fields: Map<String, Value>) -> Result<StoredResponse> {
        self.append_at(fields, Utc::now())
    }

    /// Like [`ResponseStore::append`] with an explicit clock reading.
    ///
    /// Incoming `id` / `createdAt` keys are dropped; the generated ones win.
    pub fn append_at(
        &self,
        mut fields: Map<String, Value>,
        now: DateTime<Utc>,
    ) -> Result<StoredResponse> {
        fields.remove("id");
        fields.remove("createdAt");

        let mut responses = load_all(&self.path)?;
        let response = StoredResponse {
            id: next_id(&responses, now),
            created_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            fields,
        };
        responses.push(response.clone());
        save_all(&self.path, &responses)?;
        tracing::debug!(id = %response.id, path = %self.path.display(), "response stored");
        Ok(response)
    }

    /// All stored records, oldest first.
    pub fn list(&self) -> Result<Vec<StoredResponse>> {
        load_all(&self.path)
    }
}

impl RecordSink for ResponseStore {
    fn name(&self) -> &'static str {
        "responses"
    }

    fn submit(&self, record: &SubmittedRecord) -> Result<()> {
        let fields = match serde_json::to_value(&record.birth)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.append(fields)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Record submission: where finished rituals go and how they get there.
//!
//! Submission is dispatch-and-forget. A [`Dispatcher`] starts the write and
//! returns immediately; the ritual never learns whether the write landed.
//! Failures are logged and dropped, never retried.

use crate::birth::BirthData;
use crate::config::{Config, SinkKind};
use crate::error::{DestinyError, Result};
use crate::fortune::FortuneOutcome;
use crate::responses::ResponseStore;
use crate::results::ResultLog;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// SubmittedRecord / RecordSink
// ---------------------------------------------------------------------------

/// A finished ritual as handed to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmittedRecord {
    pub birth: BirthData,
    pub outcome: FortuneOutcome,
}

pub trait RecordSink: Send + Sync {
    /// Short label for logs.
    fn name(&self) -> &'static str;

    fn submit(&self, record: &SubmittedRecord) -> Result<()>;
}

/// Submit and log the outcome; the error is consumed here.
pub fn submit_logged(sink: &dyn RecordSink, record: &SubmittedRecord) {
    match sink.submit(record) {
        Ok(()) => tracing::debug!(sink = sink.name(), "record stored"),
        Err(e) => tracing::warn!(sink = sink.name(), error = %e, "record submission failed"),
    }
}

// ---------------------------------------------------------------------------
// SinkSet
// ---------------------------------------------------------------------------

/// Fans one submission out to several stores. Each store is tried even if
/// an earlier one fails.
#[derive(Default)]
pub struct SinkSet {
    sinks: Vec<Box<dyn RecordSink>>,
}

impl SinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl RecordSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn from_config(root: &Path, config: &Config) -> Self {
        config
            .sinks
            .iter()
            .fold(Self::new(), |set, kind| match kind {
                SinkKind::Responses => set.with(ResponseStore::new(config.responses_path(root))),
                SinkKind::Results => set.with(ResultLog::new(config.results_path(root))),
            })
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl RecordSink for SinkSet {
    fn name(&self) -> &'static str {
        "sink_set"
    }

    fn submit(&self, record: &SubmittedRecord) -> Result<()> {
        let failed: Vec<String> = self
            .sinks
            .iter()
            .filter_map(|sink| {
                sink.submit(record)
                    .err()
                    .map(|e| format!("{}: {e}", sink.name()))
            })
            .collect();
        if failed.is_empty() {
            Ok(())
        } else {
            Err(DestinyError::SinkFailed(failed.join("; ")))
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatchers
// ---------------------------------------------------------------------------

pub trait Dispatcher: Send + Sync {
    /// Start `sink.submit(record)` without the caller waiting on it.
    fn dispatch(&self, sink: Arc<dyn RecordSink>, record: SubmittedRecord);
}

/// Runs each submission on a detached OS thread. If the process exits first
/// the record is lost.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadDispatcher;

impl Dispatcher for ThreadDispatcher {
    fn dispatch(&self, sink: Arc<dyn RecordSink>, record: SubmittedRecord) {
        let spawned = std::thread::Builder::new()
            .name("record-submit".to_string())
            .spawn(move || submit_logged(sink.as_ref(), &record));
        if let Err(e) = spawned {
            tracing::warn!(error = %e, "could not spawn record submission");
        }
    }
}

/// Runs the submission on the calling thread. Failure is still only logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineDispatcher;

impl Dispatcher for InlineDispatcher {
    fn dispatch(&self, sink: Arc<dyn RecordSink>, record: SubmittedRecord) {
        submit_logged(sink.as_ref(), &record);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use destiny_core::sink::{submit_logged, Dispatcher, RecordSink, SubmittedRecord, ThreadDispatcher};
use std::sync::Arc;

/// Runs each submission on the blocking pool and never joins it.
///
/// Outside a Tokio runtime it falls back to a detached thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDispatcher;

impl Dispatcher for TokioDispatcher {
    fn dispatch(&self, sink: Arc<dyn RecordSink>, record: SubmittedRecord) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || submit_logged(sink.as_ref(), &record));
            }
            Err(_) => ThreadDispatcher.dispatch(sink, record),
        }
    }
}

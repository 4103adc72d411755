use destiny_core::config::Config;
use destiny_core::fortune::StdSource;
use destiny_core::ritual::Ritual;
use destiny_core::sink::{Dispatcher, RecordSink, SinkSet};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::dispatch::TokioDispatcher;

/// Most ritual sessions held at once; the least recently used is evicted.
pub const MAX_RITUALS: usize = 1024;

/// Sessions untouched for this long are dropped.
pub const RITUAL_IDLE: Duration = Duration::from_secs(30 * 60);

pub type Rituals = Arc<Mutex<RitualSessions>>;

// ---------------------------------------------------------------------------
// RitualSessions
// ---------------------------------------------------------------------------

struct Session {
    ritual: Ritual<StdSource>,
    touched: Instant,
}

/// In-memory ritual sessions, bounded by count and idle time.
///
/// Idle sessions are swept on every insert and treated as missing on lookup.
pub struct RitualSessions {
    sessions: HashMap<Uuid, Session>,
    capacity: usize,
    idle: Duration,
}

impl Default for RitualSessions {
    fn default() -> Self {
        Self::new(MAX_RITUALS, RITUAL_IDLE)
    }
}

impl RitualSessions {
    pub fn new(capacity: usize, idle: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            capacity: capacity.max(1),
            idle,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn insert(&mut self, id: Uuid, ritual: Ritual<StdSource>) {
        self.insert_at(id, ritual, Instant::now());
    }

    fn insert_at(&mut self, id: Uuid, ritual: Ritual<StdSource>, now: Instant) {
        let idle = self.idle;
        let before = self.sessions.len();
        self.sessions
            .retain(|_, s| now.saturating_duration_since(s.touched) < idle);
        let expired = before - self.sessions.len();
        if expired > 0 {
            tracing::debug!(expired, "idle rituals dropped");
        }

        while self.sessions.len() >= self.capacity {
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|(_, s)| s.touched)
                .map(|(id, _)| *id);
            let Some(oldest) = oldest else { break };
            self.sessions.remove(&oldest);
            tracing::debug!(id = %oldest, "ritual evicted at capacity");
        }

        self.sessions.insert(id, Session { ritual, touched: now });
    }

    /// Look up a live session and mark it as used.
    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut Ritual<StdSource>> {
        self.get_mut_at(id, Instant::now())
    }

    fn get_mut_at(&mut self, id: &Uuid, now: Instant) -> Option<&mut Ritual<StdSource>> {
        let expired = self
            .sessions
            .get(id)
            .is_some_and(|s| now.saturating_duration_since(s.touched) >= self.idle);
        if expired {
            self.sessions.remove(id);
            return None;
        }
        let session = self.sessions.get_mut(id)?;
        session.touched = now;
        Some(&mut session.ritual)
    }

    pub fn remove(&mut self, id: &Uuid) -> Option<Ritual<StdSource>> {
        self.sessions.remove(id).map(|s| s.ritual)
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub config: Arc<Config>,
    pub sink: Arc<dyn RecordSink>,
    pub dispatcher: Arc<dyn Dispatcher>,
    pub rituals: Rituals,
}

impl AppState {
    pub fn new(root: PathBuf, config: Config) -> Self {
        for warning in config.validate() {
            tracing::warn!(level = ?warning.level, "config: {}", warning.message);
        }
        let sink: Arc<dyn RecordSink> = Arc::new(SinkSet::from_config(&root, &config));
        Self {
            root,
            config: Arc::new(config),
            sink,
            dispatcher: Arc::new(TokioDispatcher),
            rituals: Arc::new(Mutex::new(RitualSessions::default())),
        }
    }

    /// A ritual wired to this server's stores, on the landing page.
    pub fn new_ritual(&self) -> Ritual<StdSource> {
        Ritual::new(
            StdSource::from_entropy(),
            self.sink.clone(),
            self.dispatcher.clone(),
        )
    }
}

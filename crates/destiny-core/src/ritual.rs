//! The whole ritual: landing, the input wizard, then the revealed result.
//!
//! Finalizing the wizard resolves one fortune, dispatches one submission and
//! moves to the result. The submission is never awaited; the result is
//! shown whether or not storage succeeds.

use crate::birth::{BirthData, BirthPatch};
use crate::fortune::{FortuneOutcome, OutcomeResolver, RandomSource};
use crate::sink::{Dispatcher, RecordSink, SubmittedRecord};
use crate::wizard::{Advance, Retreat, Wizard, WizardStep};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Landing,
    Wizard(Wizard),
    Result(SubmittedRecord),
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Landing => "landing",
            Phase::Wizard(_) => "ritual",
            Phase::Result(_) => "result",
        }
    }
}

/// Outcome of [`Ritual::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Moved(WizardStep),
    Blocked(WizardStep),
    /// Finalized; the ritual is now showing its result.
    Completed,
    /// Not in the wizard; nothing to advance.
    Ignored,
}

pub struct Ritual<R> {
    phase: Phase,
    resolver: OutcomeResolver<R>,
    sink: Arc<dyn RecordSink>,
    dispatcher: Arc<dyn Dispatcher>,
}

impl<R: RandomSource> Ritual<R> {
    pub fn new(source: R, sink: Arc<dyn RecordSink>, dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            phase: Phase::Landing,
            resolver: OutcomeResolver::new(source),
            sink,
            dispatcher,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn wizard(&self) -> Option<&Wizard> {
        match &self.phase {
            Phase::Wizard(w) => Some(w),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&SubmittedRecord> {
        match &self.phase {
            Phase::Result(r) => Some(r),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<&FortuneOutcome> {
        self.result().map(|r| &r.outcome)
    }

    /// Leave the landing page for a fresh wizard. Returns false elsewhere.
    pub fn begin(&mut self) -> bool {
        if self.phase != Phase::Landing {
            return false;
        }
        self.phase = Phase::Wizard(Wizard::new());
        true
    }

    /// Apply `patch` to the wizard's record. Returns false outside the wizard.
    pub fn update(&mut self, patch: BirthPatch) -> bool {
        match &mut self.phase {
            Phase::Wizard(w) => {
                w.update(patch);
                true
            }
            _ => false,
        }
    }

    pub fn advance(&mut self) -> Progress {
        let Phase::Wizard(wizard) = &mut self.phase else {
            return Progress::Ignored;
        };
        match wizard.advance() {
            Advance::Moved(step) => Progress::Moved(step),
            Advance::Blocked(step) => Progress::Blocked(step),
            Advance::Finalized(birth) => {
                self.finalize(birth);
                Progress::Completed
            }
        }
    }

    /// Enter-key accelerator for [`Ritual::advance`].
    pub fn activate(&mut self) -> Progress {
        self.advance()
    }

    /// Step back; retreating past the first step returns to landing.
    pub fn retreat(&mut self) -> Option<Retreat> {
        let Phase::Wizard(wizard) = &mut self.phase else {
            return None;
        };
        let retreat = wizard.retreat();
        if retreat == Retreat::Aborted {
            self.phase = Phase::Landing;
        }
        Some(retreat)
    }

    /// Back to landing from anywhere. The next traversal draws a new fortune.
    pub fn restart(&mut self) {
        self.phase = Phase::Landing;
    }

    fn finalize(&mut self, birth: BirthData) {
        let outcome = self.resolver.resolve();
        let record = SubmittedRecord { birth, outcome };
        tracing::info!(
            character = record.outcome.character.id,
            sink = self.sink.name(),
            "ritual complete"
        );
        self.dispatcher.dispatch(self.sink.clone(), record.clone());
        self.phase = Phase::Result(record);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

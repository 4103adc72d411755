//! Four-step input wizard: name, birth date, birth time, energy type.
//!
//! The wizard never reports errors. An advance that the active step does not
//! allow leaves everything untouched and comes back as [`Advance::Blocked`];
//! callers decide whether to show that or ignore it.

use crate::birth::{BirthData, BirthPatch};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// WizardStep
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Name,
    Date,
    Time,
    Gender,
}

impl WizardStep {
    pub fn all() -> &'static [WizardStep] {
        &[
            WizardStep::Name,
            WizardStep::Date,
            WizardStep::Time,
            WizardStep::Gender,
        ]
    }

    pub fn count() -> usize {
        Self::all().len()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<WizardStep> {
        Self::all().get(self.index() + 1).copied()
    }

    pub fn prev(self) -> Option<WizardStep> {
        self.index()
            .checked_sub(1)
            .and_then(|i| Self::all().get(i).copied())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WizardStep::Name => "name",
            WizardStep::Date => "date",
            WizardStep::Time => "time",
            WizardStep::Gender => "gender",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Name => "Your Name",
            WizardStep::Date => "Birth Date",
            WizardStep::Time => "Birth Time",
            WizardStep::Gender => "Energy Type",
        }
    }

    pub fn title_ko(self) -> &'static str {
        match self {
            WizardStep::Name => "이름",
            WizardStep::Date => "생년월일",
            WizardStep::Time => "태어난 시간",
            WizardStep::Gender => "음양",
        }
    }

    /// Whether `data` satisfies this step's gate. Date and time always pass.
    pub fn accepts(self, data: &BirthData) -> bool {
        match self {
            WizardStep::Name => data.has_valid_name(),
            WizardStep::Date | WizardStep::Time => true,
            WizardStep::Gender => data.gender.is_some(),
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Direction / outcomes
// ---------------------------------------------------------------------------

/// Last navigation direction. Only drives transition presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the contained step.
    Moved(WizardStep),
    /// The active step's gate failed; nothing changed.
    Blocked(WizardStep),
    /// Advanced past the last step with the completed record.
    Finalized(BirthData),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retreat {
    Moved(WizardStep),
    /// Retreated before the first step; the owner should return to landing.
    Aborted,
}

// ---------------------------------------------------------------------------
// Wizard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wizard {
    step: WizardStep,
    direction: Direction,
    data: BirthData,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Name,
            direction: Direction::Forward,
            data: BirthData::default(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn data(&self) -> &BirthData {
        &self.data
    }

    /// `(current, total)` with a 1-based current step.
    pub fn progress(&self) -> (usize, usize) {
        (self.step.index() + 1, WizardStep::count())
    }

    pub fn can_advance(&self) -> bool {
        self.step.accepts(&self.data)
    }

    pub fn update(&mut self, patch: BirthPatch) {
        self.data.apply(patch);
    }

    pub fn advance(&mut self) -> Advance {
        if !self.can_advance() {
            tracing::debug!(step = %self.step, "advance blocked");
            return Advance::Blocked(self.step);
        }
        match self.step.next() {
            Some(next) => {
                self.step = next;
                self.direction = Direction::Forward;
                Advance::Moved(next)
            }
            None => Advance::Finalized(self.data.clone()),
        }
    }

    /// Enter-key accelerator; same gate as [`Wizard::advance`].
    pub fn activate(&mut self) -> Advance {
        self.advance()
    }

    pub fn retreat(&mut self) -> Retreat {
        match self.step.prev() {
            Some(prev) => {
                self.step = prev;
                self.direction = Direction::Backward;
                Retreat::Moved(prev)
            }
            None => Retreat::Aborted,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::birth::Gender;

    #[test]
    fn starts_on_name_with_defaults() {
        let w = Wizard::new();
        assert_eq!(w.step(), WizardStep::Name);
        assert_eq!(w.progress(), (1, 4));
        assert_eq!(*w.data(), BirthData::default());
        assert_eq!(w.data().year, 2000);
        assert_eq!(w.data().hour, 12);
    }

    #[test]
    fn whitespace_name_blocks_advance() {
        let mut w = Wizard::new();
        w.update(BirthPatch::name("   "));
        assert_eq!(w.advance(), Advance::Blocked(WizardStep::Name));
        assert_eq!(w.step(), WizardStep::Name);
    }

    #[test]
    fn unset_gender_blocks_finalize() {
        let mut w = Wizard::new();
        w.update(BirthPatch::name("Test"));
        for _ in 0..3 {
            assert!(matches!(w.advance(), Advance::Moved(_)));
        }
        assert_eq!(w.step(), WizardStep::Gender);
        assert_eq!(w.advance(), Advance::Blocked(WizardStep::Gender));
        assert_eq!(w.step(), WizardStep::Gender);
    }

    #[test]
    fn date_and_time_steps_always_accept() {
        let mut w = Wizard::new();
        w.update(BirthPatch::name("Test"));
        assert_eq!(w.advance(), Advance::Moved(WizardStep::Date));
        assert_eq!(w.advance(), Advance::Moved(WizardStep::Time));
        assert_eq!(w.advance(), Advance::Moved(WizardStep::Gender));
        assert_eq!(w.direction(), Direction::Forward);
    }

    #[test]
    fn full_traversal_finalizes_with_record() {
        let mut w = Wizard::new();
        w.update(BirthPatch::name("Test"));
        w.advance();
        w.update(BirthPatch::date(2024, 2, 30));
        w.advance();
        w.update(BirthPatch::time(23, 45));
        w.advance();
        w.update(BirthPatch::gender(Gender::Yang));
        match w.activate() {
            Advance::Finalized(record) => {
                assert_eq!(record.name, "Test");
                assert_eq!(record.day, 29);
                assert_eq!(record.minute, 45);
                assert_eq!(record.gender, Some(Gender::Yang));
            }
            other => panic!("expected finalize, got {other:?}"),
        }
    }

    #[test]
    fn retreat_from_first_step_aborts() {
        let mut w = Wizard::new();
        w.update(BirthPatch::name("Keep"));
        assert_eq!(w.retreat(), Retreat::Aborted);
        assert_eq!(w.retreat(), Retreat::Aborted);
        assert_eq!(w.step(), WizardStep::Name);
        assert_eq!(w.data().name, "Keep");
    }

    #[test]
    fn retreat_moves_backward() {
        let mut w = Wizard::new();
        w.update(BirthPatch::name("Test"));
        w.advance();
        w.advance();
        assert_eq!(w.retreat(), Retreat::Moved(WizardStep::Date));
        assert_eq!(w.direction(), Direction::Backward);
        assert_eq!(w.retreat(), Retreat::Moved(WizardStep::Name));
    }

    #[test]
    fn step_ordering_and_titles() {
        assert_eq!(WizardStep::count(), 4);
        assert_eq!(WizardStep::Name.next(), Some(WizardStep::Date));
        assert_eq!(WizardStep::Gender.next(), None);
        assert_eq!(WizardStep::Name.prev(), None);
        assert_eq!(WizardStep::Gender.title_ko(), "음양");
    }
}

//! The birth record assembled across the ritual steps.
//!
//! Every mutation goes through [`BirthData::apply`], which re-establishes the
//! range invariants after each merged field: the day never exceeds the
//! month's length and the minute is always on a quarter hour.

use crate::error::DestinyError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Ranges
// ---------------------------------------------------------------------------

pub const YEAR_MIN: i32 = 1950;
pub const YEAR_SPAN: i32 = 100;
pub const YEAR_MAX: i32 = YEAR_MIN + YEAR_SPAN - 1;
pub const NAME_MAX_CHARS: usize = 50;
pub const QUARTER_MINUTES: [u32; 4] = [0, 15, 30, 45];

/// Number of days in `month` of `year`, honouring leap years.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let month = month.clamp(1, 12);
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

/// Coerce a minute onto the quarter-hour grid; anything off-grid becomes 0.
pub fn normalize_minute(minute: u32) -> u32 {
    if QUARTER_MINUTES.contains(&minute) {
        minute
    } else {
        0
    }
}

// ---------------------------------------------------------------------------
// Gender
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Yin,
    Yang,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Yin => "yin",
            Gender::Yang => "yang",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Gender::Yin => "Yin (음)",
            Gender::Yang => "Yang (양)",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = DestinyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yin" => Ok(Gender::Yin),
            "yang" => Ok(Gender::Yang),
            _ => Err(DestinyError::InvalidGender(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// BirthPatch
// ---------------------------------------------------------------------------

/// A partial update to [`BirthData`]. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BirthPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

impl BirthPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn date(year: i32, month: u32, day: u32) -> Self {
        Self {
            year: Some(year),
            month: Some(month),
            day: Some(day),
            ..Self::default()
        }
    }

    pub fn time(hour: u32, minute: u32) -> Self {
        Self {
            hour: Some(hour),
            minute: Some(minute),
            ..Self::default()
        }
    }

    pub fn gender(gender: Gender) -> Self {
        Self {
            gender: Some(gender),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ---------------------------------------------------------------------------
// BirthData
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthData {
    pub name: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub gender: Option<Gender>,
}

impl Default for BirthData {
    fn default() -> Self {
        Self {
            name: String::new(),
            year: 2000,
            month: 1,
            day: 1,
            hour: 12,
            minute: 0,
            gender: None,
        }
    }
}

impl BirthData {
    /// Merge `patch` field by field, re-running the invariants after each one.
    pub fn apply(&mut self, patch: BirthPatch) {
        if let Some(name) = patch.name {
            self.name = name.chars().take(NAME_MAX_CHARS).collect();
        }
        if let Some(year) = patch.year {
            self.year = year.clamp(YEAR_MIN, YEAR_MAX);
            self.enforce();
        }
        if let Some(month) = patch.month {
            self.month = month.clamp(1, 12);
            self.enforce();
        }
        if let Some(day) = patch.day {
            self.day = day;
            self.enforce();
        }
        if let Some(hour) = patch.hour {
            self.hour = hour.min(23);
        }
        if let Some(minute) = patch.minute {
            self.minute = minute;
            self.enforce();
        }
        if let Some(gender) = patch.gender {
            self.gender = Some(gender);
        }
    }

    fn enforce(&mut self) {
        self.day = self.day.clamp(1, days_in_month(self.year, self.month));
        self.minute = normalize_minute(self.minute);
    }

    pub fn has_valid_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// True when the record can be finalized.
    pub fn is_complete(&self) -> bool {
        self.has_valid_name() && self.gender.is_some()
    }

    pub fn birth_date_label(&self) -> String {
        format!("{}.{:02}.{:02}", self.year, self.month, self.day)
    }

    pub fn birth_time_label(&self) -> String {
        format!("{:02}:{:02}", self.hour, normalize_minute(self.minute))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Result log - one CSV row per finished ritual, birth record and fortune
//! side by side.
//!
//! The header is written only when the file is created. Every row starts
//! with the time it was written. Values are quoted only when they contain a
//! comma, a quote or a line break; embedded quotes are doubled.

use crate::birth::{BirthData, Gender};
use crate::error::{DestinyError, Result};
use crate::fortune::FortuneOutcome;
use crate::io;
use crate::sink::{RecordSink, SubmittedRecord};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const HEADER: &str = "timestamp,name,birthYear,birthMonth,birthDay,birthHour,birthMinute,gender,characterName,characterElement,compatibility,sajuMessage,dailyFortune,luckyItem,luckyColor,luckyNumber\n";

// ---------------------------------------------------------------------------
// ResultRow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRow {
    pub name: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    #[serde(default)]
    pub gender: Option<Gender>,
    pub character_name: String,
    pub character_element: String,
    pub compatibility: String,
    pub saju_message: String,
    pub daily_fortune: String,
    pub lucky_item: String,
    pub lucky_color: String,
    pub lucky_number: u32,
}

impl ResultRow {
    pub fn new(birth: &BirthData, outcome: &FortuneOutcome) -> Self {
        Self {
            name: birth.name.clone(),
            year: birth.year,
            month: birth.month,
            day: birth.day,
            hour: birth.hour,
            minute: birth.minute,
            gender: birth.gender,
            character_name: outcome.character.name.to_string(),
            character_element: outcome.character.element.tag().to_string(),
            compatibility: outcome.compatibility.to_string(),
            saju_message: outcome.saju_message.to_string(),
            daily_fortune: outcome.daily_fortune.to_string(),
            lucky_item: outcome.lucky_item.to_string(),
            lucky_color: outcome.lucky_color.to_string(),
            lucky_number: outcome.lucky_number,
        }
    }

    fn cells(&self, timestamp: &str) -> [String; 16] {
        [
            timestamp.to_string(),
            self.name.clone(),
            self.year.to_string(),
            self.month.to_string(),
            self.day.to_string(),
            self.hour.to_string(),
            self.minute.to_string(),
            self.gender.map(|g| g.as_str().to_string()).unwrap_or_default(),
            self.character_name.clone(),
            self.character_element.clone(),
            self.compatibility.clone(),
            self.saju_message.clone(),
            self.daily_fortune.clone(),
            self.lucky_item.clone(),
            self.lucky_color.clone(),
            self.lucky_number.to_string(),
        ]
    }
}

/// Encode one CSV line (newline-terminated) from `cells`.
pub fn encode_row<I, T>(cells: I) -> Result<String>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut buf = Vec::new();
    {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(&mut buf);
        writer.write_record(cells)?;
        writer.flush()?;
    }
    String::from_utf8(buf).map_err(|e| DestinyError::InvalidInput(e.to_string()))
}

// ---------------------------------------------------------------------------
// ResultLog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ResultLog {
    path: PathBuf,
}

impl ResultLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, row: &ResultRow) -> Result<()> {
        self.append_at(row, Utc::now())
    }

    pub fn append_at(&self, row: &ResultRow, now: DateTime<Utc>) -> Result<()> {
        let timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        let line = encode_row(row.cells(&timestamp))?;
        let created = io::append_with_preamble(&self.path, HEADER.as_bytes(), line.as_bytes())?;
        if created {
            tracing::info!(path = %self.path.display(), "result log created");
        }
        Ok(())
    }
}

impl RecordSink for ResultLog {
    fn name(&self) -> &'static str {
        "results"
    }

    fn submit(&self, record: &SubmittedRecord) -> Result<()> {
        self.append(&ResultRow::new(&record.birth, &record.outcome))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::birth::BirthPatch;
    use crate::fortune::tests::Sequence;
    use crate::fortune::OutcomeResolver;
    use chrono::TimeZone;

    fn sample_row() -> ResultRow {
        let mut birth = BirthData::default();
        birth.apply(BirthPatch::name("Test"));
        birth.apply(BirthPatch::gender(Gender::Yang));
        let outcome = OutcomeResolver::new(Sequence::new([0, 1, 2, 3, 4, 5, 6])).resolve();
        ResultRow::new(&birth, &outcome)
    }

    #[test]
    fn quotes_and_commas_are_escaped() {
        let line = encode_row(["He said \"hi\", then left"]).unwrap();
        assert_eq!(line, "\"He said \"\"hi\"\", then left\"\n");
    }

    #[test]
    fn plain_values_are_left_bare() {
        let line = encode_row(["a", "b c", "42"]).unwrap();
        assert_eq!(line, "a,b c,42\n");
    }

    #[test]
    fn line_breaks_force_quotes() {
        let line = encode_row(["two\nlines", "x"]).unwrap();
        assert_eq!(line, "\"two\nlines\",x\n");
    }

    #[test]
    fn header_written_once() {
        let dir = tempfile::TempDir::new().unwrap();
        let log = ResultLog::new(dir.path().join("data/user_results.csv"));
        let row = sample_row();
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        log.append_at(&row, now).unwrap();
        log.append_at(&row, now).unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(format!("{}\n", lines[0]), HEADER);
        assert!(lines[1].starts_with("2025-03-01T09:30:00.000Z,Test,2000,1,1,12,0,yang,Rumi,"));
        assert!(lines[1].ends_with(",7"));
    }

    #[test]
    fn row_carries_fortune_fields() {
        let row = sample_row();
        assert_eq!(row.character_name, "Rumi");
        assert_eq!(row.character_element, "火 (불)");
        assert_eq!(row.lucky_number, 7);
    }

    #[test]
    fn row_deserializes_from_camel_case() {
        let row: ResultRow = serde_json::from_value(serde_json::json!({
            "name": "A", "year": 1990, "month": 5, "day": 3, "hour": 8, "minute": 30,
            "gender": "yin", "characterName": "Mira", "characterElement": "水 (물)",
            "compatibility": "c", "sajuMessage": "s", "dailyFortune": "d",
            "luckyItem": "i", "luckyColor": "k", "luckyNumber": 12,
            "ignored": true
        }))
        .unwrap();
        assert_eq!(row.gender, Some(Gender::Yin));
        assert_eq!(row.lucky_number, 12);
    }
}

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    Present,
    Absent,
    Late,
    Leave,
}

impl Status {
    /// Whether the student was physically checked in.
    pub fn checked_in(self) -> bool {
        matches!(self, Status::Present | Status::Late)
    }
}

/// Natural key of a record: one entry per student per day.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct RecordKey {
    pub student_id: String,
    pub date: NaiveDate,
}

impl RecordKey {
    /// Splits an id of the form `"{student_id}-{YYYY-MM-DD}"` back into its key.
    pub fn parse(id: &str) -> Option<Self> {
        let split = id.len().checked_sub(DATE_LEN + 1)?;
        let (student_id, date) = (id.get(..split)?, id.get(split + 1..)?);
        if student_id.is_empty() || id.as_bytes()[split] != b'-' {
            return None;
        }
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
        Some(Self {
            student_id: student_id.to_string(),
            date,
        })
    }
}

const DATE_LEN: usize = "YYYY-MM-DD".len();

/// One attendance entry for one student on one calendar day.
///
/// The id is not stored: it is always `"{student_id}-{date}"`, so it follows
/// the key whenever the student or the date changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "RecordRepr", from = "RecordRepr")]
pub struct AttendanceRecord {
    student_id: String,
    date: NaiveDate,
    pub time_in: Option<NaiveTime>,
    pub time_out: Option<NaiveTime>,
    pub status: Status,
    pub notes: Option<String>,
}

impl AttendanceRecord {
    pub fn new(student_id: impl Into<String>, date: NaiveDate, status: Status) -> Self {
        Self {
            student_id: student_id.into(),
            date,
            time_in: None,
            time_out: None,
            status,
            notes: None,
        }
    }

    pub fn with_times(mut self, time_in: Option<NaiveTime>, time_out: Option<NaiveTime>) -> Self {
        self.time_in = time_in;
        self.time_out = time_out;
        self
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes.filter(|n| !n.trim().is_empty());
        self
    }

    pub fn id(&self) -> String {
        record_id(&self.student_id, self.date)
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn key(&self) -> RecordKey {
        RecordKey {
            student_id: self.student_id.clone(),
            date: self.date,
        }
    }

    /// Moves the record to another day; the id moves with it.
    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    pub fn set_student_id(&mut self, student_id: impl Into<String>) {
        self.student_id = student_id.into();
    }
}

pub fn record_id(student_id: &str, date: NaiveDate) -> String {
    format!("{}-{}", student_id, date.format("%Y-%m-%d"))
}

/// Wire shape: camelCase keys, `HH:MM:SS` times, `timeIn` is `""` when empty.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordRepr {
    #[serde(default)]
    id: String,
    student_id: String,
    date: NaiveDate,
    #[serde(
        default,
        serialize_with = "wall_time::serialize_or_empty",
        deserialize_with = "wall_time::deserialize"
    )]
    time_in: Option<NaiveTime>,
    #[serde(default, with = "wall_time")]
    time_out: Option<NaiveTime>,
    status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

impl From<AttendanceRecord> for RecordRepr {
    fn from(r: AttendanceRecord) -> Self {
        Self {
            id: r.id(),
            student_id: r.student_id,
            date: r.date,
            time_in: r.time_in,
            time_out: r.time_out,
            status: r.status,
            notes: r.notes,
        }
    }
}

impl From<RecordRepr> for AttendanceRecord {
    // any incoming id is discarded and re-derived
    fn from(r: RecordRepr) -> Self {
        Self {
            student_id: r.student_id,
            date: r.date,
            time_in: r.time_in,
            time_out: r.time_out,
            status: r.status,
            notes: r.notes,
        }
    }
}

mod wall_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M:%S";

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => s.serialize_str(&t.format(FORMAT).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn serialize_or_empty<S: Serializer>(
        value: &Option<NaiveTime>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => s.serialize_str(&t.format(FORMAT).to_string()),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveTime::parse_from_str(s, FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::model::attendance::Status;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginReqDto {
    pub email: String,
    pub password: String,
}

/// One student's row on the attendance form. A row may carry notes
/// without a status; the student is then recorded absent with those notes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkEntry {
    pub student_id: String,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A submitted attendance form: one date, the wall-clock time it was
/// captured at, and whatever marks the user made.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReq {
    pub date: NaiveDate,
    pub captured_at: NaiveTime,
    #[serde(default)]
    pub marks: Vec<MarkEntry>,
}

impl MarkEntry {
    pub fn new(student_id: impl Into<String>, status: Status) -> Self {
        Self {
            student_id: student_id.into(),
            status: Some(status),
            notes: None,
        }
    }

    pub fn note_only(student_id: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            status: None,
            notes: Some(notes.into()),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

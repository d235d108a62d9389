use std::collections::HashMap;
use std::thread;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    auth::session::SessionStore,
    error::{AppError, AppResult},
    model::{
        attendance::{AttendanceRecord, Status},
        user::User,
    },
    models::{MarkEntry, SubmissionReq},
    state::AppState,
    store::{Update, Upsert},
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmissionResult {
    pub inserted: usize,
    pub replaced: usize,
    /// Roster students nobody marked; they were recorded as absent.
    pub defaulted: usize,
}

/// Turns a submitted form into one record per roster student.
///
/// Students without a status are recorded absent, keeping any notes typed
/// for them. Marks for students outside the roster are dropped.
pub fn build_records<'a, I>(roster: I, req: &SubmissionReq) -> (Vec<AttendanceRecord>, usize)
where
    I: IntoIterator<Item = &'a User>,
{
    let mut marks: HashMap<&str, &MarkEntry> = req
        .marks
        .iter()
        .map(|m| (m.student_id.as_str(), m))
        .collect();

    let mut defaulted = 0;
    let records = roster
        .into_iter()
        .map(|student| {
            let mark = marks.remove(student.id.as_str());
            let notes = mark.and_then(|m| m.notes.clone());
            let status = match mark.and_then(|m| m.status) {
                Some(status) => status,
                None => {
                    defaulted += 1;
                    Status::Absent
                }
            };
            let time_in = status.checked_in().then_some(req.captured_at);

            AttendanceRecord::new(student.id.as_str(), req.date, status)
                .with_times(time_in, None)
                .with_notes(notes)
        })
        .collect();

    for stray in marks.keys() {
        warn!(student_id = %stray, "Ignoring mark for a student outside the roster");
    }

    (records, defaulted)
}

/// Records a whole class for one day. Admin only.
#[instrument(skip(state, req), fields(date = %req.date, marks = req.marks.len()))]
pub fn submit_attendance<S: SessionStore>(
    state: &mut AppState<S>,
    req: SubmissionReq,
    today: NaiveDate,
) -> AppResult<SubmissionResult> {
    let auth = state.auth.require_user()?;
    auth.require_admin("marking attendance")?;

    if req.date > today {
        return Err(AppError::FutureDate {
            date: req.date,
            today,
        });
    }

    let (records, defaulted) = build_records(state.directory.students(), &req);

    // simulated round trip
    if !state.config.submit_delay.is_zero() {
        thread::sleep(state.config.submit_delay);
    }

    let mut result = SubmissionResult {
        defaulted,
        ..Default::default()
    };
    for record in records {
        match state.records.upsert(record) {
            Upsert::Inserted => result.inserted += 1,
            Upsert::Replaced => result.replaced += 1,
        }
    }

    info!(
        inserted = result.inserted,
        replaced = result.replaced,
        defaulted = result.defaulted,
        by = %auth.user_id,
        "Attendance submitted"
    );
    Ok(result)
}

/// Saves an edited record over the one stored under `id`. Admin only.
///
/// The edit may change the student or the date. Returns `false` when no
/// record has that id, and `RecordExists` when the edit would land on a
/// student and day that already has a record; the store is left as is.
pub fn edit_record<S: SessionStore>(
    state: &mut AppState<S>,
    id: &str,
    record: AttendanceRecord,
) -> AppResult<bool> {
    let auth = state.auth.require_user()?;
    auth.require_admin("editing attendance")?;

    let new_id = record.id();
    match state.records.update_by_id(id, record) {
        Update::Updated => {
            info!(%id, %new_id, by = %auth.user_id, "Attendance record updated");
            Ok(true)
        }
        Update::NotFound => {
            debug!(%id, "Edit ignored, record not found");
            Ok(false)
        }
        Update::Taken => {
            warn!(%id, %new_id, "Edit rejected, target already recorded");
            Err(AppError::RecordExists { id: new_id })
        }
    }
}

/// Records visible to the caller: students see only their own.
pub fn visible_records<S: SessionStore>(state: &AppState<S>) -> AppResult<Vec<AttendanceRecord>> {
    let auth = state.auth.require_user()?;
    let records = if auth.is_student() {
        state.records.by_student(&auth.user_id).cloned().collect()
    } else {
        state.records.iter().cloned().collect()
    };
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::session::MemorySessionStore, config::Config, models::LoginReqDto,
        store::RecordStore, utils::roster::Directory,
    };
    use chrono::NaiveTime;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn nine() -> NaiveTime {
        NaiveTime::from_hms_opt(9, 0, 0).unwrap()
    }

    fn logged_in(email: &str, password: &str) -> AppState<MemorySessionStore> {
        let mut state = AppState::new(
            Config::default().without_delays(),
            Directory::demo(),
            RecordStore::new(),
            MemorySessionStore::new("currentUser"),
        );
        let req = LoginReqDto {
            email: email.into(),
            password: password.into(),
        };
        assert!(state.auth.login(&state.directory, &req).unwrap());
        state
    }

    fn admin() -> AppState<MemorySessionStore> {
        logged_in("admin@example.com", "admin123")
    }

    fn form(marks: Vec<MarkEntry>) -> SubmissionReq {
        SubmissionReq {
            date: today(),
            captured_at: nine(),
            marks,
        }
    }

    #[test]
    fn unmarked_roster_is_recorded_absent() {
        let mut state = admin();

        let result = submit_attendance(&mut state, form(vec![]), today()).unwrap();

        assert_eq!(result.inserted, 5);
        assert_eq!(result.defaulted, 5);
        assert_eq!(state.records.len(), 5);
        for record in state.records.iter() {
            assert_eq!(record.status, Status::Absent);
            assert_eq!(record.time_in, None);
            assert_eq!(record.time_out, None);
            assert_eq!(record.date(), today());
        }
    }

    #[test]
    fn marks_set_status_time_and_notes() {
        let roster = Directory::demo();
        let req = form(vec![
            MarkEntry::new("1", Status::Present),
            MarkEntry::new("2", Status::Late).with_notes("traffic"),
            MarkEntry::new("3", Status::Leave).with_notes(""),
            MarkEntry::new("77", Status::Present),
        ]);

        let (records, defaulted) = build_records(roster.students(), &req);

        assert_eq!(records.len(), 5);
        assert_eq!(defaulted, 2);
        assert_eq!(records[0].time_in, Some(nine()));
        assert_eq!(records[1].status, Status::Late);
        assert_eq!(records[1].time_in, Some(nine()));
        assert_eq!(records[1].notes.as_deref(), Some("traffic"));
        assert_eq!(records[2].time_in, None);
        assert_eq!(records[2].notes, None);
        assert!(records.iter().all(|r| r.time_out.is_none()));
        assert!(records.iter().all(|r| r.student_id() != "77"));
    }

    #[test]
    fn notes_on_unmarked_students_survive_the_default() {
        let roster = Directory::demo();
        let req = form(vec![MarkEntry::note_only("4", "called in sick")]);

        let (records, defaulted) = build_records(roster.students(), &req);

        assert_eq!(defaulted, 5);
        assert_eq!(records[3].student_id(), "4");
        assert_eq!(records[3].status, Status::Absent);
        assert_eq!(records[3].time_in, None);
        assert_eq!(records[3].notes.as_deref(), Some("called in sick"));
        assert!(records.iter().filter(|r| r.student_id() != "4").all(|r| r.notes.is_none()));
    }

    #[test]
    fn marks_deserialize_without_a_status() {
        let raw = r#"{"date":"2024-03-04","capturedAt":"09:00:00",
            "marks":[{"studentId":"1","status":"late"},{"studentId":"2","notes":"no show"}]}"#;
        let req: SubmissionReq = serde_json::from_str(raw).unwrap();

        assert_eq!(req.marks[0].status, Some(Status::Late));
        assert_eq!(req.marks[1].status, None);
        assert_eq!(req.marks[1].notes.as_deref(), Some("no show"));
    }

    #[test]
    fn resubmitting_the_same_day_overwrites() {
        let mut state = admin();
        submit_attendance(&mut state, form(vec![]), today()).unwrap();

        let result = submit_attendance(
            &mut state,
            form(vec![MarkEntry::new("4", Status::Present)]),
            today(),
        )
        .unwrap();

        assert_eq!(result.replaced, 5);
        assert_eq!(result.inserted, 0);
        assert_eq!(state.records.len(), 5);
        assert_eq!(state.records.get("4-2024-03-04").unwrap().status, Status::Present);
    }

    #[test]
    fn future_dates_are_rejected() {
        let mut state = admin();
        let mut req = form(vec![]);
        req.date = today().succ_opt().unwrap();

        let err = submit_attendance(&mut state, req, today()).unwrap_err();

        assert!(matches!(err, AppError::FutureDate { .. }));
        assert!(state.records.is_empty());
    }

    #[test]
    fn students_cannot_mark_or_edit() {
        let mut state = logged_in("alex@example.com", "password123");

        let err = submit_attendance(&mut state, form(vec![]), today()).unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));

        let record = AttendanceRecord::new("1", today(), Status::Present);
        let err = edit_record(&mut state, "1-2024-03-04", record).unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[test]
    fn anonymous_callers_are_turned_away() {
        let mut state = admin();
        state.auth.logout().unwrap();

        let err = submit_attendance(&mut state, form(vec![]), today()).unwrap_err();
        assert!(matches!(err, AppError::NotAuthenticated));
    }

    #[test]
    fn edit_updates_known_ids_only() {
        let mut state = admin();
        submit_attendance(&mut state, form(vec![]), today()).unwrap();

        let mut edited = state.records.get("2-2024-03-04").unwrap().clone();
        edited.status = Status::Late;
        edited.time_in = Some(nine());
        assert!(edit_record(&mut state, "2-2024-03-04", edited).unwrap());
        assert_eq!(state.records.get("2-2024-03-04").unwrap().status, Status::Late);

        let before: Vec<AttendanceRecord> = state.records.iter().cloned().collect();
        let stranger = AttendanceRecord::new("2", today().pred_opt().unwrap(), Status::Present);
        assert!(!edit_record(&mut state, "2-2024-03-03", stranger).unwrap());
        assert_eq!(state.records.iter().cloned().collect::<Vec<_>>(), before);
    }

    #[test]
    fn edit_can_move_a_record_to_another_day() {
        let mut state = admin();
        submit_attendance(&mut state, form(vec![]), today()).unwrap();
        let yesterday = today().pred_opt().unwrap();

        let mut edited = state.records.get("3-2024-03-04").unwrap().clone();
        edited.set_date(yesterday);
        edited.status = Status::Leave;
        assert!(edit_record(&mut state, "3-2024-03-04", edited).unwrap());

        assert_eq!(state.records.len(), 5);
        assert!(state.records.get("3-2024-03-04").is_none());
        assert_eq!(state.records.get("3-2024-03-03").unwrap().status, Status::Leave);
        assert_eq!(state.records.by_student("3").count(), 1);
        assert_eq!(state.records.by_date(today()).count(), 4);
    }

    #[test]
    fn edit_onto_an_existing_record_is_rejected() {
        let mut state = admin();
        submit_attendance(&mut state, form(vec![]), today()).unwrap();
        let before: Vec<AttendanceRecord> = state.records.iter().cloned().collect();

        let mut edited = state.records.get("3-2024-03-04").unwrap().clone();
        edited.set_student_id("4");
        edited.status = Status::Present;
        let err = edit_record(&mut state, "3-2024-03-04", edited).unwrap_err();

        assert!(matches!(err, AppError::RecordExists { ref id } if id == "4-2024-03-04"));
        assert_eq!(state.records.iter().cloned().collect::<Vec<_>>(), before);
    }

    #[test]
    fn students_only_see_their_own_records() {
        let mut state = admin();
        submit_attendance(&mut state, form(vec![]), today()).unwrap();
        state.auth.logout().unwrap();

        let req = LoginReqDto {
            email: "daniel@example.com".into(),
            password: "password123".into(),
        };
        assert!(state.auth.login(&state.directory, &req).unwrap());

        let records = visible_records(&state).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].student_id(), "5");
    }
}

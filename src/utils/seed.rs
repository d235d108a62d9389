use chrono::{Datelike, Days, NaiveDate, NaiveTime, Weekday};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::model::attendance::{AttendanceRecord, Status};
use crate::model::user::User;

const STATUSES: [Status; 4] = [Status::Present, Status::Absent, Status::Late, Status::Leave];
const WEIGHTS: [u32; 4] = [80, 10, 5, 5];

fn at(h: u32, m: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(h, m, 0)
}

/// Builds the record a generated status implies.
fn synthetic_record(student_id: &str, date: NaiveDate, status: Status) -> AttendanceRecord {
    let time_in = match status {
        Status::Absent => None,
        Status::Late => at(9, 15),
        Status::Present | Status::Leave => at(8, 30),
    };
    let time_out = match status {
        Status::Absent => None,
        _ => at(15, 30),
    };
    let notes = (status == Status::Leave).then(|| "Medical leave".to_string());

    AttendanceRecord::new(student_id, date, status)
        .with_times(time_in, time_out)
        .with_notes(notes)
}

/// Generates weekday records for each student over the `days` days ending
/// at `today`, newest day first per student.
pub fn generate_records<'a, R, I>(students: I, today: NaiveDate, days: u32, rng: &mut R) -> Vec<AttendanceRecord>
where
    R: Rng + ?Sized,
    I: IntoIterator<Item = &'a User>,
{
    let weights = match WeightedIndex::new(WEIGHTS) {
        Ok(w) => w,
        Err(_) => return Vec::new(),
    };

    let mut records = Vec::new();
    for student in students {
        for offset in 0..days {
            let Some(date) = today.checked_sub_days(Days::new(offset.into())) else {
                break;
            };
            if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                continue;
            }
            let status = STATUSES[weights.sample(rng)];
            records.push(synthetic_record(&student.id, date, status));
        }
    }
    records
}

/// Seeds from `seed` when given so runs are reproducible.
pub fn seeded_records<'a, I>(students: I, today: NaiveDate, days: u32, seed: Option<u64>) -> Vec<AttendanceRecord>
where
    I: IntoIterator<Item = &'a User>,
{
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let records = generate_records(students, today, days, &mut rng);
    info!(count = records.len(), days, seeded = seed.is_some(), "Synthetic attendance generated");
    records
}

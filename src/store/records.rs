use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::model::attendance::{AttendanceRecord, RecordKey};

/// Canonical, ordered list of attendance records.
///
/// Records are never removed. `index` maps each (student, date) key to its
/// position in `records`, which keeps at most one record per key.
#[derive(Debug, Default, Clone)]
pub struct RecordStore {
    records: Vec<AttendanceRecord>,
    index: HashMap<RecordKey, usize>,
}

/// What an upsert did.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Upsert {
    Inserted,
    Replaced,
}

/// What an update by id did.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Update {
    Updated,
    NotFound,
    /// The edit would move the record onto a key that is already taken.
    Taken,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the record, or replaces the one with the same student and date
    /// in place.
    pub fn upsert(&mut self, record: AttendanceRecord) -> Upsert {
        let key = record.key();
        match self.index.get(&key) {
            Some(&pos) => {
                debug!(id = %record.id(), "Replacing attendance record");
                self.records[pos] = record;
                Upsert::Replaced
            }
            None => {
                debug!(id = %record.id(), "Appending attendance record");
                self.index.insert(key, self.records.len());
                self.records.push(record);
                Upsert::Inserted
            }
        }
    }

    /// Replaces the record stored under `id` with `record`.
    ///
    /// The edited record may carry a different student or date, in which
    /// case it moves to its new key and `id` stops resolving. A move onto a
    /// key another record already holds is refused. Either miss leaves the
    /// store untouched.
    pub fn update_by_id(&mut self, id: &str, record: AttendanceRecord) -> Update {
        let Some(pos) = self.position(id) else {
            debug!(%id, "No attendance record to update");
            return Update::NotFound;
        };

        let new_key = record.key();
        let old_key = self.records[pos].key();
        if new_key != old_key {
            if self.index.contains_key(&new_key) {
                debug!(%id, to = %record.id(), "Attendance record already exists");
                return Update::Taken;
            }
            debug!(%id, to = %record.id(), "Moving attendance record");
            self.index.remove(&old_key);
            self.index.insert(new_key, pos);
        }
        self.records[pos] = record;
        Update::Updated
    }

    pub fn get(&self, id: &str) -> Option<&AttendanceRecord> {
        self.position(id).map(|pos| &self.records[pos])
    }

    fn position(&self, id: &str) -> Option<usize> {
        let key = RecordKey::parse(id)?;
        self.index
            .get(&key)
            .copied()
            .filter(|&pos| self.records[pos].id() == id)
    }

    /// Records of one student, in insertion order. Clone the iterator to
    /// walk it again.
    pub fn by_student<'a>(
        &'a self,
        student_id: &'a str,
    ) -> impl Iterator<Item = &'a AttendanceRecord> + Clone + 'a {
        self.records
            .iter()
            .filter(move |r| r.student_id() == student_id)
    }

    /// Records of every student for one calendar day.
    pub fn by_date(&self, date: NaiveDate) -> impl Iterator<Item = &AttendanceRecord> + Clone + '_ {
        self.records.iter().filter(move |r| r.date() == date)
    }

    pub fn today(&self, today: NaiveDate) -> Vec<AttendanceRecord> {
        self.by_date(today).cloned().collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AttendanceRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Extend<AttendanceRecord> for RecordStore {
    fn extend<T: IntoIterator<Item = AttendanceRecord>>(&mut self, iter: T) {
        for record in iter {
            self.upsert(record);
        }
    }
}

impl FromIterator<AttendanceRecord> for RecordStore {
    fn from_iter<T: IntoIterator<Item = AttendanceRecord>>(iter: T) -> Self {
        let mut store = RecordStore::new();
        store.extend(iter);
        store
    }
}

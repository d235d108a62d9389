use serde::Serialize;
use strum_macros::Display;

use crate::model::attendance::{AttendanceRecord, Status};

/// Present/absent/late/leave counts over a set of records. Always computed,
/// never stored next to the records it summarises.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Serialize)]
pub struct AttendanceStatus {
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    pub leave: usize,
    pub total: usize,
}

/// Present-rate band shown on a student card.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Standing {
    Good,
    Warning,
    AtRisk,
}

const GOOD_RATE: u32 = 90;
const WARNING_RATE: u32 = 75;

pub fn aggregate<'a, I>(records: I) -> AttendanceStatus
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    records
        .into_iter()
        .fold(AttendanceStatus::default(), |mut acc, record| {
            *acc.slot(record.status) += 1;
            acc.total += 1;
            acc
        })
}

/// Whole percent of `count` in `total`, rounded half up; 0 when `total` is 0.
pub fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let (count, total) = (count as u64, total as u64);
    ((count * 200 + total) / (total * 2)) as u32
}

impl AttendanceStatus {
    fn slot(&mut self, status: Status) -> &mut usize {
        match status {
            Status::Present => &mut self.present,
            Status::Absent => &mut self.absent,
            Status::Late => &mut self.late,
            Status::Leave => &mut self.leave,
        }
    }

    pub fn count(&self, status: Status) -> usize {
        match status {
            Status::Present => self.present,
            Status::Absent => self.absent,
            Status::Late => self.late,
            Status::Leave => self.leave,
        }
    }

    pub fn percent(&self, status: Status) -> u32 {
        percentage(self.count(status), self.total)
    }

    pub fn attendance_rate(&self) -> u32 {
        self.percent(Status::Present)
    }

    pub fn standing(&self) -> Standing {
        match self.attendance_rate() {
            r if r >= GOOD_RATE => Standing::Good,
            r if r >= WARNING_RATE => Standing::Warning,
            _ => Standing::AtRisk,
        }
    }

    pub fn percentages(&self) -> Percentages {
        Percentages {
            present: self.percent(Status::Present),
            absent: self.percent(Status::Absent),
            late: self.percent(Status::Late),
            leave: self.percent(Status::Leave),
        }
    }
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Serialize)]
pub struct Percentages {
    pub present: u32,
    pub absent: u32,
    pub late: u32,
    pub leave: u32,
}

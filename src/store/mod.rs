pub mod aggregate;
pub mod records;

pub use aggregate::{AttendanceStatus, Standing, aggregate, percentage};
pub use records::{RecordStore, Update, Upsert};

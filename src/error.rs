use chrono::NaiveDate;
use derive_more::Display;

#[derive(Debug, Display)]
pub enum AppError {
    #[display(fmt = "session storage failed: {}", _0)]
    SessionIo(std::io::Error),

    #[display(fmt = "stored session is malformed: {}", _0)]
    SessionFormat(serde_json::Error),

    #[display(fmt = "no user is logged in")]
    NotAuthenticated,

    #[display(fmt = "{} is restricted to admins", action)]
    Forbidden { action: &'static str },

    #[display(fmt = "cannot mark attendance for {}, it is after {}", date, today)]
    FutureDate { date: NaiveDate, today: NaiveDate },

    #[display(fmt = "attendance record {} already exists", id)]
    RecordExists { id: String },
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::SessionIo(e) => Some(e),
            AppError::SessionFormat(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::SessionIo(e)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::SessionFormat(e)
    }
}

pub type AppResult<T> = Result<T, AppError>;

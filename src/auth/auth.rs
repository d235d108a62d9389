use crate::error::{AppError, AppResult};
use crate::model::{role::Role, user::User};

/// The caller behind an operation, resolved from the current session.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub name: String,
    pub role: Role,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            name: user.name.clone(),
            role: user.role(),
        }
    }
}

impl AuthUser {
    pub fn require_admin(&self, action: &'static str) -> AppResult<()> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(AppError::Forbidden { action })
        }
    }

    /// Returns true if the user is a student
    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }
}

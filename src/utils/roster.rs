use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::model::user::{Profile, User};

const PHOTO_QUERY: &str = "?auto=compress&cs=tinysrgb&w=150";

fn photo(id: u32) -> Option<String> {
    Some(format!(
        "https://images.pexels.com/photos/{id}/pexels-photo-{id}.jpeg{PHOTO_QUERY}"
    ))
}

fn student(id: &str, name: &str, email: &str, code: &str, class: &str, pic: u32) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        password: "password123".to_string(),
        profile_pic: photo(pic),
        profile: Profile::Student {
            student_id: code.to_string(),
            class: class.to_string(),
            join_date: NaiveDate::from_ymd_opt(2023, 9, 1).unwrap_or(NaiveDate::MIN),
        },
    }
}

fn admin(id: &str, name: &str, email: &str, code: &str, position: &str, pic: u32) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        password: "admin123".to_string(),
        profile_pic: photo(pic),
        profile: Profile::Admin {
            admin_id: code.to_string(),
            position: position.to_string(),
        },
    }
}

/// Synthetic students loaded at startup.
pub static DEMO_STUDENTS: Lazy<Vec<User>> = Lazy::new(|| {
    vec![
        student("1", "Alex Johnson", "alex@example.com", "STU001", "Class 10A", 220453),
        student("2", "Sarah Williams", "sarah@example.com", "STU002", "Class 10B", 1239291),
        student("3", "Michael Brown", "michael@example.com", "STU003", "Class 11A", 91227),
        student("4", "Emily Davis", "emily@example.com", "STU004", "Class 11B", 733872),
        student("5", "Daniel Wilson", "daniel@example.com", "STU005", "Class 12A", 1681010),
    ]
});

/// Synthetic administrators loaded at startup.
pub static DEMO_ADMINS: Lazy<Vec<User>> = Lazy::new(|| {
    vec![
        admin("101", "Prof. James Smith", "admin@example.com", "ADM001", "Principal", 2379005),
        admin("102", "Dr. Jennifer Taylor", "jennifer@example.com", "ADM002", "Vice Principal", 1181686),
    ]
});

/// Everyone who can log in, students first.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    users: Vec<User>,
}

impl Directory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    pub fn demo() -> Self {
        Self::new(DEMO_STUDENTS.iter().chain(DEMO_ADMINS.iter()).cloned().collect())
    }

    /// Exact, case-sensitive plaintext match on both fields.
    pub fn find_by_credentials(&self, email: &str, password: &str) -> Option<&User> {
        let found = self
            .users
            .iter()
            .find(|u| u.email == email && u.password == password);
        debug!(matched = found.is_some(), "Credential lookup");
        found
    }

    pub fn students(&self) -> impl Iterator<Item = &User> + Clone {
        self.users.iter().filter(|u| u.is_student())
    }

    pub fn student(&self, id: &str) -> Option<&User> {
        self.students().find(|u| u.id == id)
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

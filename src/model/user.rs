use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::role::Role;

/// A person who can log in. Passwords are plaintext; the synthetic directory
/// has no real credentials to protect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
    #[serde(flatten)]
    pub profile: Profile,
}

/// Role-specific fields. The variant tag is the user's `role`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Profile {
    #[serde(rename_all = "camelCase")]
    Student {
        student_id: String,
        class: String,
        join_date: NaiveDate,
    },
    #[serde(rename_all = "camelCase")]
    Admin { admin_id: String, position: String },
}

impl User {
    pub fn role(&self) -> Role {
        match self.profile {
            Profile::Student { .. } => Role::Student,
            Profile::Admin { .. } => Role::Admin,
        }
    }

    pub fn is_student(&self) -> bool {
        self.role() == Role::Student
    }

    /// Student code such as `STU001`, if this user is a student.
    pub fn student_code(&self) -> Option<&str> {
        match &self.profile {
            Profile::Student { student_id, .. } => Some(student_id),
            Profile::Admin { .. } => None,
        }
    }

    pub fn class(&self) -> Option<&str> {
        match &self.profile {
            Profile::Student { class, .. } => Some(class),
            Profile::Admin { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_tag_is_the_role() {
        let admin = User {
            id: "101".into(),
            name: "Prof. James Smith".into(),
            email: "admin@example.com".into(),
            password: "admin123".into(),
            profile_pic: None,
            profile: Profile::Admin {
                admin_id: "ADM001".into(),
                position: "Principal".into(),
            },
        };
        let json = serde_json::to_value(&admin).unwrap();

        assert_eq!(json["role"], "admin");
        assert_eq!(json["adminId"], "ADM001");
        assert_eq!(json["password"], "admin123");

        let back: User = serde_json::from_value(json).unwrap();
        assert_eq!(back.role(), Role::Admin);
        assert_eq!(back, admin);
    }

    #[test]
    fn student_fields_are_camel_case() {
        let raw = r#"{"id":"1","name":"Alex Johnson","email":"alex@example.com",
            "password":"password123","role":"student","studentId":"STU001",
            "class":"Class 10A","joinDate":"2023-09-01"}"#;
        let user: User = serde_json::from_str(raw).unwrap();

        assert!(user.is_student());
        assert_eq!(user.student_code(), Some("STU001"));
        assert_eq!(user.class(), Some("Class 10A"));
    }
}

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    auth::session::SessionStore,
    error::{AppError, AppResult},
    model::{attendance::AttendanceRecord, role::Role, user::User},
    state::AppState,
    store::{
        AttendanceStatus, Standing,
        aggregate::{Percentages, aggregate},
    },
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentCard {
    pub id: String,
    pub name: String,
    pub student_code: Option<String>,
    pub class: Option<String>,
    pub status: AttendanceStatus,
    pub percentages: Percentages,
    pub standing: Standing,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyOverview {
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub percentages: Percentages,
    /// Roster students with no record for the day.
    pub unrecorded: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub title: &'static str,
    pub description: &'static str,
    pub link: &'static str,
    #[serde(skip)]
    pub admin_only: bool,
}

const MENU: [MenuItem; 8] = [
    MenuItem {
        title: "Dashboard",
        description: "View attendance summary and statistics",
        link: "/dashboard",
        admin_only: false,
    },
    MenuItem {
        title: "Students",
        description: "Manage students and view detailed profiles",
        link: "/students",
        admin_only: true,
    },
    MenuItem {
        title: "Mark Attendance",
        description: "Record daily attendance for students",
        link: "/attendance",
        admin_only: true,
    },
    MenuItem {
        title: "My Profile",
        description: "View and update your personal information",
        link: "/profile",
        admin_only: false,
    },
    MenuItem {
        title: "Attendance History",
        description: "View detailed attendance records",
        link: "/history",
        admin_only: false,
    },
    MenuItem {
        title: "Schedule",
        description: "View class schedules and academic calendar",
        link: "/schedule",
        admin_only: false,
    },
    MenuItem {
        title: "Settings",
        description: "Configure application settings",
        link: "/settings",
        admin_only: true,
    },
    MenuItem {
        title: "Help & Support",
        description: "Get help and contact support",
        link: "/help",
        admin_only: false,
    },
];

pub fn menu(role: Role) -> Vec<MenuItem> {
    MENU.iter()
        .filter(|item| !item.admin_only || role.is_admin())
        .copied()
        .collect()
}

pub fn student_card<'a, I>(student: &User, records: I) -> StudentCard
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let status = aggregate(records);
    StudentCard {
        id: student.id.clone(),
        name: student.name.clone(),
        student_code: student.student_code().map(str::to_string),
        class: student.class().map(str::to_string),
        status,
        percentages: status.percentages(),
        standing: status.standing(),
    }
}

pub fn daily_overview<S: SessionStore>(state: &AppState<S>, date: NaiveDate) -> DailyOverview {
    let day = state.records.by_date(date);
    let status = aggregate(day.clone());
    let unrecorded = state
        .directory
        .students()
        .filter(|s| !day.clone().any(|r| r.student_id() == s.id))
        .count();

    DailyOverview {
        date,
        status,
        percentages: status.percentages(),
        unrecorded,
    }
}

/// What the landing view shows for the logged-in user.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum Dashboard {
    Admin {
        today: DailyOverview,
        students: Vec<StudentCard>,
        menu: Vec<MenuItem>,
    },
    Student {
        card: StudentCard,
        /// Newest first.
        history: Vec<AttendanceRecord>,
        menu: Vec<MenuItem>,
    },
}

pub fn dashboard<S: SessionStore>(state: &AppState<S>, today: NaiveDate) -> AppResult<Dashboard> {
    let user = state.auth.current_user().ok_or(AppError::NotAuthenticated)?;
    let menu = menu(user.role());

    if user.is_student() {
        let records = state.records.by_student(&user.id);
        let card = student_card(user, records.clone());
        let mut history: Vec<AttendanceRecord> = records.cloned().collect();
        history.sort_by(|a, b| b.date().cmp(&a.date()));
        return Ok(Dashboard::Student { card, history, menu });
    }

    let students = state
        .directory
        .students()
        .map(|s| student_card(s, state.records.by_student(&s.id)))
        .collect();
    Ok(Dashboard::Admin {
        today: daily_overview(state, today),
        students,
        menu,
    })
}

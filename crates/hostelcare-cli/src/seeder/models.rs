use std::time::Duration;

use chrono::{DateTime, Utc};
use hostelcare_models::{
    AdminId, ComplaintCategory, ComplaintPriority, ComplaintStatus, ComplaintUrgency, StudentId,
};

#[derive(Debug, Clone)]
pub struct StudentSeed {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub room_number: String,
    pub block: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct ComplaintSeed {
    pub student: StudentId,
    pub category: ComplaintCategory,
    pub title: String,
    pub description: String,
    pub location: String,
    pub priority: ComplaintPriority,
    pub urgency: ComplaintUrgency,
    pub status: ComplaintStatus,
    pub assigned_to: Option<AdminId>,
    pub created_at: DateTime<Utc>,
    /// Set only for resolved complaints
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub students: usize,
    pub complaints_per_student: usize,
    pub password: String,
}

impl SeedConfig {
    pub fn new(students: usize) -> Self {
        Self {
            students,
            complaints_per_student: 2,
            password: "password123".to_string(),
        }
    }

    pub fn with_complaints_per_student(mut self, count: usize) -> Self {
        self.complaints_per_student = count;
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }
}

#[derive(Debug)]
pub struct SeedSummary {
    pub students: usize,
    pub complaints: usize,
    pub elapsed: Duration,
}

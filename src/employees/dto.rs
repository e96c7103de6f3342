use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use time::Date;
use uuid::Uuid;

use crate::employees::repo_types::{iso_date, EmployeeType};
use crate::employees::services::EmployeeCommand;
use crate::error::DirectoryError;

const MIN_PASSWORD_LEN: usize = 8;

/// Body of create and update; every field is required and overwritten.
#[derive(Deserialize)]
pub struct EmployeeRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "type")]
    pub employee_type: EmployeeType,
    #[serde(default)]
    pub skill_ids: Vec<Uuid>,
    #[serde(with = "iso_date")]
    pub employment_date: Date,
}

impl EmployeeRequest {
    /// Emails are taken as sent: no trimming, no case folding.
    pub fn into_command(self) -> Result<EmployeeCommand, DirectoryError> {
        if self.name.trim().is_empty() {
            return Err(DirectoryError::Validation("Name is required".into()));
        }
        if !is_valid_email(&self.email) {
            return Err(DirectoryError::Validation("Invalid email".into()));
        }
        if self.password.len() < MIN_PASSWORD_LEN {
            return Err(DirectoryError::Validation("Password too short".into()));
        }
        Ok(EmployeeCommand {
            name: self.name,
            email: self.email,
            password: self.password,
            employee_type: self.employee_type,
            skill_ids: self.skill_ids,
            employment_date: self.employment_date,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct FilterQuery {
    pub skill_id: Option<Uuid>,
    pub years_of_service: Option<i32>,
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

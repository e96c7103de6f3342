use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;
use uuid::Uuid;

use crate::skills::repo_types::Skill;

/// Role of an employee; also the source of the granted authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "employee_type", rename_all = "UPPERCASE")]
pub enum EmployeeType {
    Regular,
    Manager,
    Admin,
}

impl EmployeeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeType::Regular => "REGULAR",
            EmployeeType::Manager => "MANAGER",
            EmployeeType::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for EmployeeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Employee as seen by the service: the `employees` row plus its skill set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    #[serde(rename = "type")]
    pub employee_type: EmployeeType,
    #[serde(with = "iso_date")]
    pub employment_date: Date,
    pub skills: Vec<Skill>,
}

/// Row of the `employees` table, without the skill links.
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub employee_type: EmployeeType,
    pub employment_date: Date,
}

impl EmployeeRow {
    pub fn with_skills(self, skills: Vec<Skill>) -> Employee {
        Employee {
            id: self.id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            employee_type: self.employee_type,
            employment_date: self.employment_date,
            skills,
        }
    }
}

/// Skill joined through `employee_skills`, keyed by its owner.
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeSkillRow {
    pub employee_id: Uuid,
    pub id: Uuid,
    pub name: String,
}

/// `YYYY-MM-DD` (de)serialization for calendar dates.
pub(crate) mod iso_date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{macros::format_description, Date};

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let text = date
            .format(format_description!("[year]-[month]-[day]"))
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let text = String::deserialize(deserializer)?;
        Date::parse(&text, format_description!("[year]-[month]-[day]"))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn sample() -> Employee {
        Employee {
            id: Uuid::new_v4(),
            name: "Ana".into(),
            email: "ana@corp.io".into(),
            password_hash: "$argon2id$secret".into(),
            employee_type: EmployeeType::Manager,
            employment_date: date!(2020 - 01 - 01),
            skills: vec![Skill {
                id: Uuid::new_v4(),
                name: "Rust".into(),
            }],
        }
    }

    #[test]
    fn serialization_hides_password_hash() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn serializes_type_and_date() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["type"], "MANAGER");
        assert_eq!(value["employment_date"], "2020-01-01");
        assert_eq!(value["skills"][0]["name"], "Rust");
    }

    #[test]
    fn employee_type_display_is_uppercase() {
        assert_eq!(EmployeeType::Regular.to_string(), "REGULAR");
        assert_eq!(EmployeeType::Admin.to_string(), "ADMIN");
    }
}

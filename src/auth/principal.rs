use serde::Serialize;

use crate::employees::repo_types::{Employee, EmployeeType};

/// Namespace every granted authority is prefixed with.
pub const ROLE_PREFIX: &str = "ROLE_";

pub fn role_authority(employee_type: EmployeeType) -> String {
    format!("{}{}", ROLE_PREFIX, employee_type.as_str())
}

/// Authentication view of an employee, consumed by access control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedPrincipal {
    /// The employee's email.
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Always `ROLE_<TYPE>` for the employee's type.
    pub authority: String,
}

impl From<&Employee> for AuthenticatedPrincipal {
    fn from(employee: &Employee) -> Self {
        Self {
            username: employee.email.clone(),
            password_hash: employee.password_hash.clone(),
            authority: role_authority(employee.employee_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use uuid::Uuid;

    #[test]
    fn authority_is_prefixed_uppercase_type() {
        assert_eq!(role_authority(EmployeeType::Regular), "ROLE_REGULAR");
        assert_eq!(role_authority(EmployeeType::Manager), "ROLE_MANAGER");
        assert_eq!(role_authority(EmployeeType::Admin), "ROLE_ADMIN");
    }

    #[test]
    fn principal_from_employee_uses_stored_hash() {
        let employee = Employee {
            id: Uuid::new_v4(),
            name: "Ana".into(),
            email: "ana@corp.io".into(),
            password_hash: "$argon2id$hash".into(),
            employee_type: EmployeeType::Manager,
            employment_date: date!(2021 - 03 - 15),
            skills: vec![],
        };
        let principal = AuthenticatedPrincipal::from(&employee);
        assert_eq!(principal.username, "ana@corp.io");
        assert_eq!(principal.password_hash, "$argon2id$hash");
        assert_eq!(principal.authority, "ROLE_MANAGER");

        let json = serde_json::to_string(&principal).unwrap();
        assert!(!json.contains("argon2"));
    }
}

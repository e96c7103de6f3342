//! Employee directory use cases.
//!
//! The service is stateless: every operation reads and writes through the
//! collaborators handed to [`EmployeeDirectory::new`].

use std::sync::Arc;

use time::{Date, OffsetDateTime};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::auth::password::CredentialVerifier;
use crate::auth::principal::AuthenticatedPrincipal;
use crate::employees::repo::EmployeeStore;
use crate::employees::repo_types::{Employee, EmployeeType};
use crate::error::{DirectoryError, DirectoryResult};
use crate::skills::repo::SkillLookup;

/// Full set of employee fields for create and update. Every field is written.
#[derive(Clone)]
pub struct EmployeeCommand {
    pub name: String,
    pub email: String,
    pub password: String, // raw, hashed before it reaches the store
    pub employee_type: EmployeeType,
    pub skill_ids: Vec<Uuid>,
    pub employment_date: Date,
}

pub struct EmployeeDirectory {
    employees: Arc<dyn EmployeeStore>,
    skills: Arc<dyn SkillLookup>,
    credentials: Arc<dyn CredentialVerifier>,
}

impl EmployeeDirectory {
    pub fn new(
        employees: Arc<dyn EmployeeStore>,
        skills: Arc<dyn SkillLookup>,
        credentials: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            employees,
            skills,
            credentials,
        }
    }

    pub async fn list_all(&self) -> DirectoryResult<Vec<Employee>> {
        self.employees.list_all().await
    }

    pub async fn find_by_id(&self, id: Uuid) -> DirectoryResult<Employee> {
        self.employees.find_by_id(id).await
    }

    /// Email uniqueness is left to the store, which reports
    /// [`DirectoryError::EmailTaken`].
    #[instrument(skip(self, command), fields(email = %command.email))]
    pub async fn create(&self, command: EmployeeCommand) -> DirectoryResult<Employee> {
        let password_hash = self.credentials.hash(&command.password)?;
        let skills = self.skills.resolve_skills(&command.skill_ids).await?;

        let employee = Employee {
            id: Uuid::new_v4(),
            name: command.name,
            email: command.email,
            password_hash,
            employee_type: command.employee_type,
            employment_date: command.employment_date,
            skills,
        };
        let saved = self.employees.save(&employee).await?;
        info!(employee_id = %saved.id, skills = saved.skills.len(), "employee created");
        Ok(saved)
    }

    /// Overwrites every field of an existing employee, password and skill set included.
    #[instrument(skip(self, command), fields(email = %command.email))]
    pub async fn update(&self, id: Uuid, command: EmployeeCommand) -> DirectoryResult<Employee> {
        let mut employee = self.employees.find_by_id(id).await?;

        employee.name = command.name;
        employee.email = command.email;
        employee.password_hash = self.credentials.hash(&command.password)?;
        employee.employee_type = command.employee_type;
        employee.skills = self.skills.resolve_skills(&command.skill_ids).await?;
        employee.employment_date = command.employment_date;

        let saved = self.employees.save(&employee).await?;
        info!(employee_id = %saved.id, "employee updated");
        Ok(saved)
    }

    /// Returns the removed employee as it was before deletion.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> DirectoryResult<Employee> {
        let employee = self.employees.find_by_id(id).await?;
        self.employees.delete(&employee).await?;
        info!(employee_id = %id, "employee deleted");
        Ok(employee)
    }

    /// [`filter_as_of`](Self::filter_as_of) against today's date in UTC, not
    /// the server's local time zone.
    pub async fn filter(
        &self,
        skill_id: Option<Uuid>,
        years_of_service: Option<i32>,
    ) -> DirectoryResult<Vec<Employee>> {
        let today = OffsetDateTime::now_utc().date();
        self.filter_as_of(skill_id, years_of_service, today).await
    }

    /// Filters by skill and/or tenure.
    ///
    /// An unknown `skill_id` is ignored rather than reported, so the result is
    /// the same as if no skill had been given. Tenure means hired strictly
    /// before `today - years_of_service` years; with zero years the cutoff is
    /// `today` and employees hired today are excluded. A negative value puts
    /// the cutoff in the future.
    #[instrument(skip(self))]
    pub async fn filter_as_of(
        &self,
        skill_id: Option<Uuid>,
        years_of_service: Option<i32>,
        today: Date,
    ) -> DirectoryResult<Vec<Employee>> {
        let skill = match skill_id {
            Some(id) => {
                let found = self.skills.find_skill(id).await?;
                if found.is_none() {
                    debug!(skill_id = %id, "unknown filter skill ignored");
                }
                found
            }
            None => None,
        };
        let cutoff = years_of_service.map(|years| years_before(today, years));

        match (skill, cutoff) {
            (None, None) => self.employees.list_all().await,
            (None, Some(cutoff)) => self.employees.find_hired_before(cutoff).await,
            (Some(skill), None) => self.employees.find_by_skill(&skill).await,
            (Some(skill), Some(cutoff)) => {
                self.employees
                    .find_by_skill_and_hired_before(&skill, cutoff)
                    .await
            }
        }
    }

    /// Looks up the principal for an exact (case-sensitive) email.
    #[instrument(skip(self))]
    pub async fn load_principal(&self, email: &str) -> DirectoryResult<AuthenticatedPrincipal> {
        let employee = self
            .employees
            .find_by_email(email)
            .await?
            .ok_or_else(|| DirectoryError::PrincipalNotFound(email.to_string()))?;
        Ok(AuthenticatedPrincipal::from(&employee))
    }

    /// Checks a login attempt. Unknown emails and wrong passwords both come
    /// back as [`DirectoryError::InvalidCredentials`].
    #[instrument(skip(self, password))]
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> DirectoryResult<AuthenticatedPrincipal> {
        let principal = match self.load_principal(email).await {
            Ok(p) => p,
            Err(DirectoryError::PrincipalNotFound(_)) => {
                warn!(%email, "login unknown email");
                return Err(DirectoryError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };
        if !self.credentials.verify(password, &principal.password_hash)? {
            warn!(%email, "login invalid password");
            return Err(DirectoryError::InvalidCredentials);
        }
        Ok(principal)
    }
}

/// Same month and day `years` earlier (later when negative). Feb 29 becomes
/// Feb 28 in a non-leap year; results out of range clamp to [`Date::MIN`] or
/// [`Date::MAX`].
pub fn years_before(today: Date, years: i32) -> Date {
    let clamped = if years >= 0 { Date::MIN } else { Date::MAX };
    let Some(year) = today.year().checked_sub(years) else {
        return clamped;
    };
    Date::from_calendar_date(year, today.month(), today.day())
        .or_else(|_| Date::from_calendar_date(year, today.month(), 28))
        .unwrap_or(clamped)
}

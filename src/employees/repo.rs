use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use crate::employees::repo_types::{Employee, EmployeeRow, EmployeeSkillRow};
use crate::error::{DirectoryError, DirectoryResult};
use crate::skills::repo_types::Skill;

/// Persistence of employee records and the predicate queries used by filtering.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn list_all(&self) -> DirectoryResult<Vec<Employee>>;

    /// Fails with [`DirectoryError::NotFound`] when no record has `id`.
    async fn find_by_id(&self, id: Uuid) -> DirectoryResult<Employee>;

    /// Inserts or replaces the record with `employee.id`, skill set included.
    async fn save(&self, employee: &Employee) -> DirectoryResult<Employee>;

    async fn delete(&self, employee: &Employee) -> DirectoryResult<()>;

    /// Exact match: no case folding, no trimming.
    async fn find_by_email(&self, email: &str) -> DirectoryResult<Option<Employee>>;

    /// Employees with `employment_date < cutoff`.
    async fn find_hired_before(&self, cutoff: Date) -> DirectoryResult<Vec<Employee>>;

    async fn find_by_skill(&self, skill: &Skill) -> DirectoryResult<Vec<Employee>>;

    async fn find_by_skill_and_hired_before(
        &self,
        skill: &Skill,
        cutoff: Date,
    ) -> DirectoryResult<Vec<Employee>>;
}

#[derive(Clone)]
pub struct PgEmployeeStore {
    db: PgPool,
}

impl PgEmployeeStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Loads the skill links for `rows` in one query and attaches them.
    async fn attach_skills(&self, rows: Vec<EmployeeRow>) -> DirectoryResult<Vec<Employee>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let links = sqlx::query_as::<_, EmployeeSkillRow>(
            r#"
            SELECT es.employee_id, s.id, s.name
              FROM employee_skills es
              JOIN skills s ON s.id = es.skill_id
             WHERE es.employee_id = ANY($1)
             ORDER BY s.name
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.db)
        .await?;

        let mut by_employee: HashMap<Uuid, Vec<Skill>> = HashMap::new();
        for link in links {
            by_employee.entry(link.employee_id).or_default().push(Skill {
                id: link.id,
                name: link.name,
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let skills = by_employee.remove(&row.id).unwrap_or_default();
                row.with_skills(skills)
            })
            .collect())
    }
}

#[async_trait]
impl EmployeeStore for PgEmployeeStore {
    async fn list_all(&self) -> DirectoryResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, name, email, password_hash, employee_type, employment_date
            FROM employees
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        self.attach_skills(rows).await
    }

    async fn find_by_id(&self, id: Uuid) -> DirectoryResult<Employee> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, name, email, password_hash, employee_type, employment_date
            FROM employees
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(DirectoryError::NotFound(id))?;

        let mut employees = self.attach_skills(vec![row]).await?;
        employees.pop().ok_or(DirectoryError::NotFound(id))
    }

    async fn save(&self, employee: &Employee) -> DirectoryResult<Employee> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            INSERT INTO employees (id, name, email, password_hash, employee_type, employment_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
               SET name = EXCLUDED.name,
                   email = EXCLUDED.email,
                   password_hash = EXCLUDED.password_hash,
                   employee_type = EXCLUDED.employee_type,
                   employment_date = EXCLUDED.employment_date
            RETURNING id, name, email, password_hash, employee_type, employment_date
            "#,
        )
        .bind(employee.id)
        .bind(&employee.name)
        .bind(&employee.email)
        .bind(&employee.password_hash)
        .bind(employee.employee_type)
        .bind(employee.employment_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                DirectoryError::EmailTaken(employee.email.clone())
            }
            other => DirectoryError::from(other),
        })?;

        sqlx::query(r#"DELETE FROM employee_skills WHERE employee_id = $1"#)
            .bind(employee.id)
            .execute(&mut *tx)
            .await?;

        let skill_ids: Vec<Uuid> = employee.skills.iter().map(|s| s.id).collect();
        if !skill_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO employee_skills (employee_id, skill_id)
                SELECT $1, UNNEST($2::uuid[])
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(employee.id)
            .bind(&skill_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(row.with_skills(employee.skills.clone()))
    }

    async fn delete(&self, employee: &Employee) -> DirectoryResult<()> {
        // employee_skills rows go with it (ON DELETE CASCADE)
        sqlx::query(r#"DELETE FROM employees WHERE id = $1"#)
            .bind(employee.id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> DirectoryResult<Option<Employee>> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, name, email, password_hash, employee_type, employment_date
            FROM employees
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        match row {
            Some(row) => Ok(self.attach_skills(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_hired_before(&self, cutoff: Date) -> DirectoryResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, name, email, password_hash, employee_type, employment_date
            FROM employees
            WHERE employment_date < $1
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.db)
        .await?;
        self.attach_skills(rows).await
    }

    async fn find_by_skill(&self, skill: &Skill) -> DirectoryResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT e.id, e.name, e.email, e.password_hash, e.employee_type, e.employment_date
              FROM employees e
             WHERE EXISTS (
                   SELECT 1 FROM employee_skills es
                    WHERE es.employee_id = e.id AND es.skill_id = $1)
            "#,
        )
        .bind(skill.id)
        .fetch_all(&self.db)
        .await?;
        self.attach_skills(rows).await
    }

    async fn find_by_skill_and_hired_before(
        &self,
        skill: &Skill,
        cutoff: Date,
    ) -> DirectoryResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT e.id, e.name, e.email, e.password_hash, e.employee_type, e.employment_date
              FROM employees e
             WHERE e.employment_date < $2
               AND EXISTS (
                   SELECT 1 FROM employee_skills es
                    WHERE es.employee_id = e.id AND es.skill_id = $1)
            "#,
        )
        .bind(skill.id)
        .bind(cutoff)
        .fetch_all(&self.db)
        .await?;
        self.attach_skills(rows).await
    }
}

use crate::auth::password::{Argon2Verifier, CredentialVerifier};
use crate::config::{AppConfig, BootstrapAdmin};
use crate::employees::repo::{EmployeeStore, PgEmployeeStore};
use crate::employees::repo_types::EmployeeType;
use crate::employees::services::{EmployeeCommand, EmployeeDirectory};
use crate::error::DirectoryError;
use crate::skills::repo::{PgSkillLookup, SkillLookup};
use anyhow::Context;
use sqlx::PgPool;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub directory: Arc<EmployeeDirectory>,
    pub skills: Arc<dyn SkillLookup>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let employees = Arc::new(PgEmployeeStore::new(db.clone())) as Arc<dyn EmployeeStore>;
        let skills = Arc::new(PgSkillLookup::new(db.clone())) as Arc<dyn SkillLookup>;
        let credentials = Arc::new(Argon2Verifier) as Arc<dyn CredentialVerifier>;

        Ok(Self::from_parts(db, config, employees, skills, credentials))
    }

    pub fn from_parts(
        db: PgPool,
        config: Arc<AppConfig>,
        employees: Arc<dyn EmployeeStore>,
        skills: Arc<dyn SkillLookup>,
        credentials: Arc<dyn CredentialVerifier>,
    ) -> Self {
        let directory = Arc::new(EmployeeDirectory::new(
            employees,
            skills.clone(),
            credentials,
        ));
        Self {
            db,
            config,
            directory,
            skills,
        }
    }

    /// Creates the configured administrator unless that email already exists.
    pub async fn bootstrap_admin(&self) -> anyhow::Result<()> {
        let Some(BootstrapAdmin { email, password }) = self.config.bootstrap_admin.clone() else {
            return Ok(());
        };
        match self.directory.load_principal(&email).await {
            Ok(_) => return Ok(()),
            Err(DirectoryError::PrincipalNotFound(_)) => {}
            Err(e) => return Err(e).context("look up bootstrap admin"),
        }
        let admin = self
            .directory
            .create(EmployeeCommand {
                name: "Administrator".into(),
                email,
                password,
                employee_type: EmployeeType::Admin,
                skill_ids: Vec::new(),
                employment_date: OffsetDateTime::now_utc().date(),
            })
            .await
            .context("create bootstrap admin")?;
        info!(employee_id = %admin.id, email = %admin.email, "bootstrap admin created");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fake_state;

    #[tokio::test]
    async fn bootstrap_admin_is_created_once() {
        let (state, _) = fake_state(Some(BootstrapAdmin {
            email: "root@corp.io".into(),
            password: "Sup3r-Secret".into(),
        }));
        state.bootstrap_admin().await.unwrap();
        state.bootstrap_admin().await.unwrap();

        let all = state.directory.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].employee_type, EmployeeType::Admin);

        let principal = state
            .directory
            .authenticate("root@corp.io", "Sup3r-Secret")
            .await
            .unwrap();
        assert_eq!(principal.authority, "ROLE_ADMIN");
    }

    #[tokio::test]
    async fn bootstrap_admin_is_optional() {
        let (state, _) = fake_state(None);
        state.bootstrap_admin().await.unwrap();
        assert!(state.directory.list_all().await.unwrap().is_empty());
    }
}

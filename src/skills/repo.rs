use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DirectoryResult;
use crate::skills::repo_types::Skill;

/// Resolves skill ids to skill records.
#[async_trait]
pub trait SkillLookup: Send + Sync {
    /// Returns the skills among `ids` that exist.
    ///
    /// Unknown ids are dropped without an error and duplicates collapse to a
    /// single skill, so the result may be shorter than the input. An empty
    /// input yields an empty result.
    async fn resolve_skills(&self, ids: &[Uuid]) -> DirectoryResult<Vec<Skill>>;

    /// Absence is not an error.
    async fn find_skill(&self, id: Uuid) -> DirectoryResult<Option<Skill>>;

    async fn list_skills(&self) -> DirectoryResult<Vec<Skill>>;
}

#[derive(Clone)]
pub struct PgSkillLookup {
    db: PgPool,
}

impl PgSkillLookup {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SkillLookup for PgSkillLookup {
    async fn resolve_skills(&self, ids: &[Uuid]) -> DirectoryResult<Vec<Skill>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let skills = sqlx::query_as::<_, Skill>(
            r#"
            SELECT id, name
            FROM skills
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.db)
        .await?;
        if skills.len() < ids.len() {
            debug!(
                requested = ids.len(),
                resolved = skills.len(),
                "unknown or duplicate skill ids dropped"
            );
        }
        Ok(skills)
    }

    async fn find_skill(&self, id: Uuid) -> DirectoryResult<Option<Skill>> {
        let skill = sqlx::query_as::<_, Skill>(r#"SELECT id, name FROM skills WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(skill)
    }

    async fn list_skills(&self) -> DirectoryResult<Vec<Skill>> {
        let skills = sqlx::query_as::<_, Skill>(r#"SELECT id, name FROM skills ORDER BY name"#)
            .fetch_all(&self.db)
            .await?;
        Ok(skills)
    }
}

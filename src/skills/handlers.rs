use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use super::repo_types::Skill;
use crate::{auth::extractors::AuthUser, error::DirectoryError, state::AppState};

pub fn skill_routes() -> Router<AppState> {
    Router::new().route("/skills", get(list_skills))
}

#[instrument(skip(state, _user))]
pub async fn list_skills(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<Skill>>, DirectoryError> {
    Ok(Json(state.skills.list_skills().await?))
}

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use tracing::{error, warn};

use super::jwt::JwtKeys;
use super::principal::{role_authority, ROLE_PREFIX};
use crate::employees::repo_types::EmployeeType;
use crate::error::DirectoryError;
use crate::state::AppState;

/// Caller identity taken from a valid bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub email: String,
    pub authority: String,
}

impl AuthUser {
    pub fn require(&self, authority: &str) -> Result<(), (StatusCode, String)> {
        if self.authority == authority {
            Ok(())
        } else {
            warn!(email = %self.email, have = %self.authority, need = %authority, "forbidden");
            Err((StatusCode::FORBIDDEN, "Insufficient role".to_string()))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "Missing Authorization header".to_string(),
            ))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header".to_string(),
            ))?;

        let claims = match keys.verify(token) {
            Ok(c) => c,
            Err(_) => {
                warn!("invalid or expired token");
                return Err((
                    StatusCode::UNAUTHORIZED,
                    "Invalid or expired token".to_string(),
                ));
            }
        };

        if !claims.role.starts_with(ROLE_PREFIX) {
            return Err((StatusCode::UNAUTHORIZED, "Malformed role claim".to_string()));
        }

        Ok(AuthUser {
            email: claims.sub,
            authority: claims.role,
        })
    }
}

/// Employee currently stored as `ROLE_ADMIN`.
///
/// The token only identifies the caller: the role is re-read from the store,
/// so a demoted admin gets 403 and a deleted one 401 before the token expires.
pub struct AdminUser(pub AuthUser);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let caller = AuthUser::from_request_parts(parts, state).await?;

        let principal = match state.directory.load_principal(&caller.email).await {
            Ok(p) => p,
            Err(DirectoryError::PrincipalNotFound(_)) => {
                warn!(email = %caller.email, "token for a removed employee");
                return Err((
                    StatusCode::UNAUTHORIZED,
                    "Employee no longer exists".to_string(),
                ));
            }
            Err(e) => {
                error!(error = %e, "load_principal failed");
                return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
            }
        };

        let user = AuthUser {
            email: principal.username,
            authority: principal.authority,
        };
        user.require(&role_authority(EmployeeType::Admin))?;
        Ok(AdminUser(user))
    }
}

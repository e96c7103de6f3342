use serde::{Deserialize, Serialize};

use crate::auth::principal::AuthenticatedPrincipal;

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub principal: AuthenticatedPrincipal,
}

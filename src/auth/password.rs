use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::error::{DirectoryError, DirectoryResult};

/// Hashes passwords for storage and checks login attempts against stored hashes.
pub trait CredentialVerifier: Send + Sync {
    fn hash(&self, raw: &str) -> DirectoryResult<String>;
    fn verify(&self, raw: &str, hash: &str) -> DirectoryResult<bool>;
}

/// Argon2id with default parameters and a random salt per hash.
#[derive(Clone, Default)]
pub struct Argon2Verifier;

impl CredentialVerifier for Argon2Verifier {
    fn hash(&self, raw: &str) -> DirectoryResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(raw.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                DirectoryError::Credential(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    fn verify(&self, raw: &str, hash: &str) -> DirectoryResult<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            DirectoryError::Credential(e.to_string())
        })?;
        Ok(Argon2::default()
            .verify_password(raw.as_bytes(), &parsed)
            .is_ok())
    }
}

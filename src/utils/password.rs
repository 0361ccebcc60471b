use argon2::{
    Argon2,
    password_hash::{PasswordHasher, PasswordVerifier, phc::PasswordHash},
};

use crate::error::AppResult;

/// Hash a password using Argon2id.
///
/// The default parameter set is a deliberate constant: every hash in the
/// system carries the same work factor, and the salt is generated per
/// call.
///
/// # Returns
/// * `AppResult<String>` - The PHC-format hash string or an error
pub fn hash_password(password: &str) -> AppResult<String> {
    let argon2 = Argon2::default();

    let password_hash = argon2.hash_password(password.as_bytes())?.to_string();

    Ok(password_hash)
}

/// Verify a password against a stored hash.
///
/// # Returns
/// * `AppResult<bool>` - True if the password matches, false otherwise
pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)?;
    let argon2 = Argon2::default();

    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_produces_phc_string() {
        let hash = hash_password("correct horse battery").expect("Failed to hash password");

        assert!(!hash.is_empty());
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn matching_password_verifies() {
        let hash = hash_password("correct horse battery").expect("Failed to hash password");

        assert!(verify_password("correct horse battery", &hash).unwrap());
    }

    #[test]
    fn wrong_password_fails_verification() {
        let hash = hash_password("correct horse battery").expect("Failed to hash password");

        assert!(!verify_password("incorrect horse battery", &hash).unwrap());
    }

    #[test]
    fn salts_differ_between_hashes() {
        let hash1 = hash_password("same password").unwrap();
        let hash2 = hash_password("same password").unwrap();

        assert_ne!(hash1, hash2);
        assert!(verify_password("same password", &hash1).unwrap());
        assert!(verify_password("same password", &hash2).unwrap());
    }
}

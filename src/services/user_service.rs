//! User service for signup, login, and user listing.

use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, User};
use crate::repositories::UserRepository;
use crate::utils::{jwt, password};

/// Input for creating an account. The password arrives in plain text and
/// is hashed here; the image reference points at an already-stored upload.
#[derive(Debug, Clone)]
pub struct SignupData {
    pub name: String,
    pub email: String,
    pub password: String,
    pub image: String,
}

/// The outcome of a successful signup or login: a proven identity plus a
/// token for subsequent requests.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}

/// User service for handling user-related business logic.
#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
}

/// Lower-cases and trims an email address so lookups and the unique index
/// compare apples to apples.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl UserService {
    /// Creates a new UserService with the given repository.
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    /// Registers a new user and issues their first access token.
    ///
    /// The duplicate check here gives a friendly failure for the common
    /// case; two signups racing on the same address are decided by the
    /// unique index at insert time, which surfaces as the same
    /// `Duplicate` error.
    pub async fn sign_up(&self, data: SignupData, jwt_config: &JwtConfig) -> AppResult<AuthSession> {
        let email = normalize_email(&data.email);

        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::Duplicate {
                entity: "users".to_string(),
                field: "email".to_string(),
                value: email,
            });
        }

        let password_hash = password::hash_password(&data.password)?;

        let user = self
            .repo
            .create(NewUser {
                name: data.name,
                email,
                password: password_hash,
                image: data.image,
            })
            .await?;

        Self::session_for(&user, jwt_config)
    }

    /// Authenticates a user by email and password.
    ///
    /// An unknown email and a wrong password fail identically, so callers
    /// cannot probe which addresses are registered.
    pub async fn authenticate(
        &self,
        email: &str,
        plain_password: &str,
        jwt_config: &JwtConfig,
    ) -> AppResult<AuthSession> {
        let email = normalize_email(email);

        let user = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or_else(invalid_credentials)?;

        if !password::verify_password(plain_password, &user.password)? {
            return Err(invalid_credentials());
        }

        Self::session_for(&user, jwt_config)
    }

    /// Gets a user by their ID.
    pub async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound {
            entity: "user".to_string(),
            field: "id".to_string(),
            value: id.to_string(),
        })
    }

    /// Lists all users.
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repo.list_all().await
    }

    fn session_for(user: &User, jwt_config: &JwtConfig) -> AppResult<AuthSession> {
        let token = jwt::generate_access_token(
            user.id,
            user.email.clone(),
            &jwt_config.secret,
            jwt_config.access_token_expiration,
        )?;

        Ok(AuthSession {
            user_id: user.id,
            email: user.email.clone(),
            token,
        })
    }
}

fn invalid_credentials() -> AppError {
    AppError::Forbidden {
        message: "Invalid email or password.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_case_and_whitespace_normalized() {
        assert_eq!(normalize_email("  Max@Test.COM "), "max@test.com");
        assert_eq!(normalize_email("max@test.com"), "max@test.com");
    }

    #[test]
    fn invalid_credentials_is_an_authorization_failure() {
        match invalid_credentials() {
            AppError::Forbidden { message } => {
                assert_eq!(message, "Invalid email or password.");
            }
            other => panic!("Expected Forbidden, got {:?}", other),
        }
    }
}

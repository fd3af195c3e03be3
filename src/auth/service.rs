use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::password::{PasswordHasher, MAX_PASSWORD_BYTES};
use crate::auth::token::TokenService;
use crate::db::models::User;
use crate::db::store::UserStore;
use crate::error::{AppError, AuthError, DatabaseError};

pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
}

/// Emails are compared trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn required<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str, AppError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::ValidationError(format!("{} is required", field))),
    }
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<TokenService>, hasher: PasswordHasher) -> Self {
        Self { users, tokens, hasher }
    }

    /// Creates a user. Fails with `DatabaseError::Duplicate` if the email exists.
    pub async fn register(
        &self,
        fullname: &Option<String>,
        email: &Option<String>,
        password: &Option<String>,
    ) -> Result<User, AppError> {
        let fullname = required("fullname", fullname)?.to_string();
        let email = normalize_email(required("email", email)?);
        // passwords are taken as typed, only presence is checked
        let password = match password.as_deref() {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => return Err(AppError::ValidationError("password is required".into())),
        };
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AppError::ValidationError(format!(
                "password must be at most {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }

        if self.users.find_user_by_email(&email).await?.is_some() {
            warn!("Registration rejected, email already in use: {}", email);
            return Err(DatabaseError::Duplicate.into());
        }

        let hasher = self.hasher;
        let digest = tokio::task::spawn_blocking(move || hasher.hash(&password)).await??;

        let user = self.users.insert_user(&User::new(fullname, email, digest)).await?;
        info!("Registered user {}", user.id);
        Ok(user)
    }

    /// Checks credentials and returns the user with a fresh session token.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<(User, String), AppError> {
        let email = normalize_email(email);
        let user = self
            .users
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let hasher = self.hasher;
        let plaintext = password.to_string();
        let digest = user.password.clone();
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &digest)).await??;
        if !matches {
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self.tokens.issue(user.id)?;
        Ok((user, token))
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.users.list_users().await
    }
}

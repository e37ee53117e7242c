use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    TransactionTrait,
};
use tracing::{debug, info, warn};

use crate::auth::{generate_token_key, token_digest, Principal};
use crate::database::entities::{auth_tokens, users};
use crate::errors::{AuthError, AuthResult};

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// A user together with the token key just issued to them
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub key: String,
    pub user: users::Model,
}

/// Accounts and token issuance
#[derive(Clone)]
pub struct AuthService {
    db: DatabaseConnection,
}

impl AuthService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validate input, create the account and issue its first token
    pub async fn register(&self, input: RegisterInput) -> AuthResult<IssuedToken> {
        let username = input.username.trim().to_string();
        let email = input.email.trim().to_string();
        Self::validate_username(&username)?;
        Self::validate_email(&email)?;
        let password_hash = Self::hash_password(&input.password)?;

        let txn = self.db.begin().await?;

        if find_by_username(&txn, &username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }
        if find_by_email(&txn, &email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let display_name = input.name.trim().to_string();
        let user = users::ActiveModel::new(username, email, display_name, password_hash)
            .insert(&txn)
            .await?;
        let key = issue_token(&txn, user.id).await?;

        txn.commit().await?;

        info!("Registered user {} (id {})", user.username, user.id);
        Ok(IssuedToken { key, user })
    }

    /// Verify credentials and rotate the user's token
    pub async fn login(&self, username: &str, password: &str) -> AuthResult<IssuedToken> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "Username and password are required".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        let user = match find_by_username(&txn, username.trim()).await? {
            Some(user) => user,
            None => {
                warn!("Login failed: unknown user {}", username);
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !Self::verify_password(password, &user.password_hash)? {
            warn!("Login failed: bad password for {}", user.username);
            return Err(AuthError::InvalidCredentials);
        }

        let key = issue_token(&txn, user.id).await?;
        txn.commit().await?;

        info!("User {} logged in", user.username);
        Ok(IssuedToken { key, user })
    }

    /// Revoke the principal's token
    pub async fn logout(&self, principal: &Principal) -> AuthResult<()> {
        auth_tokens::Entity::delete_many()
            .filter(auth_tokens::Column::UserId.eq(principal.user_id))
            .exec(&self.db)
            .await?;
        info!("User {} logged out", principal.username);
        Ok(())
    }

    /// Resolve a presented token key to its owner
    pub async fn authenticate(&self, key: &str) -> AuthResult<Principal> {
        let token = auth_tokens::Entity::find()
            .filter(auth_tokens::Column::KeyDigest.eq(token_digest(key)))
            .one(&self.db)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        let user = users::Entity::find_by_id(token.user_id)
            .one(&self.db)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        debug!("Authenticated {}", user.username);
        Ok(Principal::new(user.id, user.username))
    }

    pub async fn profile(&self, principal: &Principal) -> AuthResult<users::Model> {
        users::Entity::find_by_id(principal.user_id)
            .one(&self.db)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn update_profile(
        &self,
        principal: &Principal,
        update: ProfileUpdate,
    ) -> AuthResult<users::Model> {
        let txn = self.db.begin().await?;

        let user = users::Entity::find_by_id(principal.user_id)
            .one(&txn)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let mut active: users::ActiveModel = user.clone().into();

        if let Some(email) = update.email.map(|e| e.trim().to_string()) {
            if email != user.email {
                Self::validate_email(&email)?;
                if find_by_email(&txn, &email).await?.is_some() {
                    return Err(AuthError::EmailTaken);
                }
                active.email = Set(email);
            }
        }

        if let Some(name) = update.name {
            let name = name.trim().to_string();
            if name.chars().count() > 100 {
                return Err(AuthError::Validation(
                    "Display name is too long (max 100 characters)".to_string(),
                ));
            }
            active.display_name = Set(name);
        }

        active.updated_at = Set(Utc::now());
        let user = active.update(&txn).await?;
        txn.commit().await?;

        info!("Updated profile for {}", user.username);
        Ok(user)
    }

    /// Hash a password using bcrypt
    pub fn hash_password(password: &str) -> AuthResult<String> {
        if password.len() < 8 {
            return Err(AuthError::Validation(
                "Password must be at least 8 characters long".to_string(),
            ));
        }

        Ok(hash(password, DEFAULT_COST)?)
    }

    /// Verify a password against a hash
    pub fn verify_password(password: &str, hash: &str) -> AuthResult<bool> {
        Ok(verify(password, hash)?)
    }

    /// Validate email format
    pub fn validate_email(email: &str) -> AuthResult<()> {
        let invalid = |reason: &str| -> AuthResult<()> {
            Err(AuthError::Validation(format!("Invalid email format: {}", reason)))
        };

        if email.is_empty() {
            return Err(AuthError::Validation("Email cannot be empty".to_string()));
        }

        if email.len() > 254 {
            return Err(AuthError::Validation("Email is too long".to_string()));
        }

        let (local_part, domain_part) = match email.split_once('@') {
            Some(parts) if !parts.1.contains('@') => parts,
            _ => return invalid("must contain exactly one @"),
        };

        if local_part.is_empty() {
            return invalid("local part cannot be empty");
        }

        if !domain_part.contains('.') {
            return invalid("domain must contain a dot");
        }

        if domain_part.starts_with('.') || domain_part.ends_with('.') {
            return invalid("domain cannot start or end with a dot");
        }

        Ok(())
    }

    /// Validate username format
    pub fn validate_username(username: &str) -> AuthResult<()> {
        if username.len() < 3 {
            return Err(AuthError::Validation(
                "Username must be at least 3 characters long".to_string(),
            ));
        }

        if username.len() > 50 {
            return Err(AuthError::Validation(
                "Username is too long (max 50 characters)".to_string(),
            ));
        }

        if !username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            return Err(AuthError::Validation(
                "Username can only contain letters, numbers, underscores, and hyphens".to_string(),
            ));
        }

        Ok(())
    }
}

async fn find_by_username<C: ConnectionTrait>(
    db: &C,
    username: &str,
) -> AuthResult<Option<users::Model>> {
    Ok(users::Entity::find()
        .filter(users::Column::Username.eq(username))
        .one(db)
        .await?)
}

async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> AuthResult<Option<users::Model>> {
    Ok(users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await?)
}

/// Replace any existing token for the user with a fresh one; returns the key
async fn issue_token<C: ConnectionTrait>(db: &C, user_id: i32) -> AuthResult<String> {
    auth_tokens::Entity::delete_many()
        .filter(auth_tokens::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    let key = generate_token_key();
    auth_tokens::ActiveModel {
        key_digest: Set(token_digest(&key)),
        user_id: Set(user_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(key)
}

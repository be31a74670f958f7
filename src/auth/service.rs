use crate::config::AuthConfig;
use crate::error::{AppError, AuthError};
use crate::store::{Account, AccountStore};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, decode, Header, EncodingKey, DecodingKey, Validation, Algorithm};
use jsonwebtoken::errors::ErrorKind;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,      // Account ID
    pub username: String,
    pub iat: i64,         // Issued at
    pub exp: i64,         // Expiration time
}

pub struct AuthService {
    accounts: Arc<dyn AccountStore>,
    jwt_secret: String,
    token_expiry_hours: i64,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(accounts: Arc<dyn AccountStore>, config: &AuthConfig) -> Self {
        Self {
            accounts,
            jwt_secret: config.jwt_secret.clone(),
            token_expiry_hours: config.token_expiry_hours,
            bcrypt_cost: config.bcrypt_cost,
        }
    }

    /// Creates an account with a bcrypt-hashed password. The plaintext only
    /// lives on the hashing thread and is never stored or logged.
    pub async fn register(&self, username: &str, password: &str) -> Result<Account, AppError> {
        if username.is_empty() || password.is_empty() {
            return Err(AppError::ValidationError(
                "Username and password are required".into(),
            ));
        }

        let password_hash = self.hash_password(password.to_string()).await?;
        let account = self.accounts.insert(username, &password_hash).await?;

        info!("Registered account {} (id {})", account.username, account.id);
        Ok(account)
    }

    /// Verifies credentials and issues a token. Unknown usernames and wrong
    /// passwords are indistinguishable to the caller.
    pub async fn login(&self, username: &str, password: &str) -> Result<(String, Account), AppError> {
        if username.is_empty() || password.is_empty() {
            return Err(AppError::ValidationError(
                "Username and password are required".into(),
            ));
        }

        let account = match self.accounts.find_by_username(username).await {
            Some(account) => account,
            None => {
                warn!("Login attempt for unknown username");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        let matched = self
            .verify_password(password.to_string(), account.password_hash.clone())
            .await?;
        if !matched {
            warn!("Failed login attempt for {}", account.username);
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self.issue_token(&account)?;
        info!("Login successful for {}", account.username);

        Ok((token, account))
    }

    pub fn issue_token(&self, account: &Account) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = (now + Duration::hours(self.token_expiry_hours)).timestamp();
        let claims = Claims {
            sub: account.id.to_string(),
            username: account.username.clone(),
            iat: now.timestamp(),
            exp,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::InternalError(e.to_string()))
    }

    /// Validates signature and expiry; the claims themselves are the
    /// identity, the account store is not consulted again.
    pub fn decode_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })
    }

    async fn hash_password(&self, password: String) -> Result<String, AppError> {
        let cost = self.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| {
                error!("Hashing task failed: {}", e);
                AuthError::HashingFailed
            })?;

        hashed.map_err(|e| {
            error!("bcrypt hash failed: {}", e);
            AuthError::HashingFailed.into()
        })
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AppError> {
        let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| {
                error!("Hashing task failed: {}", e);
                AuthError::HashingFailed
            })?;

        verified.map_err(|e| {
            error!("bcrypt verify failed: {}", e);
            AuthError::HashingFailed.into()
        })
    }
}

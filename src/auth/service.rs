//! Registration, login and account lookup

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::jwt::{self, JwtError};
use crate::error::ApiError;
use crate::models::auth::{AuthTokenResponse, LoginRequest, RegisterRequest};
use crate::models::{User, UserRole};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("an account with this email already exists")]
    EmailTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("user not found")]
    UserNotFound,
    #[error("validation failed")]
    Validation(#[from] validator::ValidationErrors),
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("token error: {0}")]
    Token(#[from] JwtError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailTaken => ApiError::Conflict(err.to_string()),
            AuthError::InvalidCredentials => ApiError::Unauthenticated(err.to_string()),
            AuthError::UserNotFound => ApiError::NotFound(err.to_string()),
            AuthError::Validation(errors) => errors.into(),
            AuthError::Hash(e) => ApiError::Internal(e.to_string()),
            AuthError::Token(e) => ApiError::Internal(e.to_string()),
            AuthError::Database(e) => ApiError::Database(e.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    jwt_secret: String,
    token_ttl_seconds: i64,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt_secret: String, token_ttl_seconds: i64) -> Self {
        Self {
            pool,
            jwt_secret,
            token_ttl_seconds,
        }
    }

    /// Secret used to verify tokens minted by this service.
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// Create a farmer account and sign the new user in.
    ///
    /// Every self-registered account gets the farmer role; administrator
    /// accounts are provisioned directly in the database.
    pub async fn register(&self, input: RegisterRequest) -> Result<AuthTokenResponse, AuthError> {
        input.validate()?;

        let email = input.email.trim().to_lowercase();
        let password_hash = bcrypt::hash(&input.password, bcrypt::DEFAULT_COST)?;

        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, farm_name, phone)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.name.trim())
        .bind(&email)
        .bind(&password_hash)
        .bind(UserRole::Farmer)
        .bind(input.farm_name)
        .bind(input.phone)
        .fetch_one(&self.pool)
        .await;

        let user = match result {
            Ok(user) => user,
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                return Err(AuthError::EmailTaken);
            }
            Err(e) => return Err(AuthError::Database(e)),
        };

        tracing::info!(user_id = %user.id, "New farmer account registered");
        self.issue_token(user)
    }

    /// Verify credentials and mint an access token.
    ///
    /// Unknown email and wrong password produce the same error so callers
    /// cannot enumerate which addresses have accounts.
    pub async fn login(&self, input: LoginRequest) -> Result<AuthTokenResponse, AuthError> {
        input.validate()?;

        let email = input.email.trim().to_lowercase();

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !bcrypt::verify(&input.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "User logged in");
        self.issue_token(user)
    }

    /// Look up an account by id, for the current-user endpoint.
    pub async fn get_user(&self, user_id: Uuid) -> Result<User, AuthError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    fn issue_token(&self, user: User) -> Result<AuthTokenResponse, AuthError> {
        let access_token =
            jwt::generate_token(user.id, user.role, &self.jwt_secret, self.token_ttl_seconds)?;

        Ok(AuthTokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.token_ttl_seconds,
            user: user.into(),
        })
    }
}

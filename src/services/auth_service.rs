use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use password_hash::rand_core::OsRng;

use crate::{
    dto::auth::{Claims, LoginRequest, LoginResponse},
    error::{AppError, AppResult},
    models::{User, UserCredentials},
    response::ApiResponse,
    services::user_service::{self, USER_COLUMNS},
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

fn hash_with_argon2(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(password_hash)
}

fn verify_with_argon2(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

// Verified against when the email is unknown so both login failures cost one argon2 run.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_with_argon2("no-such-user").ok());

/// Run argon2 work on the blocking pool, off the async workers.
async fn run_blocking<T, F>(work: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password task failed: {e}")))?
}

pub async fn hash_password(password: String) -> AppResult<String> {
    run_blocking(move || hash_with_argon2(&password)).await
}

pub async fn verify_password(password: String, password_hash: String) -> AppResult<bool> {
    run_blocking(move || verify_with_argon2(&password, &password_hash)).await
}

pub fn issue_token(
    secret: &str,
    ttl: Duration,
    user_id: i64,
    email: &str,
) -> AppResult<(String, DateTime<Utc>)> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(ttl)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        iat: now.timestamp() as usize,
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    Ok((token, expiration))
}

pub fn decode_token(secret: &str, token: &str) -> AppResult<Claims> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let (email, password) = payload.into_credentials()?;

    let credentials: Option<UserCredentials> =
        sqlx::query_as("SELECT id, password_hash FROM users WHERE email = $1")
            .bind(email.as_str())
            .fetch_optional(&state.pool)
            .await?;

    let credentials = match credentials {
        Some(c) => c,
        None => {
            run_blocking(move || match DUMMY_HASH.as_deref() {
                Some(dummy) => verify_with_argon2(&password, dummy),
                None => Ok(false),
            })
            .await?;
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }
    };

    if !verify_password(password, credentials.password_hash).await? {
        tracing::info!(user_id = credentials.id, "login rejected");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let user: User = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(credentials.id)
        .fetch_one(&state.pool)
        .await?;

    let ttl = Duration::hours(state.config.token_ttl_hours);
    let (token, expires_at) = issue_token(&state.config.jwt_secret, ttl, user.id, &user.email)?;

    tracing::info!(user_id = user.id, "user logged in");

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token,
            token_type: "Bearer".into(),
            expires_at,
            user,
        },
    ))
}

/// Profile of the caller identified by the bearer token.
pub async fn current_user(state: &AppState, user_id: i64) -> AppResult<ApiResponse<User>> {
    let user = user_service::find_user(&state.pool, user_id).await?;
    Ok(ApiResponse::success("Current user", user))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[tokio::test]
    async fn password_hash_is_salted_and_verifiable() {
        let first = hash_password("hunter2".into()).await.unwrap();
        let second = hash_password("hunter2".into()).await.unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2"));
        assert!(verify_password("hunter2".into(), first.clone()).await.unwrap());
        assert!(!verify_password("hunter3".into(), first).await.unwrap());
    }

    #[tokio::test]
    async fn malformed_hash_is_an_internal_error() {
        assert!(matches!(
            verify_password("pw".into(), "plaintext".into()).await,
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn dummy_hash_never_matches_a_login_attempt() {
        let dummy = DUMMY_HASH.as_deref().expect("dummy hash");
        assert!(dummy.starts_with("$argon2"));
        assert!(!verify_with_argon2("", dummy).unwrap());
        assert!(!verify_with_argon2("admin123", dummy).unwrap());
    }

    #[test]
    fn issued_token_carries_identity() {
        let (token, expires_at) =
            issue_token(SECRET, Duration::hours(1), 42, "ana@example.com").unwrap();
        let claims = decode_token(SECRET, &token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "ana@example.com");
        assert_eq!(claims.exp, expires_at.timestamp() as usize);
    }

    #[test]
    fn expired_token_is_rejected() {
        let (token, _) =
            issue_token(SECRET, Duration::hours(-1), 1, "old@example.com").unwrap();
        assert!(matches!(
            decode_token(SECRET, &token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let (token, _) = issue_token("other", Duration::hours(1), 1, "x@example.com").unwrap();
        assert!(decode_token(SECRET, &token).is_err());
        assert!(decode_token(SECRET, "not-a-jwt").is_err());
    }
}

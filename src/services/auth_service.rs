use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::User;
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub email: String,
    pub exp: i64,
    pub iat: i64,
    pub token_type: String,
}

pub struct AuthService {
    config: Config,
}

impl AuthService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn generate_access_token(&self, user: &User) -> AppResult<String> {
        self.generate_token(user, "access", self.config.jwt_access_expiry)
    }

    pub fn generate_refresh_token(&self, user: &User) -> AppResult<String> {
        self.generate_token(user, "refresh", self.config.jwt_refresh_expiry)
    }

    // Роль в токен не кладём: право доступа каждый раз решается по профилю.
    fn generate_token(&self, user: &User, token_type: &str, expiry: i64) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(expiry);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            token_type: token_type.to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(AppError::from)
    }

    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    pub fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Ошибка хеширования пароля: {}", e)))
    }

    pub fn verify_password(hash: &str, password: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    pub async fn get_user_by_id(pool: &PgPool, user_id: Uuid) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Пользователь не найден".to_string()))
    }

    pub async fn get_user_by_email(pool: &PgPool, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    pub async fn update_last_login(pool: &PgPool, user_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    pub async fn save_refresh_token(
        pool: &PgPool,
        user_id: Uuid,
        token_hash: &str,
        expires_at: chrono::DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn refresh_token_exists(pool: &PgPool, token_hash: &str) -> AppResult<bool> {
        let exists: Option<(i32,)> = sqlx::query_as(
            "SELECT 1 FROM refresh_tokens WHERE token_hash = $1 AND expires_at > NOW()",
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;

        Ok(exists.is_some())
    }

    pub async fn delete_refresh_token(pool: &PgPool, token_hash: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM refresh_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .execute(pool)
            .await?;

        Ok(())
    }

    pub fn hash_token(token: &str) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        format!("{:x}", hasher.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    fn test_config() -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: String::new(),
            jwt_secret: "test-secret".to_string(),
            jwt_access_expiry: 900,
            jwt_refresh_expiry: 3600,
            admin_emails: vec![],
        }
    }

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            password_hash: String::new(),
            role: UserRole::Admin,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let service = AuthService::new(test_config());
        let user = test_user();

        let token = service.generate_access_token(&user).unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.token_type, "access");
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let service = AuthService::new(test_config());
        let user = test_user();
        let token = service.generate_access_token(&user).unwrap();

        let mut other = test_config();
        other.jwt_secret = "other-secret".to_string();
        assert!(AuthService::new(other).verify_token(&token).is_err());
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = AuthService::hash_password("admin123").unwrap();
        assert!(AuthService::verify_password(&hash, "admin123"));
        assert!(!AuthService::verify_password(&hash, "wrong"));
        assert!(!AuthService::verify_password("not-a-hash", "admin123"));
    }

    #[test]
    fn test_hash_token_is_stable() {
        assert_eq!(AuthService::hash_token("abc"), AuthService::hash_token("abc"));
        assert_ne!(AuthService::hash_token("abc"), AuthService::hash_token("abd"));
    }
}

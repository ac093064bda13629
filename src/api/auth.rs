use axum::{extract::State, routing::post, Json, Router};
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::AppState;
use crate::models::{AuthResponse, LoginRequest, RefreshTokenRequest, TokenResponse, UserPublic};
use crate::services::AuthService;
use crate::utils::validators::validate_email;

/// Успешный ответ на выход
#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout))
}

// Удалённый владелец живого refresh-токена — это недействительный токен,
// а не отсутствующий ресурс
fn refresh_lookup_error(err: AppError) -> AppError {
    match err {
        AppError::NotFound(_) => AppError::Unauthorized,
        other => other,
    }
}

/// Вход по email и паролю
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Успешный вход", body = AuthResponse),
        (status = 401, description = "Неверные учётные данные"),
        (status = 422, description = "Неверный формат email")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = payload.email.trim();

    if !validate_email(email) {
        return Err(AppError::Validation("Неверный формат email".to_string()));
    }

    // Единый ответ для неизвестного email и неверного пароля
    let user = AuthService::get_user_by_email(&state.pool, email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !AuthService::verify_password(&user.password_hash, &payload.password) {
        return Err(AppError::Unauthorized);
    }

    AuthService::update_last_login(&state.pool, user.id).await?;

    let auth_service = AuthService::new(state.config.clone());
    let access_token = auth_service.generate_access_token(&user)?;
    let refresh_token = auth_service.generate_refresh_token(&user)?;

    let token_hash = AuthService::hash_token(&refresh_token);
    let expires_at = Utc::now() + Duration::seconds(state.config.jwt_refresh_expiry);
    AuthService::save_refresh_token(&state.pool, user.id, &token_hash, expires_at).await?;

    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: UserPublic::from(user),
    }))
}

/// Обновление пары токенов
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "auth",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Токены обновлены", body = TokenResponse),
        (status = 401, description = "Недействительный токен")
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let auth_service = AuthService::new(state.config.clone());

    let claims = auth_service.verify_token(&payload.refresh_token)?;

    if claims.token_type != "refresh" {
        return Err(AppError::Unauthorized);
    }

    let user_id = uuid::Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)?;

    let token_hash = AuthService::hash_token(&payload.refresh_token);
    if !AuthService::refresh_token_exists(&state.pool, &token_hash).await? {
        return Err(AppError::Unauthorized);
    }

    let user = AuthService::get_user_by_id(&state.pool, user_id)
        .await
        .map_err(refresh_lookup_error)?;

    // Старый refresh-токен одноразовый
    AuthService::delete_refresh_token(&state.pool, &token_hash).await?;

    let new_access_token = auth_service.generate_access_token(&user)?;
    let new_refresh_token = auth_service.generate_refresh_token(&user)?;

    let new_token_hash = AuthService::hash_token(&new_refresh_token);
    let expires_at = Utc::now() + Duration::seconds(state.config.jwt_refresh_expiry);
    AuthService::save_refresh_token(&state.pool, user.id, &new_token_hash, expires_at).await?;

    Ok(Json(TokenResponse {
        access_token: new_access_token,
        refresh_token: new_refresh_token,
    }))
}

/// Выход из системы
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "auth",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Успешный выход", body = LogoutResponse)
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> AppResult<Json<Value>> {
    let token_hash = AuthService::hash_token(&payload.refresh_token);
    AuthService::delete_refresh_token(&state.pool, &token_hash).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Выход выполнен"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_user_reads_as_invalid_token() {
        let mapped = refresh_lookup_error(AppError::NotFound("Пользователь не найден".to_string()));
        assert!(matches!(mapped, AppError::Unauthorized));
    }

    #[test]
    fn test_other_lookup_errors_pass_through() {
        let mapped = refresh_lookup_error(AppError::Database(sqlx::Error::PoolClosed));
        assert!(matches!(mapped, AppError::Database(_)));
    }
}

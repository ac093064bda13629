use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::models::UserRole;
use crate::services::AuthService;
use crate::store::{ChangeFeed, ToastRelay};

/// Аутентифицированный пользователь (валидный access-токен).
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

/// Пользователь, прошедший проверку прав админки.
#[derive(Clone, Debug)]
pub struct AdminUser {
    pub user_id: Uuid,
    pub email: String,
}

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub feed: ChangeFeed,
    pub toasts: ToastRelay,
}

pub fn email_in_allow_list(allow_list: &[String], email: &str) -> bool {
    let email = email.trim().to_lowercase();
    !email.is_empty() && allow_list.iter().any(|allowed| *allowed == email)
}

/// Доступ по профилю даёт только роль admin; отсутствие профиля — отказ.
pub fn role_grants_admin(role: Option<&UserRole>) -> bool {
    matches!(role, Some(UserRole::Admin))
}

// Middleware для добавления AppState в extensions
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(state);
    next.run(request).await
}

// Экстрактор для авторизованного пользователя
#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        // Получаем AppState из extensions
        let app_state = parts.extensions.get::<AppState>().cloned().ok_or_else(|| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        })?;

        // Извлекаем токен из заголовка
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"error": "Missing authorization header"})),
                )
                    .into_response()
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Invalid authorization header format"})),
            )
                .into_response()
        })?;

        // Проверяем токен
        let auth_service = AuthService::new(app_state.config);
        let claims = auth_service.verify_token(token).map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Invalid or expired token"})),
            )
                .into_response()
        })?;

        // Проверяем тип токена
        if claims.token_type != "access" {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Invalid token type"})),
            )
                .into_response());
        }

        // Парсим user_id
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Invalid user ID in token"})),
            )
                .into_response()
        })?;

        Ok(AuthUser {
            user_id,
            email: claims.email,
        })
    }
}

// Экстрактор-гейт админки: нет личности — 401; email в allow-list — доступ
// без чтения профиля; иначе решает роль в профиле. Любой сбой чтения
// профиля трактуется как отказ.
#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;

        let app_state = parts.extensions.get::<AppState>().cloned().ok_or_else(|| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        })?;

        if email_in_allow_list(&app_state.config.admin_emails, &auth_user.email) {
            return Ok(AdminUser {
                user_id: auth_user.user_id,
                email: auth_user.email,
            });
        }

        let role = sqlx::query_as::<_, (UserRole,)>("SELECT role FROM users WHERE id = $1")
            .bind(auth_user.user_id)
            .fetch_optional(&app_state.pool)
            .await
            .ok()
            .flatten()
            .map(|(role,)| role);

        if role_grants_admin(role.as_ref()) {
            Ok(AdminUser {
                user_id: auth_user.user_id,
                email: auth_user.email,
            })
        } else {
            Err((
                StatusCode::FORBIDDEN,
                Json(json!({
                    "success": false,
                    "error": {"code": "FORBIDDEN", "message": "Доступ запрещён"}
                })),
            )
                .into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow_list() -> Vec<String> {
        vec!["root@example.com".to_string(), "ops@example.com".to_string()]
    }

    #[test]
    fn test_allow_list_membership() {
        assert!(email_in_allow_list(&allow_list(), "root@example.com"));
        assert!(email_in_allow_list(&allow_list(), "Root@Example.COM"));
        assert!(email_in_allow_list(&allow_list(), " ops@example.com "));
        assert!(!email_in_allow_list(&allow_list(), "user@example.com"));
        assert!(!email_in_allow_list(&allow_list(), ""));
        assert!(!email_in_allow_list(&[], "root@example.com"));
    }

    #[test]
    fn test_role_grants_admin() {
        assert!(role_grants_admin(Some(&UserRole::Admin)));
        assert!(!role_grants_admin(Some(&UserRole::User)));
        // Отсутствие профиля — отказ
        assert!(!role_grants_admin(None));
    }
}

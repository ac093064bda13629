use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::{AdminUser, AppState};
use crate::models::{AdminNotice, CreateNoticeRequest, NOTICE_POSTED_BY};
use crate::store::Collection;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_notices).post(post_notice))
}

pub async fn fetch_all(pool: &PgPool) -> AppResult<Vec<AdminNotice>> {
    let notices =
        sqlx::query_as::<_, AdminNotice>("SELECT * FROM admin_notices ORDER BY posted_at DESC")
            .fetch_all(pool)
            .await?;
    Ok(notices)
}

/// Список объявлений
#[utoipa::path(
    get,
    path = "/api/v1/notices",
    tag = "notices",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Список объявлений", body = Vec<AdminNotice>),
        (status = 401, description = "Не авторизован"),
        (status = 403, description = "Нет прав")
    )
)]
pub async fn list_notices(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<AdminNotice>>> {
    Ok(Json(fetch_all(&state.pool).await?))
}

/// Опубликовать объявление
#[utoipa::path(
    post,
    path = "/api/v1/notices",
    tag = "notices",
    security(("bearer_auth" = [])),
    request_body = CreateNoticeRequest,
    responses(
        (status = 200, description = "Объявление опубликовано", body = AdminNotice),
        (status = 422, description = "Ошибка валидации")
    )
)]
pub async fn post_notice(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<CreateNoticeRequest>,
) -> AppResult<Json<AdminNotice>> {
    payload.validate()?;

    // Время публикации ставит сервер
    let result = sqlx::query_as::<_, AdminNotice>(
        r#"
        INSERT INTO admin_notices (title, message, posted_by)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(payload.title.trim())
    .bind(payload.message.trim())
    .bind(NOTICE_POSTED_BY)
    .fetch_one(&state.pool)
    .await
    .map_err(AppError::from);

    let notice = state.toasts.report(
        result,
        "Объявление опубликовано",
        "Не удалось опубликовать объявление",
    )?;
    state.feed.notify(Collection::Notices);

    Ok(Json(notice))
}

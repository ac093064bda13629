use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::{AdminUser, AppState};
use crate::models::{ReviewRequest, VisitorRequest, VisitorResponse};
use crate::store::Collection;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_visitors))
        .route("/:id/status", put(review_visitor))
        .route("/:id", delete(delete_visitor))
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct DeleteQuery {
    confirm: Option<bool>,
}

pub async fn fetch_all(pool: &PgPool) -> AppResult<Vec<VisitorRequest>> {
    let items = sqlx::query_as::<_, VisitorRequest>(
        "SELECT * FROM visitor_requests ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Заявки посетителей
#[utoipa::path(
    get,
    path = "/api/v1/approvals/visitors",
    tag = "approvals",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Список заявок", body = Vec<VisitorResponse>),
        (status = 401, description = "Не авторизован"),
        (status = 403, description = "Нет прав")
    )
)]
pub async fn list_visitors(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<VisitorResponse>>> {
    let visitors = fetch_all(&state.pool).await?;
    Ok(Json(visitors.into_iter().map(VisitorResponse::from).collect()))
}

/// Рассмотреть заявку посетителя
#[utoipa::path(
    put,
    path = "/api/v1/approvals/visitors/{id}/status",
    tag = "approvals",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "ID заявки")
    ),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Заявка рассмотрена", body = VisitorResponse),
        (status = 404, description = "Заявка не найдена")
    )
)]
pub async fn review_visitor(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> AppResult<Json<VisitorResponse>> {
    // Пересмотр пишет статус в нижнем регистре независимо от того,
    // как его записало приложение жильцов
    let status = if payload.approved { "approved" } else { "rejected" };

    let result = sqlx::query_as::<_, VisitorRequest>(
        "UPDATE visitor_requests SET status = $2 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(status)
    .fetch_optional(&state.pool)
    .await
    .map_err(AppError::from)
    .and_then(|found| found.ok_or_else(|| AppError::NotFound("Заявка не найдена".to_string())));

    let (ok_msg, err_msg) = if payload.approved {
        ("Посетитель одобрен", "Не удалось одобрить заявку")
    } else {
        ("Посетитель отклонён", "Не удалось отклонить заявку")
    };
    let visitor = state.toasts.report(result, ok_msg, err_msg)?;
    state.feed.notify(Collection::Visitors);

    Ok(Json(VisitorResponse::from(visitor)))
}

/// Удалить заявку посетителя (требует confirm=true)
#[utoipa::path(
    delete,
    path = "/api/v1/approvals/visitors/{id}",
    tag = "approvals",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "ID заявки"),
        DeleteQuery
    ),
    responses(
        (status = 200, description = "Заявка удалена"),
        (status = 400, description = "Нет подтверждения"),
        (status = 404, description = "Заявка не найдена")
    )
)]
pub async fn delete_visitor(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteQuery>,
) -> AppResult<Json<Value>> {
    if !query.confirm.unwrap_or(false) {
        return Err(AppError::BadRequest(
            "Удаление требует подтверждения: confirm=true".to_string(),
        ));
    }

    let result = sqlx::query("DELETE FROM visitor_requests WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await
        .map_err(AppError::from)
        .and_then(|done| {
            if done.rows_affected() == 0 {
                Err(AppError::NotFound("Заявка не найдена".to_string()))
            } else {
                Ok(())
            }
        });

    state
        .toasts
        .report(result, "Заявка удалена", "Не удалось удалить заявку")?;
    state.feed.notify(Collection::Visitors);

    Ok(Json(json!({"success": true})))
}

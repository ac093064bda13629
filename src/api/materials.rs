use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::{AdminUser, AppState};
use crate::models::{MaterialRequest, MaterialStatus, ReviewRequest};
use crate::store::Collection;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_materials))
        .route("/:id/status", put(review_material))
}

pub async fn fetch_all(pool: &PgPool) -> AppResult<Vec<MaterialRequest>> {
    let items = sqlx::query_as::<_, MaterialRequest>(
        "SELECT * FROM material_requests ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Заявки на материалы
#[utoipa::path(
    get,
    path = "/api/v1/approvals/materials",
    tag = "approvals",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Список заявок", body = Vec<MaterialRequest>),
        (status = 401, description = "Не авторизован"),
        (status = 403, description = "Нет прав")
    )
)]
pub async fn list_materials(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<MaterialRequest>>> {
    Ok(Json(fetch_all(&state.pool).await?))
}

/// Рассмотреть заявку на материалы
#[utoipa::path(
    put,
    path = "/api/v1/approvals/materials/{id}/status",
    tag = "approvals",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "ID заявки")
    ),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Заявка рассмотрена", body = MaterialRequest),
        (status = 404, description = "Заявка не найдена")
    )
)]
pub async fn review_material(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> AppResult<Json<MaterialRequest>> {
    let status = if payload.approved {
        MaterialStatus::Approved
    } else {
        MaterialStatus::Rejected
    };

    let result = sqlx::query_as::<_, MaterialRequest>(
        "UPDATE material_requests SET status = $2 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&status)
    .fetch_optional(&state.pool)
    .await
    .map_err(AppError::from)
    .and_then(|found| found.ok_or_else(|| AppError::NotFound("Заявка не найдена".to_string())));

    let (ok_msg, err_msg) = if payload.approved {
        ("Заявка на материалы одобрена", "Не удалось одобрить заявку")
    } else {
        ("Заявка на материалы отклонена", "Не удалось отклонить заявку")
    };
    let material = state.toasts.report(result, ok_msg, err_msg)?;
    state.feed.notify(Collection::Materials);

    Ok(Json(material))
}

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::{AdminUser, AppState};
use crate::models::{Identification, IdentificationStatus, ReviewRequest};
use crate::store::Collection;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_identifications))
        .route("/:id/status", put(review_identification))
}

/// Итоговый статус определяется только самим запросом, поэтому повторный
/// пересмотр с тем же вердиктом — идемпотентная перезапись.
fn review_status(approved: bool) -> IdentificationStatus {
    if approved {
        IdentificationStatus::Approved
    } else {
        IdentificationStatus::Rejected
    }
}

pub async fn fetch_all(pool: &PgPool) -> AppResult<Vec<Identification>> {
    let items = sqlx::query_as::<_, Identification>(
        "SELECT * FROM identifications ORDER BY submitted_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Заявки на идентификацию
#[utoipa::path(
    get,
    path = "/api/v1/approvals/identifications",
    tag = "approvals",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Список заявок", body = Vec<Identification>),
        (status = 401, description = "Не авторизован"),
        (status = 403, description = "Нет прав")
    )
)]
pub async fn list_identifications(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<Identification>>> {
    Ok(Json(fetch_all(&state.pool).await?))
}

/// Рассмотреть заявку на идентификацию
#[utoipa::path(
    put,
    path = "/api/v1/approvals/identifications/{id}/status",
    tag = "approvals",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "ID заявки")
    ),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Заявка рассмотрена", body = Identification),
        (status = 404, description = "Заявка не найдена")
    )
)]
pub async fn review_identification(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> AppResult<Json<Identification>> {
    let status = review_status(payload.approved);

    // Повторная установка того же статуса — идемпотентная перезапись
    let result = sqlx::query_as::<_, Identification>(
        "UPDATE identifications SET status = $2 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&status)
    .fetch_optional(&state.pool)
    .await
    .map_err(AppError::from)
    .and_then(|found| found.ok_or_else(|| AppError::NotFound("Заявка не найдена".to_string())));

    let (ok_msg, err_msg) = if payload.approved {
        ("Заявка одобрена", "Не удалось одобрить заявку")
    } else {
        ("Заявка отклонена", "Не удалось отклонить заявку")
    };
    let identification = state.toasts.report(result, ok_msg, err_msg)?;
    state.feed.notify(Collection::Identifications);

    Ok(Json(identification))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_resolves_status_from_verdict() {
        assert_eq!(review_status(true), IdentificationStatus::Approved);
        assert_eq!(review_status(false), IdentificationStatus::Rejected);
    }

    // Повторное одобрение уже одобренной заявки даёт то же конечное состояние.
    #[test]
    fn test_repeated_review_is_idempotent() {
        let first = review_status(true);
        let second = review_status(true);
        assert_eq!(first, second);
        assert_eq!(second, IdentificationStatus::Approved);

        assert_eq!(review_status(false), review_status(false));
    }
}

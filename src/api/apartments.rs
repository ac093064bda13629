use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::{AdminUser, AppState};
use crate::models::{Apartment, CreateApartmentRequest, UpdateApartmentRequest};
use crate::store::Collection;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_apartments).post(create_apartment))
        .route("/:id", get(get_apartment))
        .route("/:id", put(update_apartment))
        .route("/:id", delete(delete_apartment))
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct DeleteQuery {
    /// Удаление необратимо и требует явного подтверждения.
    confirm: Option<bool>,
}

pub async fn fetch_all(pool: &PgPool) -> AppResult<Vec<Apartment>> {
    let apartments =
        sqlx::query_as::<_, Apartment>("SELECT * FROM apartments ORDER BY name ASC")
            .fetch_all(pool)
            .await?;
    Ok(apartments)
}

/// Список квартир
#[utoipa::path(
    get,
    path = "/api/v1/apartments",
    tag = "apartments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Список квартир", body = Vec<Apartment>),
        (status = 401, description = "Не авторизован"),
        (status = 403, description = "Нет прав")
    )
)]
pub async fn list_apartments(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<Apartment>>> {
    Ok(Json(fetch_all(&state.pool).await?))
}

/// Квартира по ID
#[utoipa::path(
    get,
    path = "/api/v1/apartments/{id}",
    tag = "apartments",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "ID квартиры")
    ),
    responses(
        (status = 200, description = "Квартира", body = Apartment),
        (status = 404, description = "Не найдена")
    )
)]
pub async fn get_apartment(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Apartment>> {
    let apartment = sqlx::query_as::<_, Apartment>("SELECT * FROM apartments WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Квартира не найдена".to_string()))?;

    Ok(Json(apartment))
}

/// Добавить квартиру
#[utoipa::path(
    post,
    path = "/api/v1/apartments",
    tag = "apartments",
    security(("bearer_auth" = [])),
    request_body = CreateApartmentRequest,
    responses(
        (status = 200, description = "Квартира добавлена", body = Apartment),
        (status = 422, description = "Ошибка валидации")
    )
)]
pub async fn create_apartment(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<CreateApartmentRequest>,
) -> AppResult<Json<Apartment>> {
    // Невалидная форма не доходит до хранилища
    payload.validate()?;

    let result = sqlx::query_as::<_, Apartment>(
        r#"
        INSERT INTO apartments (name, location, price, status, details)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(payload.name.trim())
    .bind(payload.location.trim())
    .bind(payload.price)
    .bind(payload.status.unwrap_or_default())
    .bind(&payload.details)
    .fetch_one(&state.pool)
    .await
    .map_err(AppError::from);

    let apartment = state.toasts.report(
        result,
        "Квартира добавлена",
        "Не удалось добавить квартиру",
    )?;
    state.feed.notify(Collection::Apartments);

    Ok(Json(apartment))
}

/// Обновить квартиру
#[utoipa::path(
    put,
    path = "/api/v1/apartments/{id}",
    tag = "apartments",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "ID квартиры")
    ),
    request_body = UpdateApartmentRequest,
    responses(
        (status = 200, description = "Квартира обновлена", body = Apartment),
        (status = 404, description = "Не найдена"),
        (status = 422, description = "Ошибка валидации")
    )
)]
pub async fn update_apartment(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateApartmentRequest>,
) -> AppResult<Json<Apartment>> {
    payload.validate()?;

    // created_at не трогаем: выставляется один раз при создании
    let result = sqlx::query_as::<_, Apartment>(
        r#"
        UPDATE apartments SET
            name = COALESCE($2, name),
            location = COALESCE($3, location),
            price = COALESCE($4, price),
            status = COALESCE($5, status),
            details = COALESCE($6, details)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.name.as_deref().map(str::trim))
    .bind(payload.location.as_deref().map(str::trim))
    .bind(payload.price)
    .bind(payload.status)
    .bind(&payload.details)
    .fetch_optional(&state.pool)
    .await
    .map_err(AppError::from)
    .and_then(|found| {
        found.ok_or_else(|| AppError::NotFound("Квартира не найдена".to_string()))
    });

    let apartment = state.toasts.report(
        result,
        "Квартира обновлена",
        "Не удалось обновить квартиру",
    )?;
    state.feed.notify(Collection::Apartments);

    Ok(Json(apartment))
}

/// Удалить квартиру (требует confirm=true)
#[utoipa::path(
    delete,
    path = "/api/v1/apartments/{id}",
    tag = "apartments",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "ID квартиры"),
        DeleteQuery
    ),
    responses(
        (status = 200, description = "Квартира удалена"),
        (status = 400, description = "Нет подтверждения"),
        (status = 404, description = "Не найдена")
    )
)]
pub async fn delete_apartment(
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

    let result = sqlx::query("DELETE FROM apartments WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await
        .map_err(AppError::from)
        .and_then(|done| {
            if done.rows_affected() == 0 {
                Err(AppError::NotFound("Квартира не найдена".to_string()))
            } else {
                Ok(())
            }
        });

    state
        .toasts
        .report(result, "Квартира удалена", "Не удалось удалить квартиру")?;
    state.feed.notify(Collection::Apartments);

    Ok(Json(json!({"success": true})))
}

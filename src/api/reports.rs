use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::middleware::{AdminUser, AppState};
use crate::models::{Rental, RentalReportResponse};
use crate::services::report_service::{filter_rentals, total_revenue, DateRange, RentalReport};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rentals", get(rental_report))
        .route("/rentals/export", get(export_rental_report))
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ReportQuery {
    /// Начало периода, YYYY-MM-DD; пусто — без ограничения
    start: Option<String>,
    /// Конец периода, YYYY-MM-DD; пусто — без ограничения
    end: Option<String>,
}

pub async fn fetch_all(pool: &PgPool) -> AppResult<Vec<Rental>> {
    let rentals = sqlx::query_as::<_, Rental>("SELECT * FROM rentals ORDER BY start_date DESC NULLS LAST")
        .fetch_all(pool)
        .await?;
    Ok(rentals)
}

/// Отчёт по аренде за период
#[utoipa::path(
    get,
    path = "/api/v1/reports/rentals",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(ReportQuery),
    responses(
        (status = 200, description = "Отчёт по аренде", body = RentalReportResponse),
        (status = 422, description = "Неверный формат даты")
    )
)]
pub async fn rental_report(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<RentalReportResponse>> {
    let range = DateRange::parse(query.start.as_deref(), query.end.as_deref())?;
    let rentals = fetch_all(&state.pool).await?;

    let filtered = filter_rentals(&rentals, &range);
    let total = total_revenue(filtered.iter().copied());

    Ok(Json(RentalReportResponse {
        record_count: filtered.len(),
        total_revenue: total,
        records: filtered.into_iter().cloned().collect(),
    }))
}

/// Экспорт отчёта в PDF
#[utoipa::path(
    get,
    path = "/api/v1/reports/rentals/export",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(ReportQuery),
    responses(
        (status = 200, description = "PDF-файл отчёта", content_type = "application/pdf"),
        (status = 422, description = "Неверный формат даты"),
        (status = 500, description = "Ошибка генерации")
    )
)]
pub async fn export_rental_report(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    let range = DateRange::parse(query.start.as_deref(), query.end.as_deref())?;
    let rentals = fetch_all(&state.pool).await?;

    let report = RentalReport::build(&rentals, range, chrono::Utc::now().date_naive());

    // Сбой генерации не трогает данные: наружу уходит только уведомление
    let bytes = match report.render_pdf() {
        Ok(bytes) => bytes,
        Err(e) => {
            state.toasts.error("Не удалось сформировать PDF-отчёт");
            return Err(e);
        }
    };
    state.toasts.success("PDF-отчёт сформирован");

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", report.filename()),
        ),
    ];

    Ok((headers, bytes))
}

use axum::{extract::State, routing::get, Json, Router};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::middleware::{AdminUser, AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(get_dashboard))
}

async fn get_dashboard(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<Value>> {
    let total_apartments: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM apartments")
        .fetch_one(&state.pool)
        .await?;

    let available_apartments: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM apartments WHERE status = 'available'")
            .fetch_one(&state.pool)
            .await?;

    let occupied_apartments: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM apartments WHERE status = 'occupied'")
            .fetch_one(&state.pool)
            .await?;

    let pending_identifications: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM identifications WHERE status = 'Pending'")
            .fetch_one(&state.pool)
            .await?;

    // Статус визитов пишется клиентами в произвольном регистре
    let pending_visitors: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM visitor_requests WHERE LOWER(TRIM(status)) = 'pending'",
    )
    .fetch_one(&state.pool)
    .await?;

    let pending_materials: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM material_requests WHERE status = 'pending'")
            .fetch_one(&state.pool)
            .await?;

    let total_notices: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admin_notices")
        .fetch_one(&state.pool)
        .await?;

    let total_rentals: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM rentals")
        .fetch_one(&state.pool)
        .await?;

    let total_revenue: (Option<Decimal>,) =
        sqlx::query_as("SELECT SUM(COALESCE(total_price, 0)) FROM rentals")
            .fetch_one(&state.pool)
            .await?;

    Ok(Json(json!({
        "apartments": {
            "total": total_apartments.0,
            "available": available_apartments.0,
            "occupied": occupied_apartments.0
        },
        "approvals": {
            "pending_identifications": pending_identifications.0,
            "pending_visitors": pending_visitors.0,
            "pending_materials": pending_materials.0
        },
        "notices": {
            "total": total_notices.0
        },
        "rentals": {
            "total": total_rentals.0,
            "total_revenue": total_revenue.0.unwrap_or_default()
        }
    })))
}

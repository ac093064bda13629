use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Запись аренды пишется бронирующим приложением. total_price приходит
/// готовым и здесь не пересчитывается.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Rental {
    pub id: Uuid,
    pub apartment_name: Option<String>,
    pub payment_amount: Option<Decimal>,
    pub days: Option<i32>,
    pub total_price: Option<Decimal>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RentalReportResponse {
    pub record_count: usize,
    pub total_revenue: Decimal,
    pub records: Vec<Rental>,
}

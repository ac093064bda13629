use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Статусы хранятся с заглавной буквы — так их пишет внешняя система подачи.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "identification_status")]
pub enum IdentificationStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Identification {
    pub id: Uuid,
    pub apartment_name: String,
    pub responsible_name: String,
    pub responsible_id_number: String,
    pub responsible_phone: String,
    pub responsible_work_place: Option<String>,
    pub status: IdentificationStatus,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewRequest {
    pub approved: bool,
}

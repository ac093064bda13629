use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "material_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MaterialStatus {
    Pending,
    Approved,
    Rejected,
}

impl Default for MaterialStatus {
    fn default() -> Self {
        Self::Pending
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaterialRequest {
    pub id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: MaterialStatus,
    pub created_at: DateTime<Utc>,
}

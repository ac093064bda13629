use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Заявки гостей пишет приложение жильцов; регистр статуса не гарантирован,
/// поэтому поле остаётся текстовым.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct VisitorRequest {
    pub id: Uuid,
    pub visitor_name: Option<String>,
    pub apartment_name: Option<String>,
    pub visit_reason: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl VisitorRequest {
    /// Гейт действий: approve/reject предлагаются только по pending,
    /// сравнение без учёта регистра.
    pub fn is_pending(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("pending")
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VisitorResponse {
    pub id: Uuid,
    pub visitor_name: Option<String>,
    pub apartment_name: Option<String>,
    pub visit_reason: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub status: String,
    pub is_pending: bool,
    pub created_at: DateTime<Utc>,
}

impl From<VisitorRequest> for VisitorResponse {
    fn from(v: VisitorRequest) -> Self {
        let is_pending = v.is_pending();
        Self {
            id: v.id,
            visitor_name: v.visitor_name,
            apartment_name: v.apartment_name,
            visit_reason: v.visit_reason,
            check_in: v.check_in,
            check_out: v.check_out,
            status: v.status,
            is_pending,
            created_at: v.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visitor(status: &str) -> VisitorRequest {
        VisitorRequest {
            id: Uuid::new_v4(),
            visitor_name: None,
            apartment_name: None,
            visit_reason: None,
            check_in: None,
            check_out: None,
            status: status.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_pending_gate_ignores_case() {
        assert!(visitor("pending").is_pending());
        assert!(visitor("Pending").is_pending());
        assert!(visitor("PENDING ").is_pending());
        assert!(!visitor("approved").is_pending());
        assert!(!visitor("").is_pending());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub const NOTICE_POSTED_BY: &str = "Admin";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AdminNotice {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub posted_by: String,
    pub posted_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateNoticeRequest {
    #[validate(custom(
        function = "crate::utils::validators::not_blank",
        message = "Заголовок обязателен"
    ))]
    pub title: String,
    #[validate(custom(
        function = "crate::utils::validators::not_blank",
        message = "Текст объявления обязателен"
    ))]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_requires_title_and_message() {
        let req = CreateNoticeRequest {
            title: "Плановое отключение воды".to_string(),
            message: "Завтра с 10:00 до 14:00".to_string(),
        };
        assert!(req.validate().is_ok());

        let req = CreateNoticeRequest {
            title: " ".to_string(),
            message: String::new(),
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("message"));
    }
}

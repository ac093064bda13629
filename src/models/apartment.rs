use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "apartment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApartmentStatus {
    Available,
    Occupied,
    Maintenance,
}

impl Default for ApartmentStatus {
    fn default() -> Self {
        Self::Available
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Apartment {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub price: Decimal,
    pub status: ApartmentStatus,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateApartmentRequest {
    #[validate(custom(
        function = "crate::utils::validators::not_blank",
        message = "Название квартиры обязательно"
    ))]
    pub name: String,
    #[validate(custom(
        function = "crate::utils::validators::not_blank",
        message = "Адрес обязателен"
    ))]
    pub location: String,
    #[validate(custom(
        function = "crate::utils::validators::positive_price",
        message = "Цена должна быть больше нуля"
    ))]
    pub price: Decimal,
    pub status: Option<ApartmentStatus>,
    pub details: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateApartmentRequest {
    #[validate(custom(
        function = "crate::utils::validators::not_blank",
        message = "Название квартиры обязательно"
    ))]
    pub name: Option<String>,
    #[validate(custom(
        function = "crate::utils::validators::not_blank",
        message = "Адрес обязателен"
    ))]
    pub location: Option<String>,
    #[validate(custom(
        function = "crate::utils::validators::positive_price",
        message = "Цена должна быть больше нуля"
    ))]
    pub price: Option<Decimal>,
    pub status: Option<ApartmentStatus>,
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, location: &str, price: &str) -> CreateApartmentRequest {
        CreateApartmentRequest {
            name: name.to_string(),
            location: location.to_string(),
            price: price.parse().unwrap(),
            status: None,
            details: None,
        }
    }

    #[test]
    fn test_create_request_valid() {
        assert!(request("Sunset View 2A", "123 Main Street", "1200").validate().is_ok());
    }

    #[test]
    fn test_create_request_blank_fields() {
        let errors = request("  ", "", "1200").validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("location"));
        assert!(!fields.contains_key("price"));
    }

    #[test]
    fn test_create_request_non_positive_price() {
        assert!(request("A", "B", "0").validate().is_err());
        assert!(request("A", "B", "-5").validate().is_err());
        assert!(request("A", "B", "0.01").validate().is_ok());
    }

    #[test]
    fn test_update_request_skips_absent_fields() {
        let req = UpdateApartmentRequest {
            name: None,
            location: None,
            price: None,
            status: Some(ApartmentStatus::Occupied),
            details: None,
        };
        assert!(req.validate().is_ok());

        let req = UpdateApartmentRequest {
            name: Some("   ".to_string()),
            location: None,
            price: None,
            status: None,
            details: None,
        };
        assert!(req.validate().is_err());
    }
}

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Apartment Admin API",
        version = "1.0.0",
        description = "Backend API административной консоли платформы аренды жилья",
        contact(
            name = "Apartment Admin Team",
            email = "support@aptadmin.kz"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    tags(
        (name = "auth", description = "Аутентификация и авторизация администраторов"),
        (name = "dashboard", description = "Сводка по платформе"),
        (name = "apartments", description = "Управление квартирами"),
        (name = "approvals", description = "Заявки на идентификацию, визиты и материалы"),
        (name = "notices", description = "Объявления для жильцов"),
        (name = "reports", description = "Отчёты по аренде")
    ),
    paths(
        // Auth
        crate::api::auth::login,
        crate::api::auth::refresh_token,
        crate::api::auth::logout,
        // Apartments
        crate::api::apartments::list_apartments,
        crate::api::apartments::get_apartment,
        crate::api::apartments::create_apartment,
        crate::api::apartments::update_apartment,
        crate::api::apartments::delete_apartment,
        // Approvals
        crate::api::identifications::list_identifications,
        crate::api::identifications::review_identification,
        crate::api::visitors::list_visitors,
        crate::api::visitors::review_visitor,
        crate::api::visitors::delete_visitor,
        crate::api::materials::list_materials,
        crate::api::materials::review_material,
        // Notices
        crate::api::notices::list_notices,
        crate::api::notices::post_notice,
        // Reports
        crate::api::reports::rental_report,
        crate::api::reports::export_rental_report,
    ),
    components(
        schemas(
            // Auth
            crate::models::LoginRequest,
            crate::models::AuthResponse,
            crate::models::RefreshTokenRequest,
            crate::models::TokenResponse,
            crate::models::UserPublic,
            crate::models::UserRole,
            crate::api::auth::LogoutResponse,
            // Apartments
            crate::models::Apartment,
            crate::models::ApartmentStatus,
            crate::models::CreateApartmentRequest,
            crate::models::UpdateApartmentRequest,
            // Approvals
            crate::models::Identification,
            crate::models::IdentificationStatus,
            crate::models::ReviewRequest,
            crate::models::VisitorResponse,
            crate::models::MaterialRequest,
            crate::models::MaterialStatus,
            // Notices
            crate::models::AdminNotice,
            crate::models::CreateNoticeRequest,
            // Reports
            crate::models::Rental,
            crate::models::RentalReportResponse,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            );
        }
    }
}

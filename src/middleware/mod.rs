pub mod auth;

pub use auth::{
    auth_middleware, email_in_allow_list, role_grants_admin, AdminUser, AppState, AuthUser,
};

pub mod apartments;
pub mod auth;
pub mod dashboard;
pub mod events;
pub mod identifications;
pub mod materials;
pub mod notices;
pub mod reports;
pub mod visitors;

use crate::middleware::AppState;
use axum::Router;

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::routes())
        .nest("/dashboard", dashboard::routes())
        .nest("/apartments", apartments::routes())
        .nest("/approvals/identifications", identifications::routes())
        .nest("/approvals/visitors", visitors::routes())
        .nest("/approvals/materials", materials::routes())
        .nest("/notices", notices::routes())
        .nest("/reports", reports::routes())
        .nest("/events", events::routes())
}

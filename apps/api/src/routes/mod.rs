pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::checklist::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Offer checklist (nested format)
        .route(
            "/api/recruteur/offres/:id/checklist",
            get(handlers::handle_get_checklist)
                .patch(handlers::handle_save_checklist)
                .delete(handlers::handle_delete_checklist),
        )
        .route(
            "/api/recruteur/offres/:id/checklist/view",
            get(handlers::handle_view_checklist),
        )
        // Candidature interview notation (flat format)
        .route(
            "/api/candidatures/:id/noter-interview",
            post(handlers::handle_record_interview),
        )
        .route(
            "/api/candidatures/:id/interview",
            get(handlers::handle_view_interview),
        )
        .with_state(state)
}

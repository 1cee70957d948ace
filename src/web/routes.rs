// src/web/routes.rs
use crate::{
    state::AppState,
    web::{
        auth_handlers, facility_handlers, member_handlers, mw_admin, mw_auth, notice_handlers,
        slot_handlers,
    },
};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub fn create_router(app_state: AppState) -> Router {
    // --- Rotas Públicas ---
    let public_routes = Router::new()
        .route("/login", get(auth_handlers::show_login_form).post(auth_handlers::handle_login))
        .route("/logout", get(auth_handlers::handle_logout))
        .route("/", get(|| async { axum::response::Redirect::to("/admin/slots") }));

    // --- Rotas de Admin ---
    // Exigem login E role admin
    let admin_routes = Router::new()
        // Gestão de slots (página + API JSON usada pelo painel)
        .route("/slots", get(slot_handlers::show_slots_page))
        .route("/slots/preview", post(slot_handlers::handle_preview))
        .route("/slots/generate", post(slot_handlers::handle_generate))
        .route("/slots/clear", post(slot_handlers::handle_clear))
        .route("/slots/{id}/status", post(slot_handlers::handle_set_status))
        // Instalações
        .route("/facilities", get(facility_handlers::show_facilities_page))
        .route("/facilities/create", post(facility_handlers::handle_create_facility))
        .route("/facilities/{id}/window", post(facility_handlers::handle_update_window))
        // Sócios
        .route("/members", get(member_handlers::show_members_page))
        .route("/members/create", post(member_handlers::handle_create_member))
        // Notificações em tempo real
        .route("/notices/ws", get(notice_handlers::notices_websocket_handler))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_admin::require_admin,
        ));

    // --- Rotas Autenticadas ---
    // require_auth corre antes de require_admin (layers aplicam-se de fora para dentro)
    let authenticated_routes = Router::new()
        .nest("/admin", admin_routes)
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_auth::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .with_state(app_state)
}

// src/web/mw_admin.rs
use crate::{error::AppError, services::staff_service, state::AppState, web::mw_auth::StaffId};
use axum::{
    extract::{Extension, Request, State},
    middleware::Next,
    response::Response,
};

pub const ADMIN_ROLES: &[&str] = &["admin"];

/// Só deixa passar quem tem a role "admin".
/// Deve ser executado *depois* de `require_auth`.
pub async fn require_admin(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffId>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let staff_id = staff.0;

    if staff_service::has_any_role(&state.db_pool, &staff_id, ADMIN_ROLES).await? {
        tracing::debug!("Admin MW: Acesso admin concedido para {}", staff_id);
        Ok(next.run(request).await)
    } else {
        tracing::warn!("Admin MW: Acesso negado para {} (sem role admin).", staff_id);
        Err(AppError::Unauthorized)
    }
}

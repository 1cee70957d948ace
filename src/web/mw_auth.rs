// src/web/mw_auth.rs
use crate::error::AppError;
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

pub const SESSION_STAFF_KEY: &str = "staff_id";

// Middleware que verifica se há um membro da equipa com sessão iniciada
pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match session.get::<String>(SESSION_STAFF_KEY).await {
        Ok(Some(staff_id)) => {
            tracing::debug!("Autenticação MW: '{}' autenticado.", staff_id);
            // Os handlers protegidos leem o ID daqui
            request.extensions_mut().insert(StaffId(staff_id));
            Ok(next.run(request).await)
        }
        Ok(None) => {
            tracing::debug!("Autenticação MW: sem sessão. Redirecionando para /login");
            Ok(Redirect::to("/login").into_response())
        }
        Err(e) => {
            tracing::error!("Autenticação MW: Erro ao ler sessão: {:?}", e);
            Err(AppError::SessionError(format!("Erro ao verificar sessão: {}", e)))
        }
    }
}

#[derive(Clone, Debug)]
pub struct StaffId(pub String);

// src/web/auth_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::staff::LoginForm,
    services::{auth_service, staff_service},
    state::AppState,
    templates::LoginPage,
    web::mw_auth::SESSION_STAFF_KEY,
};
use askama::Template;
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

const HOME: &str = "/admin/slots";

fn render_login(status: StatusCode, error: Option<String>) -> AppResult<Response> {
    let template = LoginPage { error };
    match template.render() {
        Ok(html) => Ok((status, Html(html)).into_response()),
        Err(e) => {
            tracing::error!("Falha ao renderizar template de login: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

// GET /login
pub async fn show_login_form(session: Session) -> AppResult<Response> {
    if session.get::<String>(SESSION_STAFF_KEY).await.ok().flatten().is_some() {
        tracing::debug!("GET /login: já tem sessão, redirecionando");
        return Ok(Redirect::to(HOME).into_response());
    }
    render_login(StatusCode::OK, None)
}

// POST /login
pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    tracing::info!("Tentativa de login para ID: {}", form.id);

    let staff = staff_service::find_staff_by_id(&state.db_pool, form.id.trim()).await?;
    let valid = match &staff {
        Some(s) => auth_service::verify_password(&form.password, &s.password_hash).await?,
        None => false,
    };

    let staff = match staff {
        Some(s) if valid => s,
        _ => {
            // Mensagem genérica: não revela se o ID existe
            tracing::warn!("Login falhado para ID: {}", form.id);
            return render_login(StatusCode::UNAUTHORIZED, Some(AppError::InvalidCredentials.user_message()));
        }
    };

    session
        .cycle_id()
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao rodar ID: {}", e)))?;
    session
        .insert(SESSION_STAFF_KEY, &staff.id)
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao inserir na sessão: {}", e)))?;

    tracing::info!("✅ Login bem-sucedido para: {}", staff.id);
    Ok(Redirect::to(HOME).into_response())
}

// GET /logout
pub async fn handle_logout(session: Session) -> AppResult<Redirect> {
    let staff_id: Option<String> = session.get(SESSION_STAFF_KEY).await.ok().flatten();

    session
        .delete()
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao apagar sessão: {}", e)))?;

    match staff_id {
        Some(id) => tracing::info!("🚪 '{}' terminou sessão.", id),
        None => tracing::info!("🚪 Sessão anónima terminada."),
    }
    Ok(Redirect::to("/login"))
}

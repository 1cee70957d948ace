// src/web/member_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        member::{MembershipFilter, NewMember},
        notice::Notice,
    },
    services::{member_service, staff_service},
    state::AppState,
    templates::{AdminMembersPage, MemberView},
    web::{flash, mw_auth::StaffId},
};
use askama::Template;
use axum::{
    extract::{Extension, Form, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_cookies::Cookies;

#[derive(Deserialize, Debug, Default)]
pub struct MemberQuery {
    q: Option<String>,
    membership_type: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct CreateMemberForm {
    full_name: String,
    email: String,
    phone: Option<String>,
    membership_type: Option<String>,
}

// GET /admin/members?q=&membership_type=
pub async fn show_members_page(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffId>,
    cookies: Cookies,
    Query(params): Query<MemberQuery>,
) -> AppResult<Response> {
    let staff_name = staff_service::display_name(&state.db_pool, &staff.0).await?;
    let all = member_service::list_members(&state.db_pool).await?;

    let query = params.q.unwrap_or_default();
    let plan = MembershipFilter::from_query(params.membership_type.as_deref());
    let found = member_service::filter_members(&all, &query, &plan);
    tracing::debug!("Diretório de sócios: '{}' / {:?} -> {} de {}", query, plan, found.len(), all.len());

    let template = AdminMembersPage {
        staff_name,
        shown: found.len(),
        total: all.len(),
        members: found.into_iter().map(MemberView::from).collect(),
        query,
        membership_type: params.membership_type.unwrap_or_default(),
        flash: flash::take_flash(&cookies, &state.cookie_key),
    };

    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Falha ao renderizar template AdminMembersPage: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

// POST /admin/members/create
pub async fn handle_create_member(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<CreateMemberForm>,
) -> Redirect {
    let name = form.full_name.trim().to_string();
    let new = NewMember {
        full_name: form.full_name,
        email: form.email,
        phone: form.phone,
        membership_type: form.membership_type,
    };

    let notice = match member_service::create_member(&state.db_pool, new).await {
        Ok(_) => Notice::success(format!("Sócio '{}' criado.", name)),
        Err(e) => {
            tracing::warn!("Falha ao criar sócio: {}", e);
            Notice::error(e.user_message())
        }
    };
    flash::set_flash(&cookies, &state.cookie_key, &notice);
    Redirect::to("/admin/members")
}

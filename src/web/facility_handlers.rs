// src/web/facility_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        facility::{parse_weekday_list, NewFacility},
        notice::Notice,
        slot::OperatingWindow,
    },
    services::{facility_service, staff_service},
    state::AppState,
    templates::{AdminFacilitiesPage, FacilityView},
    web::{flash, mw_auth::StaffId},
};
use askama::Template;
use axum::{
    extract::{Extension, Form, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_cookies::Cookies;

const FACILITIES_PAGE: &str = "/admin/facilities";

#[derive(Deserialize, Debug)]
pub struct CreateFacilityForm {
    name: String,
    capacity: i64,
    opening_time: String,
    closing_time: String,
    available_weekdays: String, // "1,3,5"
}

#[derive(Deserialize, Debug)]
pub struct WindowForm {
    opening_time: String,
    closing_time: String,
}

impl CreateFacilityForm {
    fn into_new_facility(self) -> AppResult<NewFacility> {
        let window = OperatingWindow::parse(&self.opening_time, &self.closing_time)?;
        let available_weekdays = parse_weekday_list(&self.available_weekdays).map_err(|e| {
            tracing::debug!("Dias inválidos no formulário: {}", e);
            AppError::InvalidInput(vec!["available_weekdays".into()])
        })?;
        Ok(NewFacility {
            name: self.name,
            capacity: self.capacity,
            window,
            available_weekdays,
        })
    }
}

/// Depois de um POST: guarda o resultado num flash e volta à lista.
fn redirect_with_outcome(state: &AppState, cookies: &Cookies, outcome: AppResult<String>) -> Redirect {
    let notice = match outcome {
        Ok(msg) => Notice::success(msg),
        Err(e) => {
            tracing::warn!("Operação em instalações falhou: {}", e);
            Notice::error(e.user_message())
        }
    };
    flash::set_flash(cookies, &state.cookie_key, &notice);
    Redirect::to(FACILITIES_PAGE)
}

// GET /admin/facilities
pub async fn show_facilities_page(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffId>,
    cookies: Cookies,
) -> AppResult<Response> {
    let staff_name = staff_service::display_name(&state.db_pool, &staff.0).await?;
    let facilities = facility_service::list_facilities(&state.db_pool).await?;

    let template = AdminFacilitiesPage {
        staff_name,
        facilities: facilities.iter().map(FacilityView::from).collect(),
        flash: flash::take_flash(&cookies, &state.cookie_key),
    };

    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Falha ao renderizar template AdminFacilitiesPage: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

async fn create_from_form(state: &AppState, form: CreateFacilityForm) -> AppResult<String> {
    let name = form.name.trim().to_string();
    let new = form.into_new_facility()?;
    facility_service::create_facility(&state.db_pool, &new).await?;
    Ok(format!("Instalação '{}' criada.", name))
}

async fn update_window_from_form(state: &AppState, facility_id: i64, form: WindowForm) -> AppResult<String> {
    let window = OperatingWindow::parse(&form.opening_time, &form.closing_time)?;
    facility_service::update_facility_window(&state.db_pool, facility_id, &window).await?;
    Ok("Horário atualizado. Os slots já gerados não foram alterados.".to_string())
}

// POST /admin/facilities/create
pub async fn handle_create_facility(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<CreateFacilityForm>,
) -> Redirect {
    let outcome = create_from_form(&state, form).await;
    redirect_with_outcome(&state, &cookies, outcome)
}

// POST /admin/facilities/{id}/window
pub async fn handle_update_window(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(facility_id): Path<i64>,
    Form(form): Form<WindowForm>,
) -> Redirect {
    let outcome = update_window_from_form(&state, facility_id, form).await;
    redirect_with_outcome(&state, &cookies, outcome)
}

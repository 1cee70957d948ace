// src/web/slot_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        notice::{Notice, NoticeLevel},
        slot::{GenerationRequest, GenerationResult, SlotStatus},
    },
    services::{facility_service, request_builder, slot_service, staff_service},
    state::AppState,
    templates::{AdminSlotsPage, FacilityOption, FacilityView, SlotDayView, SlotView},
    web::{
        api_error::{json_error, json_rejection},
        flash,
        mw_auth::StaffId,
    },
};
use askama::Template;
use axum::{
    extract::{rejection::JsonRejection, Extension, Json, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tower_cookies::Cookies;

#[derive(Deserialize, Debug)]
pub struct SlotsPageQuery {
    facility_id: Option<i64>,
    date: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct StatusPayload {
    status: SlotStatus,
}

#[derive(Deserialize, Debug)]
pub struct ClearPayload {
    facility_id: i64,
    from: String,
    to: String,
}

/// Resposta de POST /admin/slots/generate.
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct GenerateSummary {
    pub facility_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total: usize,
    pub created: u64,
    pub skipped: u64,
}

fn day_label(date: NaiveDate) -> String {
    let dia_semana = match date.weekday() {
        chrono::Weekday::Mon => "Segunda",
        chrono::Weekday::Tue => "Terça",
        chrono::Weekday::Wed => "Quarta",
        chrono::Weekday::Thu => "Quinta",
        chrono::Weekday::Fri => "Sexta",
        chrono::Weekday::Sat => "Sábado",
        chrono::Weekday::Sun => "Domingo",
    };
    format!("{}, {}", dia_semana, date.format("%d/%m"))
}

fn parse_date(raw: &str, field: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| AppError::InvalidInput(vec![field.to_string()]))
}

// --- PÁGINA (GET /admin/slots) ---
pub async fn show_slots_page(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffId>,
    cookies: Cookies,
    Query(params): Query<SlotsPageQuery>,
) -> AppResult<Response> {
    let staff_name = staff_service::display_name(&state.db_pool, &staff.0).await?;
    let facilities = facility_service::list_facilities(&state.db_pool).await?;

    // Instalação pedida, ou a primeira da lista
    let selected = match params.facility_id {
        Some(id) => facilities.iter().find(|f| f.id == id),
        None => facilities.first(),
    };

    let week_start = params
        .date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let week_end = week_start.checked_add_days(Days::new(6)).unwrap_or(week_start);

    let mut days = Vec::new();
    if let Some(facility) = selected {
        let rows = slot_service::list_slots(&state.db_pool, facility.id, week_start, week_end).await?;

        // Agrupar por data (BTreeMap mantém a ordem)
        let mut by_date: BTreeMap<String, Vec<SlotView>> = BTreeMap::new();
        for row in rows {
            by_date.entry(row.date.clone()).or_default().push(SlotView::from(row));
        }
        days = by_date
            .into_iter()
            .map(|(date, slots)| {
                let date_label = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                    .map(day_label)
                    .unwrap_or_else(|_| date.clone());
                SlotDayView { date, date_label, slots }
            })
            .collect();
    }

    let template = AdminSlotsPage {
        staff_name,
        facilities: facilities
            .iter()
            .map(|f| FacilityOption {
                id: f.id,
                name: f.name.clone(),
                selected: selected.is_some_and(|s| s.id == f.id),
            })
            .collect(),
        selected: selected.map(FacilityView::from),
        week_start: week_start.to_string(),
        week_end: week_end.to_string(),
        days,
        flash: flash::take_flash(&cookies, &state.cookie_key),
    };

    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Falha ao renderizar template AdminSlotsPage: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

// --- HANDLERS DA API ---

/// POST /admin/slots/preview: gera em memória, não grava nada.
pub async fn handle_preview(payload: Result<Json<GenerationRequest>, JsonRejection>) -> Response {
    let Json(payload) = match payload {
        Ok(p) => p,
        Err(rejection) => return json_rejection(rejection),
    };
    match request_builder::build(&payload) {
        Ok(result) => (StatusCode::OK, Json::<GenerationResult>(result)).into_response(),
        Err(e) => json_error(e.into()),
    }
}

async fn generate_and_persist(state: &AppState, payload: &GenerationRequest) -> AppResult<GenerateSummary> {
    let result = request_builder::build(payload)?;
    let outcome = slot_service::persist_slots(&state.db_pool, result.facility_id, &result.slots).await?;
    Ok(GenerateSummary {
        facility_id: result.facility_id,
        start_date: result.start_date,
        end_date: result.end_date,
        total: result.slots.len(),
        created: outcome.created,
        skipped: outcome.skipped,
    })
}

/// POST /admin/slots/generate: gera e grava; duplicados contam como ignorados.
pub async fn handle_generate(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffId>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(p) => p,
        Err(rejection) => return json_rejection(rejection),
    };
    match generate_and_persist(&state, &payload).await {
        Ok(summary) => {
            tracing::info!(
                "{} gerou slots para instalação {}: {} criados, {} ignorados",
                staff.0,
                summary.facility_id,
                summary.created,
                summary.skipped
            );
            let notice = Notice::success(format!(
                "{} slots criados, {} já existiam ({} a {}).",
                summary.created, summary.skipped, summary.start_date, summary.end_date
            ));
            state.notices.broadcast(&notice).await;
            (StatusCode::OK, Json(summary)).into_response()
        }
        Err(e) => json_error(e),
    }
}

/// POST /admin/slots/{id}/status
pub async fn handle_set_status(
    State(state): State<AppState>,
    Path(slot_id): Path<i64>,
    payload: Result<Json<StatusPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(p) => p,
        Err(rejection) => return json_rejection(rejection),
    };
    match slot_service::set_slot_status(&state.db_pool, slot_id, payload.status).await {
        Ok(row) => {
            let notice = Notice::new(
                NoticeLevel::Info,
                format!("Slot {} {} agora está '{}'.", row.date, row.start_time, row.status),
            );
            state.notices.broadcast(&notice).await;
            (StatusCode::OK, Json(row)).into_response()
        }
        Err(e) => json_error(e),
    }
}

async fn clear_range(state: &AppState, payload: &ClearPayload) -> AppResult<u64> {
    let from = parse_date(&payload.from, "from")?;
    let to = parse_date(&payload.to, "to")?;
    if to < from {
        return Err(AppError::InvalidInput(vec!["to".into()]));
    }
    slot_service::delete_available_slots(&state.db_pool, payload.facility_id, from, to).await
}

/// POST /admin/slots/clear: apaga os slots livres de um intervalo.
pub async fn handle_clear(
    State(state): State<AppState>,
    payload: Result<Json<ClearPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(p) => p,
        Err(rejection) => return json_rejection(rejection),
    };
    match clear_range(&state, &payload).await {
        Ok(deleted) => {
            state
                .notices
                .broadcast(&Notice::success(format!("{} slots livres apagados.", deleted)))
                .await;
            (StatusCode::OK, Json(serde_json::json!({ "deleted": deleted }))).into_response()
        }
        Err(e) => json_error(e),
    }
}

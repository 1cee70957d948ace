// src/templates.rs
use askama::Template; // Trait necessário para Askama
use crate::models::{facility::Facility, member::Member, notice::Notice, slot::SlotRow};

// Struct para o template `login.html` (ficheiro na pasta templates/)
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub error: Option<String>,
}

/// Mensagem de flash já pronta a mostrar (um "toast" de página).
#[derive(Clone, Debug)]
pub struct FlashView {
    pub level: String,
    pub message: String,
}

impl From<Notice> for FlashView {
    fn from(notice: Notice) -> Self {
        Self { level: notice.level.as_str().to_string(), message: notice.message }
    }
}

#[derive(Clone, Debug)]
pub struct FacilityOption {
    pub id: i64,
    pub name: String,
    pub selected: bool,
}

#[derive(Clone, Debug)]
pub struct FacilityView {
    pub id: i64,
    pub name: String,
    pub capacity: i64,
    pub opening_time: String,
    pub closing_time: String,
    pub weekdays_raw: String,
    pub weekdays_label: String,
    pub is_active: bool,
}

impl From<&Facility> for FacilityView {
    fn from(f: &Facility) -> Self {
        Self {
            id: f.id,
            name: f.name.clone(),
            capacity: f.capacity,
            opening_time: f.opening_time.clone(),
            closing_time: f.closing_time.clone(),
            weekdays_raw: f.available_weekdays.clone(),
            weekdays_label: f.weekday_labels(),
            is_active: f.is_active,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SlotView {
    pub id: i64,
    pub start_time: String,
    pub end_time: String,
    pub capacity: i64,
    pub status: String,
    pub is_available: bool,
    pub is_booked: bool,
}

impl From<SlotRow> for SlotView {
    fn from(row: SlotRow) -> Self {
        let status = row.slot_status();
        Self {
            id: row.id,
            start_time: row.start_time,
            end_time: row.end_time,
            capacity: row.capacity,
            status: status.as_str().to_string(),
            is_available: status == crate::models::slot::SlotStatus::Available,
            is_booked: status == crate::models::slot::SlotStatus::Booked,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SlotDayView {
    pub date: String,
    pub date_label: String, // ex: "Segunda, 03/03"
    pub slots: Vec<SlotView>,
}

#[derive(Template)]
#[template(path = "admin_slots.html")]
pub struct AdminSlotsPage {
    pub staff_name: String,
    pub facilities: Vec<FacilityOption>,
    pub selected: Option<FacilityView>,
    pub week_start: String,
    pub week_end: String,
    pub days: Vec<SlotDayView>,
    pub flash: Option<FlashView>,
}

#[derive(Template)]
#[template(path = "admin_facilities.html")]
pub struct AdminFacilitiesPage {
    pub staff_name: String,
    pub facilities: Vec<FacilityView>,
    pub flash: Option<FlashView>,
}

#[derive(Clone, Debug)]
pub struct MemberView {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub plan: String,
    pub is_active: bool,
}

impl From<&Member> for MemberView {
    fn from(m: &Member) -> Self {
        Self {
            full_name: m.full_name.clone(),
            email: m.email.clone(),
            phone: m.phone.clone().unwrap_or_else(|| "—".to_string()),
            plan: m.membership_type.clone().unwrap_or_else(|| "Sem plano".to_string()),
            is_active: m.is_active,
        }
    }
}

#[derive(Template)]
#[template(path = "admin_members.html")]
pub struct AdminMembersPage {
    pub staff_name: String,
    pub members: Vec<MemberView>,
    pub query: String,
    pub membership_type: String,
    pub shown: usize,
    pub total: usize,
    pub flash: Option<FlashView>,
}

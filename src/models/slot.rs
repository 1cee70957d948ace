// src/models/slot.rs
use crate::{error::SlotError, services::time_window};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{fmt, str::FromStr};

/// Janela diária de funcionamento de uma instalação.
/// Uma janela com abertura >= fecho é aceite mas não gera slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingWindow {
    #[serde(with = "hhmm")]
    pub opening_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub closing_time: NaiveTime,
}

impl OperatingWindow {
    pub fn new(opening_time: NaiveTime, closing_time: NaiveTime) -> Self {
        Self { opening_time, closing_time }
    }

    /// Constrói a janela a partir de texto `HH:MM`/`HH:MM:SS`.
    pub fn parse(opening: &str, closing: &str) -> Result<Self, SlotError> {
        Ok(Self::new(
            time_window::parse_time(opening)?,
            time_window::parse_time(closing)?,
        ))
    }

    pub fn is_valid(&self) -> bool {
        time_window::is_before(self.opening_time, self.closing_time)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    #[default]
    Available,
    Booked,
    Blocked,
    Maintenance,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Available => "available",
            SlotStatus::Booked => "booked",
            SlotStatus::Blocked => "blocked",
            SlotStatus::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(SlotStatus::Available),
            "booked" => Ok(SlotStatus::Booked),
            "blocked" => Ok(SlotStatus::Blocked),
            "maintenance" => Ok(SlotStatus::Maintenance),
            other => Err(format!("Estado de slot desconhecido: '{}'", other)),
        }
    }
}

/// Um slot gerado em memória, antes de ser gravado.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSpec {
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub duration_minutes: u32,
    pub capacity: u32,
    pub status: SlotStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    #[default]
    Days,
    Weeks,
    Months,
}

fn default_capacity() -> i64 {
    1
}

/// Janela tal como vem no pedido JSON, ainda por interpretar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowInput {
    #[serde(default)]
    pub opening_time: String,
    #[serde(default)]
    pub closing_time: String,
}

impl WindowInput {
    pub fn new(opening_time: &str, closing_time: &str) -> Self {
        Self {
            opening_time: opening_time.to_string(),
            closing_time: closing_time.to_string(),
        }
    }
}

/// Pedido de geração tal como chega do formulário do admin.
/// Os campos ficam "crus" (Option, String, i64) para que a validação
/// consiga apontar todos os campos inválidos de uma só vez.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    #[serde(default)]
    pub facility_id: Option<i64>,
    #[serde(default)]
    pub available_weekdays: Vec<i64>,
    #[serde(default)]
    pub window: WindowInput,
    #[serde(default)]
    pub duration_minutes: i64,
    #[serde(default = "default_capacity")]
    pub capacity: i64,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub period_count: i64,
    #[serde(default)]
    pub period_unit: PeriodUnit,
}

/// Resultado completo de uma geração (nunca parcial).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub facility_id: i64,
    pub start_date: NaiveDate,
    /// Última data candidata considerada, tenha ou não gerado slots.
    pub end_date: NaiveDate,
    /// Slots que a janela comporta em cada dia escolhido.
    pub slots_per_day: usize,
    pub slots: Vec<SlotSpec>,
}

/// Linha da tabela `slots`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SlotRow {
    pub id: i64,
    pub facility_id: i64,
    pub date: String,       // YYYY-MM-DD
    pub start_time: String, // HH:MM
    pub end_time: String,   // HH:MM
    pub duration_minutes: i64,
    pub capacity: i64,
    pub status: String,
}

impl SlotRow {
    pub fn slot_status(&self) -> SlotStatus {
        self.status.parse().unwrap_or_else(|e| {
            tracing::warn!("Slot {} com estado inválido na DB: {}", self.id, e);
            SlotStatus::Blocked
        })
    }
}

/// Contagem devolvida após gravar um lote de slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PersistOutcome {
    pub created: u64,
    /// Slots que já existiam para (instalação, data, hora de início).
    pub skipped: u64,
}

/// Serde para horas no formato fixo `HH:MM`.
pub mod hhmm {
    use crate::services::time_window;
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time_window::format_time(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        time_window::parse_time(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_request_from_json_uses_defaults() {
        let json = r#"{
            "facility_id": 3,
            "available_weekdays": [1, 3, 5],
            "window": { "opening_time": "09:00:00", "closing_time": "21:00" },
            "duration_minutes": 60,
            "start_date": "2025-03-03",
            "period_count": 2,
            "period_unit": "weeks"
        }"#;
        let req: GenerationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.capacity, 1);
        assert_eq!(req.period_unit, PeriodUnit::Weeks);
        assert_eq!(req.available_weekdays, vec![1, 3, 5]);
        assert_eq!(req.window, WindowInput::new("09:00:00", "21:00"));
    }

    #[test]
    fn malformed_values_still_deserialize() {
        // Horas e dias errados só são apontados na validação
        let json = r#"{ "available_weekdays": [-1, 300], "window": { "opening_time": "9h" } }"#;
        let req: GenerationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.window, WindowInput::new("9h", ""));
        assert_eq!(req.available_weekdays, vec![-1, 300]);
        assert_eq!(req.facility_id, None);
    }

    #[test]
    fn window_parses_both_time_formats() {
        let w = OperatingWindow::parse("09:00:30", "21:00").unwrap();
        assert_eq!(time_window::format_time(w.opening_time), "09:00");
        assert!(w.is_valid());
        assert!(OperatingWindow::parse("9h", "21:00").is_err());
    }

    #[test]
    fn slot_spec_serializes_fixed_time_format() {
        let slot = SlotSpec {
            date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            duration_minutes: 60,
            capacity: 4,
            status: SlotStatus::Available,
        };
        let value = serde_json::to_value(&slot).unwrap();
        assert_eq!(value["date"], "2025-03-03");
        assert_eq!(value["start_time"], "09:00");
        assert_eq!(value["end_time"], "10:00");
        assert_eq!(value["status"], "available");
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Maintenance".parse::<SlotStatus>(), Ok(SlotStatus::Maintenance));
        assert!("cancelled".parse::<SlotStatus>().is_err());
    }
}

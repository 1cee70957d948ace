// src/models/facility.rs
use crate::{error::SlotError, models::slot::OperatingWindow};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeSet;

pub const WEEKDAY_LABELS: [&str; 7] = ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"];

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Facility {
    pub id: i64,
    pub name: String,
    pub capacity: i64,
    pub opening_time: String,       // HH:MM
    pub closing_time: String,       // HH:MM
    pub available_weekdays: String, // Vem do banco como string "1,3,5"
    pub is_active: bool,
}

impl Facility {
    pub fn window(&self) -> Result<OperatingWindow, SlotError> {
        OperatingWindow::parse(&self.opening_time, &self.closing_time)
    }

    /// Máscara de dias da semana (0 = domingo). Valores inválidos são ignorados.
    pub fn weekdays(&self) -> BTreeSet<u8> {
        parse_weekday_list(&self.available_weekdays).unwrap_or_default()
    }

    pub fn weekday_labels(&self) -> String {
        self.weekdays()
            .iter()
            .map(|d| WEEKDAY_LABELS[*d as usize])
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Converte "1, 3,5" em {1,3,5}. Falha se algum valor não for 0..=6.
pub fn parse_weekday_list(raw: &str) -> Result<BTreeSet<u8>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| match t.parse::<u8>() {
            Ok(d) if d <= 6 => Ok(d),
            _ => Err(format!("Dia da semana inválido: '{}'", t)),
        })
        .collect()
}

pub fn format_weekday_list(days: &BTreeSet<u8>) -> String {
    days.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(",")
}

/// Dados para criar uma instalação (já validados pelo serviço).
#[derive(Debug, Clone)]
pub struct NewFacility {
    pub name: String,
    pub capacity: i64,
    pub window: OperatingWindow,
    pub available_weekdays: BTreeSet<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_list_round_trip_ignores_spaces() {
        let days = parse_weekday_list(" 5,1, 3 ,").unwrap();
        assert_eq!(days.into_iter().collect::<Vec<_>>(), vec![1, 3, 5]);
    }

    #[test]
    fn weekday_list_rejects_out_of_range() {
        assert!(parse_weekday_list("1,7").is_err());
        assert!(parse_weekday_list("seg").is_err());
    }

    #[test]
    fn facility_labels_follow_sunday_first_numbering() {
        let f = Facility {
            id: 1,
            name: "Piscina".into(),
            capacity: 10,
            opening_time: "07:00".into(),
            closing_time: "22:00".into(),
            available_weekdays: "0,6".into(),
            is_active: true,
        };
        assert_eq!(f.weekday_labels(), "Dom, Sáb");
        assert!(f.window().unwrap().is_valid());
    }
}

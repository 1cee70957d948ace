// src/services/time_window.rs
//! Aritmética de horas do dia (sem data) usada pelo gerador de slots.
//!
//! Todas as funções são puras. As horas são tratadas ao minuto: os segundos
//! recebidos em `HH:MM:SS` são descartados na leitura.

use crate::error::SlotError;
use chrono::{Duration, NaiveTime, Timelike};

pub const MINUTES_PER_DAY: i64 = 24 * 60;
const SECONDS_PER_DAY: i64 = MINUTES_PER_DAY * 60;

/// Lê `HH:MM` ou `HH:MM:SS`.
pub fn parse_time(raw: &str) -> Result<NaiveTime, SlotError> {
    let text = raw.trim();
    let parsed = NaiveTime::parse_from_str(text, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .map_err(|_| SlotError::InvalidTimeFormat(raw.to_string()))?;

    Ok(NaiveTime::from_hms_opt(parsed.hour(), parsed.minute(), 0).unwrap_or(parsed))
}

/// Formato fixo de saída: `HH:MM`.
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Soma minutos dando a volta dentro do mesmo dia (23:30 + 60 = 00:30).
pub fn add_minutes(time: NaiveTime, minutes: i64) -> NaiveTime {
    let (result, _) = time.overflowing_add_signed(Duration::minutes(minutes.rem_euclid(MINUTES_PER_DAY)));
    result
}

/// Como `add_minutes`, mas devolve `None` se o resultado passar da meia-noite
/// (para a frente ou para trás). Meia-noite do dia seguinte também é `None`.
pub fn checked_add_minutes(time: NaiveTime, minutes: i64) -> Option<NaiveTime> {
    let delta = minutes.checked_mul(60)?;
    let total = i64::from(time.num_seconds_from_midnight()).checked_add(delta)?;
    if !(0..SECONDS_PER_DAY).contains(&total) {
        return None;
    }
    // Dentro do dia, a soma com volta coincide com a soma direta
    Some(add_minutes(time, minutes))
}

pub fn is_before(a: NaiveTime, b: NaiveTime) -> bool {
    a < b
}

pub fn is_after_or_equal(a: NaiveTime, b: NaiveTime) -> bool {
    a >= b
}

/// Minutos entre `from` e `to` no mesmo dia (negativo se `to` for antes).
pub fn minutes_between(from: NaiveTime, to: NaiveTime) -> i64 {
    (i64::from(to.num_seconds_from_midnight()) - i64::from(from.num_seconds_from_midnight())) / 60
}

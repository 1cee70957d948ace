// src/services/slot_generator.rs
use crate::{
    models::slot::{OperatingWindow, SlotSpec, SlotStatus},
    services::time_window::{self, MINUTES_PER_DAY},
};
use chrono::NaiveDate;

/// Divide a janela de um dia em slots consecutivos de `duration_minutes`,
/// começando na abertura. Um slot só é emitido se couber inteiro antes do
/// fecho; o resto da janela é descartado.
///
/// Duração <= 0 ou abertura >= fecho devolve lista vazia (não é erro).
/// Nenhum slot atravessa a meia-noite.
pub fn generate_day(
    date: NaiveDate,
    window: &OperatingWindow,
    duration_minutes: i64,
    capacity: u32,
) -> Vec<SlotSpec> {
    if duration_minutes >= MINUTES_PER_DAY || !window.is_valid() {
        return Vec::new();
    }
    let duration = match u32::try_from(duration_minutes) {
        Ok(d) if d > 0 => d,
        _ => return Vec::new(),
    };

    let mut slots = Vec::new();
    let mut cursor = window.opening_time;

    while let Some(end) = time_window::checked_add_minutes(cursor, duration_minutes) {
        if !time_window::is_after_or_equal(window.closing_time, end) {
            break;
        }
        slots.push(SlotSpec {
            date,
            start_time: cursor,
            end_time: end,
            duration_minutes: duration,
            capacity,
            status: SlotStatus::Available,
        });
        cursor = end;
    }

    slots
}

/// Quantos slots cabem na janela (sem os construir).
pub fn slots_per_day(window: &OperatingWindow, duration_minutes: i64) -> usize {
    if duration_minutes <= 0 || !window.is_valid() {
        return 0;
    }
    let length = time_window::minutes_between(window.opening_time, window.closing_time);
    usize::try_from(length / duration_minutes).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::time_window::{format_time, parse_time};

    fn window(open: &str, close: &str) -> OperatingWindow {
        OperatingWindow::parse(open, close).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
    }

    fn ranges(slots: &[SlotSpec]) -> Vec<(String, String)> {
        slots
            .iter()
            .map(|s| (format_time(s.start_time), format_time(s.end_time)))
            .collect()
    }

    #[test]
    fn full_day_of_hourly_slots() {
        let w = window("09:00", "21:00");
        let slots = generate_day(day(), &w, 60, 8);

        assert_eq!(slots.len(), 12);
        assert_eq!(ranges(&slots[..1]), vec![("09:00".into(), "10:00".into())]);
        assert_eq!(ranges(&slots[11..]), vec![("20:00".into(), "21:00".into())]);
        assert!(slots.iter().all(|s| s.capacity == 8 && s.status == SlotStatus::Available && s.date == day()));
        assert_eq!(slots_per_day(&w, 60), 12);
    }

    #[test]
    fn slots_are_back_to_back_and_inside_the_window() {
        let cases = [("06:30", "22:15", 45), ("09:00", "10:50", 25), ("00:00", "23:59", 7)];
        for (open, close, duration) in cases {
            let w = window(open, close);
            let slots = generate_day(day(), &w, duration, 1);
            assert!(!slots.is_empty());
            for pair in slots.windows(2) {
                assert_eq!(pair[0].end_time, pair[1].start_time);
            }
            for s in &slots {
                assert!(s.start_time >= w.opening_time);
                assert!(s.end_time <= w.closing_time);
                assert_eq!(time_window::minutes_between(s.start_time, s.end_time), duration);
            }
            assert_eq!(slots.len(), slots_per_day(&w, duration));
        }
    }

    #[test]
    fn remainder_is_dropped() {
        let slots = generate_day(day(), &window("09:00", "10:50"), 60, 1);
        assert_eq!(ranges(&slots), vec![("09:00".into(), "10:00".into())]);
    }

    #[test]
    fn exact_fit_ends_on_closing_time() {
        let slots = generate_day(day(), &window("09:00", "10:00"), 30, 1);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].end_time, parse_time("10:00").unwrap());
    }

    #[test]
    fn degenerate_inputs_give_empty_sequences() {
        assert!(generate_day(day(), &window("09:00", "09:00"), 60, 1).is_empty());
        assert!(generate_day(day(), &window("21:00", "09:00"), 60, 1).is_empty());
        assert!(generate_day(day(), &window("09:00", "21:00"), 0, 1).is_empty());
        assert!(generate_day(day(), &window("09:00", "21:00"), -15, 1).is_empty());
        assert!(generate_day(day(), &window("09:00", "10:00"), 90, 1).is_empty());
    }

    #[test]
    fn never_wraps_past_midnight() {
        let slots = generate_day(day(), &window("22:00", "23:59"), 60, 1);
        assert_eq!(ranges(&slots), vec![("22:00".into(), "23:00".into())]);
    }

    #[test]
    fn generation_is_deterministic() {
        let w = window("07:15", "19:40");
        assert_eq!(generate_day(day(), &w, 35, 3), generate_day(day(), &w, 35, 3));
    }
}

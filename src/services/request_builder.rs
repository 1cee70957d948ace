// src/services/request_builder.rs
use crate::{
    error::SlotError,
    models::slot::{GenerationRequest, GenerationResult, OperatingWindow, PeriodUnit},
    services::{slot_generator, time_window},
};
use chrono::{Datelike, Days, Months, NaiveDate};
use std::collections::BTreeSet;

/// Pedido depois de validado: todos os campos obrigatórios presentes e
/// o intervalo de datas já resolvido.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub facility_id: i64,
    pub available_weekdays: BTreeSet<u8>,
    pub window: OperatingWindow,
    pub duration_minutes: i64,
    pub capacity: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Maior intervalo de datas aceite num só pedido (um ano bissexto).
pub const MAX_SPAN_DAYS: i64 = 366;

/// Valida o pedido e devolve TODOS os campos com problema de uma vez.
pub fn validate(request: &GenerationRequest) -> Result<ValidatedRequest, SlotError> {
    let mut invalid: Vec<String> = Vec::new();

    let facility_id = match request.facility_id {
        Some(id) if id > 0 => Some(id),
        _ => {
            invalid.push("facility_id".into());
            None
        }
    };

    let available_weekdays: BTreeSet<u8> = request
        .available_weekdays
        .iter()
        .filter_map(|d| u8::try_from(*d).ok().filter(|d| *d <= 6))
        .collect();
    if request.available_weekdays.is_empty() || available_weekdays.len() != unique_count(&request.available_weekdays) {
        invalid.push("available_weekdays".into());
    }

    let opening_time = match time_window::parse_time(&request.window.opening_time) {
        Ok(t) => Some(t),
        Err(_) => {
            invalid.push("opening_time".into());
            None
        }
    };
    let closing_time = match time_window::parse_time(&request.window.closing_time) {
        Ok(t) => Some(t),
        Err(_) => {
            invalid.push("closing_time".into());
            None
        }
    };

    let capacity = match u32::try_from(request.capacity) {
        Ok(c) if c >= 1 => Some(c),
        _ => {
            invalid.push("capacity".into());
            None
        }
    };

    let start_date = match NaiveDate::parse_from_str(request.start_date.trim(), "%Y-%m-%d") {
        Ok(d) => Some(d),
        Err(_) => {
            invalid.push("start_date".into());
            None
        }
    };

    let period_count = match u32::try_from(request.period_count) {
        Ok(c) if c >= 1 => Some(c),
        _ => {
            invalid.push("period_count".into());
            None
        }
    };

    // Só dá para resolver o fim com início e contagem válidos
    let end_date = match (start_date, period_count) {
        (Some(start), Some(count)) => match candidate_span(start, count, request.period_unit) {
            Some((_, end)) if span_days(start, end) <= MAX_SPAN_DAYS => Some(end),
            _ => {
                tracing::debug!(
                    "Período recusado: {} {:?} a partir de {} excede {} dias",
                    count,
                    request.period_unit,
                    start,
                    MAX_SPAN_DAYS
                );
                invalid.push("period_count".into());
                None
            }
        },
        _ => None,
    };

    match (facility_id, opening_time, closing_time, capacity, start_date, end_date) {
        (Some(facility_id), Some(opening), Some(closing), Some(capacity), Some(start_date), Some(end_date))
            if invalid.is_empty() =>
        {
            Ok(ValidatedRequest {
                facility_id,
                available_weekdays,
                window: OperatingWindow::new(opening, closing),
                duration_minutes: request.duration_minutes,
                capacity,
                start_date,
                end_date,
            })
        }
        _ => Err(SlotError::InvalidRequest(invalid)),
    }
}

fn unique_count(values: &[i64]) -> usize {
    values.iter().collect::<BTreeSet<_>>().len()
}

/// Número de dias do intervalo, contando as duas pontas.
fn span_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Primeira e última data candidatas para um período.
///
/// - dias: `count` dias a partir do início (inclusive)
/// - semanas: `count * 7` dias
/// - meses: até à véspera do mesmo dia do mês, `count` meses depois
///   (31 jan + 1 mês = 28/29 fev, logo termina a 27/28 fev)
///
/// `None` se `count` for 0 ou o calendário transbordar.
pub fn candidate_span(start: NaiveDate, count: u32, unit: PeriodUnit) -> Option<(NaiveDate, NaiveDate)> {
    if count == 0 {
        return None;
    }
    let end = match unit {
        PeriodUnit::Days => start.checked_add_days(Days::new(u64::from(count) - 1))?,
        PeriodUnit::Weeks => start.checked_add_days(Days::new(u64::from(count) * 7 - 1))?,
        PeriodUnit::Months => start.checked_add_months(Months::new(count))?.pred_opt()?,
    };
    Some((start, end.max(start)))
}

/// Datas do intervalo [start, end] cujo dia da semana está na máscara.
pub fn expand_dates(start: NaiveDate, end: NaiveDate, weekdays: &BTreeSet<u8>) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| weekdays.contains(&weekday_index(*d)))
        .collect()
}

/// 0 = domingo ... 6 = sábado.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Valida, expande as datas e gera os slots de cada uma, por ordem de
/// data e hora. Ou devolve o resultado completo, ou falha antes de gerar.
pub fn build(request: &GenerationRequest) -> Result<GenerationResult, SlotError> {
    let valid = validate(request)?;
    let dates = expand_dates(valid.start_date, valid.end_date, &valid.available_weekdays);

    let per_day = slot_generator::slots_per_day(&valid.window, valid.duration_minutes);
    let mut slots = Vec::with_capacity(dates.len() * per_day);
    for date in &dates {
        slots.extend(slot_generator::generate_day(*date, &valid.window, valid.duration_minutes, valid.capacity));
    }

    tracing::debug!(
        "Geração para instalação {}: {} datas entre {} e {}, {} slots",
        valid.facility_id,
        dates.len(),
        valid.start_date,
        valid.end_date,
        slots.len()
    );

    Ok(GenerationResult {
        facility_id: valid.facility_id,
        start_date: valid.start_date,
        end_date: valid.end_date,
        slots_per_day: per_day,
        slots,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::slot::WindowInput;
    use chrono::Weekday;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    fn request(weekdays: &[i64], count: i64, unit: PeriodUnit) -> GenerationRequest {
        GenerationRequest {
            facility_id: Some(7),
            available_weekdays: weekdays.to_vec(),
            window: WindowInput::new("09:00", "21:00"),
            duration_minutes: 60,
            capacity: 12,
            // 2025-03-03 é uma segunda-feira
            start_date: "2025-03-03".into(),
            period_count: count,
            period_unit: unit,
        }
    }

    #[test]
    fn two_weeks_of_mon_wed_fri_gives_six_dates() {
        let valid = validate(&request(&[1, 3, 5], 2, PeriodUnit::Weeks)).unwrap();
        let dates = expand_dates(valid.start_date, valid.end_date, &valid.available_weekdays);

        assert_eq!(dates.len(), 6);
        assert_eq!(dates.first(), Some(&date("2025-03-03")));
        assert_eq!(dates.last(), Some(&date("2025-03-14")));
        assert!(dates
            .iter()
            .all(|d| matches!(d.weekday(), Weekday::Mon | Weekday::Wed | Weekday::Fri)));
        assert_eq!(valid.end_date, date("2025-03-16"));
    }

    #[test]
    fn build_concatenates_per_date_in_order() {
        let result = build(&request(&[1, 3, 5], 2, PeriodUnit::Weeks)).unwrap();

        assert_eq!(result.facility_id, 7);
        assert_eq!(result.slots.len(), 6 * 12);
        assert!(result.slots.iter().all(|s| s.capacity == 12));
        for pair in result.slots.windows(2) {
            assert!((pair[0].date, pair[0].start_time) < (pair[1].date, pair[1].start_time));
        }
    }

    #[test]
    fn day_span_counts_start_day() {
        let span = candidate_span(date("2025-03-03"), 1, PeriodUnit::Days).unwrap();
        assert_eq!(span, (date("2025-03-03"), date("2025-03-03")));

        let span = candidate_span(date("2025-03-03"), 10, PeriodUnit::Days).unwrap();
        assert_eq!(span.1, date("2025-03-12"));
    }

    #[test]
    fn month_span_stops_before_same_day_of_month() {
        let span = candidate_span(date("2025-01-15"), 2, PeriodUnit::Months).unwrap();
        assert_eq!(span.1, date("2025-03-14"));

        // 31 jan + 1 mês é fixado em 28 fev
        let span = candidate_span(date("2025-01-31"), 1, PeriodUnit::Months).unwrap();
        assert_eq!(span.1, date("2025-02-27"));
    }

    #[test]
    fn end_date_is_reported_even_without_slots_on_it() {
        // Só sábados, 1 semana a partir de segunda: fim é domingo
        let result = build(&request(&[6], 1, PeriodUnit::Weeks)).unwrap();
        assert_eq!(result.end_date, date("2025-03-09"));
        assert!(result.slots.iter().all(|s| s.date == date("2025-03-08")));
        assert_eq!(result.slots.len(), 12);
    }

    #[test]
    fn empty_weekday_mask_is_invalid() {
        let err = build(&request(&[], 2, PeriodUnit::Weeks)).unwrap_err();
        assert_eq!(err, SlotError::InvalidRequest(vec!["available_weekdays".into()]));
    }

    #[test]
    fn every_invalid_field_is_reported() {
        let mut req = request(&[1, 9], 0, PeriodUnit::Days);
        req.facility_id = None;
        req.start_date = "2025-02-30".into();
        req.capacity = 0;

        let SlotError::InvalidRequest(fields) = validate(&req).unwrap_err() else {
            panic!("esperava InvalidRequest");
        };
        assert_eq!(
            fields,
            vec!["facility_id", "available_weekdays", "capacity", "start_date", "period_count"]
        );
    }

    #[test]
    fn zero_length_window_is_not_an_error() {
        let mut req = request(&[1, 2, 3, 4, 5], 1, PeriodUnit::Weeks);
        req.window = WindowInput::new("09:00", "09:00");

        let result = build(&req).unwrap();
        assert!(result.slots.is_empty());
        assert_eq!(result.end_date, date("2025-03-09"));
    }

    #[test]
    fn sunday_is_weekday_zero() {
        assert_eq!(weekday_index(date("2025-03-09")), 0);
        assert_eq!(weekday_index(date("2025-03-15")), 6);
    }

    #[test]
    fn malformed_window_and_weekdays_join_the_field_list() {
        let mut req = request(&[1, -1, 300], 1, PeriodUnit::Weeks);
        req.window = WindowInput::new("9h", "");

        let SlotError::InvalidRequest(fields) = validate(&req).unwrap_err() else {
            panic!("esperava InvalidRequest");
        };
        assert_eq!(fields, vec!["available_weekdays", "opening_time", "closing_time"]);
    }

    #[test]
    fn repeated_weekdays_are_accepted() {
        let valid = validate(&request(&[1, 1, 3], 1, PeriodUnit::Weeks)).unwrap();
        assert_eq!(valid.available_weekdays.into_iter().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn span_is_capped_at_one_year() {
        // Cabe: 52 semanas, 12 meses num ano bissexto, 366 dias
        assert!(validate(&request(&[1], 52, PeriodUnit::Weeks)).is_ok());
        assert!(validate(&request(&[1], 366, PeriodUnit::Days)).is_ok());
        let mut leap = request(&[1], 12, PeriodUnit::Months);
        leap.start_date = "2024-01-01".into();
        assert!(validate(&leap).is_ok());

        // Não cabe
        for req in [
            request(&[1], 367, PeriodUnit::Days),
            request(&[1], 53, PeriodUnit::Weeks),
            request(&[1], 13, PeriodUnit::Months),
            request(&[0], 50_000_000, PeriodUnit::Days),
        ] {
            assert_eq!(
                validate(&req).unwrap_err(),
                SlotError::InvalidRequest(vec!["period_count".into()])
            );
        }
    }

    #[test]
    fn largest_request_stays_bounded() {
        let mut req = request(&[0, 1, 2, 3, 4, 5, 6], MAX_SPAN_DAYS, PeriodUnit::Days);
        req.window = WindowInput::new("00:00", "23:59");
        req.duration_minutes = 1;

        let result = build(&req).unwrap();
        assert_eq!(result.slots.len(), 366 * 1439);
    }
}

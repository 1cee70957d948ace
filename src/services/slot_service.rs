// src/services/slot_service.rs
use crate::{
    error::{AppError, AppResult},
    models::slot::{PersistOutcome, SlotRow, SlotSpec, SlotStatus},
    services::{facility_service, time_window},
};
use chrono::NaiveDate;
use sqlx::SqlitePool;

const SLOT_COLUMNS: &str = "id, facility_id, date, start_time, end_time, duration_minutes, capacity, status";

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Grava um lote de slots gerados numa só transação.
/// Slots que já existem para (instalação, data, início) são contados como
/// ignorados; a restrição UNIQUE da tabela faz a diferença.
pub async fn persist_slots(db_pool: &SqlitePool, facility_id: i64, slots: &[SlotSpec]) -> AppResult<PersistOutcome> {
    if facility_service::find_facility(db_pool, facility_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Instalação {}", facility_id)));
    }

    let mut outcome = PersistOutcome::default();
    let mut tx = db_pool.begin().await?;

    for slot in slots {
        let inserted = sqlx::query(
            r#"
            INSERT OR IGNORE INTO slots (facility_id, date, start_time, end_time, duration_minutes, capacity, status)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(facility_id)
        .bind(date_key(slot.date))
        .bind(time_window::format_time(slot.start_time))
        .bind(time_window::format_time(slot.end_time))
        .bind(i64::from(slot.duration_minutes))
        .bind(i64::from(slot.capacity))
        .bind(slot.status.as_str())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted > 0 {
            outcome.created += inserted;
        } else {
            outcome.skipped += 1;
        }
    }

    tx.commit().await?;
    tracing::info!(
        "Slots gravados para instalação {}: {} criados, {} já existiam.",
        facility_id,
        outcome.created,
        outcome.skipped
    );
    Ok(outcome)
}

/// Slots de uma instalação entre duas datas (inclusive), por data e hora.
pub async fn list_slots(db_pool: &SqlitePool, facility_id: i64, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<SlotRow>> {
    let sql = format!(
        "SELECT {} FROM slots WHERE facility_id = ?1 AND date BETWEEN ?2 AND ?3 ORDER BY date ASC, start_time ASC",
        SLOT_COLUMNS
    );
    let rows = sqlx::query_as::<_, SlotRow>(&sql)
        .bind(facility_id)
        .bind(date_key(from))
        .bind(date_key(to))
        .fetch_all(db_pool)
        .await?;
    Ok(rows)
}

pub async fn find_slot(db_pool: &SqlitePool, slot_id: i64) -> AppResult<Option<SlotRow>> {
    let sql = format!("SELECT {} FROM slots WHERE id = ?1", SLOT_COLUMNS);
    let row = sqlx::query_as::<_, SlotRow>(&sql)
        .bind(slot_id)
        .fetch_optional(db_pool)
        .await?;
    Ok(row)
}

/// Bloqueia, põe em manutenção ou reabre um slot.
/// Reservas são feitas pelo fluxo de booking, nunca por aqui.
/// O UPDATE só toca slots que não estejam reservados.
pub async fn set_slot_status(db_pool: &SqlitePool, slot_id: i64, new_status: SlotStatus) -> AppResult<SlotRow> {
    if new_status == SlotStatus::Booked {
        return Err(AppError::Conflict("Um slot só fica reservado através de uma reserva.".into()));
    }

    let sql = format!(
        "UPDATE slots SET status = ?1 WHERE id = ?2 AND status != 'booked' RETURNING {}",
        SLOT_COLUMNS
    );
    let updated = sqlx::query_as::<_, SlotRow>(&sql)
        .bind(new_status.as_str())
        .bind(slot_id)
        .fetch_optional(db_pool)
        .await?;

    match updated {
        Some(slot) => {
            tracing::info!("Slot {} ({} {}) agora está '{}'.", slot_id, slot.date, slot.start_time, new_status);
            Ok(slot)
        }
        None => match find_slot(db_pool, slot_id).await? {
            Some(slot) => {
                tracing::warn!("Slot {} reservado, estado '{}' recusado.", slot_id, new_status);
                Err(AppError::Conflict(format!(
                    "O slot {} {} já está reservado; cancele a reserva primeiro.",
                    slot.date, slot.start_time
                )))
            }
            None => Err(AppError::NotFound(format!("Slot {}", slot_id))),
        },
    }
}

/// Apaga os slots ainda livres de um intervalo; reservados e bloqueados ficam.
pub async fn delete_available_slots(db_pool: &SqlitePool, facility_id: i64, from: NaiveDate, to: NaiveDate) -> AppResult<u64> {
    let deleted = sqlx::query(
        "DELETE FROM slots WHERE facility_id = ?1 AND date BETWEEN ?2 AND ?3 AND status = 'available'",
    )
    .bind(facility_id)
    .bind(date_key(from))
    .bind(date_key(to))
    .execute(db_pool)
    .await?
    .rows_affected();

    tracing::info!("{} slots livres apagados da instalação {} ({} a {}).", deleted, facility_id, from, to);
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::test_pool,
        models::{facility::NewFacility, slot::{GenerationRequest, OperatingWindow, PeriodUnit, WindowInput}},
        services::request_builder,
    };

    async fn facility(pool: &SqlitePool) -> i64 {
        let new = NewFacility {
            name: "Estúdio de Spinning".into(),
            capacity: 15,
            window: OperatingWindow::parse("09:00", "21:00").unwrap(),
            available_weekdays: [1, 3, 5].into_iter().collect(),
        };
        facility_service::create_facility(pool, &new).await.unwrap()
    }

    fn request(facility_id: i64, count: i64) -> GenerationRequest {
        GenerationRequest {
            facility_id: Some(facility_id),
            available_weekdays: [1, 3, 5].into_iter().collect(),
            window: WindowInput::new("09:00", "21:00"),
            duration_minutes: 60,
            capacity: 15,
            start_date: "2025-03-03".into(),
            period_count: count,
            period_unit: PeriodUnit::Weeks,
        }
    }

    fn d(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn regenerating_skips_existing_slots() {
        let pool = test_pool().await;
        let id = facility(&pool).await;

        let first = request_builder::build(&request(id, 1)).unwrap();
        let outcome = persist_slots(&pool, id, &first.slots).await.unwrap();
        assert_eq!(outcome, PersistOutcome { created: 36, skipped: 0 });

        // Duas semanas: a primeira já existe
        let second = request_builder::build(&request(id, 2)).unwrap();
        let outcome = persist_slots(&pool, id, &second.slots).await.unwrap();
        assert_eq!(outcome, PersistOutcome { created: 36, skipped: 36 });

        let rows = list_slots(&pool, id, d("2025-03-03"), d("2025-03-03")).await.unwrap();
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0].start_time, "09:00");
        assert_eq!(rows[11].end_time, "21:00");
    }

    #[tokio::test]
    async fn unknown_facility_is_not_found() {
        let pool = test_pool().await;
        let result = request_builder::build(&request(42, 1)).unwrap();
        let err = persist_slots(&pool, 42, &result.slots).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn booked_slots_cannot_be_blocked() {
        let pool = test_pool().await;
        let id = facility(&pool).await;
        let result = request_builder::build(&request(id, 1)).unwrap();
        persist_slots(&pool, id, &result.slots).await.unwrap();

        let rows = list_slots(&pool, id, d("2025-03-03"), d("2025-03-03")).await.unwrap();
        let blocked = set_slot_status(&pool, rows[0].id, SlotStatus::Maintenance).await.unwrap();
        assert_eq!(blocked.slot_status(), SlotStatus::Maintenance);

        let err = set_slot_status(&pool, rows[1].id, SlotStatus::Booked).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        sqlx::query("UPDATE slots SET status = 'booked' WHERE id = ?1")
            .bind(rows[2].id)
            .execute(&pool)
            .await
            .unwrap();
        let err = set_slot_status(&pool, rows[2].id, SlotStatus::Blocked).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let reopened = set_slot_status(&pool, rows[0].id, SlotStatus::Available).await.unwrap();
        assert_eq!(reopened.slot_status(), SlotStatus::Available);
    }

    #[tokio::test]
    async fn clearing_keeps_non_available_slots() {
        let pool = test_pool().await;
        let id = facility(&pool).await;
        let result = request_builder::build(&request(id, 1)).unwrap();
        persist_slots(&pool, id, &result.slots).await.unwrap();

        let rows = list_slots(&pool, id, d("2025-03-05"), d("2025-03-05")).await.unwrap();
        set_slot_status(&pool, rows[0].id, SlotStatus::Blocked).await.unwrap();

        let deleted = delete_available_slots(&pool, id, d("2025-03-05"), d("2025-03-05")).await.unwrap();
        assert_eq!(deleted, 11);
        let left = list_slots(&pool, id, d("2025-03-03"), d("2025-03-09")).await.unwrap();
        assert_eq!(left.len(), 36 - 11);
    }

    #[tokio::test]
    async fn status_change_never_overwrites_a_booking() {
        let pool = test_pool().await;
        let id = facility(&pool).await;
        let result = request_builder::build(&request(id, 1)).unwrap();
        persist_slots(&pool, id, &result.slots).await.unwrap();
        let rows = list_slots(&pool, id, d("2025-03-03"), d("2025-03-03")).await.unwrap();

        // Reserva gravada depois de o admin ter carregado a página
        sqlx::query("UPDATE slots SET status = 'booked' WHERE id = ?1")
            .bind(rows[0].id)
            .execute(&pool)
            .await
            .unwrap();

        for status in [SlotStatus::Blocked, SlotStatus::Maintenance, SlotStatus::Available] {
            let err = set_slot_status(&pool, rows[0].id, status).await.unwrap_err();
            assert!(matches!(err, AppError::Conflict(_)));
        }
        let stored = find_slot(&pool, rows[0].id).await.unwrap().unwrap();
        assert_eq!(stored.slot_status(), SlotStatus::Booked);

        let err = set_slot_status(&pool, 9999, SlotStatus::Blocked).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}

// src/services/facility_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        facility::{format_weekday_list, Facility, NewFacility},
        slot::OperatingWindow,
    },
    services::time_window,
};
use sqlx::SqlitePool;

const FACILITY_COLUMNS: &str =
    "id, name, capacity, opening_time, closing_time, available_weekdays, is_active";

pub async fn list_facilities(db_pool: &SqlitePool) -> AppResult<Vec<Facility>> {
    let sql = format!("SELECT {} FROM facilities ORDER BY name ASC", FACILITY_COLUMNS);
    let facilities = sqlx::query_as::<_, Facility>(&sql).fetch_all(db_pool).await?;
    tracing::debug!("Encontradas {} instalações.", facilities.len());
    Ok(facilities)
}

pub async fn find_facility(db_pool: &SqlitePool, facility_id: i64) -> AppResult<Option<Facility>> {
    let sql = format!("SELECT {} FROM facilities WHERE id = ?1", FACILITY_COLUMNS);
    let facility = sqlx::query_as::<_, Facility>(&sql)
        .bind(facility_id)
        .fetch_optional(db_pool)
        .await?;
    Ok(facility)
}

fn check_window(window: &OperatingWindow) -> AppResult<()> {
    if window.is_valid() {
        Ok(())
    } else {
        Err(AppError::InvalidInput(vec!["closing_time".into()]))
    }
}

/// Cria uma instalação e devolve o seu ID.
pub async fn create_facility(db_pool: &SqlitePool, new: &NewFacility) -> AppResult<i64> {
    let mut invalid = Vec::new();
    if new.name.trim().is_empty() {
        invalid.push("name".to_string());
    }
    if new.capacity < 1 {
        invalid.push("capacity".to_string());
    }
    if new.available_weekdays.is_empty() {
        invalid.push("available_weekdays".to_string());
    }
    if !invalid.is_empty() {
        return Err(AppError::InvalidInput(invalid));
    }
    check_window(&new.window)?;

    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO facilities (name, capacity, opening_time, closing_time, available_weekdays)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(new.name.trim())
    .bind(new.capacity)
    .bind(time_window::format_time(new.window.opening_time))
    .bind(time_window::format_time(new.window.closing_time))
    .bind(format_weekday_list(&new.available_weekdays))
    .execute(db_pool)
    .await?;

    if result.rows_affected() == 0 {
        tracing::warn!("Instalação '{}' já existe.", new.name);
        return Err(AppError::Conflict(format!("Já existe uma instalação chamada '{}'.", new.name.trim())));
    }

    let id = result.last_insert_rowid();
    tracing::info!("✅ Instalação '{}' criada (id {}).", new.name, id);
    Ok(id)
}

/// Altera o horário de funcionamento. Os slots já gerados não são tocados.
pub async fn update_facility_window(db_pool: &SqlitePool, facility_id: i64, window: &OperatingWindow) -> AppResult<()> {
    check_window(window)?;
    let rows = sqlx::query("UPDATE facilities SET opening_time = ?1, closing_time = ?2 WHERE id = ?3")
        .bind(time_window::format_time(window.opening_time))
        .bind(time_window::format_time(window.closing_time))
        .bind(facility_id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows == 0 {
        return Err(AppError::NotFound(format!("Instalação {}", facility_id)));
    }
    tracing::info!("Horário da instalação {} atualizado.", facility_id);
    Ok(())
}

// src/services/member_service.rs
use crate::{
    error::{AppError, AppResult},
    models::member::{Member, MembershipFilter, NewMember},
};
use sqlx::SqlitePool;

pub async fn list_members(db_pool: &SqlitePool) -> AppResult<Vec<Member>> {
    let members = sqlx::query_as::<_, Member>(
        r#"
        SELECT id, full_name, email, phone, membership_type, is_active, joined_on
        FROM members
        ORDER BY full_name ASC
        "#,
    )
    .fetch_all(db_pool)
    .await?;
    tracing::debug!("Encontrados {} sócios.", members.len());
    Ok(members)
}

/// Pesquisa simples (nome, email ou telefone, sem distinguir maiúsculas)
/// combinada com o filtro de plano.
pub fn filter_members<'a>(members: &'a [Member], query: &str, plan: &MembershipFilter) -> Vec<&'a Member> {
    let needle = query.trim().to_lowercase();
    members
        .iter()
        .filter(|m| plan.matches(m))
        .filter(|m| {
            needle.is_empty()
                || m.full_name.to_lowercase().contains(&needle)
                || m.email.to_lowercase().contains(&needle)
                || m.phone.as_deref().is_some_and(|p| p.contains(&needle))
        })
        .collect()
}

/// Verificação leve de formato: algo@dominio.tld, sem espaços.
pub fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((user, domain)) => {
            !user.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
        }
        None => false,
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub async fn create_member(db_pool: &SqlitePool, new: NewMember) -> AppResult<i64> {
    let mut invalid = Vec::new();
    if new.full_name.trim().is_empty() {
        invalid.push("full_name".to_string());
    }
    if !is_plausible_email(&new.email) {
        invalid.push("email".to_string());
    }
    if !invalid.is_empty() {
        return Err(AppError::InvalidInput(invalid));
    }

    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO members (full_name, email, phone, membership_type)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(new.full_name.trim())
    .bind(new.email.trim().to_lowercase())
    .bind(blank_to_none(new.phone))
    .bind(blank_to_none(new.membership_type))
    .execute(db_pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::Conflict(format!("Já existe um sócio com o email {}.", new.email.trim())));
    }
    tracing::info!("✅ Sócio '{}' criado.", new.full_name.trim());
    Ok(result.last_insert_rowid())
}

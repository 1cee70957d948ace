// src/services/staff_service.rs
use crate::{
    config::AdminBootstrap,
    error::{AppError, AppResult},
    models::staff::Staff,
    services::auth_service,
};
use sqlx::SqlitePool;

pub const DEFINED_ROLES: &[&str] = &["admin", "trainer", "receptionist"];

/// Busca um membro da equipa pelo seu ID.
pub async fn find_staff_by_id(db_pool: &SqlitePool, staff_id: &str) -> AppResult<Option<Staff>> {
    tracing::debug!("Buscando staff por ID: {}", staff_id);
    let staff = sqlx::query_as::<_, Staff>(
        "SELECT id, password_hash, name FROM staff WHERE id = ?1",
    )
    .bind(staff_id)
    .fetch_optional(db_pool)
    .await?;
    Ok(staff)
}

/// Nome para mostrar no cabeçalho das páginas (o ID se o staff já não existir).
pub async fn display_name(db_pool: &SqlitePool, staff_id: &str) -> AppResult<String> {
    Ok(find_staff_by_id(db_pool, staff_id)
        .await?
        .map(|s| s.name)
        .unwrap_or_else(|| staff_id.to_string()))
}

pub async fn get_staff_roles(db_pool: &SqlitePool, staff_id: &str) -> AppResult<Vec<String>> {
    let roles: Vec<String> =
        sqlx::query_scalar("SELECT role FROM staff_roles WHERE staff_id = ?1 ORDER BY role ASC")
            .bind(staff_id)
            .fetch_all(db_pool)
            .await?;
    tracing::debug!("Roles encontradas para {}: {:?}", staff_id, roles);
    Ok(roles)
}

/// `true` se o staff tiver alguma das roles pedidas (sem distinguir maiúsculas).
pub async fn has_any_role(db_pool: &SqlitePool, staff_id: &str, required_roles: &[&str]) -> AppResult<bool> {
    if required_roles.is_empty() {
        return Ok(true);
    }
    let roles = get_staff_roles(db_pool, staff_id).await?;
    Ok(roles
        .iter()
        .any(|role| required_roles.iter().any(|req| req.eq_ignore_ascii_case(role))))
}

/// Cria uma conta com as roles indicadas, numa só transação.
pub async fn create_staff(
    db_pool: &SqlitePool,
    id: &str,
    name: &str,
    raw_password: &str,
    roles: &[&str],
) -> AppResult<()> {
    tracing::info!("Tentando criar staff: {}", id);
    if let Some(bad) = roles
        .iter()
        .find(|r| !DEFINED_ROLES.iter().any(|d| d.eq_ignore_ascii_case(r)))
    {
        tracing::warn!("Role desconhecida '{}' para staff {}", bad, id);
        return Err(AppError::Conflict(format!("Role desconhecida: {}", bad)));
    }

    let password_hash = auth_service::hash_password(raw_password).await?;
    insert_staff(db_pool, id, name, &password_hash, roles).await
}

async fn insert_staff(
    db_pool: &SqlitePool,
    id: &str,
    name: &str,
    password_hash: &str,
    roles: &[&str],
) -> AppResult<()> {
    let mut tx = db_pool.begin().await?;

    let inserted = sqlx::query("INSERT OR IGNORE INTO staff (id, password_hash, name) VALUES (?1, ?2, ?3)")
        .bind(id)
        .bind(password_hash)
        .bind(name)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if inserted == 0 {
        tracing::warn!("Falha ao criar staff: ID '{}' já existe.", id);
        tx.rollback().await?;
        return Err(AppError::Conflict(format!("O ID '{}' já existe.", id)));
    }

    for role in roles {
        sqlx::query("INSERT OR IGNORE INTO staff_roles (staff_id, role) VALUES (?1, ?2)")
            .bind(id)
            .bind(role.to_ascii_lowercase())
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    tracing::info!("✅ Staff '{}' criado com sucesso.", id);
    Ok(())
}

/// Numa base vazia, cria o admin inicial a partir da configuração.
pub async fn ensure_bootstrap_admin(db_pool: &SqlitePool, bootstrap: Option<&AdminBootstrap>) -> AppResult<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM staff")
        .fetch_one(db_pool)
        .await?;
    if count > 0 {
        return Ok(());
    }
    match bootstrap {
        Some(admin) => {
            tracing::info!("👤 Base sem staff: criando admin inicial '{}'", admin.id);
            create_staff(db_pool, &admin.id, "Administrador", &admin.password, &["admin"]).await
        }
        None => {
            tracing::warn!("⚠️ Nenhum staff na base e ADMIN_BOOTSTRAP_ID/PASSWORD não definidos: ninguém conseguirá entrar.");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    async fn seed(pool: &SqlitePool, id: &str, roles: &[&str]) {
        let hash = auth_service::hash_password_with_cost("pw", 4).await.unwrap();
        insert_staff(pool, id, "Teste", &hash, roles).await.unwrap();
    }

    #[tokio::test]
    async fn roles_are_case_insensitive() {
        let pool = test_pool().await;
        seed(&pool, "ana", &["Admin"]).await;

        assert!(has_any_role(&pool, "ana", &["admin"]).await.unwrap());
        assert!(!has_any_role(&pool, "ana", &["trainer"]).await.unwrap());
        assert!(!has_any_role(&pool, "ninguem", &["admin"]).await.unwrap());
        assert_eq!(get_staff_roles(&pool, "ana").await.unwrap(), vec!["admin"]);
    }

    #[tokio::test]
    async fn duplicate_id_is_a_conflict() {
        let pool = test_pool().await;
        seed(&pool, "rui", &["trainer"]).await;

        let hash = auth_service::hash_password_with_cost("pw", 4).await.unwrap();
        let err = insert_staff(&pool, "rui", "Outro", &hash, &[]).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(find_staff_by_id(&pool, "rui").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn bootstrap_only_runs_on_empty_database() {
        let pool = test_pool().await;
        seed(&pool, "existente", &["receptionist"]).await;

        let admin = AdminBootstrap { id: "root".into(), password: "pw".into() };
        ensure_bootstrap_admin(&pool, Some(&admin)).await.unwrap();
        assert!(find_staff_by_id(&pool, "root").await.unwrap().is_none());
    }
}

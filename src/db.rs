// src/db.rs
use crate::error::AppResult;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration; // Usar std::time::Duration aqui

pub async fn create_db_pool(database_url: &str) -> AppResult<SqlitePool> {
    tracing::info!("Ligando à base de dados: {}", database_url);

    // Opções de conexão (criar se não existir, timeout, chaves estrangeiras)
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

/// Executa os ficheiros SQL em ./migrations (embebidos no binário).
pub async fn run_migrations(pool: &SqlitePool) -> AppResult<()> {
    tracing::info!("Executando migrações da base de dados...");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Migrações concluídas.");
    Ok(())
}

/// Pool em memória com as mesmas migrações, usado pelos testes.
/// Uma única conexão: cada conexão `:memory:` teria a sua própria base.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("url sqlite válida")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("pool em memória");
    run_migrations(&pool).await.expect("migrações");
    pool
}

// src/main.rs

// --- Declaração dos Módulos ---
mod config;
mod db;
mod error;
mod models;
mod services;
mod state;
mod templates;
mod web;

// --- Imports ---
use crate::{
    config::AppConfig,
    state::{AppState, NoticeHub},
};
use axum::serve;
use time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_cookies::{CookieManagerLayer, Key};
use tower_http::trace::TraceLayer;
use tower_sessions::{ExpiredDeletion, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Configuração do Logging (Tracing) ---
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "gym_slots=debug,tower_http=info,sqlx=warn,tower_sessions=info".into()
        }))
        .with(fmt::layer())
        .init();

    tracing::info!("🚀 Iniciando servidor de gestão do ginásio...");

    let config = AppConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Configuração inválida: {}", e))?;

    // --- Configuração da Base de Dados ---
    let db_pool = match db::create_db_pool(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("❌ Falha crítica ao inicializar a base de dados: {}", e);
            return Err(anyhow::anyhow!("Falha ao conectar/migrar DB: {}", e));
        }
    };

    services::staff_service::ensure_bootstrap_admin(&db_pool, config.admin_bootstrap.as_ref())
        .await
        .map_err(|e| anyhow::anyhow!("Falha ao criar admin inicial: {}", e))?;

    // --- Configuração das Sessões ---
    let session_store = SqliteStore::new(db_pool.clone())
        .with_table_name("sessions")
        .map_err(|e| anyhow::anyhow!("Falha ao criar session store: {}", e))?;
    session_store.migrate().await?;

    let session_store_clone = session_store.clone();
    tokio::spawn(async move {
        if let Err(e) = session_store_clone
            .continuously_delete_expired(tokio::time::Duration::from_secs(60 * 60))
            .await
        {
            tracing::error!("Erro na task de limpeza de sessões: {:?}", e);
        }
    });
    tracing::info!("🧹 Tarefa de limpeza de sessões iniciada.");

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::days(1)));

    // Chave dos cookies assinados (flash); exige pelo menos 64 bytes
    let cookie_key = Key::try_from(config.session_secret.as_bytes())
        .map_err(|e| anyhow::anyhow!("SESSION_SECRET inválida para assinar cookies: {}", e))?;
    tracing::info!("🔑 Camada de sessão configurada.");

    // --- Criação do Estado da Aplicação ---
    let app_state = AppState {
        db_pool,
        notices: NoticeHub::default(),
        cookie_key,
    };

    // --- Configuração do Endereço e Listener ---
    let addr = config.bind_addr;
    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("❌ Falha ao iniciar listener em {}: {}", addr, e);
            return Err(e.into());
        }
    };
    tracing::info!("📡 Servidor escutando em http://{}", addr);

    // --- Router e Camadas (Middlewares) ---
    let app = web::routes::create_router(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CookieManagerLayer::new())
            .layer(session_layer),
    );

    // --- Início do Servidor ---
    if let Err(e) = serve(listener, app.into_make_service()).await {
        tracing::error!("❌ Erro fatal no servidor: {}", e);
        return Err(e.into());
    }

    Ok(())
}

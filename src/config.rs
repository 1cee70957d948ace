// src/config.rs
use crate::error::{AppError, AppResult};
use std::{env, net::SocketAddr};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
/// A chave dos cookies assinados precisa de pelo menos 64 bytes.
pub const MIN_SESSION_SECRET_LEN: usize = 64;

/// Credenciais para criar o primeiro admin numa base de dados vazia.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub id: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub session_secret: String,
    pub bind_addr: SocketAddr,
    pub admin_bootstrap: Option<AdminBootstrap>,
}

impl AppConfig {
    /// Lê a configuração das variáveis de ambiente (carrega `.env` se existir).
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;
        let session_secret = env::var("SESSION_SECRET")?;
        check_session_secret(&session_secret)?;

        let bind_raw = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse::<SocketAddr>().unwrap_or_else(|e| {
            tracing::warn!("BIND_ADDR '{}' inválido ({}), usando {}", bind_raw, e, DEFAULT_BIND_ADDR);
            SocketAddr::from(([0, 0, 0, 0], 3000))
        });

        // Só cria o admin inicial se AMBAS as variáveis estiverem definidas
        let admin_bootstrap = match (env::var("ADMIN_BOOTSTRAP_ID"), env::var("ADMIN_BOOTSTRAP_PASSWORD")) {
            (Ok(id), Ok(password)) if !id.trim().is_empty() && !password.is_empty() => {
                Some(AdminBootstrap { id: id.trim().to_string(), password })
            }
            _ => None,
        };

        Ok(Self {
            database_url,
            session_secret,
            bind_addr,
            admin_bootstrap,
        })
    }
}

fn check_session_secret(secret: &str) -> AppResult<()> {
    if secret.len() < MIN_SESSION_SECRET_LEN {
        tracing::error!("❌ SESSION_SECRET tem {} bytes, são precisos {}.", secret.len(), MIN_SESSION_SECRET_LEN);
        return Err(AppError::InvalidConfig(format!(
            "SESSION_SECRET deve ter pelo menos {} bytes",
            MIN_SESSION_SECRET_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_cookies::Key;

    #[test]
    fn short_session_secret_is_refused() {
        let err = check_session_secret("curta").unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));
    }

    #[test]
    fn accepted_secret_is_a_valid_cookie_key() {
        let secret = "x".repeat(MIN_SESSION_SECRET_LEN);
        assert!(check_session_secret(&secret).is_ok());
        assert!(Key::try_from(secret.as_bytes()).is_ok());
    }
}

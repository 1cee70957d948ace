// src/error.rs
use axum::{http::StatusCode, response::Html, response::IntoResponse};
use thiserror::Error;

/// Erros do núcleo de geração de slots (funções puras, nunca transitórios).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("Formato de hora inválido: '{0}' (esperado HH:MM ou HH:MM:SS)")]
    InvalidTimeFormat(String),

    // Guarda TODOS os campos com problema, para a UI os mostrar de uma vez
    #[error("Pedido de geração inválido: {}", .0.join(", "))]
    InvalidRequest(Vec<String>),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Erro na base de dados: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Erro de migração da base de dados: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Erro de variável de ambiente: {0}")]
    EnvVarError(#[from] std::env::VarError),

    #[error("Erro ao processar password")]
    PasswordHashingError,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Erro na sessão: {0}")]
    SessionError(String),

    #[error("Slots: {0}")]
    Slot(#[from] SlotError),

    #[error("Campos inválidos: {}", .0.join(", "))]
    InvalidInput(Vec<String>),

    #[error("Corpo JSON inválido: {0}")]
    MalformedJson(String),

    #[error("Configuração inválida: {0}")]
    InvalidConfig(String),

    #[error("Não encontrado: {0}")]
    NotFound(String),

    #[error("Operação em conflito: {0}")]
    Conflict(String),

    #[error("Erro interno inesperado")]
    InternalServerError,

    #[error("Não autorizado")]
    Unauthorized,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Unauthorized => StatusCode::FORBIDDEN,
            AppError::Slot(_) | AppError::InvalidInput(_) | AppError::MalformedJson(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Mensagem segura para mostrar ao utilizador (sem detalhes internos).
    pub fn user_message(&self) -> String {
        match self {
            AppError::SqlxError(_) | AppError::SqlxMigrateError(_) => "Erro ao aceder aos dados.".into(),
            AppError::EnvVarError(_) | AppError::InvalidConfig(_) => "Erro de configuração.".into(),
            AppError::PasswordHashingError => "Erro ao processar credenciais.".into(),
            AppError::InvalidCredentials => "ID ou senha inválidos.".into(),
            AppError::SessionError(_) => "Erro na gestão da sua sessão.".into(),
            AppError::Unauthorized => "Não tem permissão para aceder a esta página.".into(),
            AppError::Slot(e) => e.to_string(),
            AppError::InvalidInput(fields) => format!("Verifique os campos: {}.", fields.join(", ")),
            AppError::MalformedJson(detail) => format!("Pedido mal formado: {}", detail),
            AppError::NotFound(what) => format!("{} não encontrado.", what),
            AppError::Conflict(msg) => msg.clone(),
            AppError::InternalServerError => "Ocorreu um erro inesperado.".into(),
        }
    }
}

// Como converter AppError numa resposta HTTP
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // Loga o erro detalhado no servidor
        tracing::error!("Erro processado: {:?}", self);

        let status = self.status_code();
        // A mensagem pode conter texto do utilizador (ex: hora mal escrita)
        let user_message = self
            .user_message()
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;");

        (status, Html(format!(r#"
            <!DOCTYPE html><html><head><title>Erro</title><style>body{{font-family:sans-serif;}}</style></head>
            <body><h1>Erro {status_code}</h1><p>{message}</p><a href="javascript:history.back()">Voltar</a></body></html>
         "#, status_code=status.as_u16(), message=user_message))).into_response()
    }
}

// Tipo Result padrão para a aplicação
pub type AppResult<T = ()> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_request_lists_every_field() {
        let err = SlotError::InvalidRequest(vec!["facility_id".into(), "period_count".into()]);
        assert_eq!(err.to_string(), "Pedido de geração inválido: facility_id, period_count");
    }

    #[test]
    fn slot_errors_are_bad_requests() {
        let err = AppError::from(SlotError::InvalidTimeFormat("25:99".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.user_message().contains("25:99"));
    }
}

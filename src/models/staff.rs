// src/models/staff.rs
use serde::Deserialize;
use sqlx::FromRow;

/// Conta da equipa lida da tabela `staff`.
#[derive(Debug, Clone, FromRow)]
pub struct Staff {
    pub id: String,
    pub password_hash: String,
    pub name: String,
}

// Struct para dados do formulário de login
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(rename = "username")] // Mapeia do HTML 'username'
    pub id: String,
    pub password: String,
}

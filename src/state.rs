// src/state.rs
use crate::models::notice::Notice;
use axum::extract::ws::Message;
use sqlx::SqlitePool;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, Mutex};
use tower_cookies::Key;
use uuid::Uuid;

// Tipo para o 'sender' de uma conexão WebSocket individual
type WsTx = mpsc::Sender<Message>;

/// Canal de notificações do painel de admin ("toasts").
/// É passado explicitamente aos handlers através do AppState.
#[derive(Debug, Clone, Default)]
pub struct NoticeHub {
    pub connections: Arc<Mutex<HashMap<Uuid, WsTx>>>,
}

impl NoticeHub {
    pub async fn register(&self, conn_id: Uuid, tx: WsTx) {
        self.connections.lock().await.insert(conn_id, tx);
    }

    pub async fn unregister(&self, conn_id: &Uuid) {
        self.connections.lock().await.remove(conn_id);
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.lock().await.len()
    }

    /// Envia a notificação para TODAS as conexões ativas.
    /// Conexões cujo canal já fechou são removidas.
    pub async fn broadcast(&self, notice: &Notice) {
        let text = match serde_json::to_string(notice) {
            Ok(t) => t,
            Err(e) => {
                tracing::error!("Falha ao serializar notificação: {:?}", e);
                return;
            }
        };

        let mut connections = self.connections.lock().await;
        let message = Message::Text(text.into());
        let mut closed = Vec::new();

        for (conn_id, tx) in connections.iter() {
            // try_send: um cliente lento não bloqueia os outros
            if let Err(mpsc::error::TrySendError::Closed(_)) = tx.try_send(message.clone()) {
                closed.push(*conn_id);
            }
        }
        for conn_id in closed {
            tracing::debug!("Removendo conexão de notificações fechada: {}", conn_id);
            connections.remove(&conn_id);
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub notices: NoticeHub,
    // Chave para assinar o cookie de flash
    pub cookie_key: Key,
}

// Permite extrair o pool da DB diretamente
impl axum::extract::FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> SqlitePool {
        state.db_pool.clone()
    }
}

impl axum::extract::FromRef<AppState> for NoticeHub {
    fn from_ref(state: &AppState) -> NoticeHub {
        state.notices.clone()
    }
}

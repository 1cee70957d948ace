// src/web/notice_handlers.rs
use crate::{state::AppState, web::mw_auth::StaffId};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Extension, State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

/// GET /admin/notices/ws: upgrade para o feed de notificações do painel.
pub async fn notices_websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Extension(staff): Extension<StaffId>,
) -> impl IntoResponse {
    let staff_id = staff.0;
    tracing::info!("Upgrade WebSocket de notificações para {}", staff_id);
    ws.on_upgrade(move |socket| handle_socket(socket, state, staff_id))
}

async fn handle_socket(socket: WebSocket, state: AppState, staff_id: String) {
    let conn_id = Uuid::new_v4();
    tracing::info!("🔌 Nova conexão de notificações: {} ({})", conn_id, staff_id);

    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<Message>(32);
    state.notices.register(conn_id, tx).await;
    tracing::debug!("Conexões de notificações ativas: {}", state.notices.connection_count().await);

    // Task 1: canal -> cliente
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if ws_sender.send(msg).await.is_err() {
                tracing::debug!("Falha ao enviar para {}, a terminar.", conn_id);
                break;
            }
        }
    });

    // Task 2: o cliente não envia comandos; só esperamos pelo fecho
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = ws_receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    // Quando uma termina, a outra é abortada
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.notices.unregister(&conn_id).await;
    tracing::info!(
        "🔌 Conexão de notificações {} fechada ({} ativas).",
        conn_id,
        state.notices.connection_count().await
    );
}

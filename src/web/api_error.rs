// src/web/api_error.rs
use crate::error::{AppError, SlotError};
use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Resposta JSON para os endpoints usados pelo JavaScript do painel.
/// Inclui a lista de campos inválidos quando existe.
pub fn json_error(err: AppError) -> Response {
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!("Erro na API: {:?}", err);
    } else {
        tracing::warn!("Pedido recusado ({}): {}", status, err);
    }

    let fields: Vec<String> = match &err {
        AppError::Slot(SlotError::InvalidRequest(f)) | AppError::InvalidInput(f) => f.clone(),
        _ => Vec::new(),
    };

    (status, Json(json!({ "error": err.user_message(), "fields": fields }))).into_response()
}

/// Corpo que nem chegou a ser lido (JSON inválido, tipos errados, sem
/// Content-Type) responde com o mesmo formato `{error, fields}`.
pub fn json_rejection(rejection: JsonRejection) -> Response {
    json_error(AppError::MalformedJson(rejection.body_text()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn invalid_requests_are_400() {
        let resp = json_error(SlotError::InvalidRequest(vec!["start_date".into()]).into());
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = json_error(AppError::NotFound("Slot 9".into()));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

use axum::{body::Bytes, extract::State, Json};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::{
    api::{types::ask_message, AppState},
    error::ApiError,
    model::StructuredResponse,
    registry::ComponentSummary,
};

pub async fn ask(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StructuredResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    async move {
        let message = ask_message(&body)?;
        let answer = state.assistant.respond(&message).await;
        Ok(Json(answer.response))
    }
    .instrument(info_span!("ask", %request_id))
    .await
}

pub async fn components(State(state): State<AppState>) -> Json<Vec<ComponentSummary>> {
    Json(state.registry.summary())
}

//! Server information and event token handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;
use crate::{About, EventStatus, EventToken, Framework};

/// GET /api/version
pub async fn get_version(State(state): State<Arc<RwLock<MockState>>>) -> impl IntoResponse {
    let state = state.read().await;

    Json(About {
        version: state.version.clone(),
        timestamp: Some("2024-06-01T12:00:00Z".to_string()),
        uuid: None,
        system_uuid: None,
        application: Some("Dependency-Track".to_string()),
        framework: Some(Framework {
            name: "Alpine".to_string(),
            version: "2.2.5".to_string(),
            timestamp: None,
            uuid: None,
        }),
    })
}

/// GET /api/v1/event/token/{token}
pub async fn get_event_status(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(token): Path<String>,
) -> impl IntoResponse {
    let state = state.read().await;

    Json(EventStatus {
        processing: state.is_processing(&EventToken::new(token)),
    })
}

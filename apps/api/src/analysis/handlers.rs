//! Axum route handlers for the analysis page sessions.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::analysis::orchestrator::FormInputs;
use crate::errors::AppError;
use crate::render::{build_view, html::render_result};
use crate::state::AppState;
use crate::ui::session::{Session, SessionView};

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub view: SessionView,
}

fn find_session(state: &AppState, id: Uuid) -> Result<Arc<Session>, AppError> {
    state
        .sessions
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let (session_id, session) = state.sessions.create();
    tracing::debug!(%session_id, "Session created");
    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id,
            view: session.view(session_id),
        }),
    )
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = find_session(&state, id)?;
    Ok(Json(session.view(id)))
}

/// PUT /api/v1/sessions/:id/inputs
///
/// Replaces the form inputs. Resume text arrives already extracted.
pub async fn handle_update_inputs(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(inputs): Json<FormInputs>,
) -> Result<Json<SessionView>, AppError> {
    let session = find_session(&state, id)?;
    session.analysis.set_inputs(inputs);
    Ok(Json(session.view(id)))
}

/// POST /api/v1/sessions/:id/analyze
///
/// Enforces the input gate, then runs exactly one analysis. Remote failures
/// are not HTTP errors: they show up as notifications in the returned view.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = find_session(&state, id)?;

    let gate = session.analysis.gate();
    if let Some(reason) = gate.reason {
        return Err(AppError::Validation(reason.message()));
    }
    if gate.in_flight {
        return Err(AppError::Conflict("An analysis is already running".to_string()));
    }

    session.copies.clear();
    if session
        .analysis
        .analyze(state.analyzer.as_ref(), &session.notifications)
        .await
        .is_none()
        && session.analysis.is_in_flight()
    {
        // Lost the race to a concurrent click on the same page.
        return Err(AppError::Conflict("An analysis is already running".to_string()));
    }

    Ok(Json(session.view(id)))
}

/// POST /api/v1/sessions/:id/suggestions/:index/copy
pub async fn handle_copy_suggestion(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<SessionView>, AppError> {
    let session = find_session(&state, id)?;

    let text = session
        .analysis
        .result()
        .and_then(|r| r.suggestions().get(index).map(|s| s.suggested_rewrite.clone()))
        .ok_or_else(|| AppError::NotFound(format!("Suggestion {index} not found")))?;

    session
        .copies
        .copy(index, &text, state.clipboard.as_ref(), &session.notifications)
        .await;

    Ok(Json(session.view(id)))
}

/// GET /api/v1/sessions/:id/report
///
/// HTML fragment for the results region; 204 when there is no result yet.
/// The first fragment after a new result carries the scroll marker.
pub async fn handle_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let session = find_session(&state, id)?;

    let fragment = session.analysis.result().map(|r| {
        let view = build_view(
            &r,
            session.copies.copied_index(),
            session.analysis.take_scroll_request(),
        );
        render_result(&view)
    });

    Ok(match fragment {
        Some(html) => (
            StatusCode::OK,
            [(header::CACHE_CONTROL, "no-store")],
            Html(html),
        )
            .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// DELETE /api/v1/sessions/:id
///
/// The page is gone; its result goes with it.
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {id} not found")))
    }
}

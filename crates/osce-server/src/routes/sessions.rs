use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError};
use uuid::Uuid;

use osce_core::models::exam::{ChecklistItem, ExamChecklist};
use osce_core::models::phase::Phase;
use osce_core::models::session::SessionMode;
use osce_core::models::vitals::Vitals;
use osce_practice::error::PracticeError;
use osce_practice::session::{PracticeSession, SessionEvent, SessionSnapshot};

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::registry::SessionHandle;
use crate::state::AppState;

/// Extra wait on top of the configured reply delay before giving up on a
/// patient reply.
const REPLY_GRACE: Duration = Duration::from_secs(5);

/// Look up a live session the caller may act on. Students only reach their
/// own sessions; graders reach any.
pub(crate) async fn session_for(
    state: &AppState,
    id: Uuid,
    user: &AuthUser,
) -> Result<SessionHandle, ApiError> {
    let handle = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("session not found: {id}")))?;

    if handle.owner != user.sub && !user.role.can_grade() {
        return Err(ApiError::Forbidden("session belongs to another user".into()));
    }
    Ok(handle)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    pub case_id: String,
    pub station_id: String,
    #[serde(default)]
    pub mode: SessionMode,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionResponse {
    pub session_id: Uuid,
    pub phase: Phase,
}

pub async fn start_session(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<StartSessionRequest>,
) -> Result<Json<StartSessionResponse>, ApiError> {
    let station = state
        .config
        .station(&req.station_id)
        .ok_or_else(|| ApiError::NotFound(format!("unknown station: {}", req.station_id)))?;
    let case = state.catalog.require(&req.case_id)?;

    let mut session = PracticeSession::new(
        station.id.clone(),
        req.mode,
        Arc::clone(&state.responder),
        state.session_timing(),
    );
    session.select_case(case)?;
    let phase = session.phase();

    let handle = state.sessions.insert(session, user.sub.clone()).await;
    tracing::info!(
        session_id = %handle.id,
        case_id = %req.case_id,
        station_id = %station.id,
        mode = %req.mode,
        role = ?user.role,
        "session started"
    );

    Ok(Json(StartSessionResponse {
        session_id: handle.id,
        phase,
    }))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let handle = session_for(&state, id, &user).await?;
    Ok(Json(handle.with_session(|s| s.snapshot()).await))
}

pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> Result<StatusCode, ApiError> {
    session_for(&state, id, &user).await?;
    if !state.sessions.close(id).await {
        return Err(ApiError::NotFound(format!("session not found: {id}")));
    }
    Ok(StatusCode::OK)
}

#[derive(Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    /// `None` if the session closed before the patient answered.
    pub patient_reply: Option<String>,
}

/// Ask the simulated patient a question and wait for the reply.
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let handle = session_for(&state, id, &user).await?;

    // Subscribe before asking so the reply cannot slip past.
    let mut events = handle.subscribe();
    handle.with_session(|s| s.ask(&req.text)).await?;

    let within = state.config.timing.reply_delay() + REPLY_GRACE;
    let patient_reply = wait_for_reply(&mut events, within).await;
    if patient_reply.is_none() {
        tracing::warn!(session_id = %id, "no patient reply before timeout");
    }

    Ok(Json(MessageResponse { patient_reply }))
}

async fn wait_for_reply(
    events: &mut broadcast::Receiver<SessionEvent>,
    within: Duration,
) -> Option<String> {
    let wait = async {
        loop {
            match events.recv().await {
                Ok(SessionEvent::PatientReplied { content }) => return Some(content),
                Ok(SessionEvent::TornDown) | Err(RecvError::Closed) => return None,
                Ok(_) | Err(RecvError::Lagged(_)) => continue,
            }
        }
    };
    tokio::time::timeout(within, wait).await.ok().flatten()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamineRequest {
    pub zone_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamineResponse {
    pub finding: String,
    pub zone_label: String,
}

pub async fn examine(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ExamineRequest>,
) -> Result<Json<ExamineResponse>, ApiError> {
    let handle = session_for(&state, id, &user).await?;
    let entry = handle.with_session(|s| s.examine_zone_id(&req.zone_id)).await?;
    Ok(Json(ExamineResponse {
        finding: entry.finding,
        zone_label: entry.zone_label,
    }))
}

pub async fn toggle_checklist_item(
    State(state): State<AppState>,
    Path((id, item)): Path<(Uuid, String)>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ExamChecklist>, ApiError> {
    let item: ChecklistItem = item.parse()?;
    let handle = session_for(&state, id, &user).await?;
    let checklist = handle
        .with_session(|s| -> Result<ExamChecklist, PracticeError> {
            s.toggle_checklist_item(item)?;
            Ok(s.exam_checklist())
        })
        .await?;
    Ok(Json(checklist))
}

#[derive(Serialize)]
pub struct DeteriorateResponse {
    /// False if the patient had already deteriorated.
    pub changed: bool,
    pub vitals: Vitals,
}

pub async fn trigger_deterioration(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DeteriorateResponse>, ApiError> {
    let handle = session_for(&state, id, &user).await?;
    let (changed, vitals) = handle
        .with_session(|s| s.trigger_deterioration().map(|changed| (changed, s.vitals())))
        .await?;
    Ok(Json(DeteriorateResponse { changed, vitals }))
}

#[derive(Serialize)]
pub struct PhaseResponse {
    pub phase: Phase,
}

/// Take the forward edge out of the current phase.
pub async fn advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<PhaseResponse>, ApiError> {
    let handle = session_for(&state, id, &user).await?;
    let phase = handle.with_session(|s| s.advance()).await?;
    Ok(Json(PhaseResponse { phase }))
}

pub async fn return_to_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<PhaseResponse>, ApiError> {
    let handle = session_for(&state, id, &user).await?;
    let phase = handle
        .with_session(|s| s.return_to_history().map(|()| s.phase()))
        .await?;
    Ok(Json(PhaseResponse { phase }))
}

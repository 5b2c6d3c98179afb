use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use uuid::Uuid;

use osce_core::models::evaluation::{Evaluation, EvaluationInputs, RubricScores};
use osce_core::models::exam::HistoryChecklist;
use osce_practice::error::PracticeError;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::routes::sessions::session_for;
use crate::state::AppState;

fn require_grader(user: &AuthUser) -> Result<(), ApiError> {
    if user.role.can_grade() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "only instructors and admins may grade sessions".into(),
        ))
    }
}

/// Store the student's red-flag and diagnosis answers.
pub async fn set_evaluation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
    Json(inputs): Json<EvaluationInputs>,
) -> Result<Json<EvaluationInputs>, ApiError> {
    let handle = session_for(&state, id, &user).await?;
    let stored = handle
        .with_session(|s| -> Result<EvaluationInputs, PracticeError> {
            s.set_evaluation(inputs)?;
            Ok(s.evaluation().clone())
        })
        .await?;
    Ok(Json(stored))
}

pub async fn record_rubric(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
    Json(rubric): Json<RubricScores>,
) -> Result<Json<RubricScores>, ApiError> {
    require_grader(&user)?;
    let handle = session_for(&state, id, &user).await?;
    handle.with_session(|s| s.record_rubric(rubric)).await?;
    tracing::info!(session_id = %id, grader = %user.sub, total = rubric.total(), "rubric recorded");
    Ok(Json(rubric))
}

/// Replace the keyword-detected history checklist with a grader's own.
pub async fn record_history_checklist(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
    Json(checklist): Json<HistoryChecklist>,
) -> Result<Json<HistoryChecklist>, ApiError> {
    require_grader(&user)?;
    let handle = session_for(&state, id, &user).await?;
    handle
        .with_session(|s| s.record_history_checklist(checklist))
        .await?;
    Ok(Json(checklist))
}

/// Score the session and start the completion countdown.
pub async fn finish_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Evaluation>, ApiError> {
    let handle = session_for(&state, id, &user).await?;
    let (result, case_id) = handle
        .with_session(|s| {
            s.finish_session()
                .map(|result| (result, s.case().map(|c| c.id().to_string())))
        })
        .await?;

    // Picked up by the results store downstream.
    tracing::info!(
        session_id = %id,
        owner = %handle.owner,
        case_id = case_id.as_deref().unwrap_or_default(),
        score = result.score,
        feedback = %result.feedback,
        "session_scored"
    );

    Ok(Json(result))
}

/// Skip the completion countdown.
pub async fn return_now(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> Result<StatusCode, ApiError> {
    let handle = session_for(&state, id, &user).await?;
    handle.with_session(|s| s.return_now()).await?;
    state.sessions.close(id).await;
    Ok(StatusCode::OK)
}

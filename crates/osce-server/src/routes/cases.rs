use axum::extract::{Path, State};
use axum::Json;

use osce_cases::catalog::CaseDetail;
use osce_cases::zones::all_zones;
use osce_core::models::case::CaseSummary;
use osce_core::models::zone::BodyZone;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_cases(State(state): State<AppState>) -> Json<Vec<CaseSummary>> {
    Json(state.catalog.summaries())
}

/// Case detail for the selection screen. Patient replies stay server-side.
pub async fn get_case_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CaseDetail>, ApiError> {
    Ok(Json(state.catalog.detail(&id)?))
}

pub async fn list_zones() -> Json<Vec<BodyZone>> {
    Json(all_zones().to_vec())
}

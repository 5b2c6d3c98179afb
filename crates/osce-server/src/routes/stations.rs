use axum::extract::State;
use axum::Json;

use osce_core::models::session::Station;

use crate::state::AppState;

pub async fn list_stations(State(state): State<AppState>) -> Json<Vec<Station>> {
    Json(state.config.stations.clone())
}

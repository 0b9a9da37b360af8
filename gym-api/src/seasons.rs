use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};

use gym_core::Season;

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/seasons", get(list_seasons))
        .route("/api/seasons/{id}", get(get_season))
}

async fn list_seasons(State(state): State<AppState>) -> Result<Json<Vec<Season>>, AppError> {
    let seasons = state.catalog.list_seasons().await?;
    Ok(Json(seasons))
}

async fn get_season(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Season>, AppError> {
    let Path(id) = id?;
    let season = state.catalog.get_season(id).await?;
    Ok(Json(season))
}

use std::sync::Arc;

use gym_core::repository::SeasonRepository;
use gym_core::{CoreError, CoreResult, Season};

/// Read-only view of the season catalog
pub struct Catalog {
    seasons: Arc<dyn SeasonRepository>,
}

impl Catalog {
    pub fn new(seasons: Arc<dyn SeasonRepository>) -> Self {
        Self { seasons }
    }

    pub async fn list_seasons(&self) -> CoreResult<Vec<Season>> {
        self.seasons.list_seasons().await
    }

    pub async fn get_season(&self, id: i64) -> CoreResult<Season> {
        self.seasons
            .get_season(id)
            .await?
            .ok_or(CoreError::SeasonNotFound(id))
    }
}

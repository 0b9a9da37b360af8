use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::{CoreError, CoreResult};

/// A fixed-duration membership program with finite enrollment capacity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Season {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    /// Length of the program in weeks
    pub duration: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub capacity: i64,
    pub available_slots: i64,
}

impl Season {
    pub fn is_full(&self) -> bool {
        self.available_slots <= 0
    }
}

/// Season definition used for seeding. Slots start out equal to capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSeason {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub duration: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub capacity: i64,
}

impl NewSeason {
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ValidationError("Season name is required".to_string()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(CoreError::ValidationError(format!("Invalid price for season {}", self.name)));
        }
        if self.duration <= 0 {
            return Err(CoreError::ValidationError(format!("Invalid duration for season {}", self.name)));
        }
        if self.capacity < 0 {
            return Err(CoreError::ValidationError(format!("Invalid capacity for season {}", self.name)));
        }
        if self.end_date < self.start_date {
            return Err(CoreError::ValidationError(format!("Season {} ends before it starts", self.name)));
        }
        Ok(())
    }
}

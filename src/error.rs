use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgroError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Profile build failed for farm {farm_id}: {reason}")]
    ProfileBuild { farm_id: String, reason: String },

    #[error("Scoring error for variety {variety_id}: {reason}")]
    Scoring { variety_id: String, reason: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl AgroError {
    pub fn profile(farm_id: impl Into<String>, reason: impl Into<String>) -> Self {
        AgroError::ProfileBuild {
            farm_id: farm_id.into(),
            reason: reason.into(),
        }
    }

    pub fn scoring(variety_id: impl Into<String>, reason: impl Into<String>) -> Self {
        AgroError::Scoring {
            variety_id: variety_id.into(),
            reason: reason.into(),
        }
    }

    /// Errors that abort a whole batch run rather than a single farm or variety.
    pub fn is_fatal_to_run(&self) -> bool {
        !matches!(
            self,
            AgroError::ProfileBuild { .. } | AgroError::Scoring { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AgroError>;

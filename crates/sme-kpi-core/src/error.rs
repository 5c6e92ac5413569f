use thiserror::Error;

#[derive(Debug, Error)]
pub enum KpiError {
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("dataset contains no rows")]
    EmptyDataset,

    #[error("invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for KpiError {
    fn from(e: serde_json::Error) -> Self {
        KpiError::SerializationError(e.to_string())
    }
}

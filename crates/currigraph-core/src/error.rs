use thiserror::Error;

#[derive(Error, Debug)]
pub enum CurriGraphError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Computation failed: {0}")]
    Computation(String),

    #[error("Unit exceeded time budget of {0:?}")]
    TimeBudgetExceeded(std::time::Duration),
}

pub type Result<T> = std::result::Result<T, CurriGraphError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoptError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Illegal configuration: {0}")]
    Config(String),

    #[error("Illegal frequency data: {0}")]
    Data(String),

    #[error("Illegal layout sequence: {0}")]
    Sequence(String),
}

pub type LpResult<T> = Result<T, LayoptError>;

// src/error.rs
use thiserror::Error;

pub type InsightResult<T> = Result<T, InsightError>;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("File size {size} bytes exceeds the {limit} byte upload limit")]
    FileTooLarge { size: u64, limit: u64 },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("Service rejected the request: {message}")]
    Rejected { message: String },
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Request cancelled")]
    Cancelled,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Progress simulator error: {0}")]
    Simulator(String),
}

/// Failures while turning mind-map data into something visible.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Mind map data is unavailable")]
    Unavailable,
    #[error("Failed to export mind map: {0}")]
    Export(#[from] std::io::Error),
}

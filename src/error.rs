use std::path::PathBuf;
use thiserror::Error;

use crate::extractors::{ExtractError, ExtractionMethod};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to read {} with {method}: {source}", .path.display())]
    Extraction {
        path: PathBuf,
        method: ExtractionMethod,
        #[source]
        source: ExtractError,
    },
}

//! Load a saved provider response from disk (offline reconcile).

use std::path::Path;

use tracing::info;

use crate::data::decode::{TimeseriesResponse, decode_response};
use crate::error::AppError;

pub fn read_response_file(path: &Path) -> Result<TimeseriesResponse, AppError> {
    let body = std::fs::read_to_string(path)
        .map_err(|e| AppError::config(format!("Failed to read input '{}': {e}", path.display())))?;
    let resp = decode_response(&body)?;
    info!(path = %path.display(), "loaded saved rates response");
    Ok(resp)
}

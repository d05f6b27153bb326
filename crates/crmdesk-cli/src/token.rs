//! Bearer credential file storage.
//!
//! The credential lives in a single local file between invocations; its
//! absence means "not authenticated". One active identity at a time —
//! logging in overwrites whatever was stored.

use std::fs;
use std::path::PathBuf;

use crmdesk_core::error::AppError;
use crmdesk_core::result::AppResult;

const DEFAULT_TOKEN_FILE: &str = ".crmdesk_token";

/// The credential file location, overridable via `CRMDESK_TOKEN_FILE`.
pub fn path() -> PathBuf {
    std::env::var("CRMDESK_TOKEN_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_TOKEN_FILE))
}

/// Read the stored credential, if any.
pub fn read() -> AppResult<Option<String>> {
    let path = path();
    if !path.exists() {
        return Ok(None);
    }
    let token = fs::read_to_string(&path)
        .map_err(|e| AppError::internal(format!("Failed to read credential file: {e}")))?;
    let token = token.trim().to_string();
    Ok(if token.is_empty() { None } else { Some(token) })
}

/// Store a credential, replacing any previous one.
pub fn write(token: &str) -> AppResult<()> {
    fs::write(path(), token)
        .map_err(|e| AppError::internal(format!("Failed to write credential file: {e}")))
}

/// Delete the stored credential. Deleting an absent file is not an error.
pub fn clear() -> AppResult<()> {
    let path = path();
    if path.exists() {
        fs::remove_file(&path)
            .map_err(|e| AppError::internal(format!("Failed to delete credential file: {e}")))?;
    }
    Ok(())
}

//! Profile store: the user's base résumé as a JSON file on disk.

use std::io::ErrorKind;
use std::path::Path;

use tracing::{info, warn};

use crate::errors::FitError;
use crate::models::document::Document;

/// Loads the base profile at `path`.
///
/// A missing file is not an error: the placeholder profile is returned so a fresh
/// install still renders a page. Unreadable or malformed files are errors.
pub fn load_profile(path: impl AsRef<Path>) -> Result<Document, FitError> {
    let path = path.as_ref();
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "No profile uploaded yet; using placeholder");
            return Ok(Document::placeholder());
        }
        Err(e) => return Err(e.into()),
    };

    let doc = parse_document(&raw)?;
    info!(
        path = %path.display(),
        name = %doc.name,
        bullets = doc.bullet_count(),
        "Profile loaded"
    );
    Ok(doc)
}

/// Parses a document from JSON text.
pub fn parse_document(raw: &str) -> Result<Document, FitError> {
    Ok(serde_json::from_str(raw)?)
}

//! File import/export, the only asynchronous boundary.

use std::path::Path;

use chrono::{DateTime, Utc};

use super::document::SnapshotDocument;
use super::r#trait::SnapshotError;

/// Read and parse a whole snapshot document.
///
/// A document without drawers gets the default layout.
pub async fn import_file(path: impl AsRef<Path>) -> Result<SnapshotDocument, SnapshotError> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path).await?;
    let document = SnapshotDocument::parse_import(&text)?;
    tracing::info!(
        path = %path.display(),
        items = document.items.len(),
        categories = document.categories.len(),
        drawers = document.drawers.len(),
        "snapshot imported"
    );
    Ok(document)
}

/// Write `document` as pretty JSON to `path`.
pub async fn export_file(
    path: impl AsRef<Path>,
    document: &SnapshotDocument,
) -> Result<(), SnapshotError> {
    let path = path.as_ref();
    tokio::fs::write(path, document.render()?).await?;
    tracing::info!(
        path = %path.display(),
        items = document.items.len(),
        "snapshot exported"
    );
    Ok(())
}

/// Suggested export file name, e.g. `toolbox-2025-06-01.json`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("toolbox-{}.json", now.format("%Y-%m-%d"))
}

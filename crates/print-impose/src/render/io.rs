//! Document I/O for proof sheets

use crate::handler::LayoutContext;
use crate::types::*;
use lopdf::Document;
use std::path::Path;

use super::page::render_proof_sheet;

/// Render a proof off the async executor
pub async fn render_proof(context: LayoutContext, marks: ProofMarks) -> Result<Document> {
    tokio::task::spawn_blocking(move || render_proof_sheet(&context, &marks)).await?
}

/// Save a proof document
pub async fn save_pdf(mut doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::task::spawn_blocking(move || {
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok::<_, ImposeError>(writer)
    })
    .await??;
    tokio::fs::write(&path, bytes).await?;
    log::info!("Wrote proof to {}", path.display());
    Ok(())
}

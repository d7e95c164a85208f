//! Writing a session's document and artifacts to disk

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use simplify_core::ContractSession;

/// One file ready to be written
#[derive(Debug)]
pub struct OutputFile {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Collect the JSON document plus whichever artifacts are fresh.
///
/// Names follow `simplificado_<upload name>.<ext>`. The PDF is skipped when
/// `include_pdf` is false or the renderer produced none.
pub fn collect_outputs(
    session: &ContractSession,
    out_dir: &Path,
    include_pdf: bool,
) -> Result<Vec<OutputFile>> {
    let document = session
        .document()
        .context("session has no simplified document")?;

    let mut files = vec![OutputFile {
        path: out_dir.join(session.download_name("json")),
        bytes: document.to_json_pretty()?.into_bytes(),
    }];

    match session.artifacts() {
        Some(artifacts) => {
            files.push(OutputFile {
                path: out_dir.join(session.download_name("html")),
                bytes: artifacts.html.clone().into_bytes(),
            });
            if include_pdf && !artifacts.pdf.is_empty() {
                files.push(OutputFile {
                    path: out_dir.join(session.download_name("pdf")),
                    bytes: artifacts.pdf.clone(),
                });
            }
        }
        None => tracing::warn!(
            "No rendered artifacts for revision {}; writing JSON only",
            session.revision()
        ),
    }

    Ok(files)
}

pub fn write_outputs(files: &[OutputFile]) -> Result<()> {
    for file in files {
        if let Some(parent) = file.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&file.path, &file.bytes)
            .with_context(|| format!("writing {}", file.path.display()))?;
        tracing::debug!("Wrote {} bytes to {}", file.bytes.len(), file.path.display());
    }
    Ok(())
}

//! DOCX text extraction
//!
//! A `.docx` file is a zip container; the body lives in
//! `word/document.xml`. Each `<w:p>` paragraph becomes one line of output,
//! built from its `<w:t>` runs (with `<w:tab>` and `<w:br>` honored).
//! Empty paragraphs are skipped.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use roxmltree::{Node, NodeId};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::ExtractionError;

const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const DOCUMENT_PART: &str = "word/document.xml";

/// Upper bound on the decompressed document part
const MAX_DOCUMENT_PART_BYTES: u64 = 64 * 1024 * 1024;

/// OLE compound file signature; Office wraps password-protected files in it
const CFB_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

pub fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    extract_with_limit(bytes, MAX_DOCUMENT_PART_BYTES)
}

fn extract_with_limit(bytes: &[u8], limit: u64) -> Result<String, ExtractionError> {
    if bytes.starts_with(&CFB_MAGIC) {
        return Err(ExtractionError::Encrypted);
    }

    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(zip_error)?;
    let part = archive.by_name(DOCUMENT_PART).map_err(zip_error)?;

    if part.size() > limit {
        return Err(too_large(part.size(), limit));
    }

    // the declared size is not trusted; stop one byte past the limit
    let mut xml = String::new();
    part.take(limit + 1)
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::Corrupt(format!("{}: {}", DOCUMENT_PART, e)))?;
    if xml.len() as u64 > limit {
        return Err(too_large(xml.len() as u64, limit));
    }

    paragraphs_from_xml(&xml).map(|paragraphs| paragraphs.join("\n"))
}

/// Collect the text of every non-empty paragraph in document order
pub fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| ExtractionError::Corrupt(format!("{}: {}", DOCUMENT_PART, e)))?;

    let mut paragraphs: Vec<String> = Vec::new();
    let mut slots: HashMap<NodeId, usize> = HashMap::new();

    for node in doc.descendants() {
        let piece = match node.tag_name().name() {
            "t" if is_wordml(&node) => node.text().unwrap_or_default(),
            "tab" if is_wordml(&node) && in_run(&node) => "\t",
            "br" | "cr" if is_wordml(&node) && in_run(&node) => "\n",
            _ => continue,
        };

        // text boxes nest paragraphs; attribute runs to the innermost one
        let Some(paragraph) = node
            .ancestors()
            .find(|a| a.tag_name().name() == "p" && is_wordml(a))
        else {
            continue;
        };

        let slot = *slots.entry(paragraph.id()).or_insert_with(|| {
            paragraphs.push(String::new());
            paragraphs.len() - 1
        });
        paragraphs[slot].push_str(piece);
    }

    Ok(paragraphs
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect())
}

fn is_wordml(node: &Node) -> bool {
    node.tag_name().namespace() == Some(WORDML_NS)
}

/// Tab stops in paragraph properties are also `<w:tab>`; only runs carry text
fn in_run(node: &Node) -> bool {
    node.parent()
        .is_some_and(|p| p.tag_name().name() == "r" && is_wordml(&p))
}

fn too_large(size: u64, limit: u64) -> ExtractionError {
    ExtractionError::Corrupt(format!(
        "{} expands to {} bytes (limit {})",
        DOCUMENT_PART, size, limit
    ))
}

fn zip_error(err: ZipError) -> ExtractionError {
    match err {
        ZipError::FileNotFound => {
            ExtractionError::Corrupt(format!("missing {}; not a Word document", DOCUMENT_PART))
        }
        other => {
            let message = other.to_string();
            if message.to_lowercase().contains("password") {
                ExtractionError::Encrypted
            } else {
                ExtractionError::Corrupt(message)
            }
        }
    }
}

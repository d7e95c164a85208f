//! Typst PDF compilation

use contract_types::RenderError;
use typst::diag::{Severity, SourceDiagnostic};

use crate::layout::ContractLayout;
use crate::world::ContractWorld;

/// Typst template for the simplified contract
pub const CONTRACT_TEMPLATE: &str = include_str!("../templates/simplified_contract.typ");

/// Compile a layout snapshot to PDF bytes
pub fn compile_pdf(layout: &ContractLayout) -> Result<Vec<u8>, RenderError> {
    let inputs = serde_json::to_value(layout)
        .map_err(|e| RenderError::Internal(format!("layout serialization failed: {}", e)))?;
    let world = ContractWorld::new(CONTRACT_TEMPLATE, &inputs)?;

    let warned = typst::compile(&world);
    for warning in &warned.warnings {
        tracing::debug!("Typst warning: {}", warning.message);
    }

    let document = warned.output.map_err(|diagnostics| {
        let errors = error_messages(&diagnostics);
        tracing::error!("Typst compilation failed: {}", errors.join("; "));
        RenderError::Compile(errors)
    })?;

    typst_pdf::pdf(&document, &typst_pdf::PdfOptions::default())
        .map_err(|diagnostics| RenderError::Export(error_messages(&diagnostics).join("; ")))
}

/// Messages of error-severity diagnostics, with hints appended
fn error_messages(diagnostics: &[SourceDiagnostic]) -> Vec<String> {
    let messages: Vec<String> = diagnostics
        .iter()
        .filter(|diag| diag.severity == Severity::Error)
        .map(|diag| {
            if diag.hints.is_empty() {
                diag.message.to_string()
            } else {
                let hints = diag
                    .hints
                    .iter()
                    .map(|h| h.to_string())
                    .collect::<Vec<_>>()
                    .join("; ");
                format!("{} (hint: {})", diag.message, hints)
            }
        })
        .collect();

    if messages.is_empty() {
        vec!["compilation failed with unknown error".to_string()]
    } else {
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use contract_types::{Document, Section};

    #[test]
    fn test_compiles_contract_to_pdf() {
        let document = Document::new(vec![
            Section::new("Entrega", "La casa se entrega el lunes.\nCon llaves.", "Voz activa."),
            Section::new("Pago", "Se paga cada mes.", "Lenguaje simple."),
        ]);
        let layout = ContractLayout::snapshot(&document, "arriendo.docx", Utc::now());

        let pdf = compile_pdf(&layout).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn test_markup_characters_are_plain_text() {
        let document = Document::new(vec![Section::new(
            "#let x = 1 *negrita* $x$",
            "Costo: $100 #pagina [nota] _x_ @ref <label>",
            "\\ // comentario",
        )]);
        let layout = ContractLayout::snapshot(&document, "a_b#c.pdf", Utc::now());

        assert!(compile_pdf(&layout).is_ok());
    }

    #[test]
    fn test_empty_document_compiles() {
        let layout = ContractLayout::snapshot(&Document::default(), "vacio.pdf", Utc::now());
        assert!(compile_pdf(&layout).is_ok());
    }
}

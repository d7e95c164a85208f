//! Prompt construction for ingestion and edits

use contract_types::{Document, Section};
use serde_json::json;

/// LumenLex legal-design instruction used for the initial rewrite
pub const SIMPLIFICATION_INSTRUCTION: &str = include_str!("../prompts/simplification_es.md");

pub const PARAGRAPH_REMINDER: &str = "RECUERDA: El texto simplificado de cada sección debe estar \
redactado ÚNICAMENTE en forma de párrafos corridos, sin bullets, sin listas, sin viñetas, sin \
numeraciones, sin saltos de línea innecesarios. Todas las ideas deben estar hiladas en párrafos, \
separadas solo por puntos y comas. NO uses listas ni saltos de línea para separar puntos.";

/// Prompt for the first rewrite of an extracted contract
pub fn ingest_prompt(raw_text: &str) -> String {
    format!(
        "{}\n\n{}\n\n\n## Contrato Original para Simplificar:\n\n{}",
        SIMPLIFICATION_INSTRUCTION.trim_end(),
        PARAGRAPH_REMINDER,
        raw_text
    )
}

/// Prompt asking for one refined section
pub fn section_edit_prompt(section: &Section, instruction: &str) -> String {
    format!(
        r#"Eres LumenLex. Ya simplificaste la siguiente cláusula de un contrato:

Título: {title}

Texto simplificado actual:
"""
{body}
"""

Justificación actual:
"""
{rationale}
"""

Por favor, refina este texto aplicando la siguiente instrucción:
"""
{instruction}
"""

Devuelve solo el JSON con los campos:
- section_title: el título puede ser ajustado o igual
- simplified_text: el texto refinado
- justification: una nueva justificación breve explicando el cambio (máximo 40 palabras)

Sigue exactamente este formato JSON, sin añadir texto extra fuera del JSON:
{{
  "section_title": "...",
  "simplified_text": "...",
  "justification": "..."
}}
"#,
        title = section.title,
        body = section.body,
        rationale = section.rationale,
        instruction = instruction.trim(),
    )
}

/// Prompt asking for a whole new document.
///
/// `source_text` is attached when the instruction needs material that the
/// simplified form may have dropped.
pub fn document_edit_prompt(
    document: &Document,
    instruction: &str,
    source_text: Option<&str>,
) -> String {
    let current = json!({ "sections": document.sections() });

    let mut prompt = format!(
        r#"Eres LumenLex. Ya simplificaste el siguiente contrato. Sus secciones actuales, en orden, son:

{current:#}

Aplica la siguiente instrucción a todo el documento:
"""
{instruction}
"""

Puedes ajustar, unir, dividir, reordenar, añadir o eliminar secciones si la instrucción lo requiere. Conserva sin cambios las secciones que la instrucción no afecta. Mantén la fidelidad jurídica del contrato y redacta cada texto simplificado en párrafos corridos.

Devuelve solo el JSON completo del documento, sin añadir texto extra fuera del JSON:
{{
  "sections": [
    {{
      "section_title": "...",
      "simplified_text": "...",
      "justification": "..."
    }}
  ]
}}
"#,
        current = current,
        instruction = instruction.trim(),
    );

    if let Some(source) = source_text {
        prompt.push_str("\n## Contrato Original (referencia):\n\n");
        prompt.push_str(source);
        prompt.push('\n');
    }

    prompt
}

//! Standalone HTML rendering

use std::fmt::Write;

use crate::layout::ContractLayout;

const STYLE: &str = "\
    body { font-family: sans-serif; line-height: 1.5; padding: 1cm; }
    h1 { text-align: center; color: #1a5276; }
    h2 { color: #2980b9; margin-top: 1.5em; }
    .justification { font-style: italic; font-size: 0.9em; background: #eef6fb; padding: 0.5em; }
    p { margin: 0.4em 0; }
";

/// Render a layout snapshot as a complete HTML page.
///
/// Every piece of document text is escaped; the output never contains
/// markup that came from the rewrite service.
pub fn render_html(layout: &ContractLayout) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n");
    html.push_str("  <meta charset=\"UTF-8\">\n");
    html.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    let _ = writeln!(html, "  <title>{}</title>", escape_html(&layout.document_title()));
    let _ = writeln!(html, "  <style>\n{}  </style>", STYLE);
    html.push_str("</head>\n<body>\n");

    let _ = writeln!(html, "  <h1>{}</h1>", escape_html(&layout.title));
    let _ = writeln!(
        html,
        "  <p><strong>Archivo fuente:</strong> {}</p>",
        escape_html(&layout.source)
    );
    let _ = writeln!(
        html,
        "  <p><strong>Generado el:</strong> {}</p>",
        escape_html(&layout.generated_at)
    );
    html.push_str("  <hr/>\n");

    for section in &layout.sections {
        let _ = writeln!(
            html,
            "  <h2>{}. {}</h2>",
            section.number,
            escape_html(&section.title)
        );
        for paragraph in &section.paragraphs {
            let _ = writeln!(html, "  <p>{}</p>", escape_html(paragraph));
        }
        let _ = writeln!(
            html,
            "  <div class=\"justification\"><strong>Justificación:</strong> {}</div>",
            escape_html(&section.rationale)
        );
        html.push_str("  <hr/>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

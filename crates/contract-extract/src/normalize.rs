/// Normalize extracted text into one clean blob.
///
/// - `\r\n` and lone `\r` become `\n`; form feeds (page breaks) become `\n`
/// - trailing whitespace is trimmed on every line
/// - runs of blank lines collapse to a single blank line
/// - leading and trailing blank lines are dropped
pub fn normalize_text(raw: &str) -> String {
    let unified = raw
        .replace("\r\n", "\n")
        .replace(['\r', '\x0C'], "\n");

    let mut out = String::with_capacity(unified.len());
    let mut pending_blank = false;

    for line in unified.split('\n') {
        let line = line.trim_end();
        if line.trim().is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }

        if !out.is_empty() {
            out.push('\n');
            if pending_blank {
                out.push('\n');
            }
        }
        out.push_str(line);
        pending_blank = false;
    }

    out
}

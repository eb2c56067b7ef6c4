/// Splits raw CSV text into rows of fields.
///
/// Double quotes open a quoted field, a doubled quote inside one is a
/// literal quote, `\r` is ignored everywhere so CRLF and LF both work, and a
/// leading byte-order mark is stripped. A trailing partial row with no
/// terminating newline is still emitted. Malformed quoting never fails;
/// stray characters are consumed literally.
pub fn parse_csv_text(text: &str) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let normalized = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = normalized.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(ch);
            }
            continue;
        }

        match ch {
            '"' => in_quotes = true,
            ',' => {
                row.push(std::mem::take(&mut field));
            }
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            '\r' => {}
            _ => field.push(ch),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

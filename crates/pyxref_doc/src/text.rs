//! Small text-only helpers shared by the extractor: pulling a docstring's
//! content out of its quoted source form, and dedenting it the way a
//! multi-line docstring's body is conventionally indented relative to its
//! opening quote.

/// If `text` (the full source span of an expression statement) looks like a
/// string literal — an optional `r`/`b`/`u`/`f` prefix followed by a quoted
/// body — returns its dedented content. `None` for anything else, which the
/// caller treats as "no docstring".
pub(crate) fn string_literal_body(text: &str) -> Option<String> {
    let trimmed = text.trim();
    let unprefixed = trimmed.trim_start_matches(|c: char| "rRbBuUfF".contains(c));

    for quote in ["\"\"\"", "'''"] {
        if let Some(inner) = strip_quotes(unprefixed, quote) {
            return Some(dedent(inner));
        }
    }
    for quote in ["\"", "'"] {
        if let Some(inner) = strip_quotes(unprefixed, quote) {
            return Some(inner.to_string());
        }
    }
    None
}

fn strip_quotes<'a>(text: &'a str, quote: &str) -> Option<&'a str> {
    if text.len() >= 2 * quote.len() && text.starts_with(quote) && text.ends_with(quote) {
        Some(&text[quote.len()..text.len() - quote.len()])
    } else {
        None
    }
}

/// Strips the common leading whitespace shared by every non-blank line
/// after the first (the first line sits right after the opening quote, so
/// it carries no indentation of its own to measure).
fn dedent(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let common_indent = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            out.push_str(line.trim());
        } else {
            out.push('\n');
            let stripped = line.get(common_indent.min(line.len())..).unwrap_or(line);
            out.push_str(stripped.trim_end());
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_docstring() {
        assert_eq!(string_literal_body(r#""does a thing.""#), Some("does a thing.".to_string()));
    }

    #[test]
    fn triple_quoted_dedents_body_lines() {
        let text = "\"\"\"Summary.\n\n    More detail.\n    \"\"\"";
        assert_eq!(string_literal_body(text), Some("Summary.\n\nMore detail.".to_string()));
    }

    #[test]
    fn non_string_statement_is_none() {
        assert_eq!(string_literal_body("x = 1"), None);
    }

    #[test]
    fn raw_prefix_is_recognized() {
        assert_eq!(string_literal_body(r#"r"raw""#), Some("raw".to_string()));
    }
}

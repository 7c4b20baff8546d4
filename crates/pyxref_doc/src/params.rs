//! Heuristic extraction of a single parameter's description out of a
//! docstring, recognizing the two forms seen across the ecosystem: Sphinx's
//! `:param name:` fields, and the `name: description` lines Google/NumPy
//! style "Args"/"Parameters" sections use.
//!
//! Neither form is validated against a surrounding section header — a
//! docstring that happens to contain a `name: text` line outside an "Args"
//! block will still match. `DocExtractor::parameter_doc` has no contract
//! beyond "best-effort, never an error", so this trades precision for
//! simplicity.

use std::sync::LazyLock;

use regex::Regex;

static SPHINX_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*:param\s+(?:\S+\s+)?(\w+)\s*:\s*(.*)$").unwrap());

static GOOGLE_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*(\w+)\s*(?:\([^)]*\))?\s*:\s*(.+)$").unwrap());

pub(crate) fn parameter_doc(docstring: &str, parameter_name: &str) -> Option<String> {
    find(&SPHINX_PARAM, docstring, parameter_name).or_else(|| find(&GOOGLE_PARAM, docstring, parameter_name))
}

fn find(pattern: &Regex, docstring: &str, parameter_name: &str) -> Option<String> {
    pattern.captures_iter(docstring).find_map(|caps| {
        if &caps[1] == parameter_name {
            Some(caps[2].trim().to_string())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphinx_style_param() {
        let doc = "Does a thing.\n\n:param name: the thing's name\n:param int count: how many\n";
        assert_eq!(parameter_doc(doc, "name"), Some("the thing's name".to_string()));
        assert_eq!(parameter_doc(doc, "count"), Some("how many".to_string()));
    }

    #[test]
    fn google_style_args_section() {
        let doc = "Does a thing.\n\nArgs:\n    name: the thing's name\n    count (int): how many\n";
        assert_eq!(parameter_doc(doc, "name"), Some("the thing's name".to_string()));
        assert_eq!(parameter_doc(doc, "count"), Some("how many".to_string()));
    }

    #[test]
    fn unmatched_parameter_is_none() {
        let doc = ":param name: the thing's name\n";
        assert_eq!(parameter_doc(doc, "other"), None);
    }
}

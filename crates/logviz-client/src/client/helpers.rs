//! Pure helpers (no HTTP).

use serde_json::{json, Value};

use logviz_core::{PageIndex, RunIdentity};

/// Error bodies are cut to this many characters.
pub(crate) const MAX_ERROR_BODY_CHARS: usize = 200;

pub(crate) fn truncate_body(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body.to_string(),
    }
}

pub(crate) fn run_variables(run: &RunIdentity) -> Value {
    json!({ "run_id": run.as_str() })
}

pub(crate) fn page_variables(run: &RunIdentity, page: PageIndex) -> Value {
    json!({ "run_id": run.as_str(), "page_id": page.get() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_are_kept() {
        assert_eq!(truncate_body("  Bad Gateway \n"), "Bad Gateway");
    }

    #[test]
    fn long_bodies_are_cut_on_char_boundary() {
        let body = "é".repeat(250);
        let cut = truncate_body(&body);
        assert_eq!(cut.chars().count(), MAX_ERROR_BODY_CHARS + 1);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn variables_carry_typed_ids() {
        let vars = page_variables(&RunIdentity::new("r-1"), PageIndex::new(3).unwrap());
        assert_eq!(vars, json!({"run_id": "r-1", "page_id": 3}));
    }
}

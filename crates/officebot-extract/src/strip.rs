//! Removal of transferred fields from page wikitext

use crate::fields::{is_recognized_root, split_field_name, TemplateFieldSet};
use once_cell::sync::Lazy;
use regex::Regex;

static EMPTIED_TEMPLATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\{\{([\w\s']+)\n\}\}").expect("valid template regex"));

/// Remove every recognized `| key = value` assignment from `text`
///
/// Only the first occurrence of each assignment is removed, together with
/// trailing text on the same line. A template left with nothing but its
/// name is collapsed onto one line.
#[must_use]
pub fn strip_transferred_fields(text: &str, fields: &TemplateFieldSet) -> String {
    let mut text = text.to_string();
    let mut removed = 0usize;

    for (name, value) in fields.iter() {
        let (root, _) = split_field_name(name);
        if !is_recognized_root(root) {
            continue;
        }
        let pattern = format!(
            r"\s*\|\s*{}\s*=\s*{}[^|}}\n]*",
            regex::escape(name.trim()),
            regex::escape(value.trim())
        );
        let Ok(assignment) = Regex::new(&pattern) else {
            tracing::warn!(field = name, "field not strippable");
            continue;
        };
        let replaced = assignment.replacen(&text, 1, "").into_owned();
        if replaced.len() != text.len() {
            removed += 1;
        }
        text = replaced;
    }

    tracing::debug!(removed, "stripped transferred fields");
    EMPTIED_TEMPLATE.replace_all(&text, "{{$1}}").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn removes_recognized_fields_only() {
        let text = "{{Infotaula persona\n| nom = Joan\n| carrec = Alcalde de Vic\n| inici = 1990\n}}\nText";
        let fields: TemplateFieldSet = [("nom", "Joan"), ("carrec", "Alcalde de Vic"), ("inici", "1990")]
            .into_iter()
            .collect();
        assert_eq!(
            strip_transferred_fields(text, &fields),
            "{{Infotaula persona\n| nom = Joan\n}}\nText"
        );
    }

    #[test]
    fn emptied_template_collapses() {
        let text = "{{Infotaula persona\n| carrec = Alcalde\n}}\nText";
        let fields: TemplateFieldSet = [("carrec", "Alcalde")].into_iter().collect();
        assert_eq!(strip_transferred_fields(text, &fields), "{{Infotaula persona}}\nText");
    }

    #[test]
    fn regex_metacharacters_in_values_are_literal() {
        let text = "{{Infotaula persona\n| ordre = 12è (b)\n| nom = X\n}}";
        let fields: TemplateFieldSet = [("ordre", "12è (b)")].into_iter().collect();
        assert_eq!(
            strip_transferred_fields(text, &fields),
            "{{Infotaula persona\n| nom = X\n}}"
        );
    }

    #[test]
    fn pair_fields_are_stripped() {
        let text = "{{Infotaula persona\n| k_etiqueta = circumscripció\n| k_nom = Girona\n| nom = X\n}}";
        let fields: TemplateFieldSet = [("k_etiqueta", "circumscripció"), ("k_nom", "Girona")]
            .into_iter()
            .collect();
        assert_eq!(
            strip_transferred_fields(text, &fields),
            "{{Infotaula persona\n| nom = X\n}}"
        );
    }
}

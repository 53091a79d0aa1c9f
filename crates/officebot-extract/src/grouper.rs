//! Field grouping
//!
//! Flat infobox fields (`carrec`, `inici`, `carrec2`, `final2`, …) are
//! grouped by numeric suffix into one [`PositionRecord`] per position.
//! Records keep the order in which their index first appears.

use crate::date::{is_macro, is_word, reversed_components};
use crate::fields::{pair_root, split_field_name, FieldRole, PairHalf, TemplateFieldSet};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Coupled `{letter}_etiqueta` / `{letter}_nom` fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelPair {
    /// Pair letter (`a`, `b`, `e`, `f`, `k`, `l`)
    pub letter: char,
    /// Free-text label naming what the value is
    pub label: String,
    /// Raw value
    pub name: String,
}

/// A pair with only one half present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairWarning {
    /// Pair letter
    pub letter: char,
    /// Half that was missing
    pub missing: PairHalf,
}

/// Fields of one position, grouped by suffix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRecord {
    index: String,
    title: Option<String>,
    title_inherited: bool,
    fields: IndexMap<FieldRole, String>,
    pairs: Vec<LabelPair>,
    warnings: Vec<PairWarning>,
}

impl PositionRecord {
    /// Numeric suffix shared by the record's fields
    #[inline]
    #[must_use]
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Raw title text, own or propagated
    #[inline]
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// True when the title came from the preceding record
    #[inline]
    #[must_use]
    pub fn title_inherited(&self) -> bool {
        self.title_inherited
    }

    /// Non-title roles with their raw text, in template order
    pub fn fields(&self) -> impl Iterator<Item = (FieldRole, &str)> {
        self.fields.iter().map(|(role, value)| (*role, value.as_str()))
    }

    /// Raw text for one role
    #[must_use]
    pub fn field(&self, role: FieldRole) -> Option<&str> {
        self.fields.get(&role).map(String::as_str)
    }

    /// Complete label/name pairs
    #[inline]
    #[must_use]
    pub fn pairs(&self) -> &[LabelPair] {
        &self.pairs
    }

    /// Dangling pair halves
    #[inline]
    #[must_use]
    pub fn warnings(&self) -> &[PairWarning] {
        &self.warnings
    }
}

#[derive(Default)]
struct Draft {
    title: Option<String>,
    fields: IndexMap<FieldRole, String>,
    labels: IndexMap<char, String>,
    names: IndexMap<char, String>,
}

/// Group flat template fields into position records
///
/// Unrecognized roots are dropped. A record without its own title inherits
/// the title of the record immediately before it; the first record stays
/// title-less when it has none.
#[must_use]
pub fn group_positions(fields: &TemplateFieldSet) -> Vec<PositionRecord> {
    let mut drafts: IndexMap<String, Draft> = IndexMap::new();

    for (name, value) in fields.iter() {
        let (root, index) = split_field_name(name);
        let value = value.trim().to_string();

        if let Some(role) = FieldRole::from_root(root) {
            let draft = drafts.entry(index.to_string()).or_default();
            if role == FieldRole::Title {
                draft.title = Some(value);
            } else {
                draft.fields.insert(role, value);
            }
        } else if let Some((letter, half)) = pair_root(root) {
            let draft = drafts.entry(index.to_string()).or_default();
            match half {
                PairHalf::Label => draft.labels.insert(letter, value),
                PairHalf::Name => draft.names.insert(letter, value),
            };
        }
    }

    let mut records = Vec::with_capacity(drafts.len());
    let mut previous_title: Option<String> = None;

    for (index, draft) in drafts {
        let (title, title_inherited) = match draft.title {
            Some(title) => (Some(title), false),
            None => (previous_title.clone(), previous_title.is_some()),
        };
        previous_title.clone_from(&title);

        let mut fields = draft.fields;
        propagate_end_year(&mut fields);

        let (pairs, warnings) = couple_pairs(&index, draft.labels, draft.names);

        records.push(PositionRecord {
            index,
            title,
            title_inherited,
            fields,
            pairs,
            warnings,
        });
    }

    tracing::debug!(records = records.len(), "grouped infobox fields");
    records
}

fn couple_pairs(
    index: &str,
    mut labels: IndexMap<char, String>,
    mut names: IndexMap<char, String>,
) -> (Vec<LabelPair>, Vec<PairWarning>) {
    let mut pairs = Vec::new();
    let mut warnings = Vec::new();

    for (letter, label) in labels.drain(..) {
        match names.shift_remove(&letter) {
            Some(name) => pairs.push(LabelPair { letter, label, name }),
            None => {
                tracing::warn!(index, %letter, "pair label without name");
                warnings.push(PairWarning {
                    letter,
                    missing: PairHalf::Name,
                });
            }
        }
    }
    for letter in names.into_keys() {
        tracing::warn!(index, %letter, "pair name without label");
        warnings.push(PairWarning {
            letter,
            missing: PairHalf::Label,
        });
    }

    (pairs, warnings)
}

/// `inici = 12 de març`, `final = 1990` → `inici = 12 de març de 1990`
fn propagate_end_year(fields: &mut IndexMap<FieldRole, String>) {
    let (Some(start), Some(end)) = (fields.get(&FieldRole::Start), fields.get(&FieldRole::End))
    else {
        return;
    };
    if is_macro(start) || is_macro(end) {
        return;
    }
    let start_parts = reversed_components(start);
    let end_parts = reversed_components(end);
    let (Some(start_last), Some(end_last)) = (start_parts.first(), end_parts.first()) else {
        return;
    };
    if is_word(start_last) && !is_word(end_last) && !end_last.is_empty() {
        let completed = format!("{start} de {end_last}");
        fields.insert(FieldRole::Start, completed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(pairs: &[(&str, &str)]) -> TemplateFieldSet {
        pairs.iter().copied().collect()
    }

    #[test]
    fn groups_by_suffix_in_order_of_appearance() {
        let records = group_positions(&set(&[
            ("carrec", "Alcalde de Vic"),
            ("inici", "1990"),
            ("carrec2", "Diputat"),
            ("final", "1995"),
        ]));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].index(), "1");
        assert_eq!(records[0].field(FieldRole::End), Some("1995"));
        assert_eq!(records[1].title(), Some("Diputat"));
    }

    #[test]
    fn title_propagates_forward() {
        let records = group_positions(&set(&[
            ("carrec", "Diputat al [[Congrés dels Diputats]]"),
            ("inici", "1977"),
            ("inici2", "1979"),
            ("inici3", "1982"),
        ]));
        assert_eq!(records.len(), 3);
        assert!(!records[0].title_inherited());
        assert_eq!(records[2].title(), Some("Diputat al [[Congrés dels Diputats]]"));
        assert!(records[2].title_inherited());
    }

    #[test]
    fn leading_record_without_title_stays_untitled() {
        let records = group_positions(&set(&[("inici", "1977"), ("carrec2", "Alcalde")]));
        assert_eq!(records[0].title(), None);
        assert_eq!(records[1].title(), Some("Alcalde"));
    }

    #[test]
    fn unrecognized_roots_are_dropped() {
        let records = group_positions(&set(&[("nom", "Joan"), ("imatge", "x.jpg")]));
        assert!(records.is_empty());
    }

    #[test]
    fn pairs_are_coupled_and_dangling_halves_reported() {
        let records = group_positions(&set(&[
            ("carrec", "Diputat"),
            ("k_etiqueta", "circumscripció"),
            ("k_nom", "[[Girona]]"),
            ("a_nom", "orphan"),
        ]));
        let record = &records[0];
        assert_eq!(
            record.pairs(),
            &[LabelPair {
                letter: 'k',
                label: "circumscripció".to_string(),
                name: "[[Girona]]".to_string(),
            }]
        );
        assert_eq!(
            record.warnings(),
            &[PairWarning {
                letter: 'a',
                missing: PairHalf::Label,
            }]
        );
    }

    #[test]
    fn end_year_completes_start() {
        let records = group_positions(&set(&[
            ("carrec", "Alcalde"),
            ("inici", "12 de març"),
            ("final", "[[4 de maig]] de [[1990]]"),
        ]));
        assert_eq!(records[0].field(FieldRole::Start), Some("12 de març de 1990"));
    }

    #[test]
    fn macro_dates_are_not_completed() {
        let records = group_positions(&set(&[
            ("carrec", "Alcalde"),
            ("inici", "12 de març"),
            ("final", "{{data|1990|5|4}}"),
        ]));
        assert_eq!(records[0].field(FieldRole::Start), Some("12 de març"));
    }

    #[test]
    fn full_start_is_untouched() {
        let records = group_positions(&set(&[
            ("carrec", "Alcalde"),
            ("inici", "1987"),
            ("final", "1990"),
        ]));
        assert_eq!(records[0].field(FieldRole::Start), Some("1987"));
    }
}

//! Template fields and the roles they carry

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Ordered field-name → raw text map of one infobox invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateFieldSet(IndexMap<String, String>);

impl TemplateFieldSet {
    /// Empty field set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a field, keeping its first position
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Raw text of a field
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Fields in template order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the template had no fields
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TemplateFieldSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Split a field name at its first digit run
///
/// `carrec2` → (`carrec`, `2`); `carrec` → (`carrec`, `1`).
#[must_use]
pub fn split_field_name(name: &str) -> (&str, &str) {
    let name = name.trim();
    match name.find(|c: char| c.is_ascii_digit()) {
        Some(start) => {
            let rest = &name[start..];
            let end = rest
                .find(|c: char| !c.is_ascii_digit())
                .map_or(name.len(), |offset| start + offset);
            (&name[..start], &name[start..end])
        }
        None => (name, "1"),
    }
}

/// Recognized infobox roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    /// `carrec`: the job title
    Title,
    /// `escut_carrec`: coat of arms, never transferred
    CoatOfArms,
    /// `inici`, or the `proclamació` label
    Start,
    /// `final`
    End,
    /// `predecessor`
    Predecessor,
    /// `successor`
    Successor,
    /// `ordre`
    Ordinal,
    /// `junt_a`
    JointWith,
    /// `nominat` / `designat`
    AppointedBy,
    /// Only reachable through the `circumscripció` label
    ElectoralDistrict,
}

impl FieldRole {
    /// Role of a plain field root, `None` for anything not whitelisted
    #[must_use]
    pub fn from_root(root: &str) -> Option<Self> {
        match root {
            "carrec" => Some(Self::Title),
            "escut_carrec" => Some(Self::CoatOfArms),
            "inici" => Some(Self::Start),
            "final" => Some(Self::End),
            "predecessor" => Some(Self::Predecessor),
            "successor" => Some(Self::Successor),
            "ordre" => Some(Self::Ordinal),
            "junt_a" => Some(Self::JointWith),
            "nominat" | "designat" => Some(Self::AppointedBy),
            _ => None,
        }
    }

    /// Role named by a pair label
    ///
    /// Labels are free text typed by editors, compared case-insensitively.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        match label.as_str() {
            "circumscripció" => Some(Self::ElectoralDistrict),
            "proclamació" => Some(Self::Start),
            other => Self::from_root(other),
        }
    }

    /// Field root as written in the template
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "carrec",
            Self::CoatOfArms => "escut_carrec",
            Self::Start => "inici",
            Self::End => "final",
            Self::Predecessor => "predecessor",
            Self::Successor => "successor",
            Self::Ordinal => "ordre",
            Self::JointWith => "junt_a",
            Self::AppointedBy => "nominat",
            Self::ElectoralDistrict => "circumscripció",
        }
    }
}

impl Display for FieldRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Letters that carry a label/name pair
pub const PAIR_LETTERS: [char; 6] = ['a', 'b', 'e', 'f', 'k', 'l'];

/// Half of a label/name pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairHalf {
    /// `{letter}_etiqueta`
    Label,
    /// `{letter}_nom`
    Name,
}

/// Parse a pair root such as `k_etiqueta`
#[must_use]
pub fn pair_root(root: &str) -> Option<(char, PairHalf)> {
    let (letter, half) = root.split_once('_')?;
    let mut chars = letter.chars();
    let letter = chars.next()?;
    if chars.next().is_some() || !PAIR_LETTERS.contains(&letter) {
        return None;
    }
    match half {
        "etiqueta" => Some((letter, PairHalf::Label)),
        "nom" => Some((letter, PairHalf::Name)),
        _ => None,
    }
}

/// True for roots the pipeline transfers (roles and pair halves)
#[must_use]
pub fn is_recognized_root(root: &str) -> bool {
    FieldRole::from_root(root).is_some() || pair_root(root).is_some()
}

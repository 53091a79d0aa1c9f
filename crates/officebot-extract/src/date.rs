//! Infobox date parsing
//!
//! Three surface forms are accepted:
//! - date macros with positional arguments: `{{data|1935|1|23}}`
//! - bracketed link chains: `[[23 de gener]] de [[1935]]`
//! - plain phrases: `7 d'agost de 1926`
//!
//! Plain forms are split on prepositions and read from the end (year first).
//! Precision follows the number of components recovered.

use crate::error::{DateError, DateResult};
use crate::links::strip_brackets;
use officebot_model::WikiDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static PREPOSITION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?: de | d'|\s)").expect("valid preposition regex"));

const CATALAN_MONTHS: [(&str, u8); 12] = [
    ("gener", 1),
    ("febrer", 2),
    ("març", 3),
    ("abril", 4),
    ("maig", 5),
    ("juny", 6),
    ("juliol", 7),
    ("agost", 8),
    ("setembre", 9),
    ("octubre", 10),
    ("novembre", 11),
    ("desembre", 12),
];

pub(crate) fn is_word(part: &str) -> bool {
    !part.is_empty() && part.chars().all(char::is_alphabetic)
}

fn is_number(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
}

/// Plain-form components, last first (`"12 de març de 1990"` → `["1990", "març", "12"]`)
///
/// Brackets are removed before splitting.
#[must_use]
pub fn reversed_components(value: &str) -> Vec<String> {
    let plain = strip_brackets(value.trim());
    let mut parts: Vec<String> = PREPOSITION_REGEX
        .split(&plain)
        .map(str::to_string)
        .collect();
    parts.reverse();
    parts
}

/// True for macro-form dates (`{{…}}`)
#[inline]
#[must_use]
pub fn is_macro(value: &str) -> bool {
    value.trim_start().starts_with("{{")
}

#[derive(Debug, Clone, Copy)]
enum Component {
    Number(u32),
    Month(u8),
}

/// Date parser with a month-name table
#[derive(Debug, Clone)]
pub struct DateParser {
    months: HashMap<String, u8>,
}

impl Default for DateParser {
    fn default() -> Self {
        Self::catalan()
    }
}

impl DateParser {
    /// Parser using the given month names (lower case → 1..=12)
    #[must_use]
    pub fn new(months: HashMap<String, u8>) -> Self {
        Self { months }
    }

    /// Parser using Catalan month names
    #[must_use]
    pub fn catalan() -> Self {
        Self::new(
            CATALAN_MONTHS
                .iter()
                .map(|(name, n)| ((*name).to_string(), *n))
                .collect(),
        )
    }

    /// Parse one infobox date value
    ///
    /// # Errors
    /// `DateError` when the value has no recognizable year, too many
    /// components, or out-of-range components.
    pub fn parse(&self, value: &str) -> DateResult<WikiDate> {
        let value = value.trim();
        if value.is_empty() {
            return Err(DateError::Empty);
        }

        let parts: Vec<String> = if is_macro(value) {
            let inner = value.replace("{{", "").replace("}}", "");
            inner.split('|').skip(1).map(|p| p.trim().to_string()).collect()
        } else {
            reversed_components(value)
        };

        if parts.is_empty() || parts.len() > 3 {
            return Err(DateError::malformed(value, format!("{} components", parts.len())));
        }
        if is_word(&parts[0]) {
            return Err(DateError::malformed(value, "no year"));
        }

        let components: Vec<Component> = parts
            .iter()
            .filter_map(|part| {
                if is_number(part) {
                    part.parse().ok().map(Component::Number)
                } else {
                    self.months
                        .get(&part.to_lowercase())
                        .copied()
                        .map(Component::Month)
                }
            })
            .collect();

        tracing::trace!(input = value, recovered = components.len(), "date components");

        let mut iter = components.into_iter();
        let year = match iter.next() {
            Some(Component::Number(y)) => {
                i32::try_from(y).map_err(|_| DateError::malformed(value, "year overflow"))?
            }
            Some(Component::Month(_)) => return Err(DateError::malformed(value, "month in year position")),
            None => return Err(DateError::malformed(value, "no component recovered")),
        };
        let month = match iter.next() {
            Some(Component::Month(m)) => Some(m),
            Some(Component::Number(m)) => {
                Some(u8::try_from(m).map_err(|_| DateError::malformed(value, "month overflow"))?)
            }
            None => None,
        };
        let day = match iter.next() {
            Some(Component::Number(d)) => {
                Some(u8::try_from(d).map_err(|_| DateError::malformed(value, "day overflow"))?)
            }
            Some(Component::Month(_)) => return Err(DateError::malformed(value, "month in day position")),
            None => None,
        };

        Ok(WikiDate::new(year, month, day)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use officebot_model::Precision;
    use pretty_assertions::assert_eq;

    fn parse(s: &str) -> Result<WikiDate, DateError> {
        DateParser::catalan().parse(s)
    }

    #[test]
    fn linked_day_month_year() {
        assert_eq!(
            parse("[[23 de gener]] de [[1935]]").unwrap(),
            WikiDate::ymd(1935, 1, 23).unwrap()
        );
    }

    #[test]
    fn elided_preposition() {
        assert_eq!(
            parse("[[7 d'agost]] de [[1926]]").unwrap(),
            WikiDate::ymd(1926, 8, 7).unwrap()
        );
    }

    #[test]
    fn year_only() {
        let date = parse("[[1918]]").unwrap();
        assert_eq!(date, WikiDate::year(1918));
        assert_eq!(date.precision(), Precision::Year);
    }

    #[test]
    fn month_year() {
        assert_eq!(parse("març de 1920").unwrap(), WikiDate::year_month(1920, 3).unwrap());
    }

    #[test]
    fn macro_with_two_arguments_has_no_day() {
        let date = parse("{{data|1977|6}}").unwrap();
        assert_eq!(date, WikiDate::year_month(1977, 6).unwrap());
        assert_eq!(date.day(), None);
    }

    #[test]
    fn macro_full_date() {
        assert_eq!(parse("{{Data|2011|2|17}}").unwrap(), WikiDate::ymd(2011, 2, 17).unwrap());
    }

    #[test]
    fn macro_without_arguments_fails() {
        assert!(matches!(parse("{{avui}}"), Err(DateError::Malformed { .. })));
    }

    #[test]
    fn missing_year_fails() {
        assert!(matches!(parse("12 de març"), Err(DateError::Malformed { .. })));
        assert!(matches!(parse("present"), Err(DateError::Malformed { .. })));
    }

    #[test]
    fn out_of_range_fails() {
        assert!(matches!(parse("{{data|1920|14}}"), Err(DateError::OutOfRange(_))));
    }

    #[test]
    fn empty_fails() {
        assert!(matches!(parse("  "), Err(DateError::Empty)));
    }

    #[test]
    fn reversed_components_reads_year_first() {
        assert_eq!(reversed_components("12 de març de 1990"), vec!["1990", "març", "12"]);
    }
}

use officebot_extract::{group_positions, DateParser, FieldRole, TemplateFieldSet};
use officebot_model::{Precision, WikiDate};
use proptest::prelude::*;

fn suffix(i: usize) -> String {
    if i == 0 {
        String::new()
    } else {
        (i + 1).to_string()
    }
}

proptest! {
    #[test]
    fn prop_one_record_per_distinct_index(
        titled in proptest::collection::vec(any::<bool>(), 1..8)
    ) {
        let mut fields = TemplateFieldSet::new();
        for (i, has_title) in titled.iter().enumerate() {
            if *has_title {
                fields.insert(format!("carrec{}", suffix(i)), format!("Càrrec {i}"));
            }
            fields.insert(format!("inici{}", suffix(i)), format!("{}", 1900 + i));
        }

        let records = group_positions(&fields);
        prop_assert_eq!(records.len(), titled.len());

        // Every record carries the nearest title at or before it
        let mut expected: Option<String> = None;
        for (i, record) in records.iter().enumerate() {
            if titled[i] {
                expected = Some(format!("Càrrec {i}"));
            }
            prop_assert_eq!(record.title(), expected.as_deref());
            prop_assert_eq!(record.title_inherited(), !titled[i] && expected.is_some());
        }
    }

    #[test]
    fn prop_year_propagation_yields_parseable_start(
        day in 1u8..=28,
        month in 1u8..=12,
        year in 1000i32..2100
    ) {
        const MONTHS: [&str; 12] = [
            "gener", "febrer", "març", "abril", "maig", "juny",
            "juliol", "agost", "setembre", "octubre", "novembre", "desembre",
        ];
        let fields = TemplateFieldSet::new()
            .with_field("carrec", "Alcalde")
            .with_field("inici", format!("{day} de {}", MONTHS[usize::from(month - 1)]))
            .with_field("final", year.to_string());

        let records = group_positions(&fields);
        let start = records[0].field(FieldRole::Start).unwrap_or_default();
        let parsed = DateParser::catalan().parse(start).unwrap();
        prop_assert_eq!(parsed, WikiDate::ymd(year, month, day).unwrap());
    }

    #[test]
    fn prop_macro_precision_follows_argument_count(
        year in 1i32..3000,
        month in proptest::option::of(1u8..=12),
        day in 1u8..=28
    ) {
        let text = match month {
            Some(m) => format!("{{{{data|{year}|{m}|{day}}}}}"),
            None => format!("{{{{data|{year}}}}}"),
        };
        let parsed = DateParser::catalan().parse(&text).unwrap();
        let expected = if month.is_some() { Precision::Day } else { Precision::Year };
        prop_assert_eq!(parsed.precision(), expected);
    }
}

#[test]
fn test_infobox_with_several_positions() {
    let fields = TemplateFieldSet::new()
        .with_field("nom", "Joan")
        .with_field("carrec", "[[Senat d'Espanya|Senador]]")
        .with_field("inici", "{{data|1977|6|15}}")
        .with_field("final", "{{data|1979|3|1}}")
        .with_field("carrec2", "Diputat al [[Congrés dels Diputats]]")
        .with_field("k_etiqueta2", "circumscripció")
        .with_field("k_nom2", "[[Girona]]")
        .with_field("inici3", "1982");

    let records = group_positions(&fields);
    assert_eq!(records.len(), 3);
    assert_eq!(records[1].pairs()[0].label, "circumscripció");
    assert_eq!(records[2].title(), Some("Diputat al [[Congrés dels Diputats]]"));
    assert!(records[2].pairs().is_empty());
}

#[test]
fn test_documented_date_forms() {
    let parser = DateParser::catalan();
    assert_eq!(
        parser.parse("[[23 de gener]] de [[1935]]").unwrap(),
        WikiDate::ymd(1935, 1, 23).unwrap()
    );
    assert_eq!(parser.parse("[[1918]]").unwrap(), WikiDate::year(1918));
    let two = parser.parse("{{data|1977|6}}").unwrap();
    assert_eq!(two.precision(), Precision::YearMonth);
    assert_eq!(two.day(), None);
}

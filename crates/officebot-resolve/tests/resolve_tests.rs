//! Resolution against the in-memory wiki

use officebot_extract::{group_positions, FieldRole, LabelPair, TemplateFieldSet};
use officebot_model::{props, Claim, EntityId, Statement, WikiDate};
use officebot_resolve::{
    CachedLinkResolver, Collaborators, Lexicon, LinkResolver, PositionResolver,
    QualifierOutcome, QualifierResolver, RecordResolver, ResolveError, SiteConfig, SiteId,
    SkipReason, synthetic_district_title,
};
use officebot_test_utils::{ids, sample_fields, sample_wiki, InMemoryWiki};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const SENATE_MEMBER: EntityId = EntityId::new(19_323_171);
const PARLIAMENT: EntityId = EntityId::new(1_152_367);
const PARLIAMENT_MEMBER: EntityId = EntityId::new(18_714_088);
const SENATE: EntityId = EntityId::new(630_986);
const COLOMBIA_PRESIDENTS: EntityId = EntityId::new(90_100);
const PRESIDENT_OF_COLOMBIA: EntityId = EntityId::new(853_475);
const FRANCE: EntityId = EntityId::new(142);
const PRESIDENT_OF_FRANCE: EntityId = EntityId::new(191_954);
const GENERALITAT_PRESIDENT: EntityId = EntityId::new(1_058_927);

fn wiki() -> InMemoryWiki {
    sample_wiki()
        .with_page("Senat d'Espanya", SENATE)
        .with_page("Parlament de Catalunya", PARLIAMENT)
        .with_page("Província de Girona", EntityId::new(7_194))
        .with_page("Llista de presidents de Colòmbia", COLOMBIA_PRESIDENTS)
        .with_statement(
            COLOMBIA_PRESIDENTS,
            Statement::builder(Claim::entity(props::IS_A_LIST_OF, props::HUMAN))
                .qualifier(Claim::entity(props::POSITION_HELD, PRESIDENT_OF_COLOMBIA))
                .build(),
        )
        .with_page("República Francesa", FRANCE)
        .with_claim(FRANCE, props::HEAD_OF_STATE_OFFICE, PRESIDENT_OF_FRANCE)
        .with_page("President de la Generalitat de Catalunya", GENERALITAT_PRESIDENT)
        .with_page("Arquebisbe", EntityId::new(49_476))
        .with_page_on("en", "Khedive", Some(EntityId::new(208_500)))
}

fn resolve(value: &str) -> Result<(EntityId, Vec<Claim>), ResolveError> {
    let wiki = wiki();
    let sites = SiteConfig::default();
    let lexicon = Lexicon::builtin().unwrap();
    PositionResolver::new(wiki.collaborators(&sites), &lexicon)
        .resolve(value)
        .map(|p| (p.office().unwrap(), p.qualifiers))
}

#[test]
fn test_deputy_through_chamber_parts() {
    assert_eq!(
        resolve("[[Congrés dels Diputats|Diputat al Congrés]]").unwrap(),
        (ids::CONGRESS_MEMBER, vec![])
    );
}

#[test]
fn test_senator_appointed_by_parliament() {
    let (office, qualifiers) =
        resolve("[[Senat d'Espanya|Senadora]] designada pel [[Parlament de Catalunya]]").unwrap();
    assert_eq!(office, SENATE_MEMBER);
    assert_eq!(qualifiers, vec![Claim::entity(props::APPOINTED_BY, PARLIAMENT)]);
}

#[test]
fn test_chamber_rules_read_only_their_own_chamber() {
    assert_eq!(
        resolve("[[Parlament de Catalunya|Diputat al Parlament]]").unwrap(),
        (PARLIAMENT_MEMBER, vec![])
    );
    assert_eq!(
        resolve("[[Parlament de Catalunya|Senador]]"),
        Err(ResolveError::NoRule("[[Parlament de Catalunya|Senador]]".to_string()))
    );
    assert!(matches!(
        resolve("[[Senat d'Espanya|Diputat]]"),
        Err(ResolveError::MissingProperty { entity, .. }) if entity == SENATE
    ));
}

#[test]
fn test_deputy_linking_senate_goes_through_parts() {
    let wiki = wiki().with_claim(SENATE, props::HAS_PART, SENATE_MEMBER);
    let sites = SiteConfig::default();
    let lexicon = Lexicon::builtin().unwrap();
    let position = PositionResolver::new(wiki.collaborators(&sites), &lexicon)
        .resolve("[[Senat d'Espanya|Diputat]]")
        .unwrap();
    assert_eq!(position.office(), Some(SENATE_MEMBER));
}

#[test]
fn test_deputy_with_district_override() {
    let (office, qualifiers) =
        resolve("[[Congrés dels Diputats|Diputat]] per [[Província de Girona|Girona]]").unwrap();
    assert_eq!(office, ids::CONGRESS_MEMBER);
    assert_eq!(
        qualifiers,
        vec![Claim::entity(props::ELECTORAL_DISTRICT, ids::GIRONA_DISTRICT)]
    );
}

#[test]
fn test_list_of_humans_narrowed_by_qualifier() {
    assert_eq!(
        resolve("[[Llista de presidents de Colòmbia]]").unwrap().0,
        PRESIDENT_OF_COLOMBIA
    );
}

#[test]
fn test_mayor_through_head_of_government() {
    assert_eq!(resolve("Alcalde de [[Vic]]").unwrap().0, ids::MAYOR_OF_VIC);
}

#[test]
fn test_phrases_without_links() {
    assert_eq!(resolve("President de la República Francesa").unwrap().0, PRESIDENT_OF_FRANCE);
    assert_eq!(resolve("Alcaldessa de Vic").unwrap().0, ids::MAYOR_OF_VIC);
    assert_eq!(resolve("Soldà del Marroc").unwrap().0, EntityId::new(14_566_713));
}

#[test]
fn test_ambassador_pairs() {
    assert_eq!(
        resolve("Ambaixador d'Espanya a França").unwrap().0,
        EntityId::new(27_969_744)
    );
    assert_eq!(
        resolve("Ambaixador d'Espanya al Regne Unit").unwrap().0,
        EntityId::new(43_542_408)
    );
    assert_eq!(
        resolve("Ambaixador de França a Espanya"),
        Err(ResolveError::missing_mapping("ambassadors", "França-Espanya"))
    );
    assert_eq!(
        resolve("Ambaixador d'Espanya"),
        Err(ResolveError::NotACountryPair(vec!["Espanya".to_string()]))
    );
}

#[test]
fn test_ordinal_and_remap() {
    let (office, qualifiers) =
        resolve("12è [[President de la Generalitat de Catalunya|president de la Generalitat]]").unwrap();
    assert_eq!(office, GENERALITAT_PRESIDENT);
    assert_eq!(qualifiers, vec![Claim::string(props::SERIES_ORDINAL, "12")]);

    assert_eq!(resolve("[[Arquebisbe]]").unwrap().0, EntityId::new(48_629_921));
}

#[test]
fn test_fallback_sites() {
    assert_eq!(resolve("[[Khedive|Khediva]]").unwrap().0, EntityId::new(208_500));
}

#[test]
fn test_unrecognized_titles_fail_loudly() {
    assert_eq!(
        resolve("Pintor de cambra"),
        Err(ResolveError::NoRule("Pintor de cambra".to_string()))
    );
    assert_eq!(
        resolve("[[Vic|Pintor de cambra]]"),
        Err(ResolveError::NoRule("[[Vic|Pintor de cambra]]".to_string()))
    );
    assert_eq!(
        resolve("Alcalde de [[Atlàntida]]"),
        Err(ResolveError::NoPage("Atlàntida".to_string()))
    );
}

#[test]
fn test_qualifier_skips() {
    let wiki = wiki();
    let sites = SiteConfig::default();
    let lexicon = Lexicon::builtin().unwrap();
    let qualifiers = QualifierResolver::new(wiki.collaborators(&sites), &lexicon);
    let office = Some(ids::CONGRESS_MEMBER);

    assert_eq!(
        qualifiers.resolve_role(FieldRole::Predecessor, "-", office).unwrap(),
        QualifierOutcome::Skip(SkipReason::Sentinel("-".to_string()))
    );
    assert_eq!(
        qualifiers.resolve_role(FieldRole::End, "?", office).unwrap(),
        QualifierOutcome::Skip(SkipReason::Sentinel("?".to_string()))
    );
    assert!(matches!(
        qualifiers.resolve_role(FieldRole::Start, "a la tardor", office).unwrap(),
        QualifierOutcome::Skip(SkipReason::MalformedDate(_))
    ));
    assert_eq!(
        qualifiers.resolve_role(FieldRole::Successor, "Ningú", office).unwrap(),
        QualifierOutcome::Skip(SkipReason::NoLink)
    );
    assert!(matches!(
        qualifiers.resolve_role(FieldRole::Successor, "[[Ningú]]", office).unwrap(),
        QualifierOutcome::Skip(SkipReason::Unresolved(_))
    ));
    assert_eq!(
        qualifiers.resolve_role(FieldRole::CoatOfArms, "Escut.svg", office).unwrap(),
        QualifierOutcome::Skip(SkipReason::CoatOfArms)
    );
    assert!(qualifiers.resolve_role(FieldRole::Title, "Alcalde", office).is_err());
}

#[test]
fn test_qualifier_claims() {
    let wiki = wiki();
    let sites = SiteConfig::default();
    let lexicon = Lexicon::builtin().unwrap();
    let qualifiers = QualifierResolver::new(wiki.collaborators(&sites), &lexicon);
    let office = Some(ids::CONGRESS_MEMBER);

    assert_eq!(
        qualifiers
            .resolve_role(FieldRole::Start, "[[23 de gener]] de [[1935]]", office)
            .unwrap(),
        QualifierOutcome::Claim(Claim::time(props::START_TIME, WikiDate::ymd(1935, 1, 23).unwrap()))
    );
    assert_eq!(
        qualifiers.resolve_role(FieldRole::Ordinal, "[[3r]]", office).unwrap(),
        QualifierOutcome::Claim(Claim::string(props::SERIES_ORDINAL, "3r"))
    );
}

#[test]
fn test_plain_district_uses_synthetic_title() {
    let wiki = wiki().with_page("Circumscripció electoral d'Osca", EntityId::new(90_200));
    let sites = SiteConfig::default();
    let lexicon = Lexicon::builtin().unwrap();
    let qualifiers = QualifierResolver::new(wiki.collaborators(&sites), &lexicon);
    assert_eq!(
        qualifiers
            .resolve_role(FieldRole::ElectoralDistrict, "Osca", Some(EntityId::new(1)))
            .unwrap(),
        QualifierOutcome::Claim(Claim::entity(props::ELECTORAL_DISTRICT, EntityId::new(90_200)))
    );
}

#[test]
fn test_pairs() {
    let wiki = wiki();
    let sites = SiteConfig::default();
    let lexicon = Lexicon::builtin().unwrap();
    let qualifiers = QualifierResolver::new(wiki.collaborators(&sites), &lexicon);
    let pair = |letter, label: &str, name: &str| LabelPair {
        letter,
        label: label.to_string(),
        name: name.to_string(),
    };

    assert_eq!(
        qualifiers
            .resolve_pair(&pair('k', "Proclamació", "1977"), None)
            .unwrap(),
        QualifierOutcome::Claim(Claim::time(props::START_TIME, WikiDate::year(1977)))
    );
    assert_eq!(
        qualifiers.resolve_pair(&pair('a', "Partit", "[[Vic]]"), None).unwrap(),
        QualifierOutcome::Skip(SkipReason::UnsupportedPair('a'))
    );
    assert_eq!(
        qualifiers.resolve_pair(&pair('k', "Partit", "[[Vic]]"), None),
        Err(ResolveError::UnknownRole("Partit".to_string()))
    );
}

#[test]
fn test_sample_records() {
    let wiki = wiki();
    let sites = SiteConfig::default();
    let lexicon = Lexicon::builtin().unwrap();
    let records = group_positions(&sample_fields());
    let resolver = RecordResolver::new(wiki.collaborators(&sites), &lexicon);

    let deputy = resolver.resolve(&records[0]).unwrap();
    assert_eq!(deputy.position.office(), Some(ids::CONGRESS_MEMBER));
    assert_eq!(
        deputy.qualifiers,
        vec![
            Claim::time(props::START_TIME, WikiDate::ymd(1977, 6, 15).unwrap()),
            Claim::time(props::END_TIME, WikiDate::year(1979)),
            Claim::entity(props::REPLACES, ids::PREDECESSOR),
            Claim::entity(props::ELECTORAL_DISTRICT, ids::GIRONA_DISTRICT),
        ]
    );
    assert!(deputy.skipped.is_empty());

    let mayor = resolver.resolve(&records[1]).unwrap();
    assert_eq!(mayor.position.office(), Some(ids::MAYOR_OF_VIC));
    assert_eq!(mayor.skipped.len(), 1);
    assert_eq!(mayor.skipped[0].reason, SkipReason::Sentinel("present".to_string()));
}

#[test]
fn test_record_without_title() {
    let wiki = wiki();
    let sites = SiteConfig::default();
    let lexicon = Lexicon::builtin().unwrap();
    let fields = TemplateFieldSet::new().with_field("inici", "1990");
    let records = group_positions(&fields);
    assert_eq!(
        RecordResolver::new(wiki.collaborators(&sites), &lexicon).resolve(&records[0]),
        Err(ResolveError::MissingTitle {
            index: "1".to_string()
        })
    );
}

#[test]
fn test_cached_resolver_in_context() {
    let wiki = wiki();
    let sites = SiteConfig::default();
    let lexicon = Lexicon::builtin().unwrap();
    let cached = CachedLinkResolver::new(&wiki, 64);
    let ctx = Collaborators {
        links: &cached,
        ..wiki.collaborators(&sites)
    };

    for _ in 0..3 {
        let position = PositionResolver::new(ctx, &lexicon).resolve("Alcalde de [[Vic]]").unwrap();
        assert_eq!(position.office(), Some(ids::MAYOR_OF_VIC));
    }
    assert!(cached.resolve("Vic", &[SiteId::new("ca")]).is_some());
    assert_eq!(cached.stats().entry_count, 1);
}

proptest! {
    #[test]
    fn prop_district_title_keeps_the_name(name in "[A-Za-z][a-z]{0,12}") {
        let title = synthetic_district_title(&name);
        prop_assert!(title.starts_with("Circumscripció electoral d"));
        prop_assert!(title.ends_with(name.as_str()));
        let elided = "aeiouAEIOU".contains(&name[..1]);
        prop_assert_eq!(title.contains(" d'"), elided);
    }
}

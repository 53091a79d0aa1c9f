use officebot_merge::{MergeDecision, MergeEngine, SkipCause};
use officebot_model::{
    props, Claim, EntityId, ExistingStatement, Source, Statement, StatementId, WikiDate,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const CONGRESS: EntityId = EntityId::new(18_171_345);
const GIRONA: EntityId = EntityId::new(5_564_804);

fn sources() -> Source {
    Source::new(vec![
        Claim::entity(props::IMPORTED_FROM, props::CATALAN_WIKIPEDIA),
        Claim::time(props::RETRIEVED, WikiDate::ymd(2024, 5, 1).unwrap()),
    ])
}

/// Apply a decision to an in-memory statement list, as a committer would
fn apply(existing: &mut Vec<ExistingStatement>, decision: MergeDecision) {
    match decision {
        MergeDecision::Create(statement) => {
            let id = StatementId::new(format!("Q1${}", existing.len()));
            existing.push(ExistingStatement::new(id, statement));
        }
        MergeDecision::Merge(plan) => {
            if let Some(slot) = existing.iter_mut().find(|e| e.id == plan.statement_id) {
                slot.statement = plan.merged;
            }
        }
        MergeDecision::Skip(_) => {}
    }
}

fn date_strategy() -> impl Strategy<Value = WikiDate> {
    (1900i32..2000, proptest::option::of((1u8..=12, proptest::option::of(1u8..=28)))).prop_map(
        |(year, rest)| match rest {
            None => WikiDate::year(year),
            Some((month, None)) => WikiDate::year_month(year, month).unwrap(),
            Some((month, Some(day))) => WikiDate::ymd(year, month, day).unwrap(),
        },
    )
}

/// Nearby dates of one year, so repeated values often refine each other
fn close_date_strategy() -> impl Strategy<Value = WikiDate> {
    (1976i32..1979, proptest::option::of((6u8..=7, proptest::option::of(1u8..=2)))).prop_map(
        |(year, rest)| match rest {
            None => WikiDate::year(year),
            Some((month, None)) => WikiDate::year_month(year, month).unwrap(),
            Some((month, Some(day))) => WikiDate::ymd(year, month, day).unwrap(),
        },
    )
}

fn statement_strategy() -> impl Strategy<Value = Statement> {
    (
        prop_oneof![
            proptest::collection::vec(date_strategy(), 0..2),
            proptest::collection::vec(close_date_strategy(), 0..4),
        ],
        proptest::option::of(date_strategy()),
        any::<bool>(),
    )
        .prop_map(|(starts, end, district)| {
            let mut builder = Statement::builder(Claim::entity(props::POSITION_HELD, CONGRESS));
            for start in starts {
                builder = builder.qualifier(Claim::time(props::START_TIME, start));
            }
            if let Some(end) = end {
                builder = builder.qualifier(Claim::time(props::END_TIME, end));
            }
            if district {
                builder = builder.qualifier(Claim::entity(props::ELECTORAL_DISTRICT, GIRONA));
            }
            builder.source(sources()).build()
        })
}

proptest! {
    #[test]
    fn prop_second_run_writes_nothing(
        seeded in proptest::collection::vec(statement_strategy(), 0..3),
        incoming in proptest::collection::vec(statement_strategy(), 1..4)
    ) {
        let engine = MergeEngine::default();
        let mut existing: Vec<ExistingStatement> = seeded
            .into_iter()
            .enumerate()
            .map(|(i, s)| ExistingStatement::new(StatementId::new(format!("Q1$seed{i}")), s))
            .collect();

        for statement in &incoming {
            let decision = engine.decide(statement, &existing);
            apply(&mut existing, decision);
        }
        for statement in &incoming {
            let decision = engine.decide(statement, &existing);
            prop_assert!(!decision.is_write(), "second run wrote: {:?}", decision);
        }
    }
}

#[test]
fn test_two_refinements_of_one_stored_date() {
    let engine = MergeEngine::default();
    let mut existing = vec![ExistingStatement::new(
        StatementId::new("Q1$1"),
        Statement::builder(Claim::entity(props::POSITION_HELD, CONGRESS))
            .qualifier(Claim::time(props::START_TIME, WikiDate::year(1977)))
            .build(),
    )];
    let new = Statement::builder(Claim::entity(props::POSITION_HELD, CONGRESS))
        .qualifier(Claim::time(props::START_TIME, WikiDate::ymd(1977, 6, 15).unwrap()))
        .qualifier(Claim::time(props::START_TIME, WikiDate::ymd(1977, 7, 1).unwrap()))
        .source(sources())
        .build();

    let first = engine.decide(&new, &existing);
    assert_eq!(first.kind(), "merge");
    apply(&mut existing, first);
    assert_eq!(existing.len(), 1);
    assert_eq!(existing[0].statement.qualifiers().get(props::START_TIME).len(), 2);

    let second = engine.decide(&new, &existing);
    assert!(!second.is_write(), "second run wrote: {second:?}");
}

#[test]
fn test_upgrade_then_rerun_is_skip() {
    let engine = MergeEngine::default();
    let mut existing = vec![ExistingStatement::new(
        StatementId::new("Q1$A"),
        Statement::builder(Claim::entity(props::POSITION_HELD, CONGRESS))
            .qualifier(Claim::time(props::START_TIME, WikiDate::year(1977)))
            .build(),
    )];
    let new = Statement::builder(Claim::entity(props::POSITION_HELD, CONGRESS))
        .qualifier(Claim::time(props::START_TIME, WikiDate::ymd(1977, 6, 15).unwrap()))
        .qualifier(Claim::entity(props::ELECTORAL_DISTRICT, GIRONA))
        .source(sources())
        .build();

    let first = engine.decide(&new, &existing);
    assert_eq!(first.kind(), "merge");
    apply(&mut existing, first);

    let stored = &existing[0].statement;
    assert_eq!(
        stored.qualifiers().get(props::START_TIME),
        &[Claim::time(props::START_TIME, WikiDate::ymd(1977, 6, 15).unwrap())]
    );
    assert_eq!(stored.qualifiers().get(props::ELECTORAL_DISTRICT).len(), 1);

    assert!(matches!(
        engine.decide(&new, &existing),
        MergeDecision::Skip(SkipCause::Unchanged { .. })
    ));
}

#[test]
fn test_asymmetric_policy() {
    let engine = MergeEngine::default();
    let existing = vec![ExistingStatement::new(
        StatementId::new("Q1$A"),
        Statement::builder(Claim::entity(props::POSITION_HELD, CONGRESS))
            .qualifier(Claim::time(props::START_TIME, WikiDate::year(1977)))
            .qualifier(Claim::entity(props::ELECTORAL_DISTRICT, GIRONA))
            .build(),
    )];

    // Equal common qualifier plus a new property: merged
    let equal = Statement::builder(Claim::entity(props::POSITION_HELD, CONGRESS))
        .qualifier(Claim::time(props::START_TIME, WikiDate::year(1977)))
        .qualifier(Claim::time(props::END_TIME, WikiDate::year(1979)))
        .build();
    assert_eq!(engine.decide(&equal, &existing).kind(), "merge");

    // One differing common qualifier: a distinct term
    let differing = Statement::builder(Claim::entity(props::POSITION_HELD, CONGRESS))
        .qualifier(Claim::time(props::START_TIME, WikiDate::year(1977)))
        .qualifier(Claim::entity(props::ELECTORAL_DISTRICT, EntityId::new(4_859_840)))
        .build();
    assert_eq!(engine.decide(&differing, &existing).kind(), "create");
}

#[test]
fn test_first_equal_office_decides() {
    let engine = MergeEngine::default();
    let existing = vec![
        ExistingStatement::new(
            StatementId::new("Q1$A"),
            Statement::builder(Claim::entity(props::POSITION_HELD, CONGRESS))
                .qualifier(Claim::time(props::START_TIME, WikiDate::year(1977)))
                .build(),
        ),
        ExistingStatement::new(
            StatementId::new("Q1$B"),
            Statement::builder(Claim::entity(props::POSITION_HELD, CONGRESS))
                .qualifier(Claim::time(props::START_TIME, WikiDate::year(1982)))
                .build(),
        ),
    ];
    // B would accept the end date, but only the first statement is merged into
    let new = Statement::builder(Claim::entity(props::POSITION_HELD, CONGRESS))
        .qualifier(Claim::time(props::START_TIME, WikiDate::year(1982)))
        .qualifier(Claim::time(props::END_TIME, WikiDate::year(1986)))
        .build();
    assert_eq!(engine.decide(&new, &existing).kind(), "create");

    // B already holding everything: nothing to write
    let held = Statement::builder(Claim::entity(props::POSITION_HELD, CONGRESS))
        .qualifier(Claim::time(props::START_TIME, WikiDate::year(1982)))
        .build();
    assert_eq!(
        engine.decide(&held, &existing),
        MergeDecision::Skip(SkipCause::Unchanged {
            statement_id: StatementId::new("Q1$B"),
        })
    );
}

#[test]
fn test_decision_serializes_with_tag() {
    let new = Statement::builder(Claim::entity(props::POSITION_HELD, CONGRESS)).build();
    let json = serde_json::to_value(MergeEngine::default().decide(&new, &[])).unwrap();
    assert_eq!(json["decision"], "create");
}

#[test]
fn test_distinct_term_is_created_once() {
    let engine = MergeEngine::default();
    let mut existing = vec![ExistingStatement::new(
        StatementId::new("Q1$A"),
        Statement::builder(Claim::entity(props::POSITION_HELD, CONGRESS))
            .qualifier(Claim::time(props::START_TIME, WikiDate::year(1977)))
            .build(),
    )];
    let second_term = Statement::builder(Claim::entity(props::POSITION_HELD, CONGRESS))
        .qualifier(Claim::time(props::START_TIME, WikiDate::year(1982)))
        .source(sources())
        .build();

    let first = engine.decide(&second_term, &existing);
    assert_eq!(first.kind(), "create");
    apply(&mut existing, first);

    assert_eq!(
        engine.decide(&second_term, &existing),
        MergeDecision::Skip(SkipCause::Unchanged {
            statement_id: StatementId::new("Q1$1"),
        })
    );
}

use concord::catalog::{CatalogBuilder, OperationCatalog, OperationId};
use concord::datatype::ReturnTypeSpec;
use concord::generator::{ExpressionGenerator, GeneratorConfig};
use concord::operation::{OperationDescriptor, Relevance};
use concord::operations::standard_catalog;
use concord::param::ParameterSpec;
use concord::pool::StaticValuePool;
use concord::selector::{select, Exclusion, SelectionCriteria};

fn mixed_catalog() -> OperationCatalog {
    let numeric = || vec![ParameterSpec::numeric()];
    let mut builder = CatalogBuilder::new();
    builder.register(OperationDescriptor::function("plain", numeric(), ReturnTypeSpec::numeric()));
    builder.register(
        OperationDescriptor::function("switched_off", numeric(), ReturnTypeSpec::numeric())
            .enabled(false),
    );
    builder.register(
        OperationDescriptor::function("rare", numeric(), ReturnTypeSpec::numeric())
            .relevance(Relevance::ExtremeLow),
    );
    builder.register(
        OperationDescriptor::function("diverging", numeric(), ReturnTypeSpec::numeric())
            .reference_compatible(false),
    );
    builder.build().expect("catalog")
}

#[test]
fn defaults_drop_disabled_and_reference_incompatible() {
    let catalog = mixed_catalog();
    let selection = select(&catalog, &SelectionCriteria::default());
    assert_eq!(selection.ids(), vec![OperationId(0), OperationId(2)]);
    assert_eq!(
        selection.excluded(),
        &[
            (OperationId(1), Exclusion::Disabled),
            (OperationId(3), Exclusion::ReferenceIncompatible)
        ]
    );
}

#[test]
fn disabled_descriptors_never_reach_the_output() {
    let catalog = mixed_catalog();
    let selection = select(&catalog, &SelectionCriteria::default());
    let pool = StaticValuePool::standard();
    let report = ExpressionGenerator::new(&pool, GeneratorConfig::default())
        .generate(&selection)
        .expect("report");
    assert!(report.expressions.iter().all(|e| e.name != "switched_off"));
    assert!(report.outcomes.iter().all(|o| o.descriptor != OperationId(1)));
}

#[test]
fn disabled_descriptors_can_be_forced_in() {
    let catalog = mixed_catalog();
    let criteria = SelectionCriteria {
        include_disabled: true,
        ..SelectionCriteria::default()
    };
    assert!(select(&catalog, &criteria).ids().contains(&OperationId(1)));
}

#[test]
fn reference_compatibility_only_filters_when_required() {
    let catalog = standard_catalog().expect("catalog");
    let strict = select(&catalog, &SelectionCriteria::default());
    assert!(strict
        .descriptors()
        .iter()
        .all(|(_, d)| d.is_reference_compatible()));
    assert!(strict
        .excluded()
        .iter()
        .any(|(_, reason)| *reason == Exclusion::ReferenceIncompatible));

    let relaxed = SelectionCriteria {
        require_reference_compatible: false,
        ..SelectionCriteria::default()
    };
    let relaxed = select(&catalog, &relaxed);
    assert!(relaxed
        .descriptors()
        .iter()
        .any(|(_, d)| d.name() == "try_parse_monotonic_iso8601_timestamp"));

    let pool = StaticValuePool::standard();
    let report = ExpressionGenerator::new(&pool, GeneratorConfig::default())
        .generate(&relaxed)
        .expect("report");
    for expression in &report.expressions {
        let eligible = expression.name != "try_parse_monotonic_iso8601_timestamp";
        assert_eq!(expression.reference_eligible, eligible, "{}", expression.syntax);
    }
}

#[test]
fn relevance_floor_is_inclusive() {
    let catalog = mixed_catalog();
    let criteria = SelectionCriteria {
        min_relevance: Relevance::Default,
        ..SelectionCriteria::default()
    };
    let selection = select(&catalog, &criteria);
    assert_eq!(selection.ids(), vec![OperationId(0)]);
    assert!(selection
        .excluded()
        .contains(&(OperationId(2), Exclusion::BelowRelevance)));
}

#[test]
fn selection_keeps_catalog_order() {
    let catalog = standard_catalog().expect("catalog");
    let ids = select(&catalog, &SelectionCriteria::default()).ids();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

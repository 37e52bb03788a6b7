use concord::catalog::{
    CatalogBuilder, CatalogWarning, OperationCatalog, OperationId, CATALOG_FORMAT_VERSION,
};
use concord::characteristic::Characteristic;
use concord::datatype::{ReturnTypeSpec, TypeCategory, TypeIdentifier, ValueKinds};
use concord::error::ConcordError;
use concord::operation::{OperationDescriptor, Relevance};
use concord::operations::standard_catalog;
use concord::param::{EnumConstants, ParameterSpec};

fn build_one(descriptor: OperationDescriptor) -> concord::Result<OperationCatalog> {
    let mut builder = CatalogBuilder::new();
    builder.register(descriptor);
    builder.build()
}

fn assert_malformed(descriptor: OperationDescriptor) {
    match build_one(descriptor) {
        Err(ConcordError::MalformedDescriptor { .. }) => {}
        other => panic!("expected a malformed descriptor, got {other:?}"),
    }
}

#[test]
fn standard_catalog_builds_without_warnings() {
    let catalog = standard_catalog().expect("catalog");
    assert!(!catalog.is_empty());
    assert!(catalog.warnings().is_empty());
    for (_, descriptor) in catalog.iter() {
        assert!(descriptor.validate().is_ok(), "{descriptor}");
    }
}

#[test]
fn overloads_keep_registration_order() {
    let catalog = standard_catalog().expect("catalog");
    let date_trunc: Vec<(OperationId, &OperationDescriptor)> =
        catalog.overloads("date_trunc").collect();
    assert_eq!(date_trunc.len(), 2);
    assert!(date_trunc[0].0 < date_trunc[1].0);
    assert_eq!(date_trunc[0].1.return_type().identifier(), Some(TypeIdentifier::Timestamp));
    assert_eq!(date_trunc[1].1.return_type().identifier(), Some(TypeIdentifier::Interval));
    assert_eq!(catalog.overloads("EXTRACT($ FROM $)").count(), 3);
    assert_eq!(catalog.overloads("justify_interval").count(), 2);
}

#[test]
fn date_bin_is_enabled_with_its_interval_constraint() {
    let catalog = standard_catalog().expect("catalog");
    let (_, date_bin) = catalog.overloads("date_bin").next().expect("date_bin");
    assert!(date_bin.is_enabled());
    assert_eq!(date_bin.get_relevance(), Relevance::Low);
    let forbidden = &date_bin.parameters()[0].incompatibilities()[0];
    assert!(forbidden.contains(Characteristic::IntervalWithMonths));
    assert!(forbidden.contains(Characteristic::MaxValue));
    assert_eq!(forbidden.len(), 2);
}

#[test]
fn pattern_placeholders_must_match_arity() {
    assert_malformed(OperationDescriptor::pattern(
        "$ + $",
        vec![ParameterSpec::numeric()],
        ReturnTypeSpec::numeric(),
    ));
}

#[test]
fn function_names_are_checked() {
    assert_malformed(OperationDescriptor::function(
        "not a name",
        vec![ParameterSpec::numeric()],
        ReturnTypeSpec::numeric(),
    ));
}

#[test]
fn return_identifier_must_belong_to_its_category() {
    assert_malformed(OperationDescriptor::function(
        "f",
        vec![ParameterSpec::numeric()],
        ReturnTypeSpec::with_identifier(TypeCategory::Numeric, TypeIdentifier::Date),
    ));
}

#[test]
fn parameters_must_accept_something() {
    assert_malformed(OperationDescriptor::function(
        "f",
        vec![ParameterSpec::only(ValueKinds::empty())],
        ReturnTypeSpec::numeric(),
    ));
}

#[test]
fn enum_parameters_need_constants() {
    assert_malformed(OperationDescriptor::function(
        "f",
        vec![ParameterSpec::only(ValueKinds::ENUM)],
        ReturnTypeSpec::numeric(),
    ));
    assert_malformed(OperationDescriptor::function(
        "f",
        vec![ParameterSpec::enum_constant(EnumConstants::new("NOTHING", &[], true))],
        ReturnTypeSpec::numeric(),
    ));
}

#[test]
fn empty_forbidden_sets_are_rejected() {
    assert_malformed(OperationDescriptor::function(
        "f",
        vec![ParameterSpec::numeric().incompatible_with(&[])],
        ReturnTypeSpec::numeric(),
    ));
}

#[test]
fn malformed_descriptor_aborts_the_whole_build() {
    let mut builder = CatalogBuilder::new();
    builder.register(OperationDescriptor::function(
        "fine",
        vec![ParameterSpec::numeric()],
        ReturnTypeSpec::numeric(),
    ));
    builder.register(OperationDescriptor::pattern(
        "$",
        vec![ParameterSpec::numeric(), ParameterSpec::numeric()],
        ReturnTypeSpec::numeric(),
    ));
    assert!(builder.build().is_err());
}

#[test]
fn impossible_forbidden_set_is_a_warning() {
    let catalog = build_one(OperationDescriptor::function(
        "f",
        vec![
            ParameterSpec::text(),
            ParameterSpec::numeric().incompatible_with(&[Characteristic::IntervalWithMonths]),
        ],
        ReturnTypeSpec::numeric(),
    ))
    .expect("dead constraints do not fail the build");
    assert_eq!(catalog.warnings().len(), 1);
    match &catalog.warnings()[0] {
        CatalogWarning::DeadConstraint { descriptor, slot, forbidden, .. } => {
            assert_eq!(*descriptor, OperationId(0));
            assert_eq!(*slot, 1);
            assert!(forbidden.contains(Characteristic::IntervalWithMonths));
        }
    }
}

#[test]
fn snapshot_round_trip_keeps_descriptors_and_fingerprint() {
    let catalog = standard_catalog().expect("catalog");
    let json = catalog.to_json().expect("json");
    let restored = OperationCatalog::from_json(&json).expect("restored");
    assert_eq!(restored.len(), catalog.len());
    for ((a, first), (b, second)) in catalog.iter().zip(restored.iter()) {
        assert_eq!(a, b);
        assert_eq!(first, second);
    }
    assert_eq!(
        restored.fingerprint().expect("fingerprint"),
        catalog.fingerprint().expect("fingerprint")
    );
}

#[test]
fn fingerprint_changes_with_the_catalog() {
    let catalog = standard_catalog().expect("catalog");
    let mut snapshot = catalog.snapshot();
    snapshot.descriptors.pop();
    let smaller = OperationCatalog::from_snapshot(snapshot).expect("smaller");
    assert_ne!(
        smaller.fingerprint().expect("fingerprint"),
        catalog.fingerprint().expect("fingerprint")
    );
}

#[test]
fn unknown_snapshot_version_is_refused() {
    let mut snapshot = standard_catalog().expect("catalog").snapshot();
    snapshot.format_version = CATALOG_FORMAT_VERSION + 1;
    assert!(matches!(
        OperationCatalog::from_snapshot(snapshot),
        Err(ConcordError::Serialization(_))
    ));
}

#[test]
fn rendering_substitutes_arguments_left_to_right() {
    let at_time_zone = OperationDescriptor::pattern(
        "$ AT TIME ZONE $::TEXT",
        vec![ParameterSpec::date_time(), ParameterSpec::text()],
        ReturnTypeSpec::date_time(TypeIdentifier::TimestampTz),
    );
    assert_eq!(
        at_time_zone.render(&["DATE '2024-02-29'", "'UTC'"]).expect("render"),
        "DATE '2024-02-29' AT TIME ZONE 'UTC'::TEXT"
    );
    let age = OperationDescriptor::function(
        "age",
        vec![ParameterSpec::date_time(), ParameterSpec::date_time()],
        ReturnTypeSpec::date_time(TypeIdentifier::Interval),
    );
    assert_eq!(age.render(&["a", "b"]).expect("render"), "age(a, b)");
    assert!(age.render(&["a"]).is_err());
}

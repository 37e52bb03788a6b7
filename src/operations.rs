// the built-in catalog sections
use crate::catalog::{CatalogBuilder, OperationCatalog};
use crate::characteristic::Characteristic;
use crate::datatype::{ReturnTypeSpec, TypeIdentifier, ValueKind, ValueKinds};
use crate::error::Result;
use crate::operation::{OperationDescriptor as Op, Relevance};
use crate::param::{
    date_time_component, iso8601_timestamp, precision, time_component, time_zone, type_format,
    ParameterSpec,
};

/// Every built-in section, in registration order.
pub fn standard_catalog() -> Result<OperationCatalog> {
    let mut builder = CatalogBuilder::new();
    register_date_time_operations(&mut builder);
    builder.build()
}

pub fn register_date_time_operations(catalog: &mut CatalogBuilder) {
    let date_time = ParameterSpec::date_time;
    let interval = ParameterSpec::time_interval;
    let without_time = || ParameterSpec::date_time().without(ValueKind::Time);
    let without_date = || ParameterSpec::date_time().without(ValueKind::Date);
    let time_only = || ParameterSpec::only(ValueKinds::TIME);
    let returns_interval = ReturnTypeSpec::date_time(TypeIdentifier::Interval);
    let returns_timestamp = ReturnTypeSpec::date_time(TypeIdentifier::Timestamp);
    let returns_timestamptz = ReturnTypeSpec::date_time(TypeIdentifier::TimestampTz);

    catalog.register(
        Op::function("age", vec![without_time(), without_time()], returns_interval)
            .relevance(Relevance::Low),
    );
    // used to hang the generator, bounded now by the per-descriptor caps
    catalog.register(
        Op::function(
            "date_bin",
            vec![
                interval().incompatible_with(&[
                    Characteristic::IntervalWithMonths,
                    Characteristic::MaxValue,
                ]),
                without_time(),
                without_time(),
            ],
            returns_timestamp,
        )
        .relevance(Relevance::Low),
    );
    catalog.register(
        Op::function("date_trunc", vec![date_time_component(), date_time()], returns_timestamp)
            .comment("for date types other than interval"),
    );
    catalog.register(
        Op::function("date_trunc", vec![date_time_component(), interval()], returns_interval)
            .comment("for interval type"),
    );
    catalog.register(
        Op::pattern(
            "EXTRACT($ FROM $)",
            vec![date_time_component(), without_time()],
            ReturnTypeSpec::numeric(),
        )
        .comment("for date types"),
    );
    catalog.register(
        Op::pattern(
            "EXTRACT($ FROM $)",
            vec![time_component(), without_date()],
            ReturnTypeSpec::numeric(),
        )
        .comment("for time types"),
    );
    catalog.register(
        Op::pattern(
            "EXTRACT($ FROM $)",
            vec![date_time_component(), interval()],
            ReturnTypeSpec::numeric(),
        )
        .comment("for interval type"),
    );
    catalog.register(
        Op::function(
            "date_part",
            vec![date_time_component(), date_time()],
            ReturnTypeSpec::numeric(),
        )
            .comment("for date types other than interval"),
    );
    catalog.register(
        Op::function(
            "date_part",
            vec![date_time_component(), interval()],
            ReturnTypeSpec::numeric(),
        )
            .comment("for interval type"),
    );
    catalog.register(Op::pattern(
        "$ AT TIME ZONE $::TEXT",
        vec![without_time(), time_zone()],
        returns_timestamptz,
    ));
    catalog.register(Op::function(
        "timezone",
        vec![time_zone(), without_time()],
        returns_timestamptz,
    ));
    catalog.register(Op::function(
        "to_timestamp",
        vec![ParameterSpec::numeric()],
        returns_timestamptz,
    ));
    catalog.register(Op::function(
        "to_char",
        vec![without_time(), type_format()],
        ReturnTypeSpec::text(),
    ));
    catalog.register(
        Op::function(
            "try_parse_monotonic_iso8601_timestamp",
            vec![iso8601_timestamp()],
            returns_timestamp,
        )
        .reference_compatible(false),
    );
    for justify in ["justify_days", "justify_hours", "justify_interval"] {
        catalog.register(
            Op::function(justify, vec![time_only()], returns_interval).comment("for time type"),
        );
        catalog.register(
            Op::function(justify, vec![interval()], returns_interval).comment("for interval type"),
        );
    }
    catalog.register(
        Op::pattern("$::TIMESTAMP($)", vec![date_time(), precision()], returns_timestamp)
            .comment("for TIMESTAMP type"),
    );
    catalog.register(
        Op::pattern("$::TIMESTAMPTZ($)", vec![date_time(), precision()], returns_timestamptz)
            .comment("for TIMESTAMPTZ type"),
    );
    for operator in ["$ + $", "$ - $"] {
        catalog.register(
            Op::pattern(operator, vec![date_time(), interval()], returns_timestamptz)
                .comment("with interval type as second operator"),
        );
    }
    for operator in ["$ + $", "$ - $"] {
        catalog.register(
            Op::pattern(operator, vec![date_time(), date_time()], returns_timestamptz)
                .comment("with date-time type as second operator"),
        );
    }
}

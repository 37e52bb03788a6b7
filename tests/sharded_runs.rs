use concord::error::ConcordError;
use concord::generator::{ExpressionGenerator, GeneratorConfig};
use concord::interface::GenerationInterface;
use concord::operations::standard_catalog;
use concord::pool::StaticValuePool;
use concord::selector::{select, SelectionCriteria};

#[test]
fn shard_count_does_not_change_the_output() {
    let catalog = standard_catalog().expect("catalog");
    let selection = select(&catalog, &SelectionCriteria::default());
    let pool = StaticValuePool::standard();
    let config = GeneratorConfig::with_seed(21);
    let sequential = ExpressionGenerator::new(&pool, config)
        .generate(&selection)
        .expect("sequential");
    for shards in [1, 2, 3, 7, 64] {
        let sharded = GenerationInterface::new(&pool, config, shards)
            .run(&selection)
            .expect("sharded");
        assert_eq!(sharded.syntax_lines(), sequential.syntax_lines(), "{shards} shards");
        assert_eq!(sharded.outcomes, sequential.outcomes, "{shards} shards");
        assert_eq!(sharded.digest(), sequential.digest());
    }
}

#[test]
fn zero_shards_runs_on_one() {
    let pool = StaticValuePool::standard();
    let interface = GenerationInterface::new(&pool, GeneratorConfig::default(), 0);
    assert_eq!(interface.shards(), 1);
}

#[test]
fn cancelled_run_reports_cancellation() {
    let catalog = standard_catalog().expect("catalog");
    let selection = select(&catalog, &SelectionCriteria::default());
    let pool = StaticValuePool::standard();
    let interface = GenerationInterface::new(&pool, GeneratorConfig::default(), 4);
    let token = interface.cancel_token();
    assert!(!token.is_cancelled());
    token.cancel();
    assert!(matches!(interface.run(&selection), Err(ConcordError::Cancelled)));
}

#[test]
fn empty_selection_gives_an_empty_report() {
    let catalog = standard_catalog().expect("catalog");
    let criteria = SelectionCriteria {
        require_reference_compatible: true,
        min_relevance: concord::operation::Relevance::ExtremeHigh,
        include_disabled: false,
    };
    let selection = select(&catalog, &criteria);
    assert!(selection.is_empty());
    let pool = StaticValuePool::standard();
    let report = GenerationInterface::new(&pool, GeneratorConfig::default(), 3)
        .run(&selection)
        .expect("report");
    assert_eq!(report.emitted(), 0);
    assert!(report.outcomes.is_empty());
    assert_eq!(report.excluded.len(), catalog.len());
}

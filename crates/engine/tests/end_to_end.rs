//! End-to-end runs of the matrix against the recording store, through to
//! the comparison table.

use idbench_core::{Error, IdStrategy, MetricBundle, ResultSet, ScenarioDefinition};
use idbench_engine::{BenchmarkMatrix, ScenarioRunner};
use idbench_report::{format_diff, metric_deltas, Metric, Report};
use idbench_store::testing::{RecordingStore, StoreCall, StoreOp};
use std::time::Duration;

fn index_scenario() -> ScenarioDefinition {
    ScenarioDefinition {
        measure_index_size: true,
        ..ScenarioDefinition::batched("e2e", 10, 5)
    }
}

#[test]
fn index_size_delta_reaches_report() {
    let store = RecordingStore::new().with_index_sizes([1000, 700]);
    let results = BenchmarkMatrix::new(&store)
        .with_scenarios(vec![index_scenario()])
        .with_strategies(vec![IdStrategy::ObjectId, IdStrategy::Ulid])
        .run()
        .unwrap();

    let result = results.get("e2e").unwrap();
    assert_eq!(result.bundles.len(), 2);
    assert_eq!(
        result.bundle(IdStrategy::ObjectId).unwrap().index_bytes,
        Some(1000)
    );
    assert_eq!(result.bundle(IdStrategy::Ulid).unwrap().index_bytes, Some(700));
    assert!(result.bundle(IdStrategy::Ulid).unwrap().lookup.is_none());

    let deltas = metric_deltas(&results, "e2e", Metric::IndexSize).unwrap();
    assert_eq!(deltas.len(), 1);
    assert_eq!(deltas[0].0, IdStrategy::Ulid);
    assert_eq!(format_diff(deltas[0].1), "+30.00%");

    assert_eq!(store.batch_sizes(), vec![5, 5, 5, 5]);
    assert_eq!(store.count(StoreOp::DropCollection), 2);
    assert!(store.is_empty());
}

#[test]
fn report_from_matrix_run() {
    let store = RecordingStore::new().with_index_sizes([2048, 3072, 1024]);
    let results = BenchmarkMatrix::new(&store)
        .with_scenarios(vec![index_scenario()])
        .run()
        .unwrap();
    assert!(results.is_finalized());

    // Insert timings against the in-memory store can round to zero, so
    // only the index rows are compared here.
    let deltas = metric_deltas(&results, "e2e", Metric::IndexSize).unwrap();
    let formatted: Vec<_> = deltas.iter().map(|(_, d)| format_diff(*d)).collect();
    assert_eq!(formatted, vec!["-50.00%", "+50.00%"]);

    let baseline_insert = results
        .get("e2e")
        .and_then(|r| r.bundle(IdStrategy::ObjectId))
        .map(|b| b.insert.as_micros())
        .unwrap();
    match Report::build(results) {
        Ok(report) => {
            assert!(baseline_insert > 0);
            let table = report.render();
            assert!(table.contains("e2e, index size"));
            assert!(table.contains("2.0 KiB"));
            assert!(table.contains("% diff UUID"));
        }
        Err(Error::InvalidBaseline { metric }) => {
            assert_eq!(baseline_insert, 0);
            assert!(metric.contains("insert duration"));
        }
        Err(other) => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn report_from_recorded_bundles() {
    let store = RecordingStore::new().with_index_sizes([1000, 700]);
    let measured = BenchmarkMatrix::new(&store)
        .with_scenarios(vec![index_scenario()])
        .with_strategies(vec![IdStrategy::ObjectId, IdStrategy::Ulid])
        .run()
        .unwrap();

    // Fixed insert timings so the table is independent of machine speed.
    let mut results = ResultSet::new(measured.strategies().to_vec()).unwrap();
    for (i, (strategy, bundle)) in measured.get("e2e").unwrap().bundles.iter().enumerate() {
        let bundle = MetricBundle {
            insert: Duration::from_millis(100 + 25 * i as u64),
            ..*bundle
        };
        results.record("e2e", *strategy, bundle).unwrap();
    }

    let report = Report::build(results).unwrap();
    let rows = report.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].values, vec!["100ms", "125ms"]);
    assert_eq!(rows[0].deltas, vec!["-25.00%"]);
    assert_eq!(rows[1].label, "e2e, index size");
    assert_eq!(rows[1].values, vec!["1000 B", "700 B"]);
    assert_eq!(rows[1].deltas, vec!["+30.00%"]);
    assert!(report.render().contains("% diff ULID"));
}

#[test]
fn preexisting_scenario_runs_every_phase() {
    let scenario = ScenarioDefinition::with_preexisting("loaded", 6, 9, 4);
    let store = RecordingStore::new().with_index_sizes([512]);
    let runner = ScenarioRunner::new(&store)
        .with_provision_batch_size(5)
        .with_lookup_probes(3);
    let results = BenchmarkMatrix::with_runner(runner)
        .with_scenarios(vec![scenario])
        .with_strategies(vec![IdStrategy::Uuid])
        .run()
        .unwrap();

    let bundle = results.get("loaded").unwrap().bundle(IdStrategy::Uuid).unwrap();
    assert!(bundle.lookup.is_some());
    assert_eq!(bundle.index_bytes, Some(512));

    let calls = store.calls();
    assert_eq!(store.batch_sizes(), vec![5, 4, 4, 2]);
    assert_eq!(store.count(StoreOp::FindById), 3);
    assert_eq!(calls.last(), Some(&StoreCall::DropCollection));
}

#[test]
fn failure_in_second_strategy_aborts_run() {
    let store = RecordingStore::new();
    store.fail_nth(StoreOp::InsertOne, 3);
    let err = BenchmarkMatrix::new(&store)
        .with_scenarios(vec![ScenarioDefinition::single("singles", 2)])
        .run()
        .unwrap_err();

    assert!(err.to_string().contains("singles"));
    assert!(err.to_string().contains("ULID"));
    // cleanup still ran for both attempted strategies
    assert_eq!(store.count(StoreOp::DropCollection), 2);
    assert_eq!(store.count(StoreOp::InsertOne), 4);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn batches_cover_every_document_once(total in 0usize..200, batch in 1usize..50) {
            let store = RecordingStore::new();
            let scenario = ScenarioDefinition::batched("prop", total, batch);
            ScenarioRunner::new(&store).run(&scenario, IdStrategy::Ulid).unwrap();

            let sizes = store.batch_sizes();
            prop_assert_eq!(sizes.iter().sum::<usize>(), total);
            prop_assert!(sizes.iter().all(|&n| n > 0 && n <= batch));
            prop_assert_eq!(sizes, scenario.insert_call_sizes().collect::<Vec<_>>());
            prop_assert_eq!(store.inserted().len(), total);
            prop_assert!(store.is_empty());
        }
    }
}

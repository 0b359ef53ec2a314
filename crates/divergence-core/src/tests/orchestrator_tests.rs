use crate::{
    CancelToken, MemorySink, PuzzleRecord, PuzzleSink, RunError, SinkError, WalkConfig,
    run_walks, run_walks_with_hook,
};

use super::fakes::{BASE, PathRules, ScriptedProvider, TARGET, UnreachableProvider, test_config};

/// Diverges at the start for half the sampled first moves.
fn branching_provider() -> ScriptedProvider {
    ScriptedProvider::new()
        .with_both("start", &[("e2e4", 50), ("d2d4", 50)])
        .with_counts("start/e2e4", BASE, &[("e7e5", 80), ("c7c5", 20)])
        .with_counts("start/e2e4", TARGET, &[("e7e5", 20), ("c7c5", 80)])
}

struct RejectingSink;

impl PuzzleSink for RejectingSink {
    fn append(&mut self, _record: &PuzzleRecord) -> Result<u64, SinkError> {
        Err(SinkError::new("disk full"))
    }
}

#[test]
fn report_counts_every_walk() {
    let provider = branching_provider();
    let rules = PathRules::new();
    let config = WalkConfig {
        number_of_walks: 12,
        ..test_config()
    };
    let mut sink = MemorySink::new();

    let report = run_walks(&config, &provider, &rules, &mut sink, &CancelToken::new())
        .expect("run should succeed");

    assert_eq!(report.walks_requested, 12);
    assert_eq!(report.walks_attempted, 12);
    assert_eq!(
        report.puzzles_found + report.walks_abandoned + report.candidates_rejected + report.walks_exhausted,
        12
    );
    assert_eq!(sink.len(), report.puzzles_found);
    // Walks that go d2d4 find no stats at the next position.
    assert_eq!(report.puzzles_found + report.walks_abandoned, 12);
    assert!(sink.records().iter().all(|r| r.fen() == "start/e2e4"));
}

#[test]
fn unavailable_data_is_counted_not_fatal() {
    let provider = UnreachableProvider::default();
    let rules = PathRules::new();
    let config = test_config();
    let mut sink = MemorySink::new();

    let report = run_walks(&config, &provider, &rules, &mut sink, &CancelToken::new())
        .expect("provider failures do not fail the run");

    assert_eq!(report.walks_abandoned, config.number_of_walks);
    assert_eq!(report.puzzles_found, 0);
    assert_eq!(provider.calls(), config.number_of_walks);
    assert!(sink.is_empty());
}

#[test]
fn invalid_config_fails_before_any_walk() {
    let provider = UnreachableProvider::default();
    let rules = PathRules::new();
    let config = WalkConfig {
        significance_level: 0.0,
        ..test_config()
    };
    let mut sink = MemorySink::new();

    let err = run_walks(&config, &provider, &rules, &mut sink, &CancelToken::new())
        .expect_err("config is invalid");

    assert!(matches!(err, RunError::Config(_)));
    assert_eq!(provider.calls(), 0);
}

#[test]
fn illegal_start_fen_is_a_config_error() {
    let provider = UnreachableProvider::default();
    let rules = PathRules::new();
    let config = WalkConfig {
        start_fen: "invalid start".to_string(),
        ..test_config()
    };
    let mut sink = MemorySink::new();

    let err = run_walks(&config, &provider, &rules, &mut sink, &CancelToken::new())
        .expect_err("start is not legal");

    assert!(matches!(err, RunError::Config(_)));
}

#[test]
fn parallel_run_matches_sequential_run() {
    let provider = branching_provider();
    let rules = PathRules::new();
    let sequential = WalkConfig {
        number_of_walks: 16,
        ..test_config()
    };
    let parallel = WalkConfig {
        workers: 4,
        ..sequential.clone()
    };

    let mut sink_a = MemorySink::new();
    let mut sink_b = MemorySink::new();
    let report_a = run_walks(&sequential, &provider, &rules, &mut sink_a, &CancelToken::new())
        .expect("sequential run");
    let report_b = run_walks(&parallel, &provider, &rules, &mut sink_b, &CancelToken::new())
        .expect("parallel run");

    assert_eq!(report_a, report_b);
    assert_eq!(sink_a.records(), sink_b.records());
}

#[test]
fn cancelled_run_attempts_nothing() {
    let provider = branching_provider();
    let rules = PathRules::new();
    let config = test_config();
    let cancel = CancelToken::new();
    cancel.cancel();
    let mut sink = MemorySink::new();

    let report = run_walks(&config, &provider, &rules, &mut sink, &cancel).expect("run");

    assert_eq!(report.walks_attempted, 0);
    assert_eq!(provider.calls(), 0);
}

#[test]
fn sink_failures_are_counted() {
    let provider = ScriptedProvider::new()
        .with_counts("start", BASE, &[("e2e4", 80), ("d2d4", 20)])
        .with_counts("start", TARGET, &[("e2e4", 20), ("d2d4", 80)]);
    let rules = PathRules::new();
    let config = test_config();

    let report = run_walks(&config, &provider, &rules, &mut RejectingSink, &CancelToken::new())
        .expect("sink failures do not fail the run");

    assert_eq!(report.puzzles_found, config.number_of_walks);
    assert_eq!(report.sink_failures, config.number_of_walks);
}

#[test]
fn hook_sees_every_walk_in_order() {
    let provider = branching_provider();
    let rules = PathRules::new();
    let config = WalkConfig {
        workers: 3,
        ..test_config()
    };
    let mut sink = MemorySink::new();
    let mut seen = Vec::new();

    run_walks_with_hook(
        &config,
        &provider,
        &rules,
        &mut sink,
        &CancelToken::new(),
        |index, _outcome| seen.push(index),
    )
    .expect("run should succeed");

    assert_eq!(seen, (0..config.number_of_walks).collect::<Vec<_>>());
}

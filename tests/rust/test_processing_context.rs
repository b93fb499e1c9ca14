//! Batch context statistics

use serde_json::json;
use std::sync::Arc;

use super::common::*;
use receiptvec::{
    audit_lines, AuditMode, EmbeddingNormalizer, NoopObserver, NormalizerConfig, ProcessingStats,
    VectorEvent, VectorProcessingContext,
};

#[test]
fn test_one_valid_one_invalid_summary() {
    init_test_env();
    let observer = RecordingObserver::new();
    let mut ctx = VectorProcessingContext::with_observer("receipts", observer.clone());

    assert!(ctx.process_vector(vec![0.1, 0.2, 0.3], 3).is_some());
    assert!(ctx.process_vector(json!([0.1, "abc", 0.3]), 3).is_none());

    let summary = ctx.log_stats();
    assert_eq!(summary.total_processed, 2);
    assert_eq!(summary.valid_vectors, 1);
    assert_eq!(summary.invalid_vectors, 1);
    assert_eq!(summary.skipped_vectors, 0);
    assert_eq!(summary.success_rate_display(), "50.00%");
    assert_eq!(summary.average_dimensions, Some(3.0));

    let logged = observer
        .events()
        .into_iter()
        .find_map(|e| match e {
            VectorEvent::BatchSummary { label, summary } => Some((label, summary)),
            _ => None,
        })
        .expect("summary event");
    assert_eq!(logged.0, "receipts");
    assert_eq!(logged.1, summary);
    assert!(logged
        .1
        .to_string()
        .contains("total=2 valid=1 invalid=1 skipped=0 success_rate=50.00%"));
}

#[test]
fn test_empty_batch_reports_zero_rate() {
    let mut ctx = VectorProcessingContext::with_observer("empty", Arc::new(NoopObserver));
    ctx.skip_vector();
    let summary = ctx.log_stats();
    assert_eq!(summary.success_rate_display(), "0%");
    assert_eq!(summary.average_dimensions_display(), "N/A");
    assert_eq!(summary.skipped_vectors, 1);
}

#[test]
fn test_context_does_not_change_parser_outcome() {
    let mut ctx = VectorProcessingContext::with_observer("same", Arc::new(NoopObserver));
    let inputs = vec![
        json!([1, 2]),
        json!("[1,2]"),
        json!([1]),
        json!(null),
        json!({"x": 1}),
    ];
    for input in inputs {
        let direct = receiptvec::parse_and_validate_vector(input.clone(), 2);
        assert_eq!(ctx.process_vector(input, 2), direct);
    }
    assert_eq!(ctx.stats().total_processed, 5);
    assert_eq!(ctx.stats().valid_vectors, 2);
}

#[test]
fn test_parallel_workers_merge_stats() {
    let normalizer = EmbeddingNormalizer::with_observer(
        NormalizerConfig {
            target_dimensions: 3,
            ..Default::default()
        },
        Arc::new(NoopObserver),
    );

    let chunks: Vec<Vec<(usize, String)>> = vec![
        vec![(1, "[1,2,3]".to_string()), (2, "[1,2]".to_string())],
        vec![(3, "\"[4,5,6]\"".to_string()), (4, String::new())],
    ];

    let handles: Vec<_> = chunks
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| {
            let normalizer = normalizer.clone();
            std::thread::spawn(move || {
                audit_lines(
                    &format!("worker-{}", i),
                    chunk,
                    AuditMode::Parse,
                    &normalizer,
                    Arc::new(NoopObserver),
                )
            })
        })
        .collect();

    let mut merged = ProcessingStats::new();
    let mut lines = Vec::new();
    for handle in handles {
        let (outcomes, stats) = handle.join().unwrap();
        lines.extend(outcomes.into_iter().map(|o| o.line));
        merged.merge(&stats);
    }

    assert_eq!(lines, vec![1, 2, 3]);
    assert_eq!(merged.total_processed, 3);
    assert_eq!(merged.valid_vectors, 2);
    assert_eq!(merged.invalid_vectors, 1);
    assert_eq!(merged.skipped_vectors, 1);
    assert_eq!(merged.summary().average_dimensions_display(), "3.0");
}

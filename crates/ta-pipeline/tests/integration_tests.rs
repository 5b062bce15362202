//! Integration tests for ta-pipeline.
//!
//! These tests drive whole runs through the orchestrator: planning failures,
//! column ordering, duplicates and sequential/parallel equivalence.

use std::sync::Arc;
use std::thread;

use approx::assert_relative_eq;
use ta_core::{EngineError, ErrorKind, Field, SeriesSet};
use ta_kernels::prelude::{atr, ema, rsi, sma};
use ta_pipeline::prelude::*;

// ============================================================================
// Test Utilities
// ============================================================================

struct Bars {
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<f64>,
}

/// Deterministic OHLCV bars.
fn create_bars(n: usize) -> Bars {
    let close: Vec<f64> = (0..n)
        .map(|i| 100.0 + 5.0 * (i as f64 * 0.3).sin() + 0.1 * i as f64)
        .collect();
    Bars {
        open: std::iter::once(close[0]).chain(close.iter().copied()).take(n).collect(),
        high: close.iter().map(|c| c + 0.75).collect(),
        low: close.iter().map(|c| c - 0.5).collect(),
        volume: (0..n).map(|i| 1_000.0 + 100.0 * (i % 7) as f64).collect(),
        close,
    }
}

fn series_set(bars: &Bars) -> SeriesSet<'_> {
    SeriesSet::from_ohlcv(&bars.open, &bars.high, &bars.low, &bars.close, &bars.volume).unwrap()
}

fn feature_requests() -> Vec<IndicatorRequest> {
    vec![
        IndicatorRequest::new("ema", 3),
        IndicatorRequest::new("rsi", 14),
        IndicatorRequest::new("sma", 5).on(Field::Volume),
        IndicatorRequest::new("rolling_std", 10),
        IndicatorRequest::new("bb_upper", 20).with_multiplier(2.0),
        IndicatorRequest::new("bb_percent_b", 20),
        IndicatorRequest::new("atr", 14),
        IndicatorRequest::new("roc", 3),
        IndicatorRequest::new("log_return", 1),
        IndicatorRequest::new("bb_middle", 20),
    ]
}

// ============================================================================
// Matrix Assembly
// ============================================================================

#[test]
fn test_columns_follow_request_order() {
    let bars = create_bars(60);
    let set = series_set(&bars);
    let requests = feature_requests();

    let matrix = Pipeline::default().run(&set, &requests).unwrap();

    assert_eq!(matrix.shape(), (60, requests.len()));
    let labels: Vec<String> = requests.iter().map(IndicatorRequest::label).collect();
    assert_eq!(matrix.labels(), labels.as_slice());
    assert_eq!(
        matrix.labels()[..4],
        ["ema_3", "rsi_14", "sma_5_volume", "rolling_std_10"]
    );
}

#[test]
fn test_columns_match_free_functions() {
    let bars = create_bars(60);
    let set = series_set(&bars);
    let matrix = Pipeline::default().run(&set, &feature_requests()).unwrap();

    let expected = ema(&bars.close, 3).unwrap();
    assert!(bitwise_eq(matrix.column(0), &expected));

    let expected = rsi(&bars.close, 14).unwrap();
    assert!(bitwise_eq(matrix.column(1), &expected));

    let expected = sma(&bars.volume, 5).unwrap();
    assert!(bitwise_eq(matrix.column(2), &expected));

    let expected = atr(&bars.high, &bars.low, &bars.close, 14).unwrap();
    assert!(bitwise_eq(matrix.column(6), &expected));
}

#[test]
fn test_warm_up_cells_are_nan() {
    let bars = create_bars(30);
    let set = series_set(&bars);
    let matrix = Pipeline::default()
        .run(
            &set,
            &[IndicatorRequest::new("ema", 5), IndicatorRequest::new("rsi", 5)],
        )
        .unwrap();

    assert_eq!(matrix.nan_count(0), 4);
    assert_eq!(matrix.nan_count(1), 5);
    assert!(matrix.get(4, 0).unwrap().is_finite());
    assert!(matrix.get(5, 1).unwrap().is_finite());
}

#[test]
fn test_order_does_not_change_values() {
    let bars = create_bars(50);
    let set = series_set(&bars);
    let requests = feature_requests();
    let mut reversed = requests.clone();
    reversed.reverse();

    let pipeline = Pipeline::default();
    let forward = pipeline.run(&set, &requests).unwrap();
    let backward = pipeline.run(&set, &reversed).unwrap();

    let k = requests.len();
    for i in 0..k {
        assert!(bitwise_eq(forward.column(i), backward.column(k - 1 - i)));
    }
}

#[test]
fn test_duplicate_requests_are_independent_columns() {
    let bars = create_bars(20);
    let set = series_set(&bars);
    let request = IndicatorRequest::new("ema", 4);

    let matrix = Pipeline::default()
        .run(&set, &[request.clone(), request.clone(), request])
        .unwrap();

    assert_eq!(matrix.cols(), 3);
    assert_eq!(matrix.labels(), ["ema_4", "ema_4", "ema_4"]);
    assert!(bitwise_eq(matrix.column(0), matrix.column(1)));
    assert!(bitwise_eq(matrix.column(1), matrix.column(2)));
}

#[test]
fn test_period_longer_than_series_is_all_nan() {
    let bars = create_bars(10);
    let set = series_set(&bars);

    let matrix = Pipeline::default()
        .run(
            &set,
            &[
                IndicatorRequest::new("ema", 11),
                IndicatorRequest::new("rsi", 10),
                IndicatorRequest::new("atr", 50),
                IndicatorRequest::new("sma", 3),
            ],
        )
        .unwrap();

    assert_eq!(matrix.nan_count(0), 10);
    assert_eq!(matrix.nan_count(1), 10);
    assert_eq!(matrix.nan_count(2), 10);
    assert_eq!(matrix.nan_count(3), 2);
}

#[test]
fn test_labels_and_source_override() {
    let bars = create_bars(30);
    let set = series_set(&bars);

    let matrix = Pipeline::default()
        .run(
            &set,
            &[
                IndicatorRequest::new("sma", 5).on(Field::High).labeled("high_ma"),
                IndicatorRequest::new("sma", 5),
            ],
        )
        .unwrap();

    let high_ma = matrix.column_by_label("high_ma").unwrap();
    let close_ma = matrix.column_by_label("sma_5").unwrap();
    for i in 4..30 {
        assert_relative_eq!(high_ma[i] - close_ma[i], 0.75, epsilon = 1e-9);
    }
}

// ============================================================================
// Failure Semantics
// ============================================================================

#[test]
fn test_missing_field_is_shape_error() {
    let close = [1.0, 2.0, 3.0, 4.0];
    let set = SeriesSet::new().with(Field::Close, &close).unwrap();

    for request in [
        IndicatorRequest::new("atr", 2),
        IndicatorRequest::new("sma", 2).on(Field::Volume),
    ] {
        let err = Pipeline::default().run(&set, &[request]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
        assert!(matches!(err, EngineError::MissingField { .. }));
    }
}

#[test]
fn test_any_failure_fails_whole_run() {
    let bars = create_bars(30);
    let set = series_set(&bars);

    let mut requests = feature_requests();
    requests.push(IndicatorRequest::new("ema", -1));
    let err = Pipeline::default().run(&set, &requests).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);

    let mut requests = feature_requests();
    requests.insert(3, IndicatorRequest::new("kama", 10));
    let err = Pipeline::default().run(&set, &requests).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownKernel);

    let mut requests = feature_requests();
    requests.push(IndicatorRequest::new("bb_lower", 20).with_multiplier(0.0));
    let err = Pipeline::new(PipelineConfig::parallel(3))
        .unwrap()
        .run(&set, &requests)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}

#[test]
fn test_first_failing_request_is_reported() {
    let bars = create_bars(10);
    let set = series_set(&bars);

    let err = Pipeline::default()
        .run(
            &set,
            &[
                IndicatorRequest::new("ema", 3),
                IndicatorRequest::new("nope", 3),
                IndicatorRequest::new("ema", 0),
            ],
        )
        .unwrap_err();
    assert_eq!(err, EngineError::UnknownKernel("nope".to_string()));
}

#[test]
fn test_source_override_on_fixed_input_kernel_rejected() {
    let bars = create_bars(30);
    let set = series_set(&bars);

    let err = Pipeline::default()
        .run(
            &set,
            &[
                IndicatorRequest::new("ema", 3),
                IndicatorRequest::new("atr", 14).on(Field::Open),
            ],
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    assert!(matches!(
        err,
        EngineError::InvalidParameter { name: "source", .. }
    ));

    let matrix = Pipeline::default()
        .run(&set, &[IndicatorRequest::new("atr", 14).on(Field::Close)])
        .unwrap();
    assert_eq!(matrix.labels(), ["atr_14"]);
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_sequential_and_parallel_bit_identical() {
    let bars = create_bars(500);
    let set = series_set(&bars);
    let mut requests = feature_requests();
    requests.extend(feature_requests());

    let sequential = Pipeline::default().run(&set, &requests).unwrap();
    for workers in [1, 2, 4, 8] {
        let parallel = Pipeline::new(PipelineConfig::parallel(workers))
            .unwrap()
            .run(&set, &requests)
            .unwrap();
        assert!(sequential.bitwise_eq(&parallel), "workers = {}", workers);
    }
}

#[test]
fn test_repeated_runs_bit_identical() {
    let bars = create_bars(200);
    let set = series_set(&bars);
    let pipeline = Pipeline::new(PipelineConfig::parallel(4)).unwrap();

    let first = pipeline.run(&set, &feature_requests()).unwrap();
    for _ in 0..5 {
        let again = pipeline.run(&set, &feature_requests()).unwrap();
        assert!(first.bitwise_eq(&again));
    }
}

#[test]
fn test_shared_pipeline_across_threads() {
    let pipeline = Arc::new(Pipeline::new(PipelineConfig::parallel(2)).unwrap());
    let bars = Arc::new(create_bars(100));
    let reference = pipeline.run(&series_set(&bars), &feature_requests()).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pipeline = Arc::clone(&pipeline);
            let bars = Arc::clone(&bars);
            thread::spawn(move || pipeline.run(&series_set(&bars), &feature_requests()).unwrap())
        })
        .collect();

    for handle in handles {
        let matrix = handle.join().unwrap();
        assert!(matrix.bitwise_eq(&reference));
    }
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_from_json_drives_execution() {
    let config = PipelineConfig::from_json(r#"{"execution": {"mode": "parallel", "workers": 3}}"#)
        .unwrap();
    let pipeline = Pipeline::new(config).unwrap();
    assert_eq!(pipeline.config().execution, Execution::Parallel { workers: 3 });

    let json = r#"[{"kernel": "EMA", "period": 3}, {"kernel": "rsi", "period": 5, "label": "r"}]"#;
    let requests = IndicatorRequest::list_from_json(json).unwrap();

    let close = [44.0, 44.25, 44.5, 43.75, 44.5, 44.75, 45.0];
    let set = SeriesSet::new().with(Field::Close, &close).unwrap();
    let matrix = pipeline.run(&set, &requests).unwrap();

    assert_eq!(matrix.labels(), ["ema_3", "r"]);
    assert_relative_eq!(matrix.get(5, 1).unwrap(), 100.0 - 100.0 / 3.0, epsilon = 1e-9);
}

#[test]
fn test_custom_registry() {
    let mut registry = KernelRegistry::new();
    registry.register("fast", Arc::new(ta_kernels::trend::Ema));

    let pipeline = Pipeline::with_registry(PipelineConfig::sequential(), registry).unwrap();
    let close = [1.0, 2.0, 3.0];
    let set = SeriesSet::new().with(Field::Close, &close).unwrap();

    let matrix = pipeline.run(&set, &[IndicatorRequest::new("fast", 2)]).unwrap();
    assert_eq!(matrix.labels(), ["fast_2"]);
    assert_eq!(matrix.column(0)[1..], [1.5, 2.5]);

    let err = pipeline.run(&set, &[IndicatorRequest::new("ema", 2)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownKernel);
}

fn bitwise_eq(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
}

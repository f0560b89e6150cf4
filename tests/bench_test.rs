use std::collections::HashSet;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use corescale::bench::{self, BenchConfig};
use corescale::workload::Workload;

#[test]
fn sequential_results_match_input_order() {
    let workload = Workload::new(Duration::ZERO);
    let inputs: Vec<u64> = (1..=10).collect();

    let (secs, results) = bench::time_sequential(&inputs, |x| workload.square(x));

    assert!(secs >= 0.0);
    assert_eq!(results, vec![1, 4, 9, 16, 25, 36, 49, 64, 81, 100]);
}

#[test]
fn both_runners_produce_the_same_result_set() {
    let inputs = vec![1, 2, 3];

    let (seq_secs, seq_results) = bench::time_sequential(&inputs, |x| x * x);
    let (par_secs, par_results) = bench::time_parallel(&inputs, 2, |x| x * x).unwrap();

    assert!(seq_secs >= 0.0);
    assert!(par_secs >= 0.0);

    let expected: HashSet<u64> = [1, 4, 9].into_iter().collect();
    assert_eq!(seq_results.into_iter().collect::<HashSet<u64>>(), expected);
    assert_eq!(par_results.into_iter().collect::<HashSet<u64>>(), expected);
}

#[test]
fn speedups_are_exact_ratios_of_recorded_timings() {
    let cfg = BenchConfig {
        inputs: (1..=4).collect(),
        delay: Duration::from_millis(2),
        worker_counts: vec![1, 2],
    };

    let report = bench::run(&cfg).unwrap();

    assert_eq!(report.samples.len(), 2);
    assert!(report.sequential_secs > 0.0);
    for (i, sample) in report.samples.iter().enumerate() {
        assert_eq!(sample.workers, i + 1);
        assert!(sample.seconds > 0.0);
        assert_eq!(sample.speedup, report.sequential_secs / sample.seconds);
    }
}

#[test]
fn single_worker_speedup_is_near_one() {
    let cfg = BenchConfig {
        inputs: (1..=5).collect(),
        delay: Duration::from_millis(20),
        worker_counts: vec![1],
    };

    let report = bench::run(&cfg).unwrap();

    // One worker cannot scale; allow a wide band for pool overhead
    // and scheduler noise.
    let speedup = report.samples[0].speedup;
    assert!(
        speedup > 0.5 && speedup < 1.5,
        "1-worker speedup {} outside tolerance",
        speedup
    );
}

#[test]
fn callbacks_fire_once_per_measurement() {
    let cfg = BenchConfig {
        inputs: vec![1, 2, 3],
        delay: Duration::from_millis(1),
        worker_counts: vec![1, 2, 3],
    };

    let mut baseline_calls = 0;
    let mut seen_counts = Vec::new();
    let report = bench::run_with(
        &cfg,
        |secs| {
            baseline_calls += 1;
            assert!(secs > 0.0);
        },
        |sample| seen_counts.push(sample.workers),
    )
    .unwrap();

    assert_eq!(baseline_calls, 1);
    assert_eq!(seen_counts, vec![1, 2, 3]);
    assert_eq!(report.samples.len(), 3);
}

fn distinct_workers_used(inputs: &[u64], workers: usize) -> usize {
    let seen = Mutex::new(HashSet::new());
    let (_, results) = bench::time_parallel(inputs, workers, |x| {
        seen.lock().unwrap().insert(rayon::current_thread_index());
        // Hold the item long enough that an oversized pool would fan out.
        thread::sleep(Duration::from_millis(5));
        x * x
    })
    .unwrap();
    assert_eq!(results.len(), inputs.len());
    seen.into_inner().unwrap().len()
}

#[test]
fn measured_window_spans_pool_lifecycle() {
    // Even with nothing to process, the sample covers pool spawn and
    // teardown, so the clock must have advanced.
    let (secs, results) = bench::time_parallel(&[], 8, |x| x * x).unwrap();
    assert!(results.is_empty());
    assert!(secs > 0.0);
}

#[test]
fn pool_never_exceeds_requested_worker_count() {
    let inputs: Vec<u64> = (1..=12).collect();
    assert!(distinct_workers_used(&inputs, 1) <= 1);
    assert!(distinct_workers_used(&inputs, 3) <= 3);
}

#[test]
fn worker_counts_cover_one_through_max() {
    let cfg = BenchConfig::new(3, Duration::ZERO, 4);
    assert_eq!(cfg.inputs, vec![1, 2, 3]);
    assert_eq!(cfg.worker_counts, vec![1, 2, 3, 4]);
}

#[test]
fn available_cores_is_at_least_one() {
    assert!(bench::available_cores() >= 1);
}

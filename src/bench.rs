use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use rayon::prelude::*;

use crate::workload::Workload;

pub const DEFAULT_INPUT_COUNT: u64 = 10;
pub const DEFAULT_DELAY_MS: u64 = 500;

/// One benchmarked point: worker count, measured wall-clock seconds,
/// and speedup relative to the sequential baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub workers: usize,
    pub seconds: f64,
    pub speedup: f64,
}

#[derive(Debug, Clone)]
pub struct BenchReport {
    pub sequential_secs: f64,
    pub samples: Vec<Sample>,
}

/// Everything the benchmark depends on, as plain data so tests can
/// substitute a tiny input set, a zero delay, or fixed worker counts.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub inputs: Vec<u64>,
    pub delay: Duration,
    pub worker_counts: Vec<usize>,
}

impl BenchConfig {
    pub fn new(input_count: u64, delay: Duration, max_workers: usize) -> Self {
        Self {
            inputs: (1..=input_count).collect(),
            delay,
            worker_counts: (1..=max_workers.max(1)).collect(),
        }
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_INPUT_COUNT,
            Duration::from_millis(DEFAULT_DELAY_MS),
            available_cores(),
        )
    }
}

/// Number of parallel execution units on this host, never less than 1.
pub fn available_cores() -> usize {
    num_cpus::get().max(1)
}

/// Apply `work` to every input in order on the calling thread.
/// Returns elapsed wall-clock seconds and the collected results.
pub fn time_sequential<F>(inputs: &[u64], work: F) -> (f64, Vec<u64>)
where
    F: Fn(u64) -> u64,
{
    let start = Instant::now();
    let results: Vec<u64> = inputs.iter().map(|&x| work(x)).collect();
    (start.elapsed().as_secs_f64(), results)
}

/// Distribute the inputs across a pool of exactly `workers` threads and
/// wait for every result. The pool is built fresh for this one
/// measurement and dropped before the clock stops, so the measured
/// window covers the full pool lifecycle: spawn, work, teardown. A
/// panic inside `work` resumes on the calling thread, so a failing
/// workload aborts the measurement rather than yielding a partial time.
pub fn time_parallel<F>(inputs: &[u64], workers: usize, work: F) -> Result<(f64, Vec<u64>)>
where
    F: Fn(u64) -> u64 + Sync,
{
    let start = Instant::now();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .with_context(|| format!("Failed to spawn a pool of {} workers", workers))?;
    let results: Vec<u64> = pool.install(|| inputs.par_iter().map(|&x| work(x)).collect());
    drop(pool);

    Ok((start.elapsed().as_secs_f64(), results))
}

/// Run the full benchmark: sequential baseline once, then one parallel
/// measurement per configured worker count in increasing order. Each
/// pool is drained and torn down before the next is created, so the
/// measurements never overlap. `on_baseline` fires once after the
/// sequential run and `on_sample` after each parallel point, letting
/// the caller report progress without the measurement core knowing
/// anything about output.
pub fn run_with<B, F>(cfg: &BenchConfig, mut on_baseline: B, mut on_sample: F) -> Result<BenchReport>
where
    B: FnMut(f64),
    F: FnMut(&Sample),
{
    let workload = Workload::new(cfg.delay);

    let (sequential_secs, _) = time_sequential(&cfg.inputs, |x| workload.square(x));
    check_timing(sequential_secs, "sequential run")?;
    on_baseline(sequential_secs);

    let mut samples = Vec::with_capacity(cfg.worker_counts.len());
    for &workers in &cfg.worker_counts {
        let (seconds, _) = time_parallel(&cfg.inputs, workers, |x| workload.square(x))?;
        check_timing(seconds, &format!("{} workers", workers))?;

        let sample = Sample {
            workers,
            seconds,
            speedup: sequential_secs / seconds,
        };
        on_sample(&sample);
        samples.push(sample);
    }

    Ok(BenchReport {
        sequential_secs,
        samples,
    })
}

pub fn run(cfg: &BenchConfig) -> Result<BenchReport> {
    run_with(cfg, |_| {}, |_| {})
}

// A clock that moves backwards or stands still would turn into an
// infinite or negative speedup; treat it as a broken measurement.
fn check_timing(seconds: f64, what: &str) -> Result<()> {
    if seconds <= 0.0 {
        bail!("Non-positive timing for {}: {}s", what, seconds);
    }
    Ok(())
}

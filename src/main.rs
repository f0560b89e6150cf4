use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use corescale::bench::{self, BenchConfig, DEFAULT_DELAY_MS, DEFAULT_INPUT_COUNT};
use corescale::report;

#[derive(Parser, Debug)]
#[command(name = "corescale")]
#[command(about = "Benchmark parallel speedup across worker counts", long_about = None)]
struct Args {
    /// Simulated per-item work duration in milliseconds
    #[arg(long, default_value_t = DEFAULT_DELAY_MS)]
    delay_ms: u64,

    /// Number of inputs to process (the integers 1..=N)
    #[arg(long, default_value_t = DEFAULT_INPUT_COUNT)]
    inputs: u64,

    /// Highest worker count to benchmark (defaults to number of CPU cores)
    #[arg(short = 'j', long)]
    max_workers: Option<usize>,

    /// Directory to write the chart images into
    #[arg(long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Do not open the charts in an image viewer
    #[arg(long)]
    no_show: bool,

    /// Disable progress bar
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let max_workers = args.max_workers.unwrap_or_else(bench::available_cores);
    let cfg = BenchConfig::new(
        args.inputs,
        Duration::from_millis(args.delay_ms),
        max_workers,
    );

    println!(
        "Benchmarking {} inputs at {}ms each, 1..={} workers",
        cfg.inputs.len(),
        args.delay_ms,
        max_workers
    );

    let progress = if !args.quiet {
        Some(create_progress_bar(cfg.worker_counts.len()))
    } else {
        None
    };

    // Result lines go through the bar so they stay in order above it.
    let emit = |line: String| match progress {
        Some(ref pb) => pb.println(line),
        None => println!("{}", line),
    };

    let report = bench::run_with(
        &cfg,
        |seq_secs| emit(report::baseline_line(seq_secs)),
        |sample| {
            emit(report::sample_line(sample));
            if let Some(ref pb) = progress {
                pb.inc(1);
            }
        },
    )?;

    if let Some(ref pb) = progress {
        pb.finish_with_message("Benchmark complete");
    }

    let (time_chart, speedup_chart) = report::render_charts(&args.out_dir, &report)?;
    println!("Wrote {}", time_chart.display());
    println!("Wrote {}", speedup_chart.display());

    if !args.no_show {
        report::show_chart(&time_chart);
        report::show_chart(&speedup_chart);
    }

    Ok(())
}

fn create_progress_bar(total_points: usize) -> ProgressBar {
    let pb = ProgressBar::new(total_points as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} worker counts ({eta})",
            )
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use plotters::prelude::*;

use crate::bench::{BenchReport, Sample};

pub const TIME_CHART_FILE: &str = "execution_time_vs_cores.png";
pub const SPEEDUP_CHART_FILE: &str = "speedup_vs_cores.png";

const CHART_SIZE: (u32, u32) = (640, 400);

pub fn baseline_line(sequential_secs: f64) -> String {
    format!("Sequential time: {:.2}s", sequential_secs)
}

pub fn sample_line(sample: &Sample) -> String {
    format!(
        "{} cores -> {:.2}s ({:.2}x speedup)",
        sample.workers, sample.seconds, sample.speedup
    )
}

/// Console summary, one line per measurement, in worker-count order.
pub fn summary_lines(report: &BenchReport) -> Vec<String> {
    let mut lines = Vec::with_capacity(report.samples.len() + 1);
    lines.push(baseline_line(report.sequential_secs));
    for s in &report.samples {
        lines.push(sample_line(s));
    }
    lines
}

/// Render both charts into `dir`, overwriting any previous run's files.
/// Returns the written paths (time chart, speedup chart).
pub fn render_charts(dir: &Path, report: &BenchReport) -> Result<(PathBuf, PathBuf)> {
    let time_path = dir.join(TIME_CHART_FILE);
    let speedup_path = dir.join(SPEEDUP_CHART_FILE);

    plot_times(&time_path, report)
        .with_context(|| format!("Failed to write chart: {}", time_path.display()))?;
    plot_speedups(&speedup_path, report)
        .with_context(|| format!("Failed to write chart: {}", speedup_path.display()))?;

    Ok((time_path, speedup_path))
}

fn plot_times(path: &Path, report: &BenchReport) -> Result<()> {
    let points: Vec<(u32, f64)> = report
        .samples
        .iter()
        .map(|s| (s.workers as u32, s.seconds))
        .collect();
    let max_workers = points.last().map(|&(w, _)| w).unwrap_or(1);
    let max_secs = points.iter().map(|&(_, t)| t).fold(0.0_f64, f64::max);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Execution Time vs Number of Cores", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0u32..max_workers + 1, 0.0_f64..max_secs * 1.1)?;

    chart
        .configure_mesh()
        .x_desc("Number of Cores")
        .y_desc("Execution Time (seconds)")
        .draw()?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &BLUE))?
        .label("Execution Time")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    chart.draw_series(points.iter().map(|&p| Circle::new(p, 3, BLUE.filled())))?;

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn plot_speedups(path: &Path, report: &BenchReport) -> Result<()> {
    let points: Vec<(u32, f64)> = report
        .samples
        .iter()
        .map(|s| (s.workers as u32, s.speedup))
        .collect();
    let max_workers = points.last().map(|&(w, _)| w).unwrap_or(1);
    let max_speedup = points
        .iter()
        .map(|&(_, s)| s)
        .fold(max_workers as f64, f64::max);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Speedup vs Number of Cores", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0u32..max_workers + 1, 0.0_f64..max_speedup * 1.1)?;

    chart
        .configure_mesh()
        .x_desc("Number of Cores")
        .y_desc("Speedup (Relative to Sequential)")
        .draw()?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &GREEN))?
        .label("Speedup")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));
    chart.draw_series(points.iter().map(|&p| Circle::new(p, 3, GREEN.filled())))?;

    // Perfect linear scaling, for reference.
    chart
        .draw_series(LineSeries::new(
            (1..=max_workers).map(|w| (w, w as f64)),
            &RED,
        ))?
        .label("Ideal Speedup")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Hand the chart to the platform's default viewer. Best-effort: on a
/// headless host there is nothing to open, and that must not fail the run.
pub fn show_chart(path: &Path) {
    #[cfg(target_os = "macos")]
    const OPENER: &str = "open";
    #[cfg(target_os = "windows")]
    const OPENER: &str = "explorer";
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    const OPENER: &str = "xdg-open";

    let _ = Command::new(OPENER).arg(path).spawn();
}

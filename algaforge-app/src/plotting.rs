//! Renders calculation results as bar charts.

use algaforge_core::{
    analysis::ChartData,
    simulation::result::{MetricKind, SimulationResult},
};
use anyhow::Result;
use log::{info, warn};
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// Metrics are grouped by kind so values of similar magnitude share an axis.
const PANELS: [(MetricKind, &str, &str, &str); 4] = [
    (MetricKind::Mass, "1_daily_masses.png", "Daily Outputs", "Mass"),
    (MetricKind::Volume, "2_daily_volumes.png", "Downstream Volumes", "Volume (mL/day)"),
    (MetricKind::Concentration, "3_nutrient_removal.png", "Nutrient Removal", "Removed (ppm/day)"),
    (MetricKind::Percentage, "4_removal_efficiency.png", "Removal Efficiency", "Efficiency (%)"),
];

/// Saves one bar chart per metric group into `output_dir` and returns the written paths.
pub fn generate_result_plots(output_dir: &Path, result: &SimulationResult) -> Result<Vec<PathBuf>> {
    info!("Generating charts for '{}'", result.species());
    let mut written = Vec::new();

    for (kind, file_name, caption, y_desc) in PANELS {
        let data = ChartData::filtered(result, |metric| metric.kind() == kind);
        if data.is_empty() {
            warn!("No metrics to plot for '{}'", caption);
            continue;
        }
        let path = output_dir.join(file_name);
        let caption = format!("{} - {}", caption, result.species());
        plot_bars(&path, &caption, y_desc, &data, kind == MetricKind::Percentage)?;
        written.push(path);
    }

    Ok(written)
}

/// Drops the unit suffix of a label, e.g. "CO2 captured (g/day)" -> "CO2 captured".
fn short_label(label: &str) -> &str {
    label.split(" (").next().unwrap_or(label)
}

/// Upper bound of the value axis: 100 for percentages, otherwise 15% headroom.
fn axis_max(data: &ChartData, percent_axis: bool) -> f64 {
    if percent_axis {
        return 100.0;
    }
    let max = data.max_value();
    if max > 0.0 {
        max * 1.15
    } else {
        1.0
    }
}

fn plot_bars(path: &Path, caption: &str, y_desc: &str, data: &ChartData, percent_axis: bool) -> Result<()> {
    let root = BitMapBackend::new(path, (1024, 640)).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = axis_max(data, percent_axis);
    let bar_count = data.values.len() as u32;
    let labels: Vec<&str> = data.labels.iter().map(|l| short_label(l)).collect();

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 36).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d((0u32..bar_count).into_segmented(), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc(y_desc)
        .x_labels(labels.len())
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => labels.get(*i as usize).map_or(String::new(), |l| l.to_string()),
            _ => String::new(),
        })
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(RGBColor(70, 130, 180).filled())
            .margin(20)
            .data(data.values.iter().enumerate().map(|(i, v)| (i as u32, *v))),
    )?;

    chart.draw_series(data.values.iter().enumerate().map(|(i, v)| {
        Text::new(
            format!("{}", v),
            (SegmentValue::CenterOf(i as u32), (*v).min(y_max)),
            ("sans-serif", 16).into_font(),
        )
    }))?;

    root.present()?;
    Ok(())
}

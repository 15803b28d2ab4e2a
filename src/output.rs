//! Output formatting and persistence for car metrics.
//!
//! Supports a human summary, JSON logging, and CSV append.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::metrics::{StarBreakdown, bar_fraction, format_rating};
use crate::models::{CarMetrics, Category};
use crate::services::CarDetails;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// One CSV row: a car's metrics at a point in time.
#[derive(Debug, Serialize)]
pub struct MetricsRecord {
    pub generated_at: DateTime<Utc>,
    pub car_id: String,
    pub car: String,
    pub total_reviews: usize,
    pub overall: f64,
    pub performance: f64,
    pub comfort: f64,
    pub consumption: f64,
    pub design: f64,
    pub cost_benefit: f64,
}

impl MetricsRecord {
    pub fn new(car_id: &str, car: &str, metrics: &CarMetrics) -> Self {
        let value = |c| metrics.category(c).value();
        Self {
            generated_at: Utc::now(),
            car_id: car_id.to_string(),
            car: car.to_string(),
            total_reviews: metrics.total_reviews(),
            overall: metrics.overall().value(),
            performance: value(Category::Performance),
            comfort: value(Category::Comfort),
            consumption: value(Category::Consumption),
            design: value(Category::Design),
            cost_benefit: value(Category::CostBenefit),
        }
    }

    pub fn from_details(details: &CarDetails) -> Self {
        Self::new(&details.car.id, &details.car.display_name(), &details.metrics)
    }
}

/// Renders metrics the way the detail page lays them out.
pub fn summary(metrics: &CarMetrics) -> String {
    let overall = metrics.overall().value();
    let stars = StarBreakdown::from_rating(overall);
    let mut out = format!(
        "{} {}{}{} ({} avaliações)\n",
        format_rating(overall),
        "★".repeat(stars.full as usize),
        if stars.half { "⯪" } else { "" },
        "☆".repeat(stars.empty as usize),
        metrics.total_reviews()
    );
    for metric in metrics.categories() {
        let filled = (bar_fraction(metric.value()) * 20.0).round().clamp(0.0, 20.0) as usize;
        out.push_str(&format!(
            "{:<16} {:>4} {}{}\n",
            metric.label(),
            format_rating(metric.value()),
            "█".repeat(filled),
            "░".repeat(20 - filled)
        ));
    }
    out
}

/// Logs the [`summary`] of a car's metrics.
pub fn print_summary(car: &str, metrics: &CarMetrics) {
    info!(car, "\n{}", summary(metrics));
}

/// Logs metrics using Rust's debug pretty-print format.
pub fn print_pretty(metrics: &CarMetrics) {
    debug!("{:#?}", metrics);
}

/// Logs metrics as pretty-printed JSON.
pub fn print_json(metrics: &CarMetrics) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(metrics)?);
    Ok(())
}

/// Appends a [`MetricsRecord`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, record: &MetricsRecord) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}

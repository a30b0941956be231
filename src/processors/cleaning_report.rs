use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::EnergyCategory;

/// What the pipeline dropped, degraded or tolerated along the way.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleaningReport {
    pub total_rows: usize,
    pub unparseable_values: usize,
    pub unparseable_dates: usize,
    pub out_of_range_rows: usize,
    pub retained_rows: usize,
    pub total_production_rows: usize,
    pub component_rows: usize,
    /// Raw rows per category label, before any filtering.
    pub category_counts: BTreeMap<String, usize>,
    /// Pivoted labels that are not one of the known categories.
    pub unknown_categories: BTreeSet<String>,
    /// Known categories with no column in the pivot, filled with zeros.
    pub missing_categories: Vec<EnergyCategory>,
    pub dates_without_total: usize,
    pub output_rows: usize,
}

impl CleaningReport {
    pub fn dropped_rows(&self) -> usize {
        self.unparseable_dates + self.out_of_range_rows
    }

    pub fn has_degradations(&self) -> bool {
        self.dropped_rows() > 0
            || self.unparseable_values > 0
            || !self.missing_categories.is_empty()
            || self.dates_without_total > 0
    }

    /// One line per kind of degradation, or a single all-clear line.
    pub fn verdict_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if self.dropped_rows() > 0 {
            lines.push(format!(
                "⚠️  {} rows dropped ({} unparseable dates, {} outside 2000-2023)",
                self.dropped_rows(),
                self.unparseable_dates,
                self.out_of_range_rows
            ));
        }
        if self.unparseable_values > 0 {
            lines.push(format!(
                "⚠️  {} values could not be parsed and are kept as missing",
                self.unparseable_values
            ));
        }
        if !self.missing_categories.is_empty() {
            lines.push(format!(
                "⚠️  {} known categories absent from the data, filled with zeros",
                self.missing_categories.len()
            ));
        }
        if self.dates_without_total > 0 {
            lines.push(format!(
                "⚠️  {} dates have no total production",
                self.dates_without_total
            ));
        }

        if lines.is_empty() {
            lines.push("✅ All rows passed cleaning".to_string());
        }
        lines
    }

    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Cleaning Report ===\n");
        summary.push_str(&format!("Input Rows: {}\n", self.total_rows));
        summary.push_str(&format!(
            "Retained Rows: {} ({:.1}%)\n",
            self.retained_rows,
            percentage(self.retained_rows, self.total_rows)
        ));
        summary.push_str(&format!("Unparseable Dates (dropped): {}\n", self.unparseable_dates));
        summary.push_str(&format!("Outside 2000-2023 (dropped): {}\n", self.out_of_range_rows));
        summary.push_str(&format!(
            "Unparseable Values (kept as missing): {}\n",
            self.unparseable_values
        ));
        summary.push_str(&format!(
            "Total Production Rows: {}, Component Rows: {}\n",
            self.total_production_rows, self.component_rows
        ));
        summary.push_str(&format!("Output Rows (dates): {}\n", self.output_rows));

        if self.dates_without_total > 0 {
            summary.push_str(&format!(
                "Dates Without Total Production: {}\n",
                self.dates_without_total
            ));
        }

        if !self.category_counts.is_empty() {
            summary.push_str("\nRows per Category:\n");
            for (label, count) in &self.category_counts {
                summary.push_str(&format!("  {}: {}\n", label, count));
            }
        }

        if !self.unknown_categories.is_empty() {
            let labels: Vec<&str> = self.unknown_categories.iter().map(String::as_str).collect();
            summary.push_str(&format!(
                "\nUnknown Categories (no emission factor): {}\n",
                labels.join(", ")
            ));
        }

        if !self.missing_categories.is_empty() {
            let labels: Vec<&str> = self
                .missing_categories
                .iter()
                .map(|c| c.source_label())
                .collect();
            summary.push_str(&format!(
                "\nCategories Absent From Data (zero filled): {}\n",
                labels.join(", ")
            ));
        }

        summary
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

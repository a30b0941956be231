use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{CellValue, Column, WideTable};
use crate::writers::csv_exporter::format_cell;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub name: String,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub sum: f64,
}

impl ColumnStats {
    fn from_values(name: String, values: impl Iterator<Item = Option<f64>>) -> Self {
        let mut stats = ColumnStats {
            name,
            count: 0,
            missing: 0,
            min: None,
            max: None,
            mean: None,
            sum: 0.0,
        };

        for value in values {
            match value {
                Some(v) => {
                    stats.count += 1;
                    stats.sum += v;
                    stats.min = Some(stats.min.map_or(v, |m| m.min(v)));
                    stats.max = Some(stats.max.map_or(v, |m| m.max(v)));
                }
                None => stats.missing += 1,
            }
        }

        if stats.count > 0 {
            stats.mean = Some(stats.sum / stats.count as f64);
        }
        stats
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualTotals {
    pub year: i32,
    pub months: usize,
    pub total_production: f64,
    pub total_emissions: f64,
}

/// Descriptive overview of the final table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSummary {
    pub rows: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub extra_categories: Vec<String>,
    pub columns: Vec<ColumnStats>,
    pub annual_totals: Vec<AnnualTotals>,
}

impl TableSummary {
    pub fn from_table(table: &WideTable) -> Self {
        let columns = table
            .columns()
            .into_iter()
            .filter(|column| !matches!(column, Column::Date | Column::Year | Column::Month))
            .map(|column| {
                let values = table.records.iter().map(|record| match record.value(&column) {
                    CellValue::Number(value) => value,
                    _ => None,
                });
                ColumnStats::from_values(column.header(), values)
            })
            .collect();

        let mut annual: BTreeMap<i32, AnnualTotals> = BTreeMap::new();
        for record in &table.records {
            let entry = annual.entry(record.year).or_insert(AnnualTotals {
                year: record.year,
                months: 0,
                total_production: 0.0,
                total_emissions: 0.0,
            });
            entry.months += 1;
            entry.total_production += record.total_production.unwrap_or(0.0);
            entry.total_emissions += record.total_emissions;
        }

        Self {
            rows: table.len(),
            date_range: table.date_range(),
            extra_categories: table.extra_categories.clone(),
            columns,
            annual_totals: annual.into_values().collect(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnStats> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn detailed_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Production & Emissions Summary ===\n");
        summary.push_str(&format!("Rows (dates): {}\n", self.rows));
        if let Some((first, last)) = self.date_range {
            summary.push_str(&format!("Date Range: {} to {}\n", first, last));
        }
        if !self.extra_categories.is_empty() {
            summary.push_str(&format!(
                "Categories Without Emission Factor: {}\n",
                self.extra_categories.join(", ")
            ));
        }

        summary.push_str("\nColumns:\n");
        for column in &self.columns {
            match (column.min, column.max, column.mean) {
                (Some(min), Some(max), Some(mean)) => summary.push_str(&format!(
                    "  {}: min={:.2}, max={:.2}, mean={:.2}, missing={}\n",
                    column.name, min, max, mean, column.missing
                )),
                _ => summary.push_str(&format!(
                    "  {}: no values, missing={}\n",
                    column.name, column.missing
                )),
            }
        }

        if !self.annual_totals.is_empty() {
            summary.push_str("\nAnnual Totals:\n");
            for year in &self.annual_totals {
                summary.push_str(&format!(
                    "  {} ({} months): production={:.1} TWh, emissions={:.1} Mt CO₂\n",
                    year.year, year.months, year.total_production, year.total_emissions
                ));
            }
        }

        summary
    }
}

/// The first `rows` rows as delimited text, header included.
pub fn preview(table: &WideTable, rows: usize) -> String {
    let columns = table.columns();
    let mut lines = vec![table.column_names().join(" | ")];

    for record in table.records.iter().take(rows) {
        let cells: Vec<String> = columns
            .iter()
            .map(|column| format_cell(record.value(column)))
            .collect();
        lines.push(cells.join(" | "));
    }

    lines.join("\n")
}

use tracing::{debug, info, warn};

use crate::models::{RawRecord, WideRecord, WideTable};
use crate::processors::cleaner::clean_records;
use crate::processors::emissions::derive_emissions;
use crate::processors::reshaper::{
    fill_known_categories, outer_join, pivot_components, split_total_production,
};
use crate::processors::CleaningReport;
use crate::utils::progress::ProgressReporter;

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub table: WideTable,
    pub report: CleaningReport,
}

/// Raw production records in, one emissions-augmented row per date out.
///
/// Each stage takes the previous stage's table by value and returns a new one.
pub struct TransformPipeline;

impl TransformPipeline {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, raw: &[RawRecord]) -> PipelineOutput {
        self.run_with_progress(raw, None)
    }

    pub fn run_with_progress(
        &self,
        raw: &[RawRecord],
        progress: Option<&ProgressReporter>,
    ) -> PipelineOutput {
        let mut report = CleaningReport::default();

        if let Some(p) = progress {
            p.stage("Cleaning values and dates...");
        }
        let cleaned = clean_records(raw, &mut report);
        debug!(
            retained = report.retained_rows,
            dropped = report.dropped_rows(),
            "cleaned records"
        );

        if let Some(p) = progress {
            p.stage("Pivoting production by source...");
        }
        let (total, components) = split_total_production(cleaned);
        report.total_production_rows = report.retained_rows - components.len();
        report.component_rows = components.len();

        let pivot = pivot_components(&components);
        report.unknown_categories = pivot.unknown_categories();
        report.missing_categories = pivot.missing_known_categories();

        let joined = outer_join(&total, &pivot);
        let production = fill_known_categories(joined);

        if let Some(p) = progress {
            p.stage("Estimating CO₂ emissions...");
        }
        let table = derive_emissions(production);
        let table = rederive_calendar_fields(table);

        report.dates_without_total = table
            .records
            .iter()
            .filter(|r| r.total_production.is_none())
            .count();
        report.output_rows = table.len();

        log_degradations(&report);
        info!(
            input_rows = report.total_rows,
            output_rows = report.output_rows,
            "pipeline complete"
        );

        PipelineOutput { table, report }
    }
}

impl Default for TransformPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Recompute year and month on the final table. Safe to apply more than once.
pub fn rederive_calendar_fields(table: WideTable) -> WideTable {
    let records = table
        .records
        .into_iter()
        .map(WideRecord::with_calendar_fields)
        .collect();
    WideTable::new(records, table.extra_categories)
}

fn log_degradations(report: &CleaningReport) {
    if report.unparseable_values > 0 {
        warn!(
            count = report.unparseable_values,
            "values could not be parsed and were kept as missing"
        );
    }
    if report.unparseable_dates > 0 {
        warn!(
            count = report.unparseable_dates,
            "rows dropped because their date could not be parsed"
        );
    }
    for label in &report.unknown_categories {
        warn!(category = %label, "category has no emission factor; excluded from emissions");
    }
    for category in &report.missing_categories {
        warn!(category = %category, "category absent from the data; filled with zeros");
    }
    if report.dates_without_total > 0 {
        debug!(count = report.dates_without_total, "dates without total production");
    }
}

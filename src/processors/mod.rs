pub mod cleaner;
pub mod cleaning_report;
pub mod emissions;
pub mod pipeline;
pub mod reshaper;

pub use cleaner::{clean_records, parse_date, parse_value};
pub use cleaning_report::CleaningReport;
pub use emissions::{category_emissions, derive_emissions};
pub use pipeline::{PipelineOutput, TransformPipeline};
pub use reshaper::{
    fill_known_categories, outer_join, pivot_components, split_total_production, PivotTable,
    ProductionTable, TotalProductionTable,
};

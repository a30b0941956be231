pub mod table_summary;

pub use table_summary::{preview, AnnualTotals, ColumnStats, TableSummary};

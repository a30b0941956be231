use crate::error::Result;
use crate::models::{CellValue, WideTable};
use crate::utils::constants::DEFAULT_OUTPUT_DELIMITER;
use crate::writers::StagedOutput;
use std::io::Write;
use std::path::Path;
use tracing::debug;

pub struct CsvExporter {
    delimiter: u8,
}

impl CsvExporter {
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_OUTPUT_DELIMITER as u8,
        }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Stage the table for `path`. The file appears when `staged` is committed.
    pub fn stage_table(
        &self,
        table: &WideTable,
        path: &Path,
        staged: &mut StagedOutput,
    ) -> Result<()> {
        let bytes = self.to_bytes(table)?;
        staged.stage(path, &bytes)?;

        debug!(
            path = %path.display(),
            rows = table.len(),
            columns = table.columns().len(),
            "staged table export"
        );
        Ok(())
    }

    pub fn to_bytes(&self, table: &WideTable) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_to(table, &mut buffer)?;
        Ok(buffer)
    }

    pub fn write_to<W: Write>(&self, table: &WideTable, out: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(out);

        let columns = table.columns();
        writer.write_record(table.column_names())?;

        for record in &table.records {
            let row: Vec<String> = columns
                .iter()
                .map(|column| format_cell(record.value(column)))
                .collect();
            writer.write_record(&row)?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn format_cell(value: CellValue) -> String {
    match value {
        CellValue::Date(date) => date.format("%Y-%m-%d").to_string(),
        CellValue::Number(Some(number)) => format_number(number),
        CellValue::Number(None) => String::new(),
        CellValue::Integer(number) => number.to_string(),
    }
}

/// Whole numbers keep one decimal (`10.0`) so float columns read as floats.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawRecord;
    use crate::processors::TransformPipeline;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(10.0), "10.0");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(0.0), "0.0");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn test_format_cell() {
        let date = NaiveDate::from_ymd_opt(2001, 3, 1).unwrap();
        assert_eq!(format_cell(CellValue::Date(date)), "2001-03-01");
        assert_eq!(format_cell(CellValue::Number(None)), "");
        assert_eq!(format_cell(CellValue::Integer(2001)), "2001");
    }

    #[test]
    fn test_semicolon_output() -> Result<()> {
        let raw = vec![
            RawRecord::new("2001-03-01", "Eolien", "10,0"),
            RawRecord::new("2001-03-01", "Production totale", "50,0"),
        ];
        let table = TransformPipeline::new().run(&raw).table;

        let bytes = CsvExporter::new().to_bytes(&table)?;
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Date;Total Production (TWh);Eolien (TWh);"));
        assert!(lines[0].ends_with(";Total_CO2_Emissions (Mt CO₂);Year;Month"));
        assert_eq!(
            lines[1],
            "2001-03-01;50.0;10.0;0.0;0.0;0.0;0.0;0.0;0.0;0.0;0.0;0.0;0.0;0.0;0.0;2001;3"
        );
        Ok(())
    }

    #[test]
    fn test_stage_table_creates_parent_dirs() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("out").join("report.csv");

        let mut staged = StagedOutput::new();
        CsvExporter::new().stage_table(&WideTable::default(), &path, &mut staged)?;
        assert!(!path.exists());
        staged.commit()?;

        let content = std::fs::read_to_string(&path)?;
        assert!(content.starts_with("Date;"));
        assert_eq!(content.lines().count(), 1);
        Ok(())
    }
}

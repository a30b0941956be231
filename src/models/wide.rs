use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{CategoryValues, EnergyCategory};
use crate::utils::constants::{
    DATE_COLUMN, MONTH_HEADER, TOTAL_EMISSIONS_HEADER, TOTAL_PRODUCTION_HEADER, YEAR_HEADER,
};

/// Final one-row-per-date record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WideRecord {
    pub date: NaiveDate,
    /// Not zero filled: a date without a total keeps `None`.
    pub total_production: Option<f64>,
    pub production: CategoryValues,
    /// Categories outside the known set, pivoted but not filled.
    pub other_production: BTreeMap<String, Option<f64>>,
    pub emissions: CategoryValues,
    pub total_emissions: f64,
    pub year: i32,
    pub month: u32,
}

impl WideRecord {
    /// Recompute `year` and `month` from `date`.
    pub fn with_calendar_fields(mut self) -> Self {
        self.year = self.date.year();
        self.month = self.date.month();
        self
    }

    pub fn value(&self, column: &Column) -> CellValue {
        match column {
            Column::Date => CellValue::Date(self.date),
            Column::TotalProduction => CellValue::Number(self.total_production),
            Column::Production(category) => CellValue::Number(Some(self.production.get(*category))),
            Column::OtherProduction(label) => {
                CellValue::Number(self.other_production.get(label).copied().flatten())
            }
            Column::Emissions(category) => CellValue::Number(Some(self.emissions.get(*category))),
            Column::TotalEmissions => CellValue::Number(Some(self.total_emissions)),
            Column::Year => CellValue::Integer(i64::from(self.year)),
            Column::Month => CellValue::Integer(i64::from(self.month)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Date,
    TotalProduction,
    Production(EnergyCategory),
    OtherProduction(String),
    Emissions(EnergyCategory),
    TotalEmissions,
    Year,
    Month,
}

impl Column {
    /// Display label used as the exported header.
    pub fn header(&self) -> String {
        match self {
            Column::Date => DATE_COLUMN.to_string(),
            Column::TotalProduction => TOTAL_PRODUCTION_HEADER.to_string(),
            Column::Production(category) => category.production_header().to_string(),
            Column::OtherProduction(label) => label.clone(),
            Column::Emissions(category) => category.emissions_header(),
            Column::TotalEmissions => TOTAL_EMISSIONS_HEADER.to_string(),
            Column::Year => YEAR_HEADER.to_string(),
            Column::Month => MONTH_HEADER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue {
    Date(NaiveDate),
    Number(Option<f64>),
    Integer(i64),
}

/// The pipeline's output table, sorted by date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WideTable {
    pub records: Vec<WideRecord>,
    /// Labels of pivoted categories outside the known set, sorted.
    pub extra_categories: Vec<String>,
}

impl WideTable {
    pub fn new(records: Vec<WideRecord>, extra_categories: Vec<String>) -> Self {
        Self {
            records,
            extra_categories,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Output columns: date, total production, known categories, extra
    /// categories, emissions per known category, total emissions, year, month.
    pub fn columns(&self) -> Vec<Column> {
        let mut columns = Vec::with_capacity(2 * EnergyCategory::COUNT + self.extra_categories.len() + 5);
        columns.push(Column::Date);
        columns.push(Column::TotalProduction);
        columns.extend(EnergyCategory::ALL.iter().map(|c| Column::Production(*c)));
        columns.extend(
            self.extra_categories
                .iter()
                .map(|label| Column::OtherProduction(label.clone())),
        );
        columns.extend(EnergyCategory::ALL.iter().map(|c| Column::Emissions(*c)));
        columns.push(Column::TotalEmissions);
        columns.push(Column::Year);
        columns.push(Column::Month);
        columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns().iter().map(Column::header).collect()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?.date;
        let last = self.records.last()?.date;
        Some((first, last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: NaiveDate) -> WideRecord {
        WideRecord {
            date,
            total_production: None,
            production: CategoryValues::zeros(),
            other_production: BTreeMap::new(),
            emissions: CategoryValues::zeros(),
            total_emissions: 0.0,
            year: 0,
            month: 0,
        }
    }

    #[test]
    fn test_calendar_fields_are_idempotent() {
        let date = NaiveDate::from_ymd_opt(2015, 11, 1).unwrap();
        let once = record(date).with_calendar_fields();
        let twice = once.clone().with_calendar_fields();

        assert_eq!(once.year, 2015);
        assert_eq!(once.month, 11);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_column_order() {
        let table = WideTable::new(vec![], vec!["Bioénergies".to_string()]);
        let names = table.column_names();

        assert_eq!(names.len(), 18);
        assert_eq!(names[0], "Date");
        assert_eq!(names[1], "Total Production (TWh)");
        assert_eq!(names[2], "Eolien (TWh)");
        assert_eq!(names[7], "Thermique renewable and waste (TWh)");
        assert_eq!(names[8], "Bioénergies");
        assert_eq!(names[9], "Eolien_emissions (Mt CO₂)");
        assert_eq!(names[14], "Thermique renouvelable et déchets_emissions (Mt CO₂)");
        assert_eq!(names[15], "Total_CO2_Emissions (Mt CO₂)");
        assert_eq!(names[16], "Year");
        assert_eq!(names[17], "Month");
    }

    #[test]
    fn test_missing_extra_category_value() {
        let date = NaiveDate::from_ymd_opt(2015, 11, 1).unwrap();
        let record = record(date);

        assert_eq!(
            record.value(&Column::OtherProduction("Bioénergies".to_string())),
            CellValue::Number(None)
        );
        assert_eq!(record.value(&Column::TotalProduction), CellValue::Number(None));
    }
}

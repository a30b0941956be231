use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{CategoryValues, CleanedRecord, EnergyCategory};
use crate::utils::constants::TOTAL_PRODUCTION_LABEL;

/// Total production per date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TotalProductionTable {
    pub totals: BTreeMap<NaiveDate, Option<f64>>,
}

/// Component quantities, one row per date and one column per category label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotTable {
    pub columns: BTreeSet<String>,
    pub rows: BTreeMap<NaiveDate, BTreeMap<String, Option<f64>>>,
}

impl PivotTable {
    pub fn missing_known_categories(&self) -> Vec<EnergyCategory> {
        EnergyCategory::ALL
            .iter()
            .copied()
            .filter(|category| !self.columns.contains(category.source_label()))
            .collect()
    }

    pub fn unknown_categories(&self) -> BTreeSet<String> {
        self.columns
            .iter()
            .filter(|label| EnergyCategory::from_source_label(label).is_none())
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRow {
    pub date: NaiveDate,
    pub total_production: Option<f64>,
    pub components: BTreeMap<String, Option<f64>>,
}

/// Result of the outer join, sorted by date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinedTable {
    pub columns: BTreeSet<String>,
    pub rows: Vec<JoinedRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductionRow {
    pub date: NaiveDate,
    pub total_production: Option<f64>,
    pub production: CategoryValues,
    pub other_production: BTreeMap<String, Option<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductionTable {
    pub rows: Vec<ProductionRow>,
    pub extra_categories: Vec<String>,
}

/// Sum that ignores missing values; two missing values stay missing.
fn add_optional(acc: Option<f64>, value: Option<f64>) -> Option<f64> {
    match (acc, value) {
        (Some(a), Some(b)) => Some(a + b),
        (Some(a), None) => Some(a),
        (None, value) => value,
    }
}

/// Separate the `Production totale` rows from the per-source rows.
///
/// Several total rows for one date are summed.
pub fn split_total_production(
    records: Vec<CleanedRecord>,
) -> (TotalProductionTable, Vec<CleanedRecord>) {
    let mut total = TotalProductionTable::default();
    let mut components = Vec::with_capacity(records.len());

    for record in records {
        if record.category == TOTAL_PRODUCTION_LABEL {
            let entry = total.totals.entry(record.date).or_insert(None);
            *entry = add_optional(*entry, record.value);
        } else {
            components.push(record);
        }
    }

    (total, components)
}

/// Long to wide, summing duplicate (date, category) pairs.
pub fn pivot_components(records: &[CleanedRecord]) -> PivotTable {
    let mut pivot = PivotTable::default();

    for record in records {
        pivot.columns.insert(record.category.clone());
        let cell = pivot
            .rows
            .entry(record.date)
            .or_default()
            .entry(record.category.clone())
            .or_insert(None);
        *cell = add_optional(*cell, record.value);
    }

    pivot
}

/// Full outer join on date. Dates found on one side only get missing values
/// for the other side's columns.
pub fn outer_join(total: &TotalProductionTable, pivot: &PivotTable) -> JoinedTable {
    let dates: BTreeSet<NaiveDate> = total
        .totals
        .keys()
        .chain(pivot.rows.keys())
        .copied()
        .collect();

    let rows = dates
        .into_iter()
        .map(|date| JoinedRow {
            date,
            total_production: total.totals.get(&date).copied().flatten(),
            components: pivot.rows.get(&date).cloned().unwrap_or_default(),
        })
        .collect();

    JoinedTable {
        columns: pivot.columns.clone(),
        rows,
    }
}

/// Zero fill the known category columns. The total and extra categories keep
/// their missing values.
pub fn fill_known_categories(joined: JoinedTable) -> ProductionTable {
    let extra_categories: Vec<String> = joined
        .columns
        .iter()
        .filter(|label| EnergyCategory::from_source_label(label).is_none())
        .cloned()
        .collect();

    let rows = joined
        .rows
        .into_iter()
        .map(|row| {
            let mut production = CategoryValues::zeros();
            for category in EnergyCategory::ALL {
                let value = row
                    .components
                    .get(category.source_label())
                    .copied()
                    .flatten()
                    .unwrap_or(0.0);
                production.set(category, value);
            }

            let other_production = extra_categories
                .iter()
                .map(|label| (label.clone(), row.components.get(label).copied().flatten()))
                .collect();

            ProductionRow {
                date: row.date,
                total_production: row.total_production,
                production,
                other_production,
            }
        })
        .collect();

    ProductionTable {
        rows,
        extra_categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn record(date: NaiveDate, category: &str, value: Option<f64>) -> CleanedRecord {
        CleanedRecord::new(date, category, value)
    }

    #[test]
    fn test_split_total_production() {
        let date = ymd(2001, 3, 1);
        let records = vec![
            record(date, "Eolien", Some(10.0)),
            record(date, "Production totale", Some(50.0)),
        ];

        let (total, components) = split_total_production(records);

        assert_eq!(total.totals.get(&date), Some(&Some(50.0)));
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].category, "Eolien");
    }

    #[test]
    fn test_pivot_sums_duplicates() {
        let date = ymd(2010, 1, 1);
        let records = vec![
            record(date, "Nucléaire", Some(5.0)),
            record(date, "Nucléaire", Some(3.0)),
            record(date, "Solaire", None),
        ];

        let pivot = pivot_components(&records);
        let row = &pivot.rows[&date];

        assert_eq!(row["Nucléaire"], Some(8.0));
        assert_eq!(row["Solaire"], None);
        assert_eq!(pivot.columns.len(), 2);
    }

    #[test]
    fn test_pivot_ignores_missing_in_sum() {
        let date = ymd(2010, 1, 1);
        let records = vec![
            record(date, "Hydraulique", None),
            record(date, "Hydraulique", Some(4.5)),
        ];

        let pivot = pivot_components(&records);
        assert_eq!(pivot.rows[&date]["Hydraulique"], Some(4.5));
    }

    #[test]
    fn test_outer_join_keeps_both_sides() {
        let only_total = ymd(2002, 1, 1);
        let only_components = ymd(2002, 2, 1);

        let mut total = TotalProductionTable::default();
        total.totals.insert(only_total, Some(40.0));
        let pivot = pivot_components(&[record(only_components, "Eolien", Some(1.0))]);

        let joined = outer_join(&total, &pivot);

        assert_eq!(joined.rows.len(), 2);
        assert_eq!(joined.rows[0].date, only_total);
        assert_eq!(joined.rows[0].total_production, Some(40.0));
        assert!(joined.rows[0].components.is_empty());
        assert_eq!(joined.rows[1].date, only_components);
        assert_eq!(joined.rows[1].total_production, None);
    }

    #[test]
    fn test_total_only_date_fills_zeros() {
        let date = ymd(2003, 5, 1);
        let mut total = TotalProductionTable::default();
        total.totals.insert(date, Some(45.0));

        let table = fill_known_categories(outer_join(&total, &PivotTable::default()));

        assert_eq!(table.rows.len(), 1);
        for category in EnergyCategory::ALL {
            assert_eq!(table.rows[0].production.get(category), 0.0);
        }
        assert_eq!(table.rows[0].total_production, Some(45.0));
    }

    #[test]
    fn test_total_is_not_filled() {
        let date = ymd(2003, 5, 1);
        let pivot = pivot_components(&[record(date, "Solaire", Some(0.5))]);

        let table = fill_known_categories(outer_join(&TotalProductionTable::default(), &pivot));

        assert_eq!(table.rows[0].total_production, None);
        assert_eq!(table.rows[0].production.get(EnergyCategory::Solar), 0.5);
    }

    #[test]
    fn test_unknown_category_kept_unfilled() {
        let first = ymd(2004, 1, 1);
        let second = ymd(2004, 2, 1);
        let pivot = pivot_components(&[
            record(first, "Bioénergies", Some(0.7)),
            record(second, "Eolien", Some(2.0)),
        ]);

        assert_eq!(
            pivot.unknown_categories(),
            BTreeSet::from(["Bioénergies".to_string()])
        );
        assert_eq!(pivot.missing_known_categories().len(), 5);

        let table = fill_known_categories(outer_join(&TotalProductionTable::default(), &pivot));

        assert_eq!(table.extra_categories, vec!["Bioénergies".to_string()]);
        assert_eq!(table.rows[0].other_production["Bioénergies"], Some(0.7));
        assert_eq!(table.rows[1].other_production["Bioénergies"], None);
    }
}

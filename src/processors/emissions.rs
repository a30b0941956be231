use crate::models::{CategoryValues, EnergyCategory, WideRecord, WideTable};
use crate::processors::reshaper::ProductionTable;
use crate::utils::constants::{EMISSIONS_SCALE_DIVISOR, TWH_SCALE};

/// Emissions in Mt CO₂ for a quantity of the given category.
///
/// The two scale constants cancel out, so the result equals
/// `quantity × factor`. The expression is kept as is so the output matches the
/// published figures bit for bit.
pub fn category_emissions(category: EnergyCategory, quantity_twh: f64) -> f64 {
    (quantity_twh * category.emission_factor() * TWH_SCALE) / EMISSIONS_SCALE_DIVISOR
}

pub fn emissions_for(production: &CategoryValues) -> CategoryValues {
    production.map(category_emissions)
}

/// Add per-category emissions and their row total to every row.
///
/// Extra categories have no factor and never contribute.
pub fn derive_emissions(table: ProductionTable) -> WideTable {
    let records = table
        .rows
        .into_iter()
        .map(|row| {
            let emissions = emissions_for(&row.production);
            let total_emissions = emissions.sum();

            WideRecord {
                date: row.date,
                total_production: row.total_production,
                production: row.production,
                other_production: row.other_production,
                emissions,
                total_emissions,
                year: 0,
                month: 0,
            }
            .with_calendar_fields()
        })
        .collect();

    WideTable::new(records, table.extra_categories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::reshaper::ProductionRow;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    #[test]
    fn test_nuclear_emissions() {
        assert_eq!(category_emissions(EnergyCategory::Nuclear, 2.0), 24.0);
    }

    #[test]
    fn test_wind_emissions_always_zero() {
        for quantity in [0.0, 1.0, 10.0, 123.456] {
            assert_eq!(category_emissions(EnergyCategory::Wind, quantity), 0.0);
        }
    }

    #[test]
    fn test_total_is_sum_of_categories() {
        let mut production = CategoryValues::zeros();
        production.set(EnergyCategory::Nuclear, 30.0);
        production.set(EnergyCategory::FossilThermal, 2.5);
        production.set(EnergyCategory::Solar, 0.75);

        let mut extras = BTreeMap::new();
        extras.insert("Bioénergies".to_string(), Some(100.0));

        let table = ProductionTable {
            rows: vec![ProductionRow {
                date: NaiveDate::from_ymd_opt(2012, 7, 1).unwrap(),
                total_production: Some(40.0),
                production,
                other_production: extras,
            }],
            extra_categories: vec!["Bioénergies".to_string()],
        };

        let wide = derive_emissions(table);
        let record = &wide.records[0];

        let expected: f64 = EnergyCategory::ALL
            .iter()
            .map(|c| record.emissions.get(*c))
            .fold(0.0, |acc, v| acc + v);
        assert_eq!(record.total_emissions, expected);
        assert_eq!(record.emissions.get(EnergyCategory::Nuclear), 360.0);
        assert_eq!(record.emissions.get(EnergyCategory::FossilThermal), 1750.0);
        assert_eq!(record.emissions.get(EnergyCategory::Solar), 30.0);
        assert_eq!(record.total_emissions, 2140.0);
        assert_eq!(record.year, 2012);
        assert_eq!(record.month, 7);
    }
}

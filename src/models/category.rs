use serde::{Deserialize, Serialize};
use std::fmt;

/// The energy sources reported in the production data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnergyCategory {
    Wind,
    Hydraulic,
    Nuclear,
    Solar,
    FossilThermal,
    RenewableThermal,
}

impl EnergyCategory {
    pub const COUNT: usize = 6;

    /// All known categories, in output column order.
    pub const ALL: [EnergyCategory; Self::COUNT] = [
        EnergyCategory::Wind,
        EnergyCategory::Hydraulic,
        EnergyCategory::Nuclear,
        EnergyCategory::Solar,
        EnergyCategory::FossilThermal,
        EnergyCategory::RenewableThermal,
    ];

    /// Label used in the `Filière` column of the source data.
    pub fn source_label(&self) -> &'static str {
        match self {
            EnergyCategory::Wind => "Eolien",
            EnergyCategory::Hydraulic => "Hydraulique",
            EnergyCategory::Nuclear => "Nucléaire",
            EnergyCategory::Solar => "Solaire",
            EnergyCategory::FossilThermal => "Thermique fossile",
            EnergyCategory::RenewableThermal => "Thermique renouvelable et déchets",
        }
    }

    pub fn from_source_label(label: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.source_label() == label)
    }

    /// Emission factor in kg CO₂ per MWh.
    pub fn emission_factor(&self) -> f64 {
        match self {
            EnergyCategory::Wind => 0.0,
            EnergyCategory::Hydraulic => 10.0,
            EnergyCategory::Nuclear => 12.0,
            EnergyCategory::Solar => 40.0,
            EnergyCategory::FossilThermal => 700.0,
            EnergyCategory::RenewableThermal => 200.0,
        }
    }

    /// Header of the production column in the exported table.
    pub fn production_header(&self) -> &'static str {
        match self {
            EnergyCategory::Wind => "Eolien (TWh)",
            EnergyCategory::Hydraulic => "Hydraulique (TWh)",
            EnergyCategory::Nuclear => "Nucléaire (TWh)",
            EnergyCategory::Solar => "Solaire (TWh)",
            EnergyCategory::FossilThermal => "Thermique fossile (TWh)",
            // Kept as published by the downstream dashboards
            EnergyCategory::RenewableThermal => "Thermique renewable and waste (TWh)",
        }
    }

    /// Header of the emissions column in the exported table.
    pub fn emissions_header(&self) -> String {
        format!(
            "{}{}",
            self.source_label(),
            crate::utils::constants::EMISSIONS_SUFFIX
        )
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for EnergyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source_label())
    }
}

/// One value per known category, indexed by [`EnergyCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryValues([f64; EnergyCategory::COUNT]);

impl CategoryValues {
    pub fn zeros() -> Self {
        Self([0.0; EnergyCategory::COUNT])
    }

    pub fn get(&self, category: EnergyCategory) -> f64 {
        self.0[category.index()]
    }

    pub fn set(&mut self, category: EnergyCategory, value: f64) {
        self.0[category.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (EnergyCategory, f64)> + '_ {
        EnergyCategory::ALL.iter().map(move |c| (*c, self.get(*c)))
    }

    /// Left-to-right sum in column order.
    pub fn sum(&self) -> f64 {
        self.0.iter().fold(0.0, |acc, v| acc + v)
    }

    pub fn map(&self, f: impl Fn(EnergyCategory, f64) -> f64) -> Self {
        let mut out = Self::zeros();
        for (category, value) in self.iter() {
            out.set(category, f(category, value));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_label_round_trip() {
        for category in EnergyCategory::ALL {
            assert_eq!(
                EnergyCategory::from_source_label(category.source_label()),
                Some(category)
            );
        }
        assert_eq!(EnergyCategory::from_source_label("Production totale"), None);
        assert_eq!(EnergyCategory::from_source_label("Bioénergies"), None);
    }

    #[test]
    fn test_emission_factor_table() {
        assert_eq!(EnergyCategory::Wind.emission_factor(), 0.0);
        assert_eq!(EnergyCategory::Hydraulic.emission_factor(), 10.0);
        assert_eq!(EnergyCategory::Nuclear.emission_factor(), 12.0);
        assert_eq!(EnergyCategory::Solar.emission_factor(), 40.0);
        assert_eq!(EnergyCategory::FossilThermal.emission_factor(), 700.0);
        assert_eq!(EnergyCategory::RenewableThermal.emission_factor(), 200.0);
    }

    #[test]
    fn test_headers() {
        assert_eq!(
            EnergyCategory::RenewableThermal.production_header(),
            "Thermique renewable and waste (TWh)"
        );
        assert_eq!(
            EnergyCategory::Nuclear.emissions_header(),
            "Nucléaire_emissions (Mt CO₂)"
        );
    }

    #[test]
    fn test_category_values() {
        let mut values = CategoryValues::zeros();
        values.set(EnergyCategory::Solar, 1.5);
        values.set(EnergyCategory::Nuclear, 2.0);

        assert_eq!(values.get(EnergyCategory::Solar), 1.5);
        assert_eq!(values.get(EnergyCategory::Wind), 0.0);
        assert_eq!(values.sum(), 3.5);

        let doubled = values.map(|_, v| v * 2.0);
        assert_eq!(doubled.get(EnergyCategory::Nuclear), 4.0);
    }
}

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One line of the source file, exactly as read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Date")]
    pub date: String,

    #[serde(rename = "Filière")]
    pub category: String,

    #[serde(rename = "Valeur (TWh)")]
    pub value: String,
}

impl RawRecord {
    pub fn new(date: impl Into<String>, category: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            category: category.into(),
            value: value.into(),
        }
    }
}

/// A raw record with a parsed date inside the retained period.
///
/// `value` is `None` when the quantity could not be parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedRecord {
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub category: String,
    pub value: Option<f64>,
}

impl CleanedRecord {
    pub fn new(date: NaiveDate, category: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            date,
            year: date.year(),
            month: date.month(),
            category: category.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleaned_record_calendar_fields() {
        let date = NaiveDate::from_ymd_opt(2001, 3, 1).unwrap();
        let record = CleanedRecord::new(date, "Eolien", Some(10.0));

        assert_eq!(record.year, 2001);
        assert_eq!(record.month, 3);
        assert_eq!(record.value, Some(10.0));
    }
}

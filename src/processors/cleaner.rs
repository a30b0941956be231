use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use crate::models::{CleanedRecord, RawRecord};
use crate::processors::CleaningReport;
use crate::utils::constants::{MAX_YEAR, MIN_YEAR};

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d", "%m/%d/%Y", "%d/%m/%Y"];

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a quantity written with a comma decimal separator.
///
/// Returns `None` for anything that is not a number once `,` is replaced by `.`.
pub fn parse_value(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    normalized.parse::<f64>().ok().filter(|value| !value.is_nan())
}

/// Tolerant date parser.
///
/// Accepts ISO dates and date-times, RFC 3339, `YYYYMMDD`, month-only
/// `YYYY-MM`, year-only `YYYY` and slash separated dates (month first, then
/// day first).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.len() == 4 && trimmed.chars().all(|c| c.is_ascii_digit()) {
        return trimmed
            .parse::<i32>()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
    {
        return Some(date);
    }

    if let Some(datetime) = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
    {
        return Some(datetime.date());
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(datetime.date_naive());
    }

    // Month only: 2001-03 or 2001/03
    ["-", "/"].iter().find_map(|separator| {
        let (year, month) = trimmed.split_once(separator)?;
        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return None;
        }
        NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
    })
}

pub fn is_within_period(date: NaiveDate) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&date.year())
}

/// Normalize values and dates, drop undated or out-of-period rows and derive
/// year and month.
///
/// Parse problems never abort: a bad quantity becomes a missing value, a bad
/// date drops its row. Both are counted in `report`.
pub fn clean_records(raw: &[RawRecord], report: &mut CleaningReport) -> Vec<CleanedRecord> {
    report.total_rows += raw.len();

    // Values first, then dates: the two passes are kept in this order.
    let with_values: Vec<(&RawRecord, Option<f64>)> = raw
        .iter()
        .map(|record| {
            let value = parse_value(&record.value);
            if value.is_none() {
                report.unparseable_values += 1;
            }
            (record, value)
        })
        .collect();

    let mut cleaned = Vec::with_capacity(with_values.len());
    for (record, value) in with_values {
        *report
            .category_counts
            .entry(record.category.clone())
            .or_default() += 1;

        let Some(date) = parse_date(&record.date) else {
            report.unparseable_dates += 1;
            continue;
        };

        if !is_within_period(date) {
            report.out_of_range_rows += 1;
            continue;
        }

        cleaned.push(CleanedRecord::new(date, record.category.trim(), value));
    }

    report.retained_rows = cleaned.len();
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_parse_value_comma_decimal() {
        assert_eq!(parse_value("12,5"), Some(12.5));
        assert_eq!(parse_value("12.5"), Some(12.5));
        assert_eq!(parse_value("42"), Some(42.0));
        assert_eq!(parse_value(" 0,25 "), Some(0.25));
        assert_eq!(parse_value("-3,0"), Some(-3.0));
    }

    #[test]
    fn test_parse_value_degrades_to_missing() {
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("n/a"), None);
        assert_eq!(parse_value("1,234,5"), None);
        assert_eq!(parse_value("NaN"), None);
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2001-03-01"), Some(ymd(2001, 3, 1)));
        assert_eq!(parse_date("2001/03/01"), Some(ymd(2001, 3, 1)));
        assert_eq!(parse_date("20010301"), Some(ymd(2001, 3, 1)));
        assert_eq!(parse_date("2001-03-01T00:00:00"), Some(ymd(2001, 3, 1)));
        assert_eq!(parse_date("2001-03-01 12:30:00"), Some(ymd(2001, 3, 1)));
        assert_eq!(parse_date("2001-03-01T00:00:00+01:00"), Some(ymd(2001, 3, 1)));
        assert_eq!(parse_date("2001-03"), Some(ymd(2001, 3, 1)));
        assert_eq!(parse_date("2001"), Some(ymd(2001, 1, 1)));
    }

    #[test]
    fn test_parse_date_prefers_month_first() {
        assert_eq!(parse_date("03/01/2001"), Some(ymd(2001, 3, 1)));
        // Day first only when the month-first reading is impossible
        assert_eq!(parse_date("25/12/2010"), Some(ymd(2010, 12, 25)));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date("not-a-date"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2001-13"), None);
        assert_eq!(parse_date("2001-02-30"), None);
    }

    #[test]
    fn test_period_filter() {
        let raw = vec![
            RawRecord::new("2027-01-01", "Eolien", "1,0"),
            RawRecord::new("2000-01-01", "Eolien", "2,0"),
            RawRecord::new("2023-12-01", "Eolien", "3,0"),
            RawRecord::new("1999-12-01", "Eolien", "4,0"),
            RawRecord::new("not-a-date", "Eolien", "5,0"),
        ];

        let mut report = CleaningReport::default();
        let cleaned = clean_records(&raw, &mut report);

        let dates: Vec<NaiveDate> = cleaned.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![ymd(2000, 1, 1), ymd(2023, 12, 1)]);
        assert_eq!(report.total_rows, 5);
        assert_eq!(report.out_of_range_rows, 2);
        assert_eq!(report.unparseable_dates, 1);
        assert_eq!(report.retained_rows, 2);
    }

    #[test]
    fn test_bad_value_keeps_row() {
        let raw = vec![RawRecord::new("2005-06-01", "Solaire", "??")];

        let mut report = CleaningReport::default();
        let cleaned = clean_records(&raw, &mut report);

        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].value, None);
        assert_eq!(cleaned[0].year, 2005);
        assert_eq!(cleaned[0].month, 6);
        assert_eq!(report.unparseable_values, 1);
        assert_eq!(report.category_counts.get("Solaire"), Some(&1));
    }
}

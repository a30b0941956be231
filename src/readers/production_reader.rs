use crate::error::{ProcessingError, Result};
use crate::models::RawRecord;
use crate::utils::constants::{
    CATEGORY_COLUMN, DATE_COLUMN, DEFAULT_INPUT_DELIMITER, VALUE_COLUMN,
};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, info};

const REQUIRED_COLUMNS: [&str; 3] = [DATE_COLUMN, CATEGORY_COLUMN, VALUE_COLUMN];

pub struct ProductionReader {
    delimiter: u8,
}

impl ProductionReader {
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_INPUT_DELIMITER as u8,
        }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Read every record of the production file.
    ///
    /// Fails when the file cannot be read, is not a well formed table, or lacks
    /// one of the `Date`, `Filière` and `Valeur (TWh)` columns. Cell contents are
    /// not checked here.
    pub fn read_records(&self, path: &Path) -> Result<Vec<RawRecord>> {
        let bytes = std::fs::read(path).map_err(|e| ProcessingError::load(path, e.to_string()))?;
        let records = self.parse_bytes(&bytes, path)?;

        info!(
            path = %path.display(),
            records = records.len(),
            "loaded production records"
        );
        Ok(records)
    }

    /// Parse an in-memory table. `origin` is only used in error messages.
    pub fn parse_bytes(&self, bytes: &[u8], origin: &Path) -> Result<Vec<RawRecord>> {
        let (text, encoding) = decode(bytes);
        debug!(encoding = encoding.name(), "decoded input");

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| ProcessingError::load(origin, e.to_string()))?
            .clone();

        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|header| header == column) {
                return Err(ProcessingError::MissingColumn(column.to_string()));
            }
        }

        let mut records = Vec::new();
        for result in reader.deserialize::<RawRecord>() {
            let record = result.map_err(|e| ProcessingError::load(origin, e.to_string()))?;
            records.push(record);
        }

        Ok(records)
    }
}

impl Default for ProductionReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode as UTF-8, falling back to Windows-1252 for Latin encoded exports.
fn decode(bytes: &[u8]) -> (Cow<'_, str>, &'static Encoding) {
    let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
    if !had_errors {
        return (text, UTF_8);
    }

    let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    (text, WINDOWS_1252)
}

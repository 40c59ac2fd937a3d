use crate::domain::field::{FieldMap, FieldValue};
use crate::error::{PaymentError, Result};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct FieldRow {
    field: String,
    #[serde(default)]
    value: String,
}

/// Reads a field map from `field,value` CSV rows.
///
/// Cells are trimmed and a row without a value cell reads as an empty value.
/// Every value is kept as text.
pub struct FieldReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> FieldReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily yields `(field, value)` pairs in file order.
    pub fn fields(self) -> impl Iterator<Item = Result<(String, FieldValue)>> {
        self.reader
            .into_deserialize::<FieldRow>()
            .map(|result| {
                result
                    .map(|row| (row.field, FieldValue::Text(row.value)))
                    .map_err(PaymentError::from)
            })
    }

    /// Collects every row; a repeated field keeps its last value.
    pub fn into_map(self) -> Result<FieldMap> {
        self.fields().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_valid_stream() {
        let data = "field, value\nMerchantID, 2000132\nItemName, Apple iphone 15\nTradeDesc,";
        let map = FieldReader::new(data.as_bytes()).into_map().unwrap();

        assert_eq!(map.len(), 3);
        assert_eq!(map["MerchantID"], FieldValue::from("2000132"));
        assert_eq!(map["ItemName"], FieldValue::from("Apple iphone 15"));
        assert_eq!(map["TradeDesc"], FieldValue::from(""));
    }

    #[test]
    fn test_reader_keeps_last_duplicate() {
        let data = "field,value\nRtnCode,0\nRtnCode,1";
        let map = FieldReader::new(data.as_bytes()).into_map().unwrap();
        assert_eq!(map["RtnCode"], FieldValue::from("1"));
    }

    #[test]
    fn test_reader_missing_header() {
        let data = "name,amount\nMerchantID,2000132";
        let results: Vec<_> = FieldReader::new(data.as_bytes()).fields().collect();
        assert!(matches!(results[0], Err(PaymentError::Csv(_))));
    }
}

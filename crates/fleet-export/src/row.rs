//! Row access

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::value::CellValue;

/// A row the exporters can read fields from.
///
/// Typed rows pick an enum for `Field`, so a column pointing at a field the
/// row does not have fails to compile. Untyped data goes through [`JsonRow`]
/// or [`Record`], keyed by field name.
pub trait ExportRow {
    type Field;

    fn value(&self, field: &Self::Field) -> CellValue;
}

/// A JSON object as returned by the REST endpoints.
pub type JsonRow = Map<String, Value>;

/// Name-keyed row built in code.
pub type Record = BTreeMap<String, CellValue>;

impl ExportRow for JsonRow {
    type Field = String;

    /// Exact key first, then a dotted path into nested objects
    /// (`vehicle.owner.name`). Missing fields read as `Null`.
    fn value(&self, field: &String) -> CellValue {
        if let Some(value) = self.get(field) {
            return CellValue::from(value);
        }

        let mut segments = field.split('.');
        let Some(first) = segments.next() else {
            return CellValue::Null;
        };
        let mut current = match self.get(first) {
            Some(value) => value,
            None => return CellValue::Null,
        };
        for segment in segments {
            current = match current.get(segment) {
                Some(value) => value,
                None => return CellValue::Null,
            };
        }
        CellValue::from(current)
    }
}

impl ExportRow for Record {
    type Field = String;

    fn value(&self, field: &String) -> CellValue {
        self.get(field).cloned().unwrap_or(CellValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> JsonRow {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_json_row_lookup() {
        let r = row(json!({
            "name": "Budi",
            "vehicle.plate": "flat-key",
            "vehicle": {"plate": "B 1234 XY", "owner": {"name": "PT Taksi"}}
        }));

        assert_eq!(r.value(&"name".to_string()), CellValue::from("Budi"));
        assert_eq!(r.value(&"vehicle.plate".to_string()), CellValue::from("flat-key"));
        assert_eq!(r.value(&"vehicle.owner.name".to_string()), CellValue::from("PT Taksi"));
        assert_eq!(r.value(&"vehicle.color".to_string()), CellValue::Null);
        assert_eq!(r.value(&"missing".to_string()), CellValue::Null);
    }

    #[test]
    fn test_record_lookup() {
        let mut r = Record::new();
        r.insert("trips".into(), CellValue::Int(12));
        assert_eq!(r.value(&"trips".to_string()), CellValue::Int(12));
        assert!(r.value(&"rating".to_string()).is_null());
    }
}

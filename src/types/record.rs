use serde_json::{Map, Value};

/// One object as delivered by the data provider
pub type Record = Map<String, Value>;

/// Property holding an object's type list, most specific type first
pub const TYPE_FIELD: &str = "@type";

/// Property holding an object's path identifier
pub const ID_FIELD: &str = "@id";

/// Plain-text form of a JSON value: strings verbatim, null as empty,
/// everything else as compact JSON.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Text of `record[field]`, or `None` when the field is missing or null.
pub fn field_text(record: &Record, field: &str) -> Option<String> {
    match record.get(field) {
        None | Some(Value::Null) => None,
        Some(value) => Some(value_to_text(value)),
    }
}

/// Most specific `@type` of a record, if it has one.
pub fn record_type(record: &Record) -> Option<&str> {
    record
        .get(TYPE_FIELD)
        .and_then(Value::as_array)
        .and_then(|types| types.first())
        .and_then(Value::as_str)
}

/// Type of the objects in a collection, taken from the first record.
///
/// Returns an empty string for an empty collection or an untyped first record.
pub fn collection_type(records: &[Record]) -> String {
    records
        .first()
        .and_then(record_type)
        .unwrap_or_default()
        .to_string()
}

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::api::{decode, ApiError};

/* -------------------------------------------------------------------------- */
/*                     structures échangées avec l'API                         */
/* -------------------------------------------------------------------------- */

#[derive(Serialize)]
pub struct LoginBody {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/* -------------------------------------------------------------------------- */
/*                                enveloppes                                  */
/* -------------------------------------------------------------------------- */

/// Some endpoints answer `[...]`, others `{ "bills": [...] }`. Both are
/// accepted: when `value` is an object holding `key`, that member is used.
pub fn unwrap_envelope(value: Value, key: &str) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key(key) => map.remove(key).unwrap_or(Value::Null),
        other => other,
    }
}

/// List endpoint → records, in server order. `null` is an empty list.
pub fn decode_list<T: DeserializeOwned>(value: Value, key: &str) -> Result<Vec<T>, ApiError> {
    match unwrap_envelope(value, key) {
        Value::Null => Ok(Vec::new()),
        list => decode(list),
    }
}

/// Single record, bare or wrapped as `{ "<key>": {...} }`.
pub fn decode_item<T: DeserializeOwned>(value: Value, key: &str) -> Result<T, ApiError> {
    decode(unwrap_envelope(value, key))
}

/// Strings, numbers and booleans all read as text; `null` reads as "".
pub fn loose_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        #[serde(rename = "_id", alias = "id", deserialize_with = "loose_string")]
        id: String,
    }

    #[test]
    fn bare_and_wrapped_lists_decode_the_same() {
        let bare: Vec<Row> = decode_list(json!([{ "_id": "a" }, { "_id": "b" }]), "bills").unwrap();
        let wrapped: Vec<Row> = decode_list(json!({ "bills": [{ "_id": "a" }, { "_id": "b" }] }), "bills").unwrap();

        assert_eq!(bare, wrapped);
        assert_eq!(bare[1].id, "b");
    }

    #[test]
    fn null_list_is_empty() {
        let rows: Vec<Row> = decode_list(Value::Null, "reservations").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn numeric_ids_read_as_text() {
        let row: Row = decode_item(json!({ "bill": { "id": 2 } }), "bill").unwrap();
        assert_eq!(row.id, "2");
    }

    #[test]
    fn unexpected_shape_is_a_decode_error() {
        let err = decode_list::<Row>(json!({ "message": "nope" }), "cars").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}

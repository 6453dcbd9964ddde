use serde_json::{Map, Value};

use crate::models::fear_greed::NormalizedPayload;
use crate::utils::formatters::format_epoch_millis;

/// Nested series the provider attaches to each indicator; not part of the record
const DATA_FIELD: &str = "data";
const TIMESTAMP_FIELD: &str = "timestamp";

/// Reshapes the provider's raw response into per-slot records.
///
/// Every top-level key is kept. For object values the `data` field is
/// dropped and a numeric `timestamp` (epoch milliseconds) is rendered as an
/// ISO-8601 string. Anything else is passed through untouched and left for
/// the validator to reject; this function never fails.
pub fn normalize(raw: Value) -> NormalizedPayload {
    let slots = match raw {
        Value::Object(map) => map
            .into_iter()
            .map(|(name, slot)| (name, normalize_slot(slot)))
            .collect(),
        _ => Map::new(),
    };
    NormalizedPayload::new(slots)
}

fn normalize_slot(slot: Value) -> Value {
    let mut fields = match slot {
        Value::Object(fields) => fields,
        other => return other,
    };

    fields.remove(DATA_FIELD);

    if let Some(timestamp) = fields.get_mut(TIMESTAMP_FIELD) {
        if let Some(iso) = timestamp.as_f64().and_then(format_epoch_millis) {
            *timestamp = Value::String(iso);
        }
    }

    Value::Object(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_numeric_timestamps_to_iso() {
        let payload = normalize(json!({
            "fear_and_greed": { "timestamp": 1_700_000_000_000_u64, "score": 50, "rating": "neutral" }
        }));
        assert_eq!(
            payload.get("fear_and_greed").unwrap()["timestamp"],
            json!("2023-11-14T22:13:20.000Z")
        );
    }

    #[test]
    fn passes_string_timestamps_through() {
        let payload = normalize(json!({
            "junk_bond_demand": { "timestamp": "2024-01-02T03:04:05+00:00", "score": 12.5, "rating": "extreme fear" }
        }));
        assert_eq!(
            payload.get("junk_bond_demand").unwrap()["timestamp"],
            json!("2024-01-02T03:04:05+00:00")
        );
    }

    #[test]
    fn drops_nested_data_series() {
        let payload = normalize(json!({
            "put_call_options": {
                "timestamp": 1_700_000_000_000_u64,
                "score": 30,
                "rating": "fear",
                "data": [{ "x": 1, "y": 2 }]
            },
            "safe_haven_demand": { "timestamp": "t", "score": 1, "rating": "fear", "data": {} }
        }));
        for name in ["put_call_options", "safe_haven_demand"] {
            let slot = payload.get(name).unwrap().as_object().unwrap();
            assert!(!slot.contains_key("data"), "{name} still carries data");
            assert!(slot.contains_key("score"));
        }
    }

    #[test]
    fn keeps_composite_history_and_unknown_fields() {
        let payload = normalize(json!({
            "fear_and_greed": {
                "timestamp": "2024-01-01T00:00:00Z",
                "score": 60,
                "rating": "greed",
                "previous_close": 58.2,
                "previous_1_week": 40,
                "previous_1_month": 35,
                "previous_1_year": 70,
                "extra": true
            }
        }));
        let slot = payload.get("fear_and_greed").unwrap();
        assert_eq!(slot["previous_close"], json!(58.2));
        assert_eq!(slot["previous_1_year"], json!(70));
        assert_eq!(slot["extra"], json!(true));
    }

    #[test]
    fn leaves_unsupported_timestamp_encodings_alone() {
        let payload = normalize(json!({
            "a": { "timestamp": true },
            "b": { "timestamp": null },
            "c": { "timestamp": [1, 2] },
            "d": { "score": 1 },
            "e": { "timestamp": 1.0e300 }
        }));
        assert_eq!(payload.get("a").unwrap()["timestamp"], json!(true));
        assert_eq!(payload.get("b").unwrap()["timestamp"], Value::Null);
        assert_eq!(payload.get("c").unwrap()["timestamp"], json!([1, 2]));
        assert!(payload.get("d").unwrap().get("timestamp").is_none());
        assert_eq!(payload.get("e").unwrap()["timestamp"], json!(1.0e300));
    }

    #[test]
    fn non_object_slots_and_payloads_pass_through() {
        let payload = normalize(json!({ "fear_and_greed": 42 }));
        assert_eq!(payload.get("fear_and_greed"), Some(&json!(42)));

        assert!(normalize(json!([1, 2, 3])).is_empty());
        assert!(normalize(Value::Null).is_empty());
    }
}

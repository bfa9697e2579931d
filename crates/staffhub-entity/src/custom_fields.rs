//! Custom field bags.
//!
//! Organizations, hiring managers, and tasks carry a freeform JSON object
//! of user-defined fields. Updates are merged shallowly into the stored
//! object: keys present in the patch overwrite, all other keys survive.

use serde_json::{Map, Value};

use staffhub_core::error::AppError;

/// Normalize an optional incoming custom-field value into an object.
///
/// `None` and `null` become `{}`; anything other than an object is rejected.
pub fn normalize(value: Option<Value>) -> Result<Value, AppError> {
    match value {
        None | Some(Value::Null) => Ok(Value::Object(Map::new())),
        Some(Value::Object(map)) => Ok(Value::Object(map)),
        Some(other) => Err(AppError::validation(format!(
            "custom_fields must be a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

/// Shallow-merge `patch` into `existing`.
///
/// A stored value that is not an object (legacy rows) is treated as empty.
/// A `null` in the patch is stored as `null` rather than removing the key.
pub fn merge(existing: Option<&Value>, patch: &Value) -> Result<Value, AppError> {
    let patch = match patch {
        Value::Object(map) => map,
        Value::Null => return Ok(existing.cloned().unwrap_or_else(|| Value::Object(Map::new()))),
        other => {
            return Err(AppError::validation(format!(
                "custom_fields must be a JSON object, got {}",
                json_type_name(other)
            )));
        }
    };

    let mut merged = match existing {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };
    for (key, value) in patch {
        merged.insert(key.clone(), value.clone());
    }
    Ok(Value::Object(merged))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_keeps_untouched_keys() {
        let existing = json!({"Reminder": "1 day", "Source": "Referral"});
        let merged = merge(Some(&existing), &json!({"Source": "LinkedIn"})).unwrap();
        assert_eq!(merged, json!({"Reminder": "1 day", "Source": "LinkedIn"}));
    }

    #[test]
    fn test_merge_is_shallow() {
        let existing = json!({"Contact": {"phone": "555", "fax": "556"}});
        let merged = merge(Some(&existing), &json!({"Contact": {"phone": "777"}})).unwrap();
        assert_eq!(merged, json!({"Contact": {"phone": "777"}}));
    }

    #[test]
    fn test_merge_null_value_is_stored() {
        let existing = json!({"Reminder": "2 hours"});
        let merged = merge(Some(&existing), &json!({"Reminder": null})).unwrap();
        assert_eq!(merged, json!({"Reminder": null}));
    }

    #[test]
    fn test_merge_into_missing_or_legacy_value() {
        assert_eq!(merge(None, &json!({"a": 1})).unwrap(), json!({"a": 1}));
        assert_eq!(
            merge(Some(&json!("legacy")), &json!({"a": 1})).unwrap(),
            json!({"a": 1})
        );
    }

    #[test]
    fn test_merge_rejects_non_object_patch() {
        assert!(merge(None, &json!([1, 2])).is_err());
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(None).unwrap(), json!({}));
        assert_eq!(normalize(Some(Value::Null)).unwrap(), json!({}));
        assert!(normalize(Some(json!("x"))).is_err());
    }
}

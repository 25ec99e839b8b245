//! Dot-path addressable option maps.
//!
//! Command-line flags such as `--options.theme.spacing.unit=4` are turned into
//! nested JSON objects that are handed to the rendering engine untouched.

use serde_json::{Map, Value};

use crate::ConfigError;

/// Convert a raw command-line value into JSON.
///
/// `true`/`false` become booleans, numeric literals become numbers, object
/// and array literals are parsed as JSON; everything else stays a string.
pub fn coerce_value(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if let Ok(int) = raw.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(float) = raw.parse::<f64>()
        && float.is_finite()
        && let Some(number) = serde_json::Number::from_f64(float)
    {
        return Value::Number(number);
    }
    if (raw.starts_with('{') || raw.starts_with('['))
        && let Ok(value) = serde_json::from_str(raw)
    {
        return value;
    }

    Value::String(raw.to_owned())
}

/// Insert `value` at a dot-separated `path`, creating objects along the way.
///
/// Intermediate values that are not objects are replaced.
pub fn insert_dotted(
    map: &mut Map<String, Value>,
    path: &str,
    value: Value,
) -> Result<(), ConfigError> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(ConfigError::Validation(format!(
            "invalid option path \"{path}\""
        )));
    }

    let (last, parents) = segments
        .split_last()
        .ok_or_else(|| ConfigError::Validation("empty option path".to_owned()))?;

    let mut current = map;
    for segment in parents {
        let entry = current
            .entry((*segment).to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(next) = entry else {
            return Err(ConfigError::Validation(format!(
                "invalid option path \"{path}\""
            )));
        };
        current = next;
    }

    current.insert((*last).to_owned(), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_coerce_scalars() {
        assert_eq!(coerce_value("true"), json!(true));
        assert_eq!(coerce_value("false"), json!(false));
        assert_eq!(coerce_value("42"), json!(42));
        assert_eq!(coerce_value("1.5"), json!(1.5));
        assert_eq!(coerce_value("petstore"), json!("petstore"));
    }

    #[test]
    fn test_coerce_json_literals() {
        assert_eq!(coerce_value(r#"{"a": 1}"#), json!({"a": 1}));
        assert_eq!(coerce_value("[1, 2]"), json!([1, 2]));
        assert_eq!(coerce_value("{not json"), json!("{not json"));
    }

    #[test]
    fn test_coerce_non_finite_stays_string() {
        assert_eq!(coerce_value("NaN"), json!("NaN"));
        assert_eq!(coerce_value("inf"), json!("inf"));
    }

    #[test]
    fn test_insert_nested_path() {
        let mut map = Map::new();
        insert_dotted(&mut map, "theme.spacing.unit", json!(4)).unwrap();
        insert_dotted(&mut map, "theme.colors.primary", json!("#32329f")).unwrap();
        insert_dotted(&mut map, "hideDownloadButton", json!(true)).unwrap();

        assert_eq!(
            Value::Object(map),
            json!({
                "theme": {
                    "spacing": {"unit": 4},
                    "colors": {"primary": "#32329f"}
                },
                "hideDownloadButton": true
            })
        );
    }

    #[test]
    fn test_insert_replaces_scalar_parent() {
        let mut map = Map::new();
        insert_dotted(&mut map, "theme", json!("dark")).unwrap();
        insert_dotted(&mut map, "theme.mode", json!("dark")).unwrap();

        assert_eq!(Value::Object(map), json!({"theme": {"mode": "dark"}}));
    }

    #[test]
    fn test_insert_rejects_empty_segment() {
        let mut map = Map::new();
        let err = insert_dotted(&mut map, "theme..unit", json!(4)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(map.is_empty());
    }
}

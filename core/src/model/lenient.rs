//! Field decoders for records exported from the backend.
//!
//! The export is loosely typed: numbers arrive as strings, flags go missing and
//! ids may be empty strings. These helpers coerce such values to safe defaults
//! instead of failing the whole file.

use chrono::Weekday;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::time::parse_weekday_str;

pub fn coerce_number(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

/// Any non-numeric value becomes `0`.
pub fn number_or_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce_number).unwrap_or(0))
}

/// Missing, null or `0` years are treated as absent.
pub fn optional_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let year = value.as_ref().map(coerce_number).unwrap_or(0);
    Ok(i32::try_from(year).ok().filter(|y| *y != 0))
}

pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        Some(Value::Number(n)) => n.as_i64().map(|n| n != 0).unwrap_or(false),
        _ => false,
    })
}

/// Empty strings count as "no reference".
pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

pub fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_id(deserializer)?.unwrap_or_default())
}

pub fn id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.trim().is_empty() => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Free text such as titles; null or non-text values become an empty string.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

/// Slot ids are stored as text; numeric slots are converted.
pub fn slot_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

/// Accepts "Mon", "monday", "Mo" or ISO day numbers (1 = Monday). Falls back to Monday.
pub fn weekday<'de, D>(deserializer: D) -> Result<Weekday, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let day = match value {
        Some(Value::String(s)) => parse_weekday_str(s.trim()).ok(),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(1) => Some(Weekday::Mon),
            Some(2) => Some(Weekday::Tue),
            Some(3) => Some(Weekday::Wed),
            Some(4) => Some(Weekday::Thu),
            Some(5) => Some(Weekday::Fri),
            Some(6) => Some(Weekday::Sat),
            Some(7) => Some(Weekday::Sun),
            _ => None,
        },
        _ => None,
    };
    Ok(day.unwrap_or(Weekday::Mon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&json!(7)), 7);
        assert_eq!(coerce_number(&json!("12")), 12);
        assert_eq!(coerce_number(&json!(" 3 ")), 3);
        assert_eq!(coerce_number(&json!(4.9)), 4);
        assert_eq!(coerce_number(&json!("abc")), 0);
        assert_eq!(coerce_number(&json!(null)), 0);
        assert_eq!(coerce_number(&json!(true)), 0);
        assert_eq!(coerce_number(&json!([1])), 0);
    }
}

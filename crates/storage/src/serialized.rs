//! Parsing of list fields stored as serialized text on cocktail nodes
//!
//! `ingredients` and `ingredientMeasures` hold JSON arrays. Malformed data is
//! a recoverable condition: callers get an empty list and a warning.

use crate::error::StorageError;
use barkeep_core::RecipeIngredient;
use serde_json::Value;
use tracing::warn;

/// Measure recorded when none is known
pub const UNKNOWN_MEASURE: &str = "unknown";

/// Parses a JSON array of scalars into strings
///
/// Null entries become empty strings so positions are preserved for zipping.
pub fn parse_serialized_list(raw: &str) -> Result<Vec<String>, StorageError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let values: Vec<Value> = serde_json::from_str(trimmed)
        .map_err(|e| StorageError::SerializationError(format!("not a JSON array: {e}")))?;

    values
        .into_iter()
        .map(|value| match value {
            Value::String(s) => Ok(s.trim().to_string()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Null => Ok(String::new()),
            other => Err(StorageError::SerializationError(format!(
                "unexpected list entry {other}"
            ))),
        })
        .collect()
}

/// Parses a serialized field, logging and returning an empty list on failure
pub fn parse_or_empty(cocktail: &str, field: &str, raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match parse_serialized_list(raw) {
        Ok(values) => values,
        Err(e) => {
            warn!("Ignoring malformed {field} on '{cocktail}': {e}");
            Vec::new()
        }
    }
}

/// Zips ingredient names with their measures
///
/// Missing or blank measures become [`UNKNOWN_MEASURE`]; blank ingredient names are skipped.
pub fn recipe_lines(ingredients: &[String], measures: &[String]) -> Vec<RecipeIngredient> {
    ingredients
        .iter()
        .enumerate()
        .filter(|(_, name)| !name.is_empty())
        .map(|(idx, name)| {
            let measure = measures
                .get(idx)
                .map(|m| m.trim())
                .filter(|m| !m.is_empty())
                .unwrap_or(UNKNOWN_MEASURE);
            RecipeIngredient::new(name.clone(), measure)
        })
        .collect()
}

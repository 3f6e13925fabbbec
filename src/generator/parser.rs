use crate::error::{GenerationError, ValidationError};
use crate::models::{Letter, Question};
use crate::utils::strings::strip_code_fences;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Turns raw completion text into validated questions.
///
/// Markdown fences are stripped; nothing else is repaired. A single invalid
/// element rejects the whole batch.
pub fn parse_response(raw: &str) -> Result<Vec<Question>, GenerationError> {
    let cleaned = strip_code_fences(raw);

    let root: Value = serde_json::from_str(&cleaned)
        .map_err(|e| GenerationError::MalformedJson(e.to_string()))?;

    let items = match root.get("mcqs").and_then(Value::as_array) {
        Some(items) if !items.is_empty() => items,
        _ => return Err(GenerationError::NoQuestions),
    };

    let questions = items
        .iter()
        .enumerate()
        .map(|(index, item)| validate_item(index, item))
        .collect::<Result<Vec<Question>, ValidationError>>()?;

    Ok(questions)
}

fn validate_item(index: usize, item: &Value) -> Result<Question, ValidationError> {
    let fields = item
        .as_object()
        .ok_or_else(|| ValidationError::new(index, "element is not an object"))?;

    let prompt = non_empty_str(fields, "mcq")
        .ok_or_else(|| ValidationError::new(index, "`mcq` must be a non-empty string"))?;

    let options = fields
        .get("options")
        .and_then(Value::as_object)
        .ok_or_else(|| ValidationError::new(index, "`options` must be an object"))?;
    let options = validate_options(index, options)?;

    let correct = fields
        .get("correct")
        .and_then(Value::as_str)
        .and_then(Letter::from_key)
        .ok_or_else(|| ValidationError::new(index, "`correct` must be one of a, b, c, d"))?;

    Ok(Question {
        prompt: prompt.to_string(),
        options,
        correct,
    })
}

fn validate_options(
    index: usize,
    options: &Map<String, Value>,
) -> Result<BTreeMap<Letter, String>, ValidationError> {
    if let Some(extra) = options.keys().find(|k| Letter::from_key(k).is_none()) {
        return Err(ValidationError::new(
            index,
            format!("unexpected option key `{}`", extra),
        ));
    }

    let mut validated = BTreeMap::new();
    for letter in Letter::ALL {
        let text = non_empty_str(options, &letter.to_string()).ok_or_else(|| {
            ValidationError::new(
                index,
                format!("option `{}` must be a non-empty string", letter),
            )
        })?;
        validated.insert(letter, text.to_string());
    }
    Ok(validated)
}

fn non_empty_str<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

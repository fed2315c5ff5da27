//! Pulling structured data out of free-text model answers.
//!
//! Models asked for JSON often wrap it in prose or a fenced block, or give
//! up and answer in bullet points. These helpers try the strict path first
//! and degrade to scraping.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)```").expect("valid regex"));

static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*•]|\d+[.)])\s+(.+?)\s*$").expect("valid regex"));

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("valid regex"));

/// Tries the whole text, then a fenced block, then the first balanced
/// `{...}` or `[...]` span.
pub fn extract_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if value.is_object() || value.is_array() {
            return Some(value);
        }
    }

    for caps in FENCED_BLOCK.captures_iter(trimmed) {
        if let Ok(value) = serde_json::from_str::<Value>(caps[1].trim()) {
            return Some(value);
        }
    }

    balanced_span(trimmed).and_then(|span| serde_json::from_str(span).ok())
}

/// Finds the first balanced object or array, ignoring brackets inside
/// string literals.
fn balanced_span(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let mut stack = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => stack.push(c),
            '}' | ']' => {
                let open = stack.pop()?;
                if (open == '{') != (c == '}') {
                    return None;
                }
                if stack.is_empty() {
                    return Some(&text[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Bullet and numbered lines as list items, markdown emphasis stripped.
pub fn scrape_list(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| LIST_ITEM.captures(line))
        .map(|caps| caps[1].replace("**", "").trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// First number following `label:` (case-insensitive) on any line.
pub fn scrape_number(text: &str, label: &str) -> Option<f64> {
    let label = label.to_lowercase();
    text.lines().find_map(|line| {
        let lower = line.to_lowercase();
        let idx = lower.find(&label)?;
        let rest = &line[idx + label.len()..];
        let rest = rest.trim_start_matches(|c: char| c == ':' || c == '*' || c.is_whitespace());
        NUMBER.find(rest)?.as_str().parse().ok()
    })
}

/// Reads a string array field, accepting a single string too.
pub fn string_list(value: &Value, field: &str) -> Vec<String> {
    match value.get(field) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Object(_) => v.get("name").and_then(Value::as_str).map(str::to_string),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

/// Reads a numeric field, tolerating numbers encoded as strings ("250 kcal").
pub fn number_field(value: &Value, field: &str) -> Option<f64> {
    match value.get(field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => NUMBER.find(s)?.as_str().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_plain_json() {
        let value = extract_json(r#"{"calories": 1800}"#).unwrap();
        assert_eq!(value["calories"], 1800);
    }

    #[test]
    fn test_extract_fenced_json() {
        let text = "Here is your plan:\n```json\n{\"meals\": [\"oats\"]}\n```\nEnjoy!";
        assert_eq!(extract_json(text).unwrap(), json!({"meals": ["oats"]}));
    }

    #[test]
    fn test_extract_embedded_object_ignores_braces_in_strings() {
        let text = r#"Sure! {"tip": "use {brackets} sparingly", "n": 2} hope that helps"#;
        let value = extract_json(text).unwrap();
        assert_eq!(value["n"], 2);
    }

    #[test]
    fn test_extract_returns_none_for_prose() {
        assert!(extract_json("Eat more vegetables.").is_none());
        assert!(extract_json("broken {\"a\": [1, 2}").is_none());
    }

    #[test]
    fn test_scrape_list_handles_bullets_and_numbers() {
        let text = "Try these:\n- **Oatmeal** with berries\n2) Greek yogurt\n* \nNot a bullet";
        assert_eq!(scrape_list(text), vec!["Oatmeal with berries", "Greek yogurt"]);
    }

    #[test]
    fn test_scrape_number_after_label() {
        let text = "Food: salad\nCalories: ~ 320 kcal\nProtein: 12.5g";
        assert_eq!(scrape_number(text, "calories"), Some(320.0));
        assert_eq!(scrape_number(text, "Protein"), Some(12.5));
        assert_eq!(scrape_number(text, "fat"), None);
    }

    #[test]
    fn test_field_helpers_are_lenient() {
        let value = json!({"foods": ["apple", {"name": "kale"}, 3], "kcal": "250 kcal", "one": "tea"});
        assert_eq!(string_list(&value, "foods"), vec!["apple", "kale"]);
        assert_eq!(string_list(&value, "one"), vec!["tea"]);
        assert_eq!(number_field(&value, "kcal"), Some(250.0));
    }
}

//! JSON reading helpers shared by the loaders.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::errors::{IngestError, Result};

static TRAILING_COMMA: OnceLock<Regex> = OnceLock::new();

fn trailing_comma() -> &'static Regex {
    TRAILING_COMMA.get_or_init(|| Regex::new(r",\s*([\]}])").expect("static regex is valid"))
}

/// Read a file to a string, mapping a missing file to [`IngestError::NotFound`].
pub fn read_text(path: &Path, what: &str) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::not_found(what, path)
        } else {
            IngestError::read_failed(path, e)
        }
    })
}

/// Parse JSON text strictly.
pub fn parse(text: &str, path: &Path) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| IngestError::parse_failed(path, e))
}

/// Parse JSON text, retrying once with trailing commas removed.
///
/// The repair is a plain textual rewrite of `,` followed by optional
/// whitespace and a closing bracket or brace.
pub fn parse_with_repair(text: &str, path: &Path) -> Result<Value> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(e) => {
            log::warn!(
                "Strict JSON parsing failed for {} ({e}). Attempting cleanup.",
                path.display()
            );
            let cleaned = remove_trailing_commas(text);
            serde_json::from_str(&cleaned).map_err(|e| {
                log::error!(
                    "Cleanup parsing also failed for {} at line {} col {}",
                    path.display(),
                    e.line(),
                    e.column()
                );
                IngestError::parse_failed(path, e)
            })
        }
    }
}

pub fn remove_trailing_commas(text: &str) -> String {
    trailing_comma().replace_all(text, "$1").into_owned()
}

/// Short JSON type name used in malformed-input messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Lenient value coercion
// ============================================================================

/// Trimmed non-empty string form of a scalar; `None` for null, blank or
/// structured values.
pub fn opt_str(value: Option<&Value>) -> Option<String> {
    let s = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Integer coercion for codes. Floats are truncated; numeric strings accepted.
pub fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

pub fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        _ => None,
    }
}

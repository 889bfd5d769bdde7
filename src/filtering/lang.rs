//! Entry-level language filtering.
use serde_json::{Map, Value};

use super::Filter;

/// Keeps entries whose `lang_code` is exactly [Lang::code].
///
/// Missing or non-string `lang_code` values never match.
/// [Lang::code] is `en` by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lang {
    code: String,
}

impl Lang {
    pub fn new(code: String) -> Self {
        Self { code }
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

impl Filter<&Map<String, Value>> for Lang {
    fn detect(&self, entry: &Map<String, Value>) -> bool {
        entry.get("lang_code").and_then(Value::as_str) == Some(self.code.as_str())
    }
}

impl Default for Lang {
    fn default() -> Self {
        Lang::new("en".to_string())
    }
}

//! Best-effort metadata filter.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// Key/value constraints used to select datasets.
///
/// A list value means "any of these". Keys absent from the metadata being
/// tested do not disqualify it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Filter {
    terms: BTreeMap<String, Value>,
}

impl Filter {
    /// Creates an empty filter, which matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires `key` to equal `value`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.terms.insert(key.into(), value.into());
        self
    }

    /// Requires `key` to equal one of `values`.
    pub fn with_any<V: Into<Value>>(
        mut self,
        key: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let list = values.into_iter().map(Into::into).collect();
        self.terms.insert(key.into(), Value::Array(list));
        self
    }

    /// Iterates over `(key, wanted)` terms.
    pub fn terms(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.terms.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns `true` if the filter has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Returns `true` if `actual` satisfies `wanted`.
pub(crate) fn term_matches(actual: &Value, wanted: &Value) -> bool {
    if actual == wanted {
        return true;
    }
    match wanted {
        Value::Array(options) => options.iter().any(|option| option == actual),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_term() {
        assert!(term_matches(&json!("tas"), &json!("tas")));
        assert!(!term_matches(&json!("tas"), &json!("sst")));
    }

    #[test]
    fn list_term_means_any() {
        let wanted = json!(["monthly", "annual"]);
        assert!(term_matches(&json!("annual"), &wanted));
        assert!(!term_matches(&json!("irregular"), &wanted));
    }

    #[test]
    fn list_equal_to_list() {
        assert!(term_matches(&json!(["a", "b"]), &json!(["a", "b"])));
    }

    #[test]
    fn builder_and_deserialize_agree() {
        let built = Filter::new()
            .with("variable", "tas")
            .with_any("time_resolution", ["monthly", "annual"]);
        let parsed: Filter = serde_json::from_value(json!({
            "variable": "tas",
            "time_resolution": ["monthly", "annual"],
        }))
        .unwrap();
        assert_eq!(built, parsed);
        assert!(!built.is_empty());
        assert_eq!(built.terms().count(), 2);
    }
}

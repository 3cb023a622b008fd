//! Configuration documents.
//!
//! A [`ResourceDocument`] is the shape the hosting framework hands to the
//! controller and gets back: an optional identity and a flat map of
//! snake_case field names to JSON values. A field is set when its key is
//! present with a non-null value; that key presence is what keeps "never
//! configured" apart from "configured to zero".

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity plus per-field values of one managed resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceDocument {
    /// Server-assigned identity, once the resource exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    /// Field values keyed by field name.
    #[serde(flatten)]
    attributes: Map<String, Value>,
}

impl ResourceDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a document from a JSON object.
    ///
    /// Returns `None` if the value is not an object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(_) => serde_json::from_value(value).ok(),
            _ => None,
        }
    }

    /// Sets a field, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets the identity, builder style.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.set_id(id);
        self
    }

    /// Returns the identity, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Sets the identity.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Returns a field's value if it is set.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name).filter(|v| !v.is_null())
    }

    /// Returns a field's value as a string if it is set to one.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Checks whether a field is set.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Sets a field's value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Names of all set fields.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, _)| k.as_str())
    }

    /// Number of set fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attribute_names().count()
    }

    /// Returns true if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn null_is_treated_as_unset() {
        let doc = ResourceDocument::from_value(json!({
            "realm": "acme",
            "display_name": null
        }))
        .unwrap();

        assert!(doc.is_set("realm"));
        assert!(!doc.is_set("display_name"));
        assert_eq!(doc.attribute_names().collect::<Vec<_>>(), vec!["realm"]);
    }

    #[test]
    fn zero_and_false_are_set() {
        let doc = ResourceDocument::new()
            .with("failure_factor", 0)
            .with("remember_me", false);

        assert_eq!(doc.get("failure_factor"), Some(&json!(0)));
        assert_eq!(doc.get("remember_me"), Some(&json!(false)));
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn serializes_flat_with_id() {
        let doc = ResourceDocument::new()
            .with_id("r-1")
            .with("realm", "acme")
            .with("enabled", true);

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value, json!({"id": "r-1", "realm": "acme", "enabled": true}));

        let back: ResourceDocument = serde_json::from_value(value).unwrap();
        assert_eq!(back.id(), Some("r-1"));
        assert_eq!(back.get_str("realm"), Some("acme"));
    }

    #[test]
    fn empty_id_is_no_identity() {
        let doc = ResourceDocument::new().with_id("");
        assert_eq!(doc.id(), None);
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(ResourceDocument::from_value(json!(["realm"])).is_none());
    }
}

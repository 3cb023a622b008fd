//! Field codec between configuration documents and domain records.
//!
//! The codec is derived from a [`ResourceSchema`]: each field name is mapped
//! to the record's camelCase wire key, and serde does the typed conversion.
//! No field is converted by hand, so a record type only has to agree with its
//! schema table on names and kinds.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::document::ResourceDocument;
use crate::error::{ProviderError, ProviderResult, ValidationErrors};
use crate::schema::{Presence, ResourceSchema};

/// Wire key of the server-assigned identity.
const ID_KEY: &str = "id";

/// Bidirectional document ↔ record translation for one schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldCodec {
    schema: &'static ResourceSchema,
}

impl FieldCodec {
    /// Creates a codec for the given schema.
    #[must_use]
    pub const fn new(schema: &'static ResourceSchema) -> Self {
        Self { schema }
    }

    /// Returns the schema this codec follows.
    #[must_use]
    pub const fn schema(&self) -> &'static ResourceSchema {
        self.schema
    }

    /// Builds a record from a document.
    ///
    /// Required fields are read directly, defaulted fields fall back to their
    /// default, and optional fields are only carried over when set, so an
    /// unset field stays `None` on the record while an explicit `0` or `false`
    /// becomes `Some`.
    ///
    /// ## Errors
    ///
    /// Returns `ProviderError::Validation` if a required field is missing and
    /// `ProviderError::Codec` if a value does not fit the record.
    pub fn decode<T: DeserializeOwned>(&self, document: &ResourceDocument) -> ProviderResult<T> {
        let mut wire = Map::new();
        let mut missing = ValidationErrors::new();

        for field in self.schema.fields {
            match field.effective_value(document) {
                Some(value) => {
                    wire.insert(field.api_name(), value.into_owned());
                }
                None if field.presence == Presence::Required => {
                    missing.push(field.name, "is required");
                }
                None => {}
            }
        }
        missing.into_result()?;

        if let Some(id) = document.id() {
            wire.insert(ID_KEY.to_string(), Value::from(id));
        }

        serde_json::from_value(Value::Object(wire)).map_err(|e| {
            ProviderError::Codec(format!("cannot decode {}: {e}", self.schema.type_name))
        })
    }

    /// Writes a record's values into a document.
    ///
    /// Required and defaulted fields are always written. Optional fields are
    /// written only when the record carries a value; otherwise whatever the
    /// document already holds for them is left untouched. The record's
    /// identity, if any, replaces the document's.
    ///
    /// ## Errors
    ///
    /// Returns `ProviderError::Codec` if the record does not serialize to an
    /// object.
    pub fn encode<T: Serialize>(&self, record: &T, document: &mut ResourceDocument) -> ProviderResult<()> {
        let wire = match serde_json::to_value(record) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(ProviderError::Codec(format!(
                    "{} record encoded to {other}, expected an object",
                    self.schema.type_name
                )))
            }
            Err(e) => return Err(ProviderError::Codec(e.to_string())),
        };

        for field in self.schema.fields {
            match wire.get(&field.api_name()) {
                Some(value) if !value.is_null() => document.set(field.name, value.clone()),
                _ if field.presence.is_optional() => {}
                _ => {
                    return Err(ProviderError::Codec(format!(
                        "{} record has no value for required field '{}'",
                        self.schema.type_name, field.name
                    )))
                }
            }
        }

        if let Some(id) = wire.get(ID_KEY).and_then(Value::as_str) {
            document.set_id(id);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use kc_model::{Realm, SslRequired};
    use serde_json::json;

    use super::*;
    use crate::schema::REALM_SCHEMA;

    fn codec() -> FieldCodec {
        FieldCodec::new(&REALM_SCHEMA)
    }

    fn doc(value: Value) -> ResourceDocument {
        ResourceDocument::from_value(value).unwrap()
    }

    #[test]
    fn absent_ssl_required_defaults_to_external() {
        let realm: Realm = codec()
            .decode(&doc(json!({"realm": "acme", "enabled": true})))
            .unwrap();

        assert_eq!(realm.ssl_required, SslRequired::External);
        assert_eq!(realm.id, None);
    }

    #[test]
    fn zero_is_present_not_absent() {
        let realm: Realm = codec()
            .decode(&doc(json!({
                "realm": "acme",
                "enabled": true,
                "access_token_lifespan": 0,
                "brute_force_protected": false
            })))
            .unwrap();

        assert_eq!(realm.access_token_lifespan, Some(0));
        assert_eq!(realm.brute_force_protected, Some(false));
        assert_eq!(realm.sso_session_idle_timeout, None);
        assert_eq!(realm.remember_me, None);
    }

    #[test]
    fn round_trip_keeps_exactly_the_configured_fields() {
        let input = doc(json!({
            "realm": "acme",
            "enabled": false,
            "ssl_required": "NONE",
            "display_name": "Acme Corp",
            "supported_locales": ["en", "de"],
            "smtp_server": {},
            "verify_email": true,
            "failure_factor": 0,
            "quick_login_check_milli_seconds": 1000
        }));

        let realm: Realm = codec().decode(&input).unwrap();
        let mut output = ResourceDocument::new();
        codec().encode(&realm, &mut output).unwrap();

        assert_eq!(output, input);
    }

    #[test]
    fn empty_collections_and_maps_stay_present() {
        let realm: Realm = codec()
            .decode(&doc(json!({
                "realm": "acme",
                "enabled": true,
                "default_roles": [],
                "smtp_server": {}
            })))
            .unwrap();

        assert_eq!(realm.default_roles, Some(vec![]));
        assert_eq!(realm.smtp_server, Some(Default::default()));
        assert_eq!(realm.supported_locales, None);
    }

    #[test]
    fn collection_order_is_preserved() {
        let realm: Realm = codec()
            .decode(&doc(json!({
                "realm": "acme",
                "enabled": true,
                "supported_locales": ["fr", "en", "de"]
            })))
            .unwrap();

        assert_eq!(
            realm.supported_locales,
            Some(vec!["fr".to_string(), "en".to_string(), "de".to_string()])
        );
    }

    #[test]
    fn document_id_becomes_record_id() {
        let realm: Realm = codec()
            .decode(&doc(json!({"id": "r-7", "realm": "acme", "enabled": true})))
            .unwrap();
        assert_eq!(realm.id.as_deref(), Some("r-7"));
    }

    #[test]
    fn missing_required_field_is_a_validation_error() {
        let err = codec()
            .decode::<Realm>(&doc(json!({"realm": "acme"})))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn encode_leaves_unset_optional_fields_untouched() {
        let mut document = doc(json!({
            "realm": "acme",
            "enabled": true,
            "display_name": "kept"
        }));

        let mut realm = Realm::new("acme").with_id("r-1");
        realm.enabled = false;
        realm.access_token_lifespan = Some(600);
        codec().encode(&realm, &mut document).unwrap();

        assert_eq!(document.id(), Some("r-1"));
        assert_eq!(document.get("enabled"), Some(&json!(false)));
        assert_eq!(document.get("display_name"), Some(&json!("kept")));
        assert_eq!(document.get("access_token_lifespan"), Some(&json!(600)));
        assert_eq!(document.get("ssl_required"), Some(&json!("EXTERNAL")));
        assert!(!document.is_set("registration_allowed"));
    }

    #[test]
    fn every_schema_field_maps_onto_the_record() {
        let mut full = ResourceDocument::new();
        for field in REALM_SCHEMA.fields {
            let value = match field.kind {
                crate::schema::FieldKind::String if field.name == "ssl_required" => json!("ALL"),
                crate::schema::FieldKind::String => json!("x"),
                crate::schema::FieldKind::Bool => json!(true),
                crate::schema::FieldKind::Int => json!(1),
                crate::schema::FieldKind::StringList => json!(["a"]),
                crate::schema::FieldKind::StringMap => json!({"host": "smtp"}),
            };
            full.set(field.name, value);
        }

        let realm: Realm = codec().decode(&full).unwrap();
        let mut output = ResourceDocument::new();
        codec().encode(&realm, &mut output).unwrap();

        assert_eq!(output, full);
    }
}

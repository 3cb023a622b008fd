//! Declarative field schema for managed resources.
//!
//! A [`ResourceSchema`] lists every field a resource document may carry,
//! together with its kind, presence rule, replacement flag and validator.
//! The same table drives user input validation, the field codec and plan
//! diffing, so adding a field means adding one row here.

use std::borrow::Cow;

use kc_model::SslRequired;
use serde_json::Value;

use crate::document::ResourceDocument;
use crate::error::{ProviderResult, ValidationErrors};

/// Value kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// UTF-8 string.
    String,
    /// Boolean.
    Bool,
    /// 32-bit signed integer.
    Int,
    /// Ordered list of strings.
    StringList,
    /// Map of string to string.
    StringMap,
}

impl FieldKind {
    /// Returns the kind name used in messages and schema listings.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::StringList => "list(string)",
            Self::StringMap => "map(string)",
        }
    }

    /// Checks that a JSON value has this kind.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Bool => value.is_boolean(),
            Self::Int => value
                .as_i64()
                .is_some_and(|n| i32::try_from(n).is_ok()),
            Self::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            Self::StringMap => value
                .as_object()
                .is_some_and(|map| map.values().all(Value::is_string)),
        }
    }
}

/// Whether a field must, may, or may by default be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Must be set by the caller.
    Required,
    /// Takes the given string value when not set.
    Defaulted(&'static str),
    /// Absent unless set; absence leaves the remote value alone.
    Optional,
}

impl Presence {
    /// Returns true for fields whose absence is meaningful.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        matches!(self, Self::Optional)
    }
}

/// Predicate over a single field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    /// The string value must be one of the listed values.
    OneOf(&'static [&'static str]),
    /// The string value must not be empty.
    NonEmpty,
}

impl Validator {
    /// Checks a value, returning a message on failure.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        match self {
            Self::OneOf(allowed) => match value.as_str() {
                Some(s) if allowed.contains(&s) => Ok(()),
                _ => Err(format!("must be one of {}", allowed.join(", "))),
            },
            Self::NonEmpty => match value.as_str() {
                Some(s) if !s.trim().is_empty() => Ok(()),
                _ => Err("must not be empty".to_string()),
            },
        }
    }
}

/// Declaration of one document field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// snake_case field name.
    pub name: &'static str,
    /// Value kind.
    pub kind: FieldKind,
    /// Presence rule.
    pub presence: Presence,
    /// Changing this field requires destroying and recreating the resource.
    pub force_new: bool,
    /// Value validator.
    pub validator: Option<Validator>,
    /// Human-readable description.
    pub description: &'static str,
}

impl FieldSpec {
    const fn new(name: &'static str, kind: FieldKind, presence: Presence) -> Self {
        Self {
            name,
            kind,
            presence,
            force_new: false,
            validator: None,
            description: "",
        }
    }

    /// A required string field.
    #[must_use]
    pub const fn required_string(name: &'static str) -> Self {
        Self::new(name, FieldKind::String, Presence::Required)
    }

    /// A required boolean field.
    #[must_use]
    pub const fn required_bool(name: &'static str) -> Self {
        Self::new(name, FieldKind::Bool, Presence::Required)
    }

    /// A string field with a default.
    #[must_use]
    pub const fn defaulted_string(name: &'static str, default: &'static str) -> Self {
        Self::new(name, FieldKind::String, Presence::Defaulted(default))
    }

    /// An optional field of the given kind.
    #[must_use]
    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self::new(name, kind, Presence::Optional)
    }

    /// An optional boolean field.
    #[must_use]
    pub const fn optional_bool(name: &'static str) -> Self {
        Self::optional(name, FieldKind::Bool)
    }

    /// An optional integer field.
    #[must_use]
    pub const fn optional_int(name: &'static str) -> Self {
        Self::optional(name, FieldKind::Int)
    }

    /// Marks the field as requiring replacement on change.
    #[must_use]
    pub const fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    /// Attaches a validator.
    #[must_use]
    pub const fn validated(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Attaches a description.
    #[must_use]
    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Key of this field in the camelCase wire form.
    #[must_use]
    pub fn api_name(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        let mut upper = false;
        for c in self.name.chars() {
            if c == '_' {
                upper = true;
            } else if upper {
                out.push(c.to_ascii_uppercase());
                upper = false;
            } else {
                out.push(c);
            }
        }
        out
    }

    /// Value this field takes in a document, applying its default.
    #[must_use]
    pub fn effective_value<'a>(&self, document: &'a ResourceDocument) -> Option<Cow<'a, Value>> {
        match (document.get(self.name), self.presence) {
            (Some(value), _) => Some(Cow::Borrowed(value)),
            (None, Presence::Defaulted(default)) => Some(Cow::Owned(Value::from(default))),
            (None, _) => None,
        }
    }
}

/// Field table for one resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSchema {
    /// Resource type name, e.g. `keycloak_realm`.
    pub type_name: &'static str,
    /// Field declarations in display order.
    pub fields: &'static [FieldSpec],
}

impl ResourceSchema {
    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields that require replacement on change.
    pub fn force_new_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.force_new)
    }

    /// Validates a configuration document.
    ///
    /// Every violation is collected so the caller can report them at once.
    ///
    /// ## Errors
    ///
    /// Returns `ProviderError::Validation` if any field is unknown, missing,
    /// of the wrong kind, or rejected by its validator.
    pub fn validate(&self, document: &ResourceDocument) -> ProviderResult<()> {
        let mut errors = ValidationErrors::new();

        for name in document.attribute_names() {
            if self.field(name).is_none() {
                errors.push(name, format!("unknown field for {}", self.type_name));
            }
        }

        for field in self.fields {
            let Some(value) = document.get(field.name) else {
                if field.presence == Presence::Required {
                    errors.push(field.name, "is required");
                }
                continue;
            };

            if !field.kind.accepts(value) {
                errors.push(field.name, format!("expected {}", field.kind.as_str()));
                continue;
            }
            if let Some(validator) = field.validator {
                if let Err(message) = validator.check(value) {
                    errors.push(field.name, message);
                }
            }
        }

        errors.into_result()
    }
}

/// Schema of the `keycloak_realm` resource.
pub static REALM_SCHEMA: ResourceSchema = ResourceSchema {
    type_name: "keycloak_realm",
    fields: REALM_FIELDS,
};

const REALM_FIELDS: &[FieldSpec] = &[
    FieldSpec::required_string("realm")
        .force_new()
        .validated(Validator::NonEmpty)
        .describe("Realm name and ID"),
    FieldSpec::required_bool("enabled").describe("Whether the realm is enabled"),
    FieldSpec::defaulted_string("ssl_required", "EXTERNAL")
        .validated(Validator::OneOf(SslRequired::NAMES))
        .describe("SSL requirement: ALL, EXTERNAL or NONE"),
    FieldSpec::optional("display_name", FieldKind::String).describe("Display name for UI"),
    FieldSpec::optional("supported_locales", FieldKind::StringList)
        .describe("Supported locales"),
    FieldSpec::optional("default_roles", FieldKind::StringList)
        .describe("Roles granted to new users"),
    FieldSpec::optional("smtp_server", FieldKind::StringMap).describe("SMTP server settings"),
    // Login & registration
    FieldSpec::optional_bool("internationalization_enabled"),
    FieldSpec::optional_bool("registration_allowed"),
    FieldSpec::optional_bool("registration_email_as_username"),
    FieldSpec::optional_bool("remember_me"),
    FieldSpec::optional_bool("verify_email"),
    FieldSpec::optional_bool("reset_password_allowed"),
    FieldSpec::optional_bool("edit_username_allowed"),
    FieldSpec::optional_bool("brute_force_protected"),
    // Lifespans, in seconds
    FieldSpec::optional_int("access_token_lifespan"),
    FieldSpec::optional_int("access_token_lifespan_for_implicit_flow"),
    FieldSpec::optional_int("sso_session_idle_timeout"),
    FieldSpec::optional_int("sso_session_max_lifespan"),
    FieldSpec::optional_int("offline_session_idle_timeout"),
    FieldSpec::optional_int("access_code_lifespan"),
    FieldSpec::optional_int("access_code_lifespan_user_action"),
    FieldSpec::optional_int("access_code_lifespan_login"),
    // Brute force detection
    FieldSpec::optional_int("max_failure_wait_seconds"),
    FieldSpec::optional_int("minimum_quick_login_wait_seconds"),
    FieldSpec::optional_int("wait_increment_seconds"),
    FieldSpec::optional_int("quick_login_check_milli_seconds"),
    FieldSpec::optional_int("max_delta_time_seconds"),
    FieldSpec::optional_int("failure_factor"),
];

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> ResourceDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn minimal_realm_is_valid() {
        let document = doc(json!({"realm": "acme", "enabled": true}));
        assert!(REALM_SCHEMA.validate(&document).is_ok());
    }

    #[test]
    fn bogus_ssl_required_is_rejected() {
        let document = doc(json!({"realm": "acme", "enabled": true, "ssl_required": "BOGUS"}));

        match REALM_SCHEMA.validate(&document) {
            Err(crate::ProviderError::Validation(errors)) => {
                assert!(errors.contains("ssl_required"));
                assert_eq!(errors.violations().len(), 1);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn every_problem_is_reported() {
        let document = doc(json!({
            "realm": "",
            "access_token_lifespan": "300",
            "failure_factor": 1.5,
            "smtp_server": {"port": 25},
            "colour": "blue"
        }));

        let Err(crate::ProviderError::Validation(errors)) = REALM_SCHEMA.validate(&document) else {
            panic!("expected validation error");
        };
        for field in [
            "realm",
            "enabled",
            "access_token_lifespan",
            "failure_factor",
            "smtp_server",
            "colour",
        ] {
            assert!(errors.contains(field), "missing violation for {field}");
        }
    }

    #[test]
    fn out_of_range_int_is_rejected() {
        let document = doc(json!({"realm": "acme", "enabled": true, "failure_factor": 5_000_000_000_i64}));
        assert!(REALM_SCHEMA.validate(&document).is_err());
    }

    #[test]
    fn negative_ints_pass_through() {
        let document = doc(json!({"realm": "acme", "enabled": true, "access_code_lifespan": -1}));
        assert!(REALM_SCHEMA.validate(&document).is_ok());
    }

    #[test]
    fn zero_values_are_valid() {
        let document = doc(json!({
            "realm": "acme",
            "enabled": false,
            "failure_factor": 0,
            "remember_me": false,
            "supported_locales": [],
            "smtp_server": {}
        }));
        assert!(REALM_SCHEMA.validate(&document).is_ok());
    }

    #[test]
    fn realm_name_forces_replacement() {
        let names: Vec<_> = REALM_SCHEMA.force_new_fields().map(|f| f.name).collect();
        assert_eq!(names, vec!["realm"]);
    }

    #[test]
    fn api_names_are_camel_case() {
        let field = REALM_SCHEMA.field("access_token_lifespan_for_implicit_flow").unwrap();
        assert_eq!(field.api_name(), "accessTokenLifespanForImplicitFlow");
        assert_eq!(
            REALM_SCHEMA.field("quick_login_check_milli_seconds").unwrap().api_name(),
            "quickLoginCheckMilliSeconds"
        );
        assert_eq!(REALM_SCHEMA.field("realm").unwrap().api_name(), "realm");
    }

    #[test]
    fn field_names_are_unique() {
        for (i, field) in REALM_SCHEMA.fields.iter().enumerate() {
            assert!(
                REALM_SCHEMA.fields[i + 1..].iter().all(|f| f.name != field.name),
                "duplicate field {}",
                field.name
            );
        }
    }

    #[test]
    fn default_is_applied_for_effective_value() {
        let document = doc(json!({"realm": "acme", "enabled": true}));
        let field = REALM_SCHEMA.field("ssl_required").unwrap();

        assert_eq!(field.effective_value(&document).unwrap().as_ref(), &json!("EXTERNAL"));
        assert!(REALM_SCHEMA
            .field("display_name")
            .unwrap()
            .effective_value(&document)
            .is_none());
    }
}

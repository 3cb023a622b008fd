//! Schema listing.

use kc_provider::{FieldSpec, Presence, Validator, REALM_SCHEMA};
use serde::Serialize;
use tabled::Tabled;

use crate::config::OutputFormat;
use crate::output::output;

/// One field of the realm schema, for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct FieldRow {
    /// Field name.
    #[tabled(rename = "Field")]
    pub name: &'static str,
    /// Value kind.
    #[tabled(rename = "Type")]
    pub kind: &'static str,
    /// Required, defaulted or optional.
    #[tabled(rename = "Presence")]
    pub presence: String,
    /// Whether changing the field replaces the realm.
    #[tabled(rename = "Force New")]
    pub force_new: bool,
    /// Value constraint, if any.
    #[tabled(rename = "Constraint")]
    pub constraint: String,
    /// Field description.
    #[tabled(rename = "Description")]
    pub description: &'static str,
}

impl From<&FieldSpec> for FieldRow {
    fn from(field: &FieldSpec) -> Self {
        let presence = match field.presence {
            Presence::Required => "required".to_string(),
            Presence::Defaulted(default) => format!("default {default}"),
            Presence::Optional => "optional".to_string(),
        };
        let constraint = match field.validator {
            Some(Validator::OneOf(allowed)) => format!("one of {}", allowed.join(", ")),
            Some(Validator::NonEmpty) => "non-empty".to_string(),
            None => String::new(),
        };

        Self {
            name: field.name,
            kind: field.kind.as_str(),
            presence,
            force_new: field.force_new,
            constraint,
            description: field.description,
        }
    }
}

/// Prints the realm schema.
pub fn run_schema(format: OutputFormat) -> crate::CliResult<()> {
    let rows: Vec<FieldRow> = REALM_SCHEMA.fields.iter().map(FieldRow::from).collect();
    output(&rows, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_is_listed() {
        let rows: Vec<FieldRow> = REALM_SCHEMA.fields.iter().map(FieldRow::from).collect();
        assert_eq!(rows.len(), REALM_SCHEMA.fields.len());

        let realm = &rows[0];
        assert_eq!(realm.name, "realm");
        assert_eq!(realm.presence, "required");
        assert!(realm.force_new);
        assert_eq!(realm.constraint, "non-empty");
    }

    #[test]
    fn defaults_and_choices_are_shown() {
        let ssl = REALM_SCHEMA
            .field("ssl_required")
            .map(FieldRow::from)
            .unwrap();

        assert_eq!(ssl.presence, "default EXTERNAL");
        assert_eq!(ssl.constraint, "one of ALL, EXTERNAL, NONE");
        assert!(!ssl.force_new);
    }
}

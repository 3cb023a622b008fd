//! Change planning.
//!
//! A plan compares the tracked state of a resource with its configuration,
//! field by field, and decides which operation brings the remote side in
//! line: create, in-place update, replacement, or nothing.

use serde::Serialize;
use serde_json::Value;

use crate::document::ResourceDocument;
use crate::schema::ResourceSchema;

/// Operation a plan resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanAction {
    /// Nothing is tracked yet; the resource must be created.
    Create,
    /// Mutable fields differ; update in place.
    Update,
    /// A force-replace field differs; destroy and recreate.
    Replace,
    /// Configuration matches the tracked state.
    NoOp,
}

/// One differing field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeChange {
    /// Field name.
    pub field: &'static str,
    /// Value in the tracked state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    /// Value the configuration asks for.
    pub after: Value,
    /// Whether this change alone forces replacement.
    pub requires_replace: bool,
}

/// Result of planning one resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    /// Operation to perform.
    pub action: PlanAction,
    /// Identity of the tracked resource, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Fields that differ, in schema order.
    pub changes: Vec<AttributeChange>,
}

impl Plan {
    /// Diffs a configuration against the tracked state.
    ///
    /// A field counts as changed only when the configuration sets it, or the
    /// schema gives it a default, and the value differs from the tracked one.
    /// Optional fields the configuration leaves unset never produce a change;
    /// whatever the server holds for them is accepted.
    #[must_use]
    pub fn diff(
        schema: &ResourceSchema,
        prior: Option<&ResourceDocument>,
        config: &ResourceDocument,
    ) -> Self {
        let changes: Vec<AttributeChange> = schema
            .fields
            .iter()
            .filter_map(|field| {
                let after = field.effective_value(config)?;
                let before = prior.and_then(|p| p.get(field.name));
                if before == Some(after.as_ref()) {
                    return None;
                }
                Some(AttributeChange {
                    field: field.name,
                    before: before.cloned(),
                    after: after.into_owned(),
                    requires_replace: field.force_new && prior.is_some(),
                })
            })
            .collect();

        let id = prior.and_then(ResourceDocument::id).map(str::to_string);
        let action = match (&id, prior) {
            (None, _) | (_, None) => PlanAction::Create,
            _ if changes.iter().any(|c| c.requires_replace) => PlanAction::Replace,
            _ if !changes.is_empty() => PlanAction::Update,
            _ => PlanAction::NoOp,
        };

        Self { action, id, changes }
    }

    /// Returns true if applying the plan would call the remote API.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.action != PlanAction::NoOp
    }

    /// Fields whose change forces replacement.
    pub fn replace_reasons(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.changes
            .iter()
            .filter(|c| c.requires_replace)
            .map(|c| c.field)
    }
}

//! Realm resource controller.
//!
//! Sequences create, read, update, delete and import against a
//! [`RealmClient`], translating between configuration documents and realm
//! records with a [`FieldCodec`]. The controller holds no state between
//! calls; the caller passes in the tracked document and keeps what comes back.

use std::sync::Arc;

use kc_model::Realm;
use serde_json::Value;

use crate::client::RealmClient;
use crate::codec::FieldCodec;
use crate::document::ResourceDocument;
use crate::error::{Operation, ProviderError, ProviderResult};
use crate::plan::{Plan, PlanAction};
use crate::schema::ResourceSchema;

/// Outcome of reading a tracked realm.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    /// The realm exists; this is its refreshed document.
    Present(ResourceDocument),
    /// The realm no longer exists remotely; drop the tracked state.
    Absent,
}

impl ReadOutcome {
    /// Returns the document if the realm exists.
    #[must_use]
    pub fn into_document(self) -> Option<ResourceDocument> {
        match self {
            Self::Present(doc) => Some(doc),
            Self::Absent => None,
        }
    }
}

/// Reconciles realm documents against the management API.
#[derive(Clone)]
pub struct RealmController {
    client: Arc<dyn RealmClient>,
    codec: FieldCodec,
}

impl std::fmt::Debug for RealmController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealmController")
            .field("schema", &self.codec.schema().type_name)
            .finish_non_exhaustive()
    }
}

impl RealmController {
    /// Creates a controller over the given client and schema.
    #[must_use]
    pub fn new(client: Arc<dyn RealmClient>, schema: &'static ResourceSchema) -> Self {
        Self {
            client,
            codec: FieldCodec::new(schema),
        }
    }

    /// Returns the schema documents are validated against.
    #[must_use]
    pub const fn schema(&self) -> &'static ResourceSchema {
        self.codec.schema()
    }

    /// Validates a configuration document.
    pub fn validate(&self, config: &ResourceDocument) -> ProviderResult<()> {
        self.schema().validate(config)
    }

    /// Creates the realm described by `config`.
    ///
    /// After the create call succeeds, the realm is read back into the
    /// configuration so that values the server filled in for unset fields
    /// become part of the returned state.
    ///
    /// ## Errors
    ///
    /// Fails without side effects on validation errors. A failed create call
    /// is returned as `ProviderError::Remote` and nothing exists remotely. If
    /// only the read-back fails, `ProviderError::Tainted` carries the new
    /// realm's identity so the caller can keep tracking it.
    pub async fn create(&self, config: &ResourceDocument) -> ProviderResult<ResourceDocument> {
        self.validate(config)?;

        let mut realm: Realm = self.codec.decode(config)?;
        realm.id = None;

        let created = self
            .client
            .create_realm(&realm)
            .await
            .map_err(|e| ProviderError::remote(Operation::Create, &realm.realm, e))?;

        if !created.is_persisted() {
            return Err(ProviderError::MissingIdentity {
                realm: realm.realm.clone(),
            });
        }
        let id = created.id.unwrap_or_default();
        tracing::info!(realm = %realm.realm, %id, "realm created");

        let mut document = config.clone();
        document.set_id(&id);
        match self.read(&id, &document).await {
            Ok(ReadOutcome::Present(document)) => Ok(document),
            Ok(ReadOutcome::Absent) => Err(ProviderError::NotFound { id }),
            Err(e) => {
                tracing::warn!(%id, error = %e, "created realm could not be read back");
                Err(ProviderError::Tainted {
                    id,
                    source: Box::new(e),
                })
            }
        }
    }

    /// Reads the realm and refreshes `prior` with what the server reports.
    ///
    /// Fields the server reports replace their tracked values; optional
    /// fields it omits keep whatever `prior` holds.
    ///
    /// ## Errors
    ///
    /// A missing realm is not an error: it yields [`ReadOutcome::Absent`].
    /// Every other remote failure is returned.
    pub async fn read(&self, id: &str, prior: &ResourceDocument) -> ProviderResult<ReadOutcome> {
        self.fetch(Operation::Read, id, prior.clone()).await
    }

    /// Updates the realm in place.
    ///
    /// The record sent is the full tracked state in `prior` with every field
    /// `config` sets or defaults laid over it, so settings the configuration
    /// leaves unset keep their tracked values. A change to any force-replace
    /// field is refused so that the update call never carries a renamed
    /// realm; use [`RealmController::apply`] to route such changes through
    /// replacement.
    ///
    /// ## Errors
    ///
    /// Returns `ProviderError::Conflict` for force-replace changes,
    /// `ProviderError::Validation` for bad input, and remote failures verbatim.
    pub async fn update(
        &self,
        id: &str,
        prior: &ResourceDocument,
        config: &ResourceDocument,
    ) -> ProviderResult<ResourceDocument> {
        self.validate(config)?;
        self.ensure_in_place(prior, config)?;

        let mut document = self.overlay(prior, config);
        let mut realm: Realm = self.codec.decode(&document)?;
        realm.id = Some(id.to_string());

        self.client
            .update_realm(&realm)
            .await
            .map_err(|e| ProviderError::remote(Operation::Update, id, e))?;
        tracing::info!(realm = %realm.realm, %id, "realm updated");

        document.set_id(id);
        self.read(id, &document)
            .await?
            .into_document()
            .ok_or_else(|| ProviderError::NotFound { id: id.to_string() })
    }

    /// Deletes the realm. Deleting a realm that is already gone succeeds.
    pub async fn delete(&self, id: &str) -> ProviderResult<()> {
        match self.client.delete_realm(id).await {
            Ok(()) => {
                tracing::info!(%id, "realm deleted");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(%id, "realm already absent");
                Ok(())
            }
            Err(e) => Err(ProviderError::remote(Operation::Delete, id, e)),
        }
    }

    /// Imports an existing realm as fully tracked state.
    ///
    /// Every field the server reports is treated as configured.
    ///
    /// ## Errors
    ///
    /// Returns `ProviderError::NotFound` if the realm doesn't exist.
    pub async fn import(&self, id: &str) -> ProviderResult<ResourceDocument> {
        let document = self
            .fetch(Operation::Import, id, ResourceDocument::new())
            .await?
            .into_document()
            .ok_or_else(|| ProviderError::NotFound { id: id.to_string() })?;
        tracing::info!(%id, fields = document.len(), "realm imported");
        Ok(document)
    }

    /// Plans the changes needed to bring `prior` in line with `config`.
    pub fn plan(
        &self,
        prior: Option<&ResourceDocument>,
        config: &ResourceDocument,
    ) -> ProviderResult<Plan> {
        self.validate(config)?;
        Ok(Plan::diff(self.schema(), prior, config))
    }

    /// Plans and executes the changes for one realm.
    ///
    /// Replacement deletes the tracked realm before creating the new one.
    /// A no-op returns `prior` unchanged.
    pub async fn apply(
        &self,
        prior: Option<&ResourceDocument>,
        config: &ResourceDocument,
    ) -> ProviderResult<ResourceDocument> {
        let plan = self.plan(prior, config)?;
        tracing::debug!(action = ?plan.action, changes = plan.changes.len(), "applying plan");

        match (plan.action, plan.id.as_deref(), prior) {
            (PlanAction::Update, Some(id), Some(prior)) => self.update(id, prior, config).await,
            (PlanAction::Replace, Some(id), _) => {
                tracing::info!(
                    %id,
                    fields = ?plan.replace_reasons().collect::<Vec<_>>(),
                    "replacing realm"
                );
                self.delete(id).await?;
                self.create(config).await
            }
            (PlanAction::NoOp, _, Some(prior)) => Ok(prior.clone()),
            _ => self.create(config).await,
        }
    }

    async fn fetch(
        &self,
        operation: Operation,
        id: &str,
        mut document: ResourceDocument,
    ) -> ProviderResult<ReadOutcome> {
        let realm = match self.client.get_realm(id).await {
            Ok(realm) => realm,
            Err(e) if e.is_not_found() && operation == Operation::Read => {
                tracing::warn!(%id, "realm no longer exists, dropping tracked state");
                return Ok(ReadOutcome::Absent);
            }
            Err(e) if e.is_not_found() => return Ok(ReadOutcome::Absent),
            Err(e) => return Err(ProviderError::remote(operation, id, e)),
        };
        tracing::debug!(%id, realm = %realm.realm, "realm read");

        self.codec.encode(&realm, &mut document)?;
        if document.id().is_none() {
            document.set_id(id);
        }
        Ok(ReadOutcome::Present(document))
    }

    /// Tracked state with the configured and defaulted values on top.
    fn overlay(&self, prior: &ResourceDocument, config: &ResourceDocument) -> ResourceDocument {
        let mut merged = prior.clone();
        for field in self.schema().fields {
            if let Some(value) = field.effective_value(config) {
                merged.set(field.name, value.into_owned());
            }
        }
        merged
    }

    /// Refuses changes to force-replace fields between tracked and new state.
    ///
    /// A field missing from the tracked state can't be compared and counts
    /// as changed.
    fn ensure_in_place(
        &self,
        prior: &ResourceDocument,
        config: &ResourceDocument,
    ) -> ProviderResult<()> {
        for field in self.schema().force_new_fields() {
            let Some(after) = field.effective_value(config) else {
                continue;
            };
            let before = prior.get(field.name);
            if before != Some(after.as_ref()) {
                return Err(ProviderError::Conflict {
                    field: field.name,
                    prior: before.cloned().unwrap_or(Value::Null),
                    requested: after.into_owned(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::client::InMemoryRealmClient;
    use crate::schema::REALM_SCHEMA;

    fn controller(client: &Arc<InMemoryRealmClient>) -> RealmController {
        RealmController::new(client.clone(), &REALM_SCHEMA)
    }

    #[tokio::test]
    async fn invalid_config_never_reaches_the_client() {
        let client = Arc::new(InMemoryRealmClient::new());
        let config = ResourceDocument::from_value(json!({
            "realm": "acme",
            "enabled": true,
            "ssl_required": "BOGUS"
        }))
        .unwrap();

        let err = controller(&client).create(&config).await.unwrap_err();
        assert!(err.is_validation());
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn update_refuses_a_renamed_realm() {
        let client = Arc::new(InMemoryRealmClient::new());
        client.insert(Realm::new("acme").with_id("r-1"));

        let prior = ResourceDocument::from_value(json!({"id": "r-1", "realm": "acme", "enabled": true})).unwrap();
        let config = ResourceDocument::from_value(json!({"realm": "acme-2", "enabled": true})).unwrap();

        let err = controller(&client)
            .update("r-1", &prior, &config)
            .await
            .unwrap_err();

        match err {
            ProviderError::Conflict { field, prior, requested } => {
                assert_eq!(field, "realm");
                assert_eq!(prior, json!("acme"));
                assert_eq!(requested, json!("acme-2"));
            }
            other => panic!("expected conflict, got {other:?}"),
        }
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn update_refuses_when_tracked_name_is_unknown() {
        let client = Arc::new(InMemoryRealmClient::new());
        client.insert(Realm::new("acme").with_id("r-1"));

        let prior = ResourceDocument::new().with_id("r-1");
        let config = ResourceDocument::from_value(json!({"realm": "acme-2", "enabled": true})).unwrap();

        let err = controller(&client)
            .update("r-1", &prior, &config)
            .await
            .unwrap_err();

        match err {
            ProviderError::Conflict { field, prior, .. } => {
                assert_eq!(field, "realm");
                assert_eq!(prior, Value::Null);
            }
            other => panic!("expected conflict, got {other:?}"),
        }
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn import_of_missing_realm_is_not_found() {
        let client = Arc::new(InMemoryRealmClient::new());
        let err = controller(&client).import("nope").await.unwrap_err();

        assert!(matches!(err, ProviderError::NotFound { ref id } if id == "nope"));
    }

    #[tokio::test]
    async fn read_encodes_remote_identity() {
        let client = Arc::new(InMemoryRealmClient::new());
        client.insert(Realm::new("acme"));

        let outcome = controller(&client)
            .read("acme", &ResourceDocument::new())
            .await
            .unwrap();
        let doc = outcome.into_document().unwrap();
        assert_eq!(doc.id(), Some("acme"));
        assert_eq!(doc.get_str("realm"), Some("acme"));
    }
}

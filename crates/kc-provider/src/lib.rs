//! # kc-provider
//!
//! Reconciliation engine for declaratively managed Keycloak realms.
//!
//! A caller (a plan/apply tool, an orchestrator plugin, a test) hands the
//! [`RealmController`] a configuration document and the state it tracked last
//! time; the controller validates the document against the schema, decodes it
//! into a [`kc_model::Realm`], talks to the management API through a
//! [`RealmClient`], and returns the refreshed document to track next.
//!
//! ## Modules
//!
//! - [`schema`] - declarative field table and validation
//! - [`document`] - presence-tracking configuration documents
//! - [`codec`] - schema-driven document ↔ record translation
//! - [`client`] - remote client trait, HTTP and in-memory implementations
//! - [`plan`] - field-level diff and action selection
//! - [`controller`] - create/read/update/delete/import and apply
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use kc_provider::{HttpRealmClient, ProviderConfig, RealmController, ResourceDocument, REALM_SCHEMA};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ProviderConfig::default().from_env();
//! let client = HttpRealmClient::new(&config)?;
//! let controller = RealmController::new(Arc::new(client), &REALM_SCHEMA);
//!
//! let desired = ResourceDocument::new()
//!     .with("realm", "acme")
//!     .with("enabled", true)
//!     .with("access_token_lifespan", 300);
//! let state = controller.apply(None, &desired).await?;
//! println!("created {}", state.id().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod client;
pub mod codec;
pub mod config;
pub mod controller;
pub mod document;
pub mod error;
pub mod plan;
pub mod schema;

pub use client::{ClientError, ClientResult, HttpRealmClient, InMemoryRealmClient, RealmClient};
pub use codec::FieldCodec;
pub use config::ProviderConfig;
pub use controller::{ReadOutcome, RealmController};
pub use document::ResourceDocument;
pub use error::{Operation, ProviderError, ProviderResult, ValidationErrors};
pub use plan::{AttributeChange, Plan, PlanAction};
pub use schema::{FieldKind, FieldSpec, Presence, ResourceSchema, Validator, REALM_SCHEMA};

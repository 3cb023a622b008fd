//! # kc-model
//!
//! Domain records for Keycloak realm reconciliation.
//!
//! The types here mirror the admin REST representation of a realm: they
//! serialize to the camelCase wire form the management API speaks, and every
//! field the remote system may default on its own is an `Option` so that
//! "not configured" never collapses into a zero value.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod realm;

pub use realm::{Realm, SmtpServer, SslRequired};

//! In-memory realm client.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use kc_model::Realm;
use parking_lot::{Mutex, RwLock};

use super::{ClientError, ClientResult, RealmClient};

/// A call received by [`InMemoryRealmClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCall {
    /// `get_realm(id)`.
    Get(String),
    /// `create_realm(realm)` with the record as sent.
    Create(Realm),
    /// `update_realm(realm)` with the record as sent.
    Update(Realm),
    /// `delete_realm(id)`.
    Delete(String),
}

type ServerDefaults = Box<dyn Fn(&mut Realm) + Send + Sync>;

/// [`RealmClient`] that keeps realms in process memory.
///
/// Identities are assigned as `r-1`, `r-2`, ... in creation order. Every call
/// is recorded so callers can inspect exactly what would have been sent.
#[derive(Default)]
pub struct InMemoryRealmClient {
    realms: RwLock<BTreeMap<String, Realm>>,
    calls: Mutex<Vec<ClientCall>>,
    next_id: AtomicU64,
    unavailable: AtomicBool,
    reads_unavailable: AtomicBool,
    server_defaults: Option<ServerDefaults>,
}

impl fmt::Debug for InMemoryRealmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryRealmClient")
            .field("realms", &self.realms.read().len())
            .field("calls", &self.calls.lock().len())
            .field("unavailable", &self.unavailable.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl InMemoryRealmClient {
    /// Creates an empty client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills in settings on create, the way a server applies its own defaults
    /// to fields the request left out.
    #[must_use]
    pub fn with_server_defaults(mut self, defaults: impl Fn(&mut Realm) + Send + Sync + 'static) -> Self {
        self.server_defaults = Some(Box::new(defaults));
        self
    }

    /// Stores a realm as if it already existed remotely.
    ///
    /// A realm without an id is stored under its name.
    pub fn insert(&self, mut realm: Realm) -> String {
        let id = realm.id.clone().unwrap_or_else(|| realm.realm.clone());
        realm.id = Some(id.clone());
        self.realms.write().insert(id.clone(), realm);
        id
    }

    /// Removes a realm behind the caller's back.
    pub fn remove(&self, id: &str) -> Option<Realm> {
        self.realms.write().remove(id)
    }

    /// Returns the stored realm.
    #[must_use]
    pub fn realm(&self, id: &str) -> Option<Realm> {
        self.realms.read().get(id).cloned()
    }

    /// Number of stored realms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.realms.read().len()
    }

    /// Returns true if no realm is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.realms.read().is_empty()
    }

    /// Returns every call received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<ClientCall> {
        self.calls.lock().clone()
    }

    /// Forgets recorded calls.
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Makes every following call fail with a transport error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Makes every following `get_realm` fail with a transport error while
    /// the other calls keep working.
    pub fn set_reads_unavailable(&self, unavailable: bool) {
        self.reads_unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn record(&self, call: ClientCall) -> ClientResult<()> {
        self.calls.lock().push(call);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ClientError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RealmClient for InMemoryRealmClient {
    async fn get_realm(&self, id: &str) -> ClientResult<Realm> {
        self.record(ClientCall::Get(id.to_string()))?;
        if self.reads_unavailable.load(Ordering::SeqCst) {
            return Err(ClientError::Transport("read timed out".to_string()));
        }
        self.realm(id).ok_or_else(|| ClientError::not_found(id))
    }

    async fn create_realm(&self, realm: &Realm) -> ClientResult<Realm> {
        self.record(ClientCall::Create(realm.clone()))?;

        let mut realms = self.realms.write();
        if realms.values().any(|r| r.realm == realm.realm) {
            return Err(ClientError::Api {
                status: 409,
                message: format!("Realm {} already exists", realm.realm),
            });
        }

        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let id = format!("r-{n}");

        let mut created = realm.clone();
        created.id = Some(id.clone());
        if let Some(defaults) = &self.server_defaults {
            defaults(&mut created);
        }
        realms.insert(id, created.clone());
        Ok(created)
    }

    async fn update_realm(&self, realm: &Realm) -> ClientResult<()> {
        self.record(ClientCall::Update(realm.clone()))?;

        let id = realm
            .id
            .clone()
            .ok_or_else(|| ClientError::not_found(realm.realm.clone()))?;
        let mut realms = self.realms.write();
        let stored = realms
            .get_mut(&id)
            .ok_or_else(|| ClientError::not_found(id.clone()))?;

        *stored = realm.clone();
        Ok(())
    }

    async fn delete_realm(&self, id: &str) -> ClientResult<()> {
        self.record(ClientCall::Delete(id.to_string()))?;
        self.realms
            .write()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ClientError::not_found(id))
    }
}

//! Keycloak admin REST client.

use async_trait::async_trait;
use kc_model::Realm;
use reqwest::{RequestBuilder, Response, StatusCode};

use super::{ClientError, ClientResult, RealmClient};
use crate::config::ProviderConfig;

/// [`RealmClient`] backed by the Keycloak admin REST API.
///
/// Realms are addressed as `/admin/realms/{id}`. Keycloak uses the realm name
/// as the id unless told otherwise, so the create call looks the new realm up
/// by name to learn its identity.
#[derive(Debug, Clone)]
pub struct HttpRealmClient {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl HttpRealmClient {
    /// Creates a new client from provider configuration.
    pub fn new(config: &ProviderConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            access_token: config.access_token.clone(),
        })
    }

    /// Gets the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn realms_url(&self) -> String {
        format!("{}/admin/realms", self.base_url)
    }

    fn realm_url(&self, id: &str) -> String {
        format!("{}/admin/realms/{}", self.base_url, id)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl RealmClient for HttpRealmClient {
    async fn get_realm(&self, id: &str) -> ClientResult<Realm> {
        let url = self.realm_url(id);
        tracing::debug!(%url, "GET realm");

        let response = self.authorize(self.client.get(&url)).send().await?;
        let response = check_status(response, id).await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn create_realm(&self, realm: &Realm) -> ClientResult<Realm> {
        let url = self.realms_url();
        tracing::debug!(%url, realm = %realm.realm, "POST realm");

        let response = self
            .authorize(self.client.post(&url).json(realm))
            .send()
            .await?;
        check_status(response, &realm.realm).await?;

        // POST answers 201 with only a Location header.
        self.get_realm(&realm.realm).await
    }

    async fn update_realm(&self, realm: &Realm) -> ClientResult<()> {
        let url = self.realm_url(&realm.realm);
        tracing::debug!(%url, id = ?realm.id, "PUT realm");

        let response = self
            .authorize(self.client.put(&url).json(realm))
            .send()
            .await?;
        check_status(response, &realm.realm).await?;
        Ok(())
    }

    async fn delete_realm(&self, id: &str) -> ClientResult<()> {
        let url = self.realm_url(id);
        tracing::debug!(%url, "DELETE realm");

        let response = self.authorize(self.client.delete(&url)).send().await?;
        check_status(response, id).await?;
        Ok(())
    }
}

/// Maps non-success statuses to client errors.
async fn check_status(response: Response, id: &str) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(status_error(status, id, message))
}

fn status_error(status: StatusCode, id: &str, message: String) -> ClientError {
    if status == StatusCode::NOT_FOUND {
        ClientError::not_found(id)
    } else {
        ClientError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

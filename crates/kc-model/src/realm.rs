//! Realm domain record.
//!
//! A realm is the top-level container for all Keycloak entities. This record
//! carries the subset of realm settings that the reconciler manages.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// SMTP server settings, keyed by the admin API's property names
/// (`host`, `port`, `from`, `auth`, ...).
pub type SmtpServer = BTreeMap<String, String>;

/// SSL requirement level for a realm.
///
/// Serialized in uppercase. The admin API reports the value in lowercase, so
/// both spellings are accepted when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SslRequired {
    /// SSL required for all requests.
    #[serde(alias = "all")]
    All,
    /// SSL required for external requests only.
    #[default]
    #[serde(alias = "external")]
    External,
    /// No SSL required.
    #[serde(alias = "none")]
    None,
}

impl SslRequired {
    /// Accepted configuration values, in declaration order.
    pub const NAMES: &'static [&'static str] = &["ALL", "EXTERNAL", "NONE"];

    /// Returns the configuration spelling of this level.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::External => "EXTERNAL",
            Self::None => "NONE",
        }
    }
}

impl fmt::Display for SslRequired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Keycloak realm as exchanged with the admin API.
///
/// `id` is assigned by the server and is `None` until the realm exists
/// remotely. `realm` is the user-chosen name; it is fixed at creation time.
///
/// Every `Option` field is tri-state: `None` leaves the server's own value in
/// place and is omitted from the payload, `Some(v)` is sent verbatim, including
/// `Some(0)` and `Some(false)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Realm {
    // === Identity ===
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Realm name (natural key).
    pub realm: String,
    /// Whether the realm is enabled.
    #[serde(default)]
    pub enabled: bool,

    // === Security ===
    /// SSL requirement level.
    #[serde(default)]
    pub ssl_required: SslRequired,

    // === Presentation ===
    /// Display name for UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Supported locales, in configured order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_locales: Option<Vec<String>>,
    /// Roles granted to every new user, in configured order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_roles: Option<Vec<String>>,
    /// SMTP configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smtp_server: Option<SmtpServer>,

    // === Login & registration ===
    /// Enable internationalization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internationalization_enabled: Option<bool>,
    /// Allow user self-registration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_allowed: Option<bool>,
    /// Use email as username during registration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_email_as_username: Option<bool>,
    /// Enable "Remember Me" checkbox.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remember_me: Option<bool>,
    /// Require email verification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_email: Option<bool>,
    /// Allow password reset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_password_allowed: Option<bool>,
    /// Allow users to edit their username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_username_allowed: Option<bool>,
    /// Enable brute force detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brute_force_protected: Option<bool>,

    // === Token & code lifespans (seconds) ===
    /// Access token lifespan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token_lifespan: Option<i32>,
    /// Access token lifespan for implicit flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token_lifespan_for_implicit_flow: Option<i32>,
    /// Authorization code lifespan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_code_lifespan: Option<i32>,
    /// User action code lifespan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_code_lifespan_user_action: Option<i32>,
    /// Login flow code lifespan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_code_lifespan_login: Option<i32>,

    // === Session lifespans (seconds) ===
    /// SSO session idle timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sso_session_idle_timeout: Option<i32>,
    /// SSO session max lifespan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sso_session_max_lifespan: Option<i32>,
    /// Offline session idle timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offline_session_idle_timeout: Option<i32>,

    // === Brute force detection ===
    /// Maximum lockout wait in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_failure_wait_seconds: Option<i32>,
    /// Lockout wait after a too-quick login failure, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_quick_login_wait_seconds: Option<i32>,
    /// Wait increment per failure, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_increment_seconds: Option<i32>,
    /// Window for quick login failure detection, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_login_check_milli_seconds: Option<i32>,
    /// Time after which the failure count resets, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_delta_time_seconds: Option<i32>,
    /// Failures before a wait is enforced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_factor: Option<i32>,
}

impl Realm {
    /// Creates an enabled realm with the given name and no optional settings.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            realm: name.into(),
            enabled: true,
            ..Self::default()
        }
    }

    /// Sets the server-assigned identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Sets the SSL requirement.
    #[must_use]
    pub const fn with_ssl_required(mut self, ssl: SslRequired) -> Self {
        self.ssl_required = ssl;
        self
    }

    /// Returns true once the realm exists remotely.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_realm_has_no_optional_settings() {
        let realm = Realm::new("acme");

        assert_eq!(realm.realm, "acme");
        assert!(realm.enabled);
        assert!(!realm.is_persisted());
        assert_eq!(realm.ssl_required, SslRequired::External);
        assert_eq!(realm.access_token_lifespan, None);
        assert_eq!(realm.smtp_server, None);
    }

    #[test]
    fn unset_fields_are_omitted_from_payload() {
        let realm = Realm::new("acme");
        let value = serde_json::to_value(&realm).unwrap();

        assert_eq!(
            value,
            json!({"realm": "acme", "enabled": true, "sslRequired": "EXTERNAL"})
        );
    }

    #[test]
    fn zero_values_are_sent() {
        let mut realm = Realm::new("acme");
        realm.failure_factor = Some(0);
        realm.remember_me = Some(false);

        let value = serde_json::to_value(&realm).unwrap();
        assert_eq!(value["failureFactor"], json!(0));
        assert_eq!(value["rememberMe"], json!(false));
    }

    #[test]
    fn lowercase_ssl_required_is_accepted() {
        let realm: Realm = serde_json::from_value(json!({
            "id": "acme",
            "realm": "acme",
            "enabled": false,
            "sslRequired": "external",
            "accessTokenLifespanForImplicitFlow": 900,
            "quickLoginCheckMilliSeconds": 1000
        }))
        .unwrap();

        assert!(realm.is_persisted());
        assert_eq!(realm.ssl_required, SslRequired::External);
        assert_eq!(realm.access_token_lifespan_for_implicit_flow, Some(900));
        assert_eq!(realm.quick_login_check_milli_seconds, Some(1000));
    }

    #[test]
    fn empty_id_is_not_persisted() {
        let realm = Realm::new("acme").with_id("");
        assert!(!realm.is_persisted());
    }

    #[test]
    fn ssl_required_names_match_serialization() {
        for level in [SslRequired::All, SslRequired::External, SslRequired::None] {
            let value = serde_json::to_value(level).unwrap();
            assert_eq!(value, json!(level.as_str()));
            assert!(SslRequired::NAMES.contains(&level.as_str()));
        }
    }
}

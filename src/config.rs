//! Configuration types for MQTT topic authorization
//!
//! Provides the JSON-serializable policy: a global rule list, per-principal
//! rule lists selected by client identity, and the default behaviour.

use crate::qos::QosMatch;
use crate::retained::RetainMatch;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Authorization policy configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case", default)]
pub struct AuthzConfig {
    /// Behaviour when no permission matches
    pub default_behaviour: AuthorizationBehaviour,

    /// Permissions applied to every client, after any principal permissions
    pub permissions: Vec<PermissionConfig>,

    /// Principal-specific rule sets (first match wins)
    pub principals: Vec<PrincipalConfig>,
}

// ============================================================================
// Permissions
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PermissionConfig {
    /// Rule name (for logging and debugging)
    #[serde(default)]
    pub name: Option<String>,

    /// Topic pattern, may contain + and # wildcards
    pub topic: String,

    /// Activity this rule applies to
    #[serde(default)]
    pub activity: Activity,

    /// QoS levels this rule applies to
    #[serde(default)]
    pub qos: QosMatch,

    /// Retained flags this rule applies to (publish only)
    #[serde(default)]
    pub retain: RetainMatch,

    /// Allow or deny
    #[serde(default, rename = "type")]
    pub permission_type: PermissionType,
}

impl PermissionConfig {
    /// Name used in logs and errors, falling back to the topic pattern
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.topic)
    }
}

/// Activity a permission applies to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Activity {
    Publish,
    Subscribe,
    #[default]
    All,
}

impl Activity {
    /// Check if an attempt of kind `other` falls under this activity
    pub fn includes(self, other: Activity) -> bool {
        self == Activity::All || self == other
    }
}

/// Effect of a matching permission
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionType {
    #[default]
    Allow,
    Deny,
}

impl PermissionType {
    pub fn behaviour(self) -> AuthorizationBehaviour {
        match self {
            PermissionType::Allow => AuthorizationBehaviour::Accept,
            PermissionType::Deny => AuthorizationBehaviour::Deny,
        }
    }
}

/// Outcome of an authorization check
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AuthorizationBehaviour {
    Accept,
    #[default]
    Deny,
}

impl AuthorizationBehaviour {
    pub fn is_accept(self) -> bool {
        self == AuthorizationBehaviour::Accept
    }
}

impl fmt::Display for AuthorizationBehaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorizationBehaviour::Accept => f.write_str("ACCEPT"),
            AuthorizationBehaviour::Deny => f.write_str("DENY"),
        }
    }
}

// ============================================================================
// Principals
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PrincipalConfig {
    /// Principal name (for logging and debugging)
    pub name: String,

    /// Match conditions (all must match, none = every client)
    #[serde(default, rename = "match")]
    pub match_conditions: PrincipalMatch,

    /// Overrides the global default behaviour
    #[serde(default)]
    pub default_behaviour: Option<AuthorizationBehaviour>,

    /// Permissions evaluated before the global ones
    #[serde(default)]
    pub permissions: Vec<PermissionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case", default)]
pub struct PrincipalMatch {
    /// Match by exact username
    pub username: Option<String>,
    /// Match by username regex
    pub username_regex: Option<String>,
    /// Match by exact client ID
    pub client_id: Option<String>,
    /// Match by client ID regex
    pub client_id_regex: Option<String>,
}

// ============================================================================
// Client Identity (runtime state per connection)
// ============================================================================

/// Identity of a connected client, as established by the broker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientIdentity {
    /// Client ID from CONNECT
    pub client_id: String,
    /// Username from CONNECT (if provided)
    pub username: Option<String>,
}

impl ClientIdentity {
    pub fn new(client_id: impl Into<String>, username: Option<&str>) -> Self {
        Self {
            client_id: client_id.into(),
            username: username.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuthzConfig::default();
        assert_eq!(config.default_behaviour, AuthorizationBehaviour::Deny);
        assert!(config.permissions.is_empty());
        assert!(config.principals.is_empty());
    }

    #[test]
    fn test_deserialize_config() {
        let json = r#"{
            "default-behaviour": "accept",
            "permissions": [
                {"topic": "public/#", "activity": "subscribe"}
            ],
            "principals": [
                {
                    "name": "sensors",
                    "match": {"username-regex": "^sensor-"},
                    "default-behaviour": "deny",
                    "permissions": [
                        {
                            "name": "sensor-temp",
                            "topic": "sensors/+/temp",
                            "activity": "publish",
                            "qos": "zero-one",
                            "retain": "not-retained",
                            "type": "allow"
                        }
                    ]
                }
            ]
        }"#;

        let config: AuthzConfig = serde_json::from_str(json).expect("Failed to parse");
        assert_eq!(config.default_behaviour, AuthorizationBehaviour::Accept);
        assert_eq!(config.permissions.len(), 1);
        assert_eq!(config.permissions[0].activity, Activity::Subscribe);

        let principal = &config.principals[0];
        assert_eq!(principal.name, "sensors");
        assert_eq!(
            principal.match_conditions.username_regex.as_deref(),
            Some("^sensor-")
        );
        assert_eq!(principal.default_behaviour, Some(AuthorizationBehaviour::Deny));

        let rule = &principal.permissions[0];
        assert_eq!(rule.display_name(), "sensor-temp");
        assert_eq!(rule.qos, QosMatch::ZeroOne);
        assert_eq!(rule.retain, RetainMatch::NotRetained);
        assert_eq!(rule.permission_type, PermissionType::Allow);
    }

    #[test]
    fn test_permission_defaults() {
        let rule: PermissionConfig = serde_json::from_str(r#"{"topic": "a/b"}"#).unwrap();
        assert_eq!(rule.activity, Activity::All);
        assert_eq!(rule.qos, QosMatch::All);
        assert_eq!(rule.retain, RetainMatch::All);
        assert_eq!(rule.permission_type, PermissionType::Allow);
        assert_eq!(rule.display_name(), "a/b");
    }

    #[test]
    fn test_activity_includes() {
        assert!(Activity::All.includes(Activity::Publish));
        assert!(Activity::All.includes(Activity::Subscribe));
        assert!(Activity::Publish.includes(Activity::Publish));
        assert!(!Activity::Publish.includes(Activity::Subscribe));
        assert!(!Activity::Subscribe.includes(Activity::All));
    }

    #[test]
    fn test_enum_values_are_kebab_case() {
        assert_eq!(serde_json::to_string(&Activity::Subscribe).unwrap(), r#""subscribe""#);
        assert_eq!(serde_json::to_string(&PermissionType::Deny).unwrap(), r#""deny""#);
        assert_eq!(
            serde_json::to_string(&AuthorizationBehaviour::Accept).unwrap(),
            r#""accept""#
        );

        let behaviour: AuthorizationBehaviour = serde_json::from_str(r#""deny""#).unwrap();
        assert_eq!(behaviour, AuthorizationBehaviour::Deny);
        assert!(serde_json::from_str::<AuthorizationBehaviour>(r#""ACCEPT""#).is_err());
        assert!(serde_json::from_str::<Activity>(r#""Publish""#).is_err());
    }

    #[test]
    fn test_behaviour_display() {
        assert_eq!(AuthorizationBehaviour::Accept.to_string(), "ACCEPT");
        assert_eq!(AuthorizationBehaviour::Deny.to_string(), "DENY");
        assert_eq!(PermissionType::Deny.behaviour(), AuthorizationBehaviour::Deny);
    }
}

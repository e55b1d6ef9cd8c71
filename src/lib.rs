//! MQTT topic authorization for Sentinel
//!
//! Decides whether a client may publish to or subscribe on an MQTT topic:
//!
//! - **Topic Filters**: `+` single-level and `#` multi-level wildcards,
//!   validated when a rule is built
//! - **Topic Permissions**: activity, QoS set and retained flag scoping,
//!   with an allow or deny effect
//! - **Evaluation**: first matching permission wins, otherwise the default
//!   behaviour applies
//! - **Policies**: per-principal rule sets selected by username or client ID
//! - **Sessions**: rule sets resolved once per connected client
//!
//! # Rule order
//!
//! Permissions are evaluated in the order given. The first permission that
//! applies decides, even when a later one is more specific. List narrow
//! rules before broad ones.
//!
//! # Example
//!
//! ```
//! use sentinel_mqtt_authz::acl::{check_publish, AuthorizationResult, TopicPermission};
//! use sentinel_mqtt_authz::config::{Activity, AuthorizationBehaviour};
//! use sentinel_mqtt_authz::qos::Qos;
//!
//! let result = AuthorizationResult::new(
//!     vec![TopicPermission::allow("sensors/+/temp", Activity::Publish).unwrap()],
//!     AuthorizationBehaviour::Deny,
//! );
//!
//! assert_eq!(
//!     check_publish("sensors/room1/temp", Qos::AtLeastOnce, false, &result),
//!     AuthorizationBehaviour::Accept
//! );
//! assert_eq!(
//!     check_publish("sensors/room1/humidity", Qos::AtLeastOnce, false, &result),
//!     AuthorizationBehaviour::Deny
//! );
//! ```

pub mod acl;
pub mod config;
pub mod error;
pub mod mqtt;
pub mod policy;
pub mod qos;
pub mod retained;
pub mod session;

// Re-export main types
pub use config::AuthzConfig;
pub use error::ConfigError;
pub use policy::Policy;
pub use session::SessionRegistry;

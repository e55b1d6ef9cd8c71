//! Topic permission types and applicability logic

use crate::config::{Activity, AuthorizationBehaviour, PermissionConfig, PermissionType};
use crate::error::Result;
use crate::mqtt::{TopicFilter, TopicName};
use crate::qos::{Qos, QosMatch};
use crate::retained::RetainMatch;

/// An attempted publish or subscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptedOperation<'a> {
    Publish {
        topic: &'a str,
        qos: Qos,
        retained: bool,
    },
    Subscribe {
        topic: &'a str,
        qos: Qos,
    },
}

impl<'a> AttemptedOperation<'a> {
    pub fn topic(&self) -> &'a str {
        match *self {
            AttemptedOperation::Publish { topic, .. } | AttemptedOperation::Subscribe { topic, .. } => {
                topic
            }
        }
    }

    pub fn qos(&self) -> Qos {
        match *self {
            AttemptedOperation::Publish { qos, .. } | AttemptedOperation::Subscribe { qos, .. } => qos,
        }
    }

    pub fn activity(&self) -> Activity {
        match self {
            AttemptedOperation::Publish { .. } => Activity::Publish,
            AttemptedOperation::Subscribe { .. } => Activity::Subscribe,
        }
    }

    /// Retained flag, present for publishes only
    pub fn retained(&self) -> Option<bool> {
        match *self {
            AttemptedOperation::Publish { retained, .. } => Some(retained),
            AttemptedOperation::Subscribe { .. } => None,
        }
    }
}

/// A single immutable topic permission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicPermission {
    filter: TopicFilter,
    activity: Activity,
    qos: QosMatch,
    retain: RetainMatch,
    permission_type: PermissionType,
}

impl TopicPermission {
    /// Allow every activity, QoS and retained flag on `pattern`
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            filter: TopicFilter::parse(pattern)?,
            activity: Activity::All,
            qos: QosMatch::All,
            retain: RetainMatch::All,
            permission_type: PermissionType::Allow,
        })
    }

    /// Allow `activity` on `pattern`
    pub fn allow(pattern: &str, activity: Activity) -> Result<Self> {
        Ok(Self::new(pattern)?.with_activity(activity))
    }

    /// Deny `activity` on `pattern`
    pub fn deny(pattern: &str, activity: Activity) -> Result<Self> {
        Ok(Self::new(pattern)?
            .with_activity(activity)
            .with_type(PermissionType::Deny))
    }

    /// Compile a permission from configuration
    pub fn from_config(config: &PermissionConfig) -> Result<Self> {
        let filter =
            TopicFilter::parse(&config.topic).map_err(|e| e.in_rule(config.display_name()))?;

        Ok(Self {
            filter,
            activity: config.activity,
            qos: config.qos,
            retain: config.retain,
            permission_type: config.permission_type,
        })
    }

    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activity = activity;
        self
    }

    pub fn with_qos(mut self, qos: QosMatch) -> Self {
        self.qos = qos;
        self
    }

    pub fn with_retain(mut self, retain: RetainMatch) -> Self {
        self.retain = retain;
        self
    }

    pub fn with_type(mut self, permission_type: PermissionType) -> Self {
        self.permission_type = permission_type;
        self
    }

    pub fn filter(&self) -> &TopicFilter {
        &self.filter
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn qos(&self) -> QosMatch {
        self.qos
    }

    pub fn retain(&self) -> RetainMatch {
        self.retain
    }

    pub fn permission_type(&self) -> PermissionType {
        self.permission_type
    }

    /// Check if this permission applies to an attempted operation
    ///
    /// `topic` must be the normalized, split form of `operation.topic()`.
    /// The retained flag is only consulted for publishes.
    pub fn implies(&self, topic: &TopicName<'_>, operation: &AttemptedOperation<'_>) -> bool {
        if !self.activity.includes(operation.activity()) {
            return false;
        }

        if !self.qos.contains(operation.qos()) {
            return false;
        }

        if let Some(retained) = operation.retained() {
            if !self.retain.contains(retained) {
                return false;
            }
        }

        self.filter.matches(topic)
    }

    /// Check if this permission applies to every operation `other` applies to
    ///
    /// Effects are not compared. A permission covered by an earlier one in
    /// the same rule set never decides anything, whatever its effect.
    pub fn covers(&self, other: &TopicPermission) -> bool {
        // Subscriptions never consult the retained flag
        let retain_covered =
            other.activity == Activity::Subscribe || self.retain.includes(other.retain);

        self.activity.includes(other.activity)
            && self.qos.includes(other.qos)
            && retain_covered
            && self.filter.covers(&other.filter)
    }
}

/// Ordered permissions plus the behaviour when none matches
///
/// Order is priority: the first permission that applies decides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationResult {
    permissions: Vec<TopicPermission>,
    default_behaviour: AuthorizationBehaviour,
}

impl AuthorizationResult {
    pub fn new(permissions: Vec<TopicPermission>, default_behaviour: AuthorizationBehaviour) -> Self {
        Self {
            permissions,
            default_behaviour,
        }
    }

    /// A result with no permissions
    pub fn with_default(default_behaviour: AuthorizationBehaviour) -> Self {
        Self::new(Vec::new(), default_behaviour)
    }

    pub fn permissions(&self) -> &[TopicPermission] {
        &self.permissions
    }

    pub fn default_behaviour(&self) -> AuthorizationBehaviour {
        self.default_behaviour
    }

    /// Indices of permissions that can never match because an earlier
    /// permission covers them
    pub fn shadowed(&self) -> Vec<(usize, usize)> {
        let mut shadowed = Vec::new();
        for (i, later) in self.permissions.iter().enumerate() {
            if let Some(j) = self.permissions[..i].iter().position(|p| p.covers(later)) {
                shadowed.push((i, j));
            }
        }
        shadowed
    }
}

/// Result of evaluating an attempted operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub behaviour: AuthorizationBehaviour,
    /// Index of the permission that decided, `None` for the default
    pub matched_rule: Option<usize>,
}

impl Decision {
    pub fn matched(index: usize, permission: &TopicPermission) -> Self {
        Self {
            behaviour: permission.permission_type().behaviour(),
            matched_rule: Some(index),
        }
    }

    pub fn default_behaviour(behaviour: AuthorizationBehaviour) -> Self {
        Self {
            behaviour,
            matched_rule: None,
        }
    }

    pub fn is_accept(&self) -> bool {
        self.behaviour.is_accept()
    }
}

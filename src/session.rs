//! Per-client authorization sessions
//!
//! Resolves a client's rule set once at connect time and reuses it for every
//! publish and subscribe the client attempts until it disconnects.

use crate::acl::{self, AttemptedOperation, AuthorizationResult, Decision};
use crate::config::{AuthorizationBehaviour, ClientIdentity};
use crate::policy::Policy;
use crate::qos::Qos;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Registry of connected clients and their resolved rule sets
pub struct SessionRegistry {
    /// Compiled policy
    policy: Arc<Policy>,
    /// Resolved rule sets (keyed by client_id)
    sessions: DashMap<String, Arc<AuthorizationResult>>,
}

impl SessionRegistry {
    pub fn new(policy: Arc<Policy>) -> Self {
        Self {
            policy,
            sessions: DashMap::new(),
        }
    }

    /// Resolve and cache the rule set for a connecting client
    ///
    /// A second connect with the same client ID replaces the earlier session.
    pub fn connect(&self, identity: &ClientIdentity) -> Arc<AuthorizationResult> {
        let result = self.policy.resolve(identity);

        info!(
            client_id = %identity.client_id,
            principal = self.policy.principal_name(identity).unwrap_or("global"),
            rules = result.permissions().len(),
            "Client session opened"
        );

        if self
            .sessions
            .insert(identity.client_id.clone(), Arc::clone(&result))
            .is_some()
        {
            debug!(client_id = %identity.client_id, "Replaced existing session");
        }

        result
    }

    /// Drop a client's session, returning whether one existed
    pub fn disconnect(&self, client_id: &str) -> bool {
        let removed = self.sessions.remove(client_id).is_some();
        if removed {
            debug!(client_id = %client_id, "Client session closed");
        }
        removed
    }

    /// Evaluate an operation for a connected client
    ///
    /// Clients without a session are denied.
    pub fn evaluate(&self, client_id: &str, operation: &AttemptedOperation<'_>) -> Decision {
        // Clone the Arc so no map shard lock is held while evaluating
        let result = match self.sessions.get(client_id) {
            Some(entry) => Arc::clone(entry.value()),
            None => {
                warn!(
                    client_id = %client_id,
                    topic = %operation.topic(),
                    activity = ?operation.activity(),
                    "Operation without session"
                );
                return Decision::default_behaviour(AuthorizationBehaviour::Deny);
            }
        };

        let decision = acl::evaluate(operation, &result);

        if !decision.is_accept() {
            info!(
                client_id = %client_id,
                topic = %operation.topic(),
                activity = ?operation.activity(),
                rule = ?decision.matched_rule,
                "Operation denied"
            );
        }

        decision
    }

    /// Check if a connected client may publish
    pub fn check_publish(
        &self,
        client_id: &str,
        topic: &str,
        qos: Qos,
        retained: bool,
    ) -> AuthorizationBehaviour {
        self.evaluate(
            client_id,
            &AttemptedOperation::Publish {
                topic,
                qos,
                retained,
            },
        )
        .behaviour
    }

    /// Check if a connected client may subscribe
    pub fn check_subscription(&self, client_id: &str, topic: &str, qos: Qos) -> AuthorizationBehaviour {
        self.evaluate(client_id, &AttemptedOperation::Subscribe { topic, qos })
            .behaviour
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(Arc::new(Policy::default()))
    }
}

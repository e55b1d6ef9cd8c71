//! Authorization evaluation
//!
//! Permissions are scanned in the order the caller supplied them and the
//! first one that applies decides. Order is priority; the most specific
//! permission does not win on its own. A broad `allow a/#` listed before
//! `deny a/b` accepts a publish to `a/b`.

use crate::config::AuthorizationBehaviour;
use crate::mqtt::TopicName;
use crate::qos::Qos;
use tracing::{debug, trace};

use super::rules::{AttemptedOperation, AuthorizationResult, Decision};

/// Evaluate an attempted operation against an authorization result
pub fn evaluate(operation: &AttemptedOperation<'_>, result: &AuthorizationResult) -> Decision {
    let permissions = result.permissions();

    if permissions.is_empty() {
        return Decision::default_behaviour(result.default_behaviour());
    }

    // Normalize and split once, reused for every permission
    let topic = TopicName::new(operation.topic());

    for (index, permission) in permissions.iter().enumerate() {
        if !permission.implies(&topic, operation) {
            continue;
        }

        let decision = Decision::matched(index, permission);
        debug!(
            rule = index,
            pattern = %permission.filter(),
            topic = %topic.as_str(),
            activity = ?operation.activity(),
            qos = %operation.qos(),
            decision = %decision.behaviour,
            "Topic permission matched"
        );
        return decision;
    }

    trace!(
        topic = %topic.as_str(),
        activity = ?operation.activity(),
        default = %result.default_behaviour(),
        "No topic permission matched, using default"
    );

    Decision::default_behaviour(result.default_behaviour())
}

/// Check if a publish is permitted
pub fn check_publish(
    topic: &str,
    qos: Qos,
    retained: bool,
    result: &AuthorizationResult,
) -> AuthorizationBehaviour {
    evaluate(
        &AttemptedOperation::Publish {
            topic,
            qos,
            retained,
        },
        result,
    )
    .behaviour
}

/// Check if a subscription is permitted
pub fn check_subscription(
    topic: &str,
    qos: Qos,
    result: &AuthorizationResult,
) -> AuthorizationBehaviour {
    evaluate(&AttemptedOperation::Subscribe { topic, qos }, result).behaviour
}

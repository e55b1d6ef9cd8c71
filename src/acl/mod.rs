//! Access Control List (ACL) module
//!
//! Provides topic permissions and first-match-wins evaluation of publish and
//! subscribe attempts.

mod evaluator;
mod rules;

pub use evaluator::{check_publish, check_subscription, evaluate};
pub use rules::{AttemptedOperation, AuthorizationResult, Decision, TopicPermission};

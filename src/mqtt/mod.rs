//! MQTT topic handling
//!
//! Provides topic filter parsing, topic normalization and wildcard matching.

mod topic;

pub use topic::{matches, normalize, TopicFilter, TopicName, LEVEL_SEPARATOR};

//! Property-based tests for topic wildcard matching and evaluation

use proptest::prelude::*;
use sentinel_mqtt_authz::acl::{check_publish, check_subscription, AuthorizationResult, TopicPermission};
use sentinel_mqtt_authz::config::{Activity, AuthorizationBehaviour};
use sentinel_mqtt_authz::mqtt::{matches, normalize, TopicFilter};
use sentinel_mqtt_authz::qos::Qos;

/// Topic level without wildcards or separators (may be empty)
fn arb_level() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z0-9_$-]{0,6}").unwrap()
}

fn arb_levels() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(arb_level(), 1..6)
}

fn arb_topic() -> impl Strategy<Value = String> {
    arb_levels().prop_map(|levels| levels.join("/"))
}

fn arb_qos() -> impl Strategy<Value = Qos> {
    prop_oneof![
        Just(Qos::AtMostOnce),
        Just(Qos::AtLeastOnce),
        Just(Qos::ExactlyOnce)
    ]
}

fn arb_behaviour() -> impl Strategy<Value = AuthorizationBehaviour> {
    prop_oneof![
        Just(AuthorizationBehaviour::Accept),
        Just(AuthorizationBehaviour::Deny)
    ]
}

proptest! {
    /// Property: # matches every topic
    #[test]
    fn prop_hash_matches_everything(topic in arb_topic()) {
        prop_assert!(matches("#", &topic));
    }

    /// Property: a literal topic used as a pattern matches exactly itself
    #[test]
    fn prop_literal_matches_itself(topic in arb_topic(), other in arb_topic()) {
        prop_assert!(matches(&topic, &topic));
        prop_assert_eq!(matches(&topic, &other), topic == other);
    }

    /// Property: prefix/# matches the prefix and every extension of it
    #[test]
    fn prop_multi_level_matches_prefix(prefix in arb_topic(), rest in arb_topic()) {
        let pattern = format!("{}/#", prefix);
        prop_assert!(matches(&pattern, &prefix));
        let extended = format!("{}/{}", prefix, rest);
        prop_assert!(matches(&pattern, &extended));
    }

    /// Property: replacing any level with + still matches, but + never
    /// matches a topic with a different number of levels
    #[test]
    fn prop_single_level_consumes_one_level(levels in arb_levels(), index in any::<prop::sample::Index>()) {
        let i = index.index(levels.len());
        let mut pattern = levels.clone();
        pattern[i] = "+".to_string();
        let pattern = pattern.join("/");

        prop_assert!(matches(&pattern, &levels.join("/")));

        let longer = format!("{}/extra", levels.join("/"));
        prop_assert!(!matches(&pattern, &longer));
    }

    /// Property: # anywhere but the last level is rejected
    #[test]
    fn prop_inner_hash_rejected(prefix in arb_levels(), suffix in arb_levels()) {
        let pattern = format!("{}/#/{}", prefix.join("/"), suffix.join("/"));
        prop_assert!(TopicFilter::parse(&pattern).is_err());
    }

    /// Property: a single trailing separator is ignored by evaluation
    #[test]
    fn prop_trailing_separator_ignored(pattern in arb_topic(), topic in arb_topic(), qos in arb_qos()) {
        let result = AuthorizationResult::new(
            vec![TopicPermission::new(&pattern).unwrap()],
            AuthorizationBehaviour::Deny,
        );
        prop_assume!(!topic.is_empty() && !topic.ends_with('/'));
        let with_slash = format!("{}/", topic);
        prop_assert_eq!(normalize(&with_slash), topic.as_str());
        prop_assert_eq!(
            check_subscription(&with_slash, qos, &result),
            check_subscription(&topic, qos, &result)
        );
    }

    /// Property: an empty rule set always yields the default behaviour
    #[test]
    fn prop_empty_rules_yield_default(
        topic in ".*",
        qos in arb_qos(),
        retained in any::<bool>(),
        default in arb_behaviour(),
    ) {
        let result = AuthorizationResult::with_default(default);
        prop_assert_eq!(check_publish(&topic, qos, retained, &result), default);
        prop_assert_eq!(check_subscription(&topic, qos, &result), default);
    }

    /// Property: a publish-only rule never decides a subscription
    #[test]
    fn prop_publish_rule_ignored_for_subscribe(topic in arb_topic(), qos in arb_qos()) {
        let result = AuthorizationResult::new(
            vec![TopicPermission::allow("#", Activity::Publish).unwrap()],
            AuthorizationBehaviour::Deny,
        );
        prop_assert_eq!(check_subscription(&topic, qos, &result), AuthorizationBehaviour::Deny);
        prop_assert_eq!(check_publish(&topic, qos, false, &result), AuthorizationBehaviour::Accept);
    }
}

//! MQTT topic filters and topic names
//!
//! A [`TopicFilter`] is parsed and validated once, when the permission that
//! owns it is built. A [`TopicName`] is normalized and split once per
//! attempted operation and then reused for every rule that is checked.
//!
//! Empty levels are significant: `a//b` has three levels and `a/` has two.

use crate::error::{ConfigError, Result};
use std::fmt;
use std::str::FromStr;

/// Separator between topic levels
pub const LEVEL_SEPARATOR: char = '/';

/// One level of a parsed topic filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FilterLevel {
    /// Exact, case-sensitive level
    Literal(String),
    /// `+`: exactly one level, any value
    SingleLevel,
    /// `#`: zero or more trailing levels
    MultiLevel,
}

/// Validated topic filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicFilter {
    pattern: String,
    levels: Vec<FilterLevel>,
}

impl TopicFilter {
    /// Parse a topic filter
    ///
    /// # Rules
    /// * `#` must be the last level
    /// * `+` and `#` must occupy an entire level
    /// * Empty levels are allowed and match only empty topic levels
    ///
    /// # Examples
    /// ```
    /// use sentinel_mqtt_authz::mqtt::{TopicFilter, TopicName};
    ///
    /// let filter = TopicFilter::parse("sensors/+/temp").unwrap();
    /// assert!(filter.matches(&TopicName::new("sensors/room1/temp")));
    /// assert!(!filter.matches(&TopicName::new("sensors/room1/humidity")));
    ///
    /// assert!(TopicFilter::parse("sensors/#/temp").is_err());
    /// ```
    pub fn parse(pattern: &str) -> Result<Self> {
        let raw: Vec<&str> = pattern.split(LEVEL_SEPARATOR).collect();
        let last = raw.len() - 1;
        let mut levels = Vec::with_capacity(raw.len());

        for (i, level) in raw.into_iter().enumerate() {
            let parsed = match level {
                "#" if i == last => FilterLevel::MultiLevel,
                "#" => return Err(ConfigError::pattern(pattern, "'#' must be the last level")),
                "+" => FilterLevel::SingleLevel,
                l if l.contains('#') => {
                    return Err(ConfigError::pattern(pattern, "'#' must occupy an entire level"))
                }
                l if l.contains('+') => {
                    return Err(ConfigError::pattern(pattern, "'+' must occupy an entire level"))
                }
                l => FilterLevel::Literal(l.to_string()),
            };
            levels.push(parsed);
        }

        Ok(Self {
            pattern: pattern.to_string(),
            levels,
        })
    }

    /// The filter as written
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Check if a topic name matches this filter
    pub fn matches(&self, topic: &TopicName<'_>) -> bool {
        match_levels(&self.levels, topic.levels())
    }

    /// Check if every topic matched by `other` is also matched by `self`
    ///
    /// `a/#` covers `a/+/c` and `a`; `a/+` does not cover `a/#`.
    pub fn covers(&self, other: &TopicFilter) -> bool {
        let mut theirs = other.levels.iter();

        for level in &self.levels {
            match (level, theirs.next()) {
                (FilterLevel::MultiLevel, _) => return true,
                (_, None) => return false,
                (FilterLevel::SingleLevel, Some(FilterLevel::MultiLevel)) => return false,
                (FilterLevel::SingleLevel, Some(_)) => {}
                (FilterLevel::Literal(a), Some(FilterLevel::Literal(b))) if a == b => {}
                (FilterLevel::Literal(_), Some(_)) => return false,
            }
        }

        theirs.next().is_none()
    }
}

impl FromStr for TopicFilter {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for TopicFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

/// Topic name of an attempted operation, split into levels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicName<'a> {
    name: &'a str,
    levels: Vec<&'a str>,
}

impl<'a> TopicName<'a> {
    /// Normalize (see [`normalize`]) and split a topic
    pub fn new(topic: &'a str) -> Self {
        Self::verbatim(normalize(topic))
    }

    /// Split a topic without normalizing it
    pub fn verbatim(topic: &'a str) -> Self {
        Self {
            name: topic,
            levels: topic.split(LEVEL_SEPARATOR).collect(),
        }
    }

    pub fn as_str(&self) -> &'a str {
        self.name
    }

    pub fn levels(&self) -> &[&'a str] {
        &self.levels
    }
}

/// Remove a single trailing `/`, unless the topic is exactly `/`
pub fn normalize(topic: &str) -> &str {
    if topic.len() > 1 {
        topic.strip_suffix(LEVEL_SEPARATOR).unwrap_or(topic)
    } else {
        topic
    }
}

/// Check if `topic` matches `pattern`, splitting both on `/` as given
///
/// The topic is not normalized. An invalid pattern matches nothing.
///
/// # Examples
/// ```
/// use sentinel_mqtt_authz::mqtt::matches;
///
/// assert!(matches("a/#", "a"));
/// assert!(matches("a/+", "a/"));
/// assert!(!matches("a/+", "a"));
/// assert!(!matches("a/#/b", "a/x/b"));
/// ```
pub fn matches(pattern: &str, topic: &str) -> bool {
    TopicFilter::parse(pattern)
        .map(|filter| filter.matches(&TopicName::verbatim(topic)))
        .unwrap_or(false)
}

fn match_levels(filter: &[FilterLevel], topic: &[&str]) -> bool {
    let mut t_idx = 0;

    for level in filter {
        match level {
            // # absorbs everything that is left, including nothing
            FilterLevel::MultiLevel => return true,
            FilterLevel::SingleLevel => {
                if t_idx >= topic.len() {
                    return false;
                }
            }
            FilterLevel::Literal(expected) => {
                if topic.get(t_idx).copied() != Some(expected.as_str()) {
                    return false;
                }
            }
        }
        t_idx += 1;
    }

    // Both must be fully consumed for a match
    t_idx == topic.len()
}

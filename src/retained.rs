//! Retained-message applicability of a permission

use serde::{Deserialize, Serialize};

/// Which publishes a permission applies to, by retained flag
///
/// Subscriptions never consult this.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RetainMatch {
    Retained,
    NotRetained,
    #[default]
    All,
}

impl RetainMatch {
    /// Check if a publish with this retained flag is covered
    pub fn contains(self, retained: bool) -> bool {
        match self {
            RetainMatch::Retained => retained,
            RetainMatch::NotRetained => !retained,
            RetainMatch::All => true,
        }
    }

    /// Check if every publish covered by `other` is also covered by this
    pub fn includes(self, other: RetainMatch) -> bool {
        self == RetainMatch::All || self == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        assert!(RetainMatch::Retained.contains(true));
        assert!(!RetainMatch::Retained.contains(false));
        assert!(RetainMatch::NotRetained.contains(false));
        assert!(!RetainMatch::NotRetained.contains(true));
        assert!(RetainMatch::All.contains(true));
        assert!(RetainMatch::All.contains(false));
    }

    #[test]
    fn test_includes() {
        assert!(RetainMatch::All.includes(RetainMatch::Retained));
        assert!(RetainMatch::Retained.includes(RetainMatch::Retained));
        assert!(!RetainMatch::Retained.includes(RetainMatch::All));
        assert!(!RetainMatch::NotRetained.includes(RetainMatch::Retained));
    }

    #[test]
    fn test_deserialize() {
        let retain: RetainMatch = serde_json::from_str(r#""not-retained""#).unwrap();
        assert_eq!(retain, RetainMatch::NotRetained);
    }
}

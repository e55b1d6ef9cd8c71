//! QoS levels and the QoS sets a permission applies to

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// MQTT quality of service level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Qos {
    AtMostOnce = 0,
    AtLeastOnce = 1,
    ExactlyOnce = 2,
}

impl Qos {
    pub fn level(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Qos {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Qos::AtMostOnce),
            1 => Ok(Qos::AtLeastOnce),
            2 => Ok(Qos::ExactlyOnce),
            other => Err(ConfigError::InvalidQos(other)),
        }
    }
}

impl fmt::Display for Qos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

/// Set of QoS levels a permission applies to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum QosMatch {
    Zero,
    One,
    Two,
    ZeroOne,
    OneTwo,
    ZeroTwo,
    #[default]
    All,
}

impl QosMatch {
    fn mask(self) -> u8 {
        match self {
            QosMatch::Zero => 0b001,
            QosMatch::One => 0b010,
            QosMatch::Two => 0b100,
            QosMatch::ZeroOne => 0b011,
            QosMatch::OneTwo => 0b110,
            QosMatch::ZeroTwo => 0b101,
            QosMatch::All => 0b111,
        }
    }

    /// Check if `qos` is in this set
    pub fn contains(self, qos: Qos) -> bool {
        self.mask() & (1 << qos.level()) != 0
    }

    /// Check if every level in `other` is also in this set
    pub fn includes(self, other: QosMatch) -> bool {
        self.mask() & other.mask() == other.mask()
    }
}

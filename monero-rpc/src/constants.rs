//! Network parameters and protocol constants.

use crate::error::RpcError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use watcher_core::Piconero;

/// Mandatory ring size since hardfork v15.
pub const CURRENT_RING_SIZE: u32 = 16;

/// Smallest transfer amount worth broadcasting, in piconero.
pub const DUST_THRESHOLD: Piconero = Piconero(2_000_000_000);

/// Which Monero network a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Mainnet,
    Stagenet,
    Testnet,
}

impl NetworkType {
    /// Default daemon RPC port.
    pub fn default_daemon_port(self) -> u16 {
        match self {
            NetworkType::Mainnet => 18081,
            NetworkType::Stagenet => 38081,
            NetworkType::Testnet => 28081,
        }
    }

    /// Default wallet RPC port.
    pub fn default_wallet_port(self) -> u16 {
        match self {
            NetworkType::Mainnet => 18082,
            NetworkType::Stagenet => 38082,
            NetworkType::Testnet => 28082,
        }
    }

    /// Leading characters of addresses on this network.
    pub fn address_first_chars(self) -> &'static [char] {
        match self {
            NetworkType::Mainnet => &['4', '8'],
            NetworkType::Stagenet => &['5', '7'],
            NetworkType::Testnet => &['9', 'A', 'B'],
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkType::Mainnet => write!(f, "mainnet"),
            NetworkType::Stagenet => write!(f, "stagenet"),
            NetworkType::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for NetworkType {
    type Err = RpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(NetworkType::Mainnet),
            "stagenet" => Ok(NetworkType::Stagenet),
            "testnet" => Ok(NetworkType::Testnet),
            other => Err(RpcError::Config(format!("unknown network: {other}"))),
        }
    }
}

/// Transaction fee priority accepted by the wallet RPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum FeePriority {
    /// Low fee, slow confirmation.
    Low = 1,
    /// Default.
    Normal = 2,
    Elevated = 3,
    /// High fee, fast confirmation.
    High = 4,
}

impl FeePriority {
    /// Wire value for RPC parameters.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for FeePriority {
    type Error = RpcError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(FeePriority::Low),
            2 => Ok(FeePriority::Normal),
            3 => Ok(FeePriority::Elevated),
            4 => Ok(FeePriority::High),
            other => Err(RpcError::InvalidInput(format!("fee priority out of range: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_parse() {
        assert_eq!("mainnet".parse::<NetworkType>().unwrap(), NetworkType::Mainnet);
        assert_eq!("Stagenet".parse::<NetworkType>().unwrap(), NetworkType::Stagenet);
        assert!("ethereum".parse::<NetworkType>().is_err());
    }

    #[test]
    fn test_default_ports() {
        assert_eq!(NetworkType::Mainnet.default_daemon_port(), 18081);
        assert_eq!(NetworkType::Testnet.default_wallet_port(), 28082);
    }

    #[test]
    fn test_fee_priority_wire_values() {
        assert_eq!(FeePriority::Normal.as_u8(), 2);
        assert_eq!(FeePriority::try_from(4).unwrap(), FeePriority::High);
        assert!(FeePriority::try_from(0).is_err());
    }
}

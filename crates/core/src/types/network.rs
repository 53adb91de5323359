//! Supported resolution networks.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A blockchain network a name can resolve against.
///
/// The wire identifier (serde form and [`Network::as_str`]) is the uppercase
/// ticker the resolution backend expects, e.g. `"ETH"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Network {
    /// Ethereum
    Eth,
    /// Bitcoin
    Btc,
    /// Shibarium
    Bone,
    /// Core
    #[default]
    Core,
    /// Viction
    Vic,
    /// Polygon
    Matic,
    /// Cardano
    Ada,
    /// ApeChain
    Ape,
}

impl Network {
    /// Every supported network, in display order.
    pub const ALL: [Self; 8] = [
        Self::Eth,
        Self::Btc,
        Self::Bone,
        Self::Core,
        Self::Vic,
        Self::Matic,
        Self::Ada,
        Self::Ape,
    ];

    /// Wire identifier used by the resolution backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eth => "ETH",
            Self::Btc => "BTC",
            Self::Bone => "BONE",
            Self::Core => "CORE",
            Self::Vic => "VIC",
            Self::Matic => "MATIC",
            Self::Ada => "ADA",
            Self::Ape => "APE",
        }
    }

    /// Human-readable network name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Eth => "Ethereum",
            Self::Btc => "Bitcoin",
            Self::Bone => "Shibarium",
            Self::Core => "Core",
            Self::Vic => "Viction",
            Self::Matic => "Polygon",
            Self::Ada => "Cardano",
            Self::Ape => "ApeChain",
        }
    }

    /// Whether addresses on this network use the EVM `0x` + 40 hex format.
    #[must_use]
    pub const fn is_evm(self) -> bool {
        matches!(
            self,
            Self::Eth | Self::Bone | Self::Core | Self::Vic | Self::Matic | Self::Ape
        )
    }

    /// EIP-155 chain id for EVM networks; `None` for the rest.
    #[must_use]
    pub const fn chain_id(self) -> Option<u64> {
        match self {
            Self::Eth => Some(1),
            Self::Bone => Some(109),
            Self::Core => Some(1116),
            Self::Vic => Some(88),
            Self::Matic => Some(137),
            Self::Ape => Some(33139),
            Self::Btc | Self::Ada => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Network {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|n| n.as_str() == upper)
            .ok_or_else(|| UnknownNetwork(s.to_owned()))
    }
}

/// Error returned when parsing an unsupported network identifier.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported network: {0}")]
pub struct UnknownNetwork(pub String);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("eth".parse::<Network>().unwrap(), Network::Eth);
        assert_eq!("MATIC".parse::<Network>().unwrap(), Network::Matic);
        assert!("DOGE".parse::<Network>().is_err());
    }

    #[test]
    fn test_evm_networks_have_chain_ids() {
        for network in Network::ALL {
            assert_eq!(network.is_evm(), network.chain_id().is_some());
        }
    }

    #[test]
    fn test_serde_uses_wire_identifier() {
        let json = serde_json::to_string(&Network::Bone).unwrap();
        assert_eq!(json, "\"BONE\"");
        let parsed: Network = serde_json::from_str("\"APE\"").unwrap();
        assert_eq!(parsed, Network::Ape);
    }
}

//! Wallet address type.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::network::Network;

/// Errors that can occur when parsing a [`WalletAddress`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The input string is empty.
    #[error("address cannot be empty")]
    Empty,
    /// The input is not `0x` followed by 40 hex characters.
    #[error("address must be 0x followed by 40 hex characters")]
    MalformedEvm,
    /// The input contains whitespace or control characters.
    #[error("address contains invalid characters")]
    InvalidCharacter,
}

/// A wallet address on some network.
///
/// EVM-style networks are validated strictly (`0x` + 40 hex characters);
/// other networks carry an opaque non-empty token, since their address
/// formats are owned by the resolution backend.
///
/// ## Examples
///
/// ```
/// use nameport_core::{Network, WalletAddress};
///
/// let addr = "0x36de81e06e59b9674e985b00ba05acbb96d4f1a3";
/// assert!(WalletAddress::parse_for(addr, Network::Eth).is_ok());
/// assert!(WalletAddress::parse_for("not-an-address", Network::Eth).is_err());
///
/// // Non-EVM formats are opaque.
/// assert!(WalletAddress::parse_for("bc1qar0srrr7xfkvy5l643", Network::Btc).is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Parse an address for a specific network.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains whitespace, or does
    /// not match the EVM format when `network.is_evm()`.
    pub fn parse_for(s: &str, network: Network) -> Result<Self, AddressError> {
        if network.is_evm() {
            return Self::parse_evm(s);
        }

        let s = s.trim();
        if s.is_empty() {
            return Err(AddressError::Empty);
        }
        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(AddressError::InvalidCharacter);
        }

        Ok(Self(s.to_owned()))
    }

    /// Parse an EVM address: `0x` followed by exactly 40 hex characters.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or malformed.
    pub fn parse_evm(s: &str) -> Result<Self, AddressError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AddressError::Empty);
        }

        let hex = s.strip_prefix("0x").ok_or(AddressError::MalformedEvm)?;
        if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AddressError::MalformedEvm);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the address and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for WalletAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

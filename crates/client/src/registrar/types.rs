//! Canonical registrar models.
//!
//! The wire shapes of the registry API have drifted across revisions; these
//! are the single internal representation the rest of the crate sees. See
//! [`super::wire`] for the adapter that absorbs shape drift.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use nameport_core::{Email, NameKey, WalletAddress};

/// Whether a name can currently be registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Available,
    Unavailable,
}

/// An availability snapshot for one name.
///
/// Immutable once produced; a later check supersedes it, never patches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameAvailability {
    /// The name this snapshot describes.
    pub name: NameKey,
    /// Availability at the time of the check.
    pub status: AvailabilityStatus,
    /// Registration price in USD, when quoted.
    pub price_usd: Option<Decimal>,
    /// Registration price in the namespace's native token, when quoted.
    pub price_native: Option<Decimal>,
    /// Ticker of the native price's currency.
    pub native_currency: Option<String>,
    /// Checkout URL on the registrar's own site, when offered.
    pub external_action_url: Option<String>,
}

impl NameAvailability {
    /// True if the snapshot says the name can be registered.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == AvailabilityStatus::Available
    }
}

/// One way to pay for a registration, scoped to a TLD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentOption {
    /// EIP-155 chain the payment settles on.
    pub chain_id: u64,
    /// Registrar contract to pay into.
    pub contract_address: String,
    /// Token contract used for payment (zero address for the native coin).
    pub token_address: String,
    /// Display ticker for the payment token.
    pub symbol: String,
    /// Price per name in the payment token.
    pub unit_price: Decimal,
}

/// A name included in an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderName {
    pub name: NameKey,
    pub auto_renew: bool,
}

/// An order submission: the chosen payment route, the buyer, and the names.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub payment: PaymentOption,
    pub buyer: WalletAddress,
    pub names: Vec<OrderName>,
}

/// Identifier returned when an order is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReceipt {
    pub order_id: String,
}

/// A mint submission binding a name to a wallet (and optional email).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintRequest {
    pub name: NameKey,
    pub wallet: WalletAddress,
    pub email: Option<Email>,
}

/// On-chain coordinates of a freshly minted name token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintReceipt {
    pub token_id: String,
    pub chain_id: u64,
    pub contract_address: String,
}

/// Ownership and expiry snapshot for a minted name token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    /// The name in `label.tld` form as reported by the registry.
    pub name: String,
    pub owner: String,
    pub chain_id: u64,
    pub contract_address: String,
    pub token_id: String,
    pub status: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenMetadata {
    /// The name parsed against the local grammar, when it conforms.
    #[must_use]
    pub fn name_key(&self) -> Option<NameKey> {
        NameKey::parse(&self.name).ok()
    }
}

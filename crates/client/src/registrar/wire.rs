//! Wire-format adapter for the registry API.
//!
//! Search and recommendation responses have shipped in three incompatible
//! shapes over the API's lifetime: a bare array, `{"pageItems": [...]}`, and
//! `{"results": [...]}`. Item fields drifted too (`name`+`available` vs
//! `sld`/`tld`+`status`, `price` vs `usdPrice`). Everything here normalizes
//! to the canonical models in [`super::types`]; shape drift must never leak
//! past this module.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use nameport_core::{NameKey, Tld};

use super::types::{
    AvailabilityStatus, MintReceipt, MintRequest, NameAvailability, OrderReceipt, OrderRequest,
    PaymentOption, TokenMetadata,
};

// =============================================================================
// Search / recommendations
// =============================================================================

/// The three observed envelope shapes for search and recommendation results.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum SearchResponse {
    Items(Vec<WireAvailability>),
    Paged {
        #[serde(rename = "pageItems")]
        page_items: Vec<WireAvailability>,
    },
    Wrapped {
        results: Vec<WireAvailability>,
    },
}

impl SearchResponse {
    /// Normalize whichever envelope arrived into canonical snapshots.
    ///
    /// Items that cannot be keyed or carry no availability signal are
    /// dropped with a warning rather than failing the whole response;
    /// recommendation feeds routinely include names outside our grammar.
    pub(super) fn into_availabilities(self) -> Vec<NameAvailability> {
        let items = match self {
            Self::Items(items) => items,
            Self::Paged { page_items } => page_items,
            Self::Wrapped { results } => results,
        };

        items
            .into_iter()
            .filter_map(|item| match item.into_canonical() {
                Ok(snapshot) => Some(snapshot),
                Err(reason) => {
                    tracing::warn!(reason, "dropping malformed availability item");
                    None
                }
            })
            .collect()
    }
}

/// One search result item, tolerant of every observed field spelling.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireAvailability {
    sld: Option<String>,
    tld: Option<String>,
    /// Older revisions send the full name instead of sld/tld.
    name: Option<String>,
    available: Option<bool>,
    status: Option<String>,
    #[serde(alias = "price")]
    usd_price: Option<Decimal>,
    #[serde(alias = "nativeAmount")]
    native_price: Option<Decimal>,
    #[serde(alias = "currency")]
    native_currency: Option<String>,
    click_url: Option<String>,
}

impl WireAvailability {
    fn into_canonical(self) -> Result<NameAvailability, &'static str> {
        let name = match (self.sld, self.tld) {
            (Some(sld), Some(tld)) => NameKey::parse(&format!("{sld}.{tld}"))
                .map_err(|_| "sld/tld outside the label grammar")?,
            _ => {
                let raw = self.name.ok_or("item has neither sld/tld nor name")?;
                NameKey::parse(&raw).map_err(|_| "name outside the label grammar")?
            }
        };

        let status = match (self.available, self.status.as_deref()) {
            (Some(true), _) => AvailabilityStatus::Available,
            (Some(false), _) => AvailabilityStatus::Unavailable,
            (None, Some(s)) if s.eq_ignore_ascii_case("available") => {
                AvailabilityStatus::Available
            }
            (None, Some(_)) => AvailabilityStatus::Unavailable,
            (None, None) => return Err("item carries no availability signal"),
        };

        Ok(NameAvailability {
            name,
            status,
            price_usd: self.usd_price,
            price_native: self.native_price,
            native_currency: self.native_currency,
            external_action_url: self.click_url,
        })
    }
}

// =============================================================================
// Payment options
// =============================================================================

/// Payment options arrive either bare or wrapped in `{"options": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum PaymentOptionsResponse {
    List(Vec<WirePaymentOption>),
    Wrapped { options: Vec<WirePaymentOption> },
}

impl PaymentOptionsResponse {
    pub(super) fn into_options(self) -> Vec<PaymentOption> {
        let options = match self {
            Self::List(options) | Self::Wrapped { options } => options,
        };
        options.into_iter().map(WirePaymentOption::into_canonical).collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WirePaymentOption {
    chain_id: u64,
    contract_address: String,
    #[serde(default)]
    token_address: Option<String>,
    symbol: String,
    #[serde(alias = "unitPrice")]
    price: Decimal,
}

impl WirePaymentOption {
    fn into_canonical(self) -> PaymentOption {
        PaymentOption {
            chain_id: self.chain_id,
            contract_address: self.contract_address,
            token_address: self.token_address.unwrap_or_default(),
            symbol: self.symbol,
            unit_price: self.price,
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireOrderRequest {
    payment_option: WireOrderPayment,
    buyer: String,
    names: Vec<WireOrderName>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireOrderPayment {
    chain_id: u64,
    contract_address: String,
    token_address: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireOrderName {
    sld: String,
    tld: String,
    auto_renew: bool,
    domain_length: usize,
}

impl WireOrderRequest {
    pub(super) fn from_canonical(request: &OrderRequest) -> Self {
        Self {
            payment_option: WireOrderPayment {
                chain_id: request.payment.chain_id,
                contract_address: request.payment.contract_address.clone(),
                token_address: request.payment.token_address.clone(),
            },
            buyer: request.buyer.as_str().to_owned(),
            names: request
                .names
                .iter()
                .map(|n| WireOrderName {
                    sld: n.name.label().as_str().to_owned(),
                    tld: n.name.tld().as_str().to_owned(),
                    auto_renew: n.auto_renew,
                    domain_length: n.name.label().len(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireOrderResponse {
    #[serde(alias = "id")]
    order_id: String,
}

impl WireOrderResponse {
    pub(super) fn into_canonical(self) -> OrderReceipt {
        OrderReceipt {
            order_id: self.order_id,
        }
    }
}

// =============================================================================
// Minting
// =============================================================================

#[derive(Debug, Serialize)]
pub(super) struct WireMintRequest {
    sld: String,
    tld: String,
    user: WireMintUser,
}

#[derive(Debug, Serialize)]
struct WireMintUser {
    wallet: String,
    /// The registry expects the field even when no email was supplied.
    email: String,
}

impl WireMintRequest {
    pub(super) fn from_canonical(request: &MintRequest) -> Self {
        Self {
            sld: request.name.label().as_str().to_owned(),
            tld: request.name.tld().as_str().to_owned(),
            user: WireMintUser {
                wallet: request.wallet.as_str().to_owned(),
                email: request
                    .email
                    .as_ref()
                    .map(|e| e.as_str().to_owned())
                    .unwrap_or_default(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireMintResponse {
    #[serde(alias = "id")]
    token_id: String,
    chain_id: u64,
    contract_address: String,
}

impl WireMintResponse {
    pub(super) fn into_canonical(self) -> MintReceipt {
        MintReceipt {
            token_id: self.token_id,
            chain_id: self.chain_id,
            contract_address: self.contract_address,
        }
    }
}

// =============================================================================
// Token metadata
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireTokenMetadata {
    name: String,
    owner: String,
    chain_id: u64,
    contract_address: String,
    token_id: String,
    status: String,
    expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl WireTokenMetadata {
    pub(super) fn into_canonical(self) -> TokenMetadata {
        TokenMetadata {
            name: self.name,
            owner: self.owner,
            chain_id: self.chain_id,
            contract_address: self.contract_address,
            token_id: self.token_id,
            status: self.status,
            expires_at: self.expires_at,
        }
    }
}

/// Build the query string pairs for a search-style endpoint.
pub(super) fn search_query(name: &NameKey, limit: Option<u32>) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("sld", name.label().as_str().to_owned()),
        ("tld", name.tld().as_str().to_owned()),
    ];
    if let Some(limit) = limit {
        query.push(("limit", limit.to_string()));
    }
    query
}

/// Build the query string pairs for the payment options endpoint.
pub(super) fn payment_options_query(tld: Option<&Tld>) -> Vec<(&'static str, String)> {
    tld.map(|t| vec![("tld", t.as_str().to_owned())])
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_search(value: serde_json::Value) -> Vec<NameAvailability> {
        let response: SearchResponse = serde_json::from_value(value).unwrap();
        response.into_availabilities()
    }

    #[test]
    fn test_bare_array_shape() {
        let items = parse_search(json!([
            {"sld": "alice", "tld": "core", "status": "available", "usdPrice": "4.99"}
        ]));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name.to_string(), "alice.core");
        assert!(items[0].is_available());
        assert_eq!(items[0].price_usd.unwrap().to_string(), "4.99");
    }

    #[test]
    fn test_page_items_shape() {
        let items = parse_search(json!({
            "pageItems": [
                {"sld": "alice", "tld": "core", "status": "registered",
                 "nativeAmount": "12.5", "currency": "CORE", "clickUrl": "https://example.test/buy"}
            ]
        }));
        assert_eq!(items.len(), 1);
        assert!(!items[0].is_available());
        assert_eq!(items[0].price_native.unwrap().to_string(), "12.5");
        assert_eq!(items[0].native_currency.as_deref(), Some("CORE"));
        assert_eq!(
            items[0].external_action_url.as_deref(),
            Some("https://example.test/buy")
        );
    }

    #[test]
    fn test_results_shape_with_legacy_item_fields() {
        let items = parse_search(json!({
            "results": [
                {"name": "alice.core", "available": true, "price": "4.99", "currency": "USD"}
            ]
        }));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name.to_string(), "alice.core");
        assert!(items[0].is_available());
    }

    #[test]
    fn test_available_bool_wins_over_status_string() {
        let items = parse_search(json!([
            {"sld": "a", "tld": "core", "available": false, "status": "available"}
        ]));
        assert!(!items[0].is_available());
    }

    #[test]
    fn test_unkeyable_items_are_dropped() {
        let items = parse_search(json!([
            {"status": "available"},
            {"name": "UPPER CASE.core", "available": true},
            {"sld": "ok", "tld": "core", "available": true}
        ]));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name.to_string(), "ok.core");
    }

    #[test]
    fn test_item_without_availability_signal_is_dropped() {
        let items = parse_search(json!([
            {"sld": "alice", "tld": "core", "usdPrice": "4.99"}
        ]));
        assert!(items.is_empty());
    }

    #[test]
    fn test_payment_options_both_shapes() {
        let wrapped: PaymentOptionsResponse = serde_json::from_value(json!({
            "options": [
                {"chainId": 1116, "contractAddress": "0xabc", "tokenAddress": "0x0",
                 "symbol": "CORE", "price": "10"}
            ]
        }))
        .unwrap();
        let bare: PaymentOptionsResponse = serde_json::from_value(json!([
            {"chainId": 1, "contractAddress": "0xdef", "symbol": "ETH", "unitPrice": "0.002"}
        ]))
        .unwrap();

        let wrapped = wrapped.into_options();
        assert_eq!(wrapped.len(), 1);
        assert_eq!(wrapped[0].chain_id, 1116);

        let bare = bare.into_options();
        assert_eq!(bare[0].symbol, "ETH");
        assert_eq!(bare[0].token_address, "");
        assert_eq!(bare[0].unit_price.to_string(), "0.002");
    }

    #[test]
    fn test_order_request_serialization() {
        let request = OrderRequest {
            payment: PaymentOption {
                chain_id: 1116,
                contract_address: "0xabc".to_owned(),
                token_address: "0x0".to_owned(),
                symbol: "CORE".to_owned(),
                unit_price: "10".parse().unwrap(),
            },
            buyer: nameport_core::WalletAddress::parse_evm(
                "0x36de81e06e59b9674e985b00ba05acbb96d4f1a3",
            )
            .unwrap(),
            names: vec![super::super::types::OrderName {
                name: NameKey::parse("alice.core").unwrap(),
                auto_renew: true,
            }],
        };

        let wire = WireOrderRequest::from_canonical(&request);
        let value = serde_json::to_value(&wire).unwrap();
        assert_eq!(value["paymentOption"]["chainId"], 1116);
        assert_eq!(value["names"][0]["sld"], "alice");
        assert_eq!(value["names"][0]["autoRenew"], true);
        assert_eq!(value["names"][0]["domainLength"], 5);
    }

    #[test]
    fn test_mint_request_sends_empty_email_when_absent() {
        let request = MintRequest {
            name: NameKey::parse("alice.core").unwrap(),
            wallet: nameport_core::WalletAddress::parse_evm(
                "0x36de81e06e59b9674e985b00ba05acbb96d4f1a3",
            )
            .unwrap(),
            email: None,
        };
        let value = serde_json::to_value(WireMintRequest::from_canonical(&request)).unwrap();
        assert_eq!(value["user"]["email"], "");
    }

    #[test]
    fn test_token_metadata_parses_expiry() {
        let wire: WireTokenMetadata = serde_json::from_value(json!({
            "name": "alice.core",
            "owner": "0x36de81e06e59b9674e985b00ba05acbb96d4f1a3",
            "chainId": 1116,
            "contractAddress": "0xabc",
            "tokenId": "42",
            "status": "active",
            "expiresAt": "2027-01-01T00:00:00Z"
        }))
        .unwrap();
        let metadata = wire.into_canonical();
        assert_eq!(metadata.token_id, "42");
        assert!(metadata.expires_at.is_some());
        assert_eq!(metadata.name_key().unwrap().to_string(), "alice.core");
    }
}

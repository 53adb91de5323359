//! Name-registry API client.
//!
//! # Architecture
//!
//! - `reqwest` + JSON against the registrar's partner API; a static partner
//!   key authenticates every request (not user-specific)
//! - In-memory caching via `moka` for idempotent reads (availability,
//!   recommendations, payment options); orders and mints are never cached
//! - [`wire`] absorbs response-shape drift; the rest of the crate only sees
//!   the canonical models in [`types`]
//!
//! # Example
//!
//! ```rust,ignore
//! use nameport_client::registrar::{RegistrarApi, RegistrarClient};
//!
//! let client = RegistrarClient::new(&config);
//! let snapshots = client.search(&"alice.core".parse()?, 1).await?;
//! ```

pub mod types;
mod wire;

pub use types::{
    AvailabilityStatus, MintReceipt, MintRequest, NameAvailability, OrderName, OrderReceipt,
    OrderRequest, PaymentOption, TokenMetadata,
};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use nameport_core::{NameKey, Tld, WalletAddress};

use crate::config::NameportConfig;

/// Header carrying the static partner credential.
const API_KEY_HEADER: &str = "Api-Key";

/// How long idempotent reads stay cached. Availability is priced data, so
/// this is deliberately shorter than a typical catalog cache.
const CACHE_TTL: Duration = Duration::from_secs(60);

/// Errors that can occur when talking to the registry API.
#[derive(Debug, Error)]
pub enum RegistrarError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the registry.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The registry rejected the request.
    #[error("Registry error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
}

/// The registry operations this client consumes.
///
/// The resolution service and registration pipeline depend on this trait so
/// they can be exercised against in-memory fakes.
#[async_trait]
pub trait RegistrarApi: Send + Sync {
    /// Availability snapshots for a name.
    async fn search(
        &self,
        name: &NameKey,
        limit: u32,
    ) -> Result<Vec<NameAvailability>, RegistrarError>;

    /// Similar-name suggestions with their own availability snapshots.
    async fn recommendations(
        &self,
        name: &NameKey,
    ) -> Result<Vec<NameAvailability>, RegistrarError>;

    /// Payment routes, optionally scoped to one TLD.
    async fn payment_options(
        &self,
        tld: Option<&Tld>,
    ) -> Result<Vec<PaymentOption>, RegistrarError>;

    /// Submit an order for one or more names.
    async fn create_order(&self, request: &OrderRequest) -> Result<OrderReceipt, RegistrarError>;

    /// Mint the token for a name.
    async fn mint(&self, request: &MintRequest) -> Result<MintReceipt, RegistrarError>;

    /// Ownership/expiry snapshot for a name.
    async fn token_metadata(&self, name: &NameKey) -> Result<TokenMetadata, RegistrarError>;

    /// Ownership/expiry snapshot by on-chain coordinates.
    async fn token_metadata_by_id(
        &self,
        chain_id: u64,
        contract_address: &str,
        token_id: &str,
    ) -> Result<TokenMetadata, RegistrarError>;

    /// Every token currently held by a wallet.
    async fn tokens_by_wallet(
        &self,
        wallet: &WalletAddress,
    ) -> Result<Vec<TokenMetadata>, RegistrarError>;
}

/// Cached value for idempotent registrar reads.
#[derive(Clone)]
enum CacheValue {
    Availability(Vec<NameAvailability>),
    PaymentOptions(Vec<PaymentOption>),
}

/// Client for the name-registry partner API.
///
/// Cheap to clone; the HTTP connection pool and cache are shared.
#[derive(Clone)]
pub struct RegistrarClient {
    inner: Arc<RegistrarClientInner>,
}

struct RegistrarClientInner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    cache: Cache<String, CacheValue>,
}

impl RegistrarClient {
    /// Create a new registry API client.
    #[must_use]
    pub fn new(config: &NameportConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(RegistrarClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_base_url.trim_end_matches('/').to_owned(),
                api_key: config.api_key.expose_secret().to_owned(),
                cache,
            }),
        }
    }

    /// Invalidate all cached reads.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, RegistrarError> {
        let response = self
            .inner
            .client
            .get(format!("{}{path}", self.inner.base_url))
            .header(API_KEY_HEADER, &self.inner.api_key)
            .query(query)
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RegistrarError> {
        let response = self
            .inner
            .client
            .post(format!("{}{path}", self.inner.base_url))
            .header(API_KEY_HEADER, &self.inner.api_key)
            .json(body)
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, RegistrarError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(RegistrarError::RateLimited(retry_after));
        }

        // Read the body as text first for better error diagnostics
        let response_text = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistrarError::NotFound(truncate(&response_text, 200)));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate(&response_text, 500),
                "Registry API returned non-success status"
            );
            return Err(RegistrarError::Api {
                status: status.as_u16(),
                message: truncate(&response_text, 200),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&response_text, 500),
                "Failed to parse registry response"
            );
            RegistrarError::Parse(e)
        })
    }
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[async_trait]
impl RegistrarApi for RegistrarClient {
    #[instrument(skip(self), fields(name = %name))]
    async fn search(
        &self,
        name: &NameKey,
        limit: u32,
    ) -> Result<Vec<NameAvailability>, RegistrarError> {
        let cache_key = format!("search:{name}:{limit}");

        if let Some(CacheValue::Availability(items)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for search");
            return Ok(items);
        }

        let response: wire::SearchResponse = self
            .get_json("/partner/search", &wire::search_query(name, Some(limit)))
            .await?;
        let items = response.into_availabilities();

        self.inner
            .cache
            .insert(cache_key, CacheValue::Availability(items.clone()))
            .await;

        Ok(items)
    }

    #[instrument(skip(self), fields(name = %name))]
    async fn recommendations(
        &self,
        name: &NameKey,
    ) -> Result<Vec<NameAvailability>, RegistrarError> {
        let cache_key = format!("recommendations:{name}");

        if let Some(CacheValue::Availability(items)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for recommendations");
            return Ok(items);
        }

        let response: wire::SearchResponse = self
            .get_json("/partner/recommendations", &wire::search_query(name, None))
            .await?;
        let items = response.into_availabilities();

        self.inner
            .cache
            .insert(cache_key, CacheValue::Availability(items.clone()))
            .await;

        Ok(items)
    }

    #[instrument(skip(self))]
    async fn payment_options(
        &self,
        tld: Option<&Tld>,
    ) -> Result<Vec<PaymentOption>, RegistrarError> {
        let cache_key = format!(
            "options:{}",
            tld.map_or_else(|| "*".to_owned(), |t| t.as_str().to_owned())
        );

        if let Some(CacheValue::PaymentOptions(options)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for payment options");
            return Ok(options);
        }

        let response: wire::PaymentOptionsResponse = self
            .get_json("/partner/payment/options", &wire::payment_options_query(tld))
            .await?;
        let options = response.into_options();

        self.inner
            .cache
            .insert(cache_key, CacheValue::PaymentOptions(options.clone()))
            .await;

        Ok(options)
    }

    #[instrument(skip(self, request), fields(buyer = %request.buyer))]
    async fn create_order(&self, request: &OrderRequest) -> Result<OrderReceipt, RegistrarError> {
        let body = wire::WireOrderRequest::from_canonical(request);
        let response: wire::WireOrderResponse = self.post_json("/partner/order", &body).await?;
        Ok(response.into_canonical())
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    async fn mint(&self, request: &MintRequest) -> Result<MintReceipt, RegistrarError> {
        let body = wire::WireMintRequest::from_canonical(request);
        let response: wire::WireMintResponse = self.post_json("/partner/mint", &body).await?;
        Ok(response.into_canonical())
    }

    #[instrument(skip(self), fields(name = %name))]
    async fn token_metadata(&self, name: &NameKey) -> Result<TokenMetadata, RegistrarError> {
        let response: wire::WireTokenMetadata = self
            .get_json(
                &format!("/partner/token/{}/{}", name.label(), name.tld()),
                &[],
            )
            .await?;
        Ok(response.into_canonical())
    }

    #[instrument(skip(self))]
    async fn token_metadata_by_id(
        &self,
        chain_id: u64,
        contract_address: &str,
        token_id: &str,
    ) -> Result<TokenMetadata, RegistrarError> {
        let response: wire::WireTokenMetadata = self
            .get_json(
                &format!("/partner/token/{chain_id}/{contract_address}/{token_id}"),
                &[],
            )
            .await?;
        Ok(response.into_canonical())
    }

    #[instrument(skip(self), fields(wallet = %wallet))]
    async fn tokens_by_wallet(
        &self,
        wallet: &WalletAddress,
    ) -> Result<Vec<TokenMetadata>, RegistrarError> {
        let response: Vec<wire::WireTokenMetadata> = self
            .get_json(&format!("/partner/tokens/wallet/{wallet}"), &[])
            .await?;
        Ok(response
            .into_iter()
            .map(wire::WireTokenMetadata::into_canonical)
            .collect())
    }
}

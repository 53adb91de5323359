//! Bidirectional name/address resolution.
//!
//! Forward resolution (name to address) is gated by registrar availability:
//! a name the registry still sells cannot have an owner, so a definitive
//! `available` answer short-circuits without touching the resolution
//! backend. Reverse resolution (address to name) goes straight to the
//! backend.
//!
//! The backend itself (chain lookups, registry contracts) is behind the
//! [`ResolutionBackend`] trait; this crate only orchestrates.

pub mod batch;

pub use batch::{
    BatchDirection, BatchError, BatchRequest, NoProgress, ProgressSink, MAX_BATCH_INPUTS,
};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use nameport_core::{AddressError, LabelError, NameKey, Network, WalletAddress};

use crate::registrar::RegistrarApi;

/// Transport-level failure from the resolution backend.
///
/// "Could not look up" only; "looked up, found nothing" is `Ok(None)`.
#[derive(Debug, Error)]
#[error("resolution backend error: {0}")]
pub struct BackendError(pub String);

/// The external lookup capability the service forwards to.
#[async_trait]
pub trait ResolutionBackend: Send + Sync {
    /// Address currently bound to `name` on `network`, if any.
    async fn resolve(
        &self,
        name: &NameKey,
        network: Network,
    ) -> Result<Option<String>, BackendError>;

    /// Primary name currently bound to `address` on `network`, if any.
    async fn reverse_resolve(
        &self,
        address: &WalletAddress,
        network: Network,
    ) -> Result<Option<String>, BackendError>;
}

/// Classification of a resolution failure, for batch reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    /// The input never left validation.
    Validation,
    /// The name is still purchasable, so it has no owner.
    NotRegistered,
    /// No name is bound to the address.
    NotFound,
    /// The name is registered but the backend returned no address.
    ResolutionFailed,
    /// Transport failure talking to the backend.
    Network,
}

/// Why a single resolution failed.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid name: {0}")]
    InvalidName(#[from] LabelError),

    #[error("invalid address: {0}")]
    InvalidAddress(#[from] AddressError),

    #[error("{0} is not registered")]
    NotRegistered(NameKey),

    #[error("no name found for this address")]
    NotFound,

    #[error("{0} is registered but did not resolve to an address")]
    ResolutionFailed(NameKey),

    #[error(transparent)]
    Network(#[from] BackendError),
}

impl ResolveError {
    /// The reporting category this error falls into.
    #[must_use]
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::InvalidName(_) | Self::InvalidAddress(_) => OutcomeKind::Validation,
            Self::NotRegistered(_) => OutcomeKind::NotRegistered,
            Self::NotFound => OutcomeKind::NotFound,
            Self::ResolutionFailed(_) => OutcomeKind::ResolutionFailed,
            Self::Network(_) => OutcomeKind::Network,
        }
    }
}

/// The recorded failure inside a batch outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeError {
    kind: OutcomeKind,
    message: String,
}

impl OutcomeError {
    #[must_use]
    pub fn kind(&self) -> OutcomeKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&ResolveError> for OutcomeError {
    fn from(err: &ResolveError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// The result of resolving one input: the raw input plus exactly one of a
/// resolved value or a recorded error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionOutcome {
    input: String,
    result: Result<String, OutcomeError>,
}

impl ResolutionOutcome {
    pub(crate) fn success(input: impl Into<String>, resolved: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            result: Ok(resolved.into()),
        }
    }

    pub(crate) fn failure(input: impl Into<String>, err: &ResolveError) -> Self {
        Self {
            input: input.into(),
            result: Err(OutcomeError::from(err)),
        }
    }

    /// The raw input string as submitted.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn resolved(&self) -> Option<&str> {
        self.result.as_deref().ok()
    }

    #[must_use]
    pub fn error(&self) -> Option<&OutcomeError> {
        self.result.as_ref().err()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Orchestrates single-item resolution over a registrar and a backend.
pub struct ResolutionService<R, B> {
    registrar: R,
    backend: B,
}

impl<R: RegistrarApi, B: ResolutionBackend> ResolutionService<R, B> {
    pub fn new(registrar: R, backend: B) -> Self {
        Self { registrar, backend }
    }

    /// Resolve a name to the address it is bound to on `network`.
    ///
    /// # Errors
    ///
    /// `InvalidName` before any network call; `NotRegistered` when the
    /// registry says the name is still for sale; `ResolutionFailed` when the
    /// backend knows no binding; `Network` on backend transport failure.
    #[instrument(skip(self))]
    pub async fn resolve_name(&self, name: &str, network: Network) -> Result<String, ResolveError> {
        let key = NameKey::parse(name)?;

        // Only a definitive "available" blocks resolution. A registrar
        // error or an empty answer must not mask a registered name, so we
        // fall through to the backend, which is authoritative for ownership.
        match self.registrar.search(&key, 1).await {
            Ok(snapshots) => {
                if snapshots.iter().any(|s| s.name == key && s.is_available()) {
                    debug!(name = %key, "name is still purchasable, skipping backend");
                    return Err(ResolveError::NotRegistered(key));
                }
            }
            Err(err) => {
                warn!(name = %key, error = %err, "availability check failed, proceeding to backend");
            }
        }

        match self.backend.resolve(&key, network).await? {
            Some(address) => Ok(address),
            None => Err(ResolveError::ResolutionFailed(key)),
        }
    }

    /// Resolve an address to its primary name on `network`.
    ///
    /// # Errors
    ///
    /// `InvalidAddress` before any network call; `NotFound` when no name is
    /// bound; `Network` on backend transport failure.
    #[instrument(skip(self))]
    pub async fn resolve_address(
        &self,
        address: &str,
        network: Network,
    ) -> Result<String, ResolveError> {
        let wallet = WalletAddress::parse_for(address, network)?;

        match self.backend.reverse_resolve(&wallet, network).await? {
            Some(name) => Ok(name),
            None => Err(ResolveError::NotFound),
        }
    }
}

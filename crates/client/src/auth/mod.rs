//! Wallet challenge-response sign-in.
//!
//! The wallet capability (browser extension, embedded signer) sits behind
//! the [`WalletProvider`] trait. The authenticator drives the
//! connect/sign/disconnect lifecycle and is the only writer of the session's
//! identity.
//!
//! The signature is NOT verified here. A relying server must verify it
//! before trusting the session; until then the authenticated state is
//! provisional.

pub mod siwe;

pub use siwe::{SiweMessage, SIGN_IN_STATEMENT};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use nameport_core::WalletAddress;

use crate::config::NameportConfig;
use crate::registrar::{RegistrarApi, RegistrarError};
use crate::session::{Identity, Session};

/// Failures surfaced by a wallet provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// The user declined the signature prompt.
    #[error("signature request rejected")]
    Rejected,

    /// The provider itself failed.
    #[error("wallet provider error: {0}")]
    Provider(String),
}

/// The wallet capability the authenticator drives.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// The currently connected address, if any.
    async fn current_address(&self) -> Option<String>;

    /// Ask the wallet to sign `message`, returning the signature.
    async fn request_signature(&self, message: &str) -> Result<String, WalletError>;

    /// Drop the wallet connection.
    async fn disconnect(&self);
}

/// Where the sign-in lifecycle currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Disconnected,
    Connected,
    Authenticating,
    Authenticated,
}

/// Authentication failures.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no wallet is connected")]
    NotConnected,

    #[error("sign-in rejected by the user")]
    Rejected,

    #[error("wallet provider error: {0}")]
    Provider(String),

    #[error(transparent)]
    Registrar(#[from] RegistrarError),
}

/// Drives wallet connection and challenge-response sign-in.
pub struct WalletAuthenticator<P> {
    provider: P,
    domain: String,
    uri: String,
    chain_id: u64,
    state: AuthState,
    address: Option<String>,
}

impl<P: WalletProvider> WalletAuthenticator<P> {
    /// Build an authenticator over `provider` using the configured sign-in
    /// origin and the default network's chain id.
    #[must_use]
    pub fn new(provider: P, config: &NameportConfig) -> Self {
        Self {
            provider,
            domain: config.app_domain.clone(),
            uri: config.app_uri.clone(),
            // SIWE chain ids are EVM-only; mainnet stands in for the rest.
            chain_id: config.default_network.chain_id().unwrap_or(1),
            state: AuthState::Disconnected,
            address: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state
    }

    /// The connected address, if any.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Pick up the provider's current address.
    ///
    /// # Errors
    ///
    /// `NotConnected` when the provider reports no address.
    #[instrument(skip(self))]
    pub async fn connect(&mut self) -> Result<(), AuthError> {
        match self.provider.current_address().await {
            Some(address) => {
                debug!(%address, "wallet connected");
                self.address = Some(address);
                self.state = AuthState::Connected;
                Ok(())
            }
            None => {
                self.state = AuthState::Disconnected;
                self.address = None;
                Err(AuthError::NotConnected)
            }
        }
    }

    /// Run the challenge-response sign-in and install the identity into
    /// `session` on success.
    ///
    /// A fresh challenge (new nonce, new timestamp) is built on every call.
    /// Any failure clears the session, disconnects the provider, and drops
    /// back to `Disconnected`.
    ///
    /// # Errors
    ///
    /// `NotConnected` when no wallet is connected; `Rejected` when the user
    /// declines; `Provider` when the wallet or its address is unusable.
    #[instrument(skip(self, session))]
    pub async fn sign_in(&mut self, session: &mut Session) -> Result<(), AuthError> {
        let Some(address) = self.address.clone() else {
            return Err(AuthError::NotConnected);
        };

        self.state = AuthState::Authenticating;
        let challenge = SiweMessage::new(&self.domain, &self.uri, &address, self.chain_id);

        let outcome = match self.provider.request_signature(&challenge.to_message()).await {
            // The signature is verified server-side, not here; see module
            // docs. The address still has to be one we can key a session by.
            Ok(_signature) => WalletAddress::parse_evm(&address).map_err(|e| {
                AuthError::Provider(format!("provider returned an unusable address: {e}"))
            }),
            Err(WalletError::Rejected) => Err(AuthError::Rejected),
            Err(WalletError::Provider(msg)) => Err(AuthError::Provider(msg)),
        };

        match outcome {
            Ok(wallet) => {
                session.set_identity(Identity::new(wallet));
                self.state = AuthState::Authenticated;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "sign-in failed, disconnecting");
                session.clear();
                self.provider.disconnect().await;
                self.state = AuthState::Disconnected;
                self.address = None;
                Err(err)
            }
        }
    }

    /// Reconcile with the provider: an external disconnect (wallet UI,
    /// another tab) drops the session from any state.
    #[instrument(skip(self, session))]
    pub async fn sync(&mut self, session: &mut Session) {
        if self.provider.current_address().await.is_none()
            && self.state != AuthState::Disconnected
        {
            debug!("wallet disconnected externally");
            session.clear();
            self.state = AuthState::Disconnected;
            self.address = None;
        }
    }

    /// Sign out: clear the session and disconnect the wallet.
    #[instrument(skip(self, session))]
    pub async fn sign_out(&mut self, session: &mut Session) {
        session.clear();
        self.provider.disconnect().await;
        self.state = AuthState::Disconnected;
        self.address = None;
    }
}

/// Populate the identity's known-names list from the registry.
///
/// Failure is non-fatal: sign-in stands, the list just stays as it was.
#[instrument(skip(registrar, session))]
pub async fn hydrate_registered_names<R: RegistrarApi>(registrar: &R, session: &mut Session) {
    let Some(identity) = session.identity_mut() else {
        return;
    };
    let wallet = identity.wallet().clone();

    match registrar.tokens_by_wallet(&wallet).await {
        Ok(tokens) => {
            for name in tokens.iter().filter_map(crate::registrar::TokenMetadata::name_key) {
                identity.add_registered_name(name);
            }
        }
        Err(err) => {
            warn!(error = %err, "could not hydrate registered names");
        }
    }
}

//! Name-registration pipeline.
//!
//! A five-stage state machine over one registration attempt:
//! availability check, payment-option fetch, option selection, order, mint.
//! Stages only advance on success; any stage failure parks the attempt in
//! `Failed` with the stage that broke. Wrong-state calls are rejected
//! without changing state, so a UI can wire buttons straight to these
//! methods.
//!
//! The pipeline owns nothing durable. It never mutates the session except
//! to append the freshly minted name to the identity's known-names list.

use thiserror::Error;
use tracing::{debug, instrument, warn};

use nameport_core::{LabelError, NameKey};

use crate::registrar::{
    MintReceipt, MintRequest, NameAvailability, OrderName, OrderReceipt, OrderRequest,
    PaymentOption, RegistrarApi, RegistrarError,
};
use crate::session::Session;

/// The stage a registration attempt failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Availability,
    PaymentOptions,
    Order,
    Mint,
}

/// Where the current attempt stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegistrationState {
    #[default]
    Idle,
    CheckingAvailability,
    Available,
    Unavailable,
    AwaitingPaymentSelection,
    PaymentSelected,
    OrderPlaced,
    Minted,
    Failed(FailureKind),
}

/// Why a pipeline operation was refused or an attempt failed.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid name: {0}")]
    Validation(#[from] LabelError),

    #[error("{operation} is not valid in state {state:?}")]
    InvalidState {
        operation: &'static str,
        state: RegistrationState,
    },

    #[error("sign in before placing an order")]
    NotAuthenticated,

    #[error("no payment option at index {0}")]
    InvalidSelection(usize),

    #[error(transparent)]
    Registrar(#[from] RegistrarError),
}

/// Everything cached for the attempt in flight. Dropped wholesale whenever
/// a new availability check starts; stale data from a prior name must never
/// survive into the next attempt.
#[derive(Debug, Default)]
struct Attempt {
    name: Option<NameKey>,
    availability: Option<NameAvailability>,
    recommendations: Vec<NameAvailability>,
    payment_options: Vec<PaymentOption>,
    selection: Option<usize>,
    order: Option<OrderReceipt>,
    mint: Option<MintReceipt>,
}

/// Drives one name through availability, payment, order, and mint.
pub struct RegistrationPipeline<R> {
    registrar: R,
    state: RegistrationState,
    attempt: Attempt,
    auto_renew: bool,
}

impl<R: RegistrarApi> RegistrationPipeline<R> {
    #[must_use]
    pub fn new(registrar: R) -> Self {
        Self {
            registrar,
            state: RegistrationState::Idle,
            attempt: Attempt::default(),
            auto_renew: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> RegistrationState {
        self.state
    }

    /// The name under registration, once an attempt has started.
    #[must_use]
    pub fn name(&self) -> Option<&NameKey> {
        self.attempt.name.as_ref()
    }

    /// The availability snapshot from the current attempt's check.
    #[must_use]
    pub fn availability(&self) -> Option<&NameAvailability> {
        self.attempt.availability.as_ref()
    }

    /// Similar-name suggestions fetched alongside an available result.
    #[must_use]
    pub fn recommendations(&self) -> &[NameAvailability] {
        &self.attempt.recommendations
    }

    /// Payment options fetched for the current attempt.
    #[must_use]
    pub fn payment_options(&self) -> &[PaymentOption] {
        &self.attempt.payment_options
    }

    /// The chosen payment option, once selected.
    #[must_use]
    pub fn selected_option(&self) -> Option<&PaymentOption> {
        self.attempt
            .selection
            .and_then(|i| self.attempt.payment_options.get(i))
    }

    #[must_use]
    pub fn order_receipt(&self) -> Option<&OrderReceipt> {
        self.attempt.order.as_ref()
    }

    #[must_use]
    pub fn mint_receipt(&self) -> Option<&MintReceipt> {
        self.attempt.mint.as_ref()
    }

    /// Whether orders placed by this pipeline request auto-renewal.
    pub fn set_auto_renew(&mut self, auto_renew: bool) {
        self.auto_renew = auto_renew;
    }

    /// Discard the attempt and return to `Idle`.
    pub fn reset(&mut self) {
        self.attempt = Attempt::default();
        self.state = RegistrationState::Idle;
    }

    /// Start a new attempt for `label.tld`. Allowed from any state; all
    /// data from a previous attempt is discarded first.
    ///
    /// Recommendations are fetched only for available names with labels of
    /// three or more characters, and their failure never fails the check.
    ///
    /// # Errors
    ///
    /// `Validation` before any network call; `Registrar` when the search
    /// itself fails (state parks in `Failed(Availability)`).
    #[instrument(skip(self))]
    pub async fn check_availability(
        &mut self,
        label: &str,
        tld: &str,
    ) -> Result<(), PipelineError> {
        self.reset();

        let name = NameKey::parse(&format!("{label}.{tld}"))?;
        self.state = RegistrationState::CheckingAvailability;

        let snapshots = match self.registrar.search(&name, 1).await {
            Ok(snapshots) => snapshots,
            Err(err) => {
                self.state = RegistrationState::Failed(FailureKind::Availability);
                self.attempt.name = Some(name);
                return Err(err.into());
            }
        };

        // An answer that does not mention the name counts as unavailable.
        let snapshot = snapshots.into_iter().find(|s| s.name == name);
        let available = snapshot.as_ref().is_some_and(NameAvailability::is_available);

        if available && name.label().len() >= 3 {
            match self.registrar.recommendations(&name).await {
                Ok(recommendations) => self.attempt.recommendations = recommendations,
                Err(err) => {
                    warn!(error = %err, "recommendations fetch failed, continuing without");
                }
            }
        }

        self.attempt.name = Some(name);
        self.attempt.availability = snapshot;
        self.state = if available {
            RegistrationState::Available
        } else {
            RegistrationState::Unavailable
        };
        debug!(state = ?self.state, "availability check finished");
        Ok(())
    }

    /// Fetch the payment options for the attempt's TLD.
    ///
    /// # Errors
    ///
    /// `InvalidState` outside `Available`; `Registrar` on fetch failure
    /// (state parks in `Failed(PaymentOptions)`).
    #[instrument(skip(self))]
    pub async fn request_payment_options(&mut self) -> Result<(), PipelineError> {
        if self.state != RegistrationState::Available {
            return Err(PipelineError::InvalidState {
                operation: "request_payment_options",
                state: self.state,
            });
        }
        let tld = self.attempt.name.as_ref().map(|n| n.tld().clone());

        match self.registrar.payment_options(tld.as_ref()).await {
            Ok(options) => {
                self.attempt.payment_options = options;
                self.state = RegistrationState::AwaitingPaymentSelection;
                Ok(())
            }
            Err(err) => {
                self.state = RegistrationState::Failed(FailureKind::PaymentOptions);
                Err(err.into())
            }
        }
    }

    /// Choose one of the fetched payment options. Pure; no I/O.
    ///
    /// # Errors
    ///
    /// `InvalidState` outside `AwaitingPaymentSelection`; `InvalidSelection`
    /// for an out-of-range index (state unchanged).
    pub fn select_payment_option(&mut self, index: usize) -> Result<(), PipelineError> {
        if self.state != RegistrationState::AwaitingPaymentSelection {
            return Err(PipelineError::InvalidState {
                operation: "select_payment_option",
                state: self.state,
            });
        }
        if index >= self.attempt.payment_options.len() {
            return Err(PipelineError::InvalidSelection(index));
        }

        self.attempt.selection = Some(index);
        self.state = RegistrationState::PaymentSelected;
        Ok(())
    }

    /// Submit the order for the attempt's name under the session's identity.
    ///
    /// # Errors
    ///
    /// `InvalidState` outside `PaymentSelected`; `NotAuthenticated` without
    /// a signed-in identity; `Registrar` on submission failure (state parks
    /// in `Failed(Order)`, identity untouched).
    #[instrument(skip(self, session))]
    pub async fn place_order(&mut self, session: &Session) -> Result<(), PipelineError> {
        if self.state != RegistrationState::PaymentSelected {
            return Err(PipelineError::InvalidState {
                operation: "place_order",
                state: self.state,
            });
        }
        let identity = session.identity().ok_or(PipelineError::NotAuthenticated)?;
        let (Some(name), Some(payment)) = (self.attempt.name.clone(), self.selected_option())
        else {
            // Unreachable from the state machine, but never panic for it.
            return Err(PipelineError::InvalidState {
                operation: "place_order",
                state: self.state,
            });
        };

        let request = OrderRequest {
            payment: payment.clone(),
            buyer: identity.wallet().clone(),
            names: vec![OrderName {
                name,
                auto_renew: self.auto_renew,
            }],
        };

        match self.registrar.create_order(&request).await {
            Ok(receipt) => {
                debug!(order_id = %receipt.order_id, "order placed");
                self.attempt.order = Some(receipt);
                self.state = RegistrationState::OrderPlaced;
                Ok(())
            }
            Err(err) => {
                self.state = RegistrationState::Failed(FailureKind::Order);
                Err(err.into())
            }
        }
    }

    /// Mint the ordered name to the session's wallet.
    ///
    /// On success the name is appended to the identity's known names. A
    /// mint failure does NOT roll back the placed order; the order id stays
    /// readable for out-of-band recovery.
    ///
    /// # Errors
    ///
    /// `InvalidState` outside `OrderPlaced`; `NotAuthenticated` without a
    /// signed-in identity; `Registrar` on mint failure (state parks in
    /// `Failed(Mint)`).
    #[instrument(skip(self, session))]
    pub async fn mint(&mut self, session: &mut Session) -> Result<(), PipelineError> {
        if self.state != RegistrationState::OrderPlaced {
            return Err(PipelineError::InvalidState {
                operation: "mint",
                state: self.state,
            });
        }
        let identity = session
            .identity_mut()
            .ok_or(PipelineError::NotAuthenticated)?;
        let Some(name) = self.attempt.name.clone() else {
            return Err(PipelineError::InvalidState {
                operation: "mint",
                state: self.state,
            });
        };

        let request = MintRequest {
            name: name.clone(),
            wallet: identity.wallet().clone(),
            email: identity.email().cloned(),
        };

        match self.registrar.mint(&request).await {
            Ok(receipt) => {
                debug!(token_id = %receipt.token_id, "name minted");
                identity.add_registered_name(name);
                self.attempt.mint = Some(receipt);
                self.state = RegistrationState::Minted;
                Ok(())
            }
            Err(err) => {
                self.state = RegistrationState::Failed(FailureKind::Mint);
                Err(err.into())
            }
        }
    }
}

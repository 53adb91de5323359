//! Nameport client library.
//!
//! Workflow logic for a wallet-connected name service client: bidirectional
//! name/address resolution, batch resolution, sign-in-with-wallet, the
//! name-registration pipeline, and the selection cart. Consumed by a UI
//! layer that owns rendering and routing; this crate owns everything that
//! has to stay correct when external services partially fail.
//!
//! # Architecture
//!
//! - [`registrar`] - typed facade over the remote name-registry HTTP API
//! - [`resolve`] - name/address resolution gated by registrar availability,
//!   plus the sequential batch orchestrator
//! - [`auth`] - wallet challenge-response sign-in (SIWE-style)
//! - [`session`] - the owned session context holding the active identity
//! - [`pipeline`] - the availability/payment/order/mint state machine
//! - [`cart`] - idempotent selection set of names to register
//!
//! External collaborators (the resolution backend and the wallet capability)
//! are trait seams so workflows are testable without the network.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod cart;
pub mod config;
pub mod pipeline;
pub mod registrar;
pub mod resolve;
pub mod session;

pub use config::{ConfigError, NameportConfig};
pub use session::{Identity, Session};

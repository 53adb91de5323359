//! Core types for Nameport.
//!
//! This module provides validated wrappers for common domain concepts.

pub mod address;
pub mod email;
pub mod label;
pub mod network;

pub use address::{AddressError, WalletAddress};
pub use email::{Email, EmailError};
pub use label::{Label, LabelError, NameKey, Tld};
pub use network::{Network, UnknownNetwork};

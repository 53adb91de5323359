//! Nameport Core - Shared types library.
//!
//! This crate provides the domain types used across all Nameport components:
//! - `client` - Workflow library consumed by the UI layer
//! - `integration-tests` - HTTP-level tests against a mock registrar
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Every type
//! validates at parse time so the workflow layer never sees a malformed
//! label, address, or email.
//!
//! # Modules
//!
//! - [`types`] - Validated wrappers for names, addresses, emails, and networks

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

//! Owned session context.
//!
//! A [`Session`] is plain state owned by the embedding application and passed
//! `&mut` into the workflows that read or update it. Nothing here is global;
//! two sessions never observe each other.

use nameport_core::{Email, NameKey, WalletAddress};

/// The signed-in user: wallet, optional contact email, and the names the
/// wallet is known to hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    wallet: WalletAddress,
    email: Option<Email>,
    registered_names: Vec<NameKey>,
}

impl Identity {
    /// An identity for a freshly signed-in wallet with no known names.
    #[must_use]
    pub fn new(wallet: WalletAddress) -> Self {
        Self {
            wallet,
            email: None,
            registered_names: Vec::new(),
        }
    }

    #[must_use]
    pub fn wallet(&self) -> &WalletAddress {
        &self.wallet
    }

    #[must_use]
    pub fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    pub fn set_email(&mut self, email: Option<Email>) {
        self.email = email;
    }

    /// Names this wallet is known to hold, in discovery order.
    #[must_use]
    pub fn registered_names(&self) -> &[NameKey] {
        &self.registered_names
    }

    /// Record a name as held by this wallet. Idempotent; returns `true` when
    /// the name was newly recorded.
    pub fn add_registered_name(&mut self, name: NameKey) -> bool {
        if self.registered_names.contains(&name) {
            return false;
        }
        self.registered_names.push(name);
        true
    }

    /// Replace the known-names list wholesale, deduplicated in order.
    pub fn set_registered_names(&mut self, names: Vec<NameKey>) {
        self.registered_names.clear();
        for name in names {
            self.add_registered_name(name);
        }
    }
}

/// Per-user session state. Created empty; populated by sign-in and cleared
/// by sign-out or wallet disconnect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    /// An empty, signed-out session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn identity_mut(&mut self) -> Option<&mut Identity> {
        self.identity.as_mut()
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    /// Install a new identity, replacing any previous one.
    pub fn set_identity(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    /// Drop the identity. Safe to call on an already-empty session.
    pub fn clear(&mut self) {
        self.identity = None;
    }
}

//! Sign-in challenge text (EIP-4361).
//!
//! The message a wallet signs to prove control of an address. The exact
//! layout matters: wallets render it verbatim, and verifiers re-derive it
//! byte for byte.

use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;

/// Statement line shown to the user inside the wallet prompt.
pub const SIGN_IN_STATEMENT: &str = "Sign in to Nameport with your wallet";

const NONCE_LENGTH: usize = 17;

/// A ready-to-sign challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiweMessage {
    pub domain: String,
    pub address: String,
    pub statement: String,
    pub uri: String,
    pub chain_id: u64,
    pub nonce: String,
    pub issued_at: DateTime<Utc>,
}

impl SiweMessage {
    /// Build a challenge with a fresh nonce and the current timestamp.
    #[must_use]
    pub fn new(domain: &str, uri: &str, address: &str, chain_id: u64) -> Self {
        Self {
            domain: domain.to_owned(),
            address: address.to_owned(),
            statement: SIGN_IN_STATEMENT.to_owned(),
            uri: uri.to_owned(),
            chain_id,
            nonce: generate_nonce(),
            issued_at: Utc::now(),
        }
    }

    /// Render the EIP-4361 message text.
    #[must_use]
    pub fn to_message(&self) -> String {
        format!(
            "{} wants you to sign in with your Ethereum account:\n\
             {}\n\
             \n\
             {}\n\
             \n\
             URI: {}\n\
             Version: 1\n\
             Chain ID: {}\n\
             Nonce: {}\n\
             Issued At: {}",
            self.domain,
            self.address,
            self.statement,
            self.uri,
            self.chain_id,
            self.nonce,
            self.issued_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        )
    }
}

/// A fresh 17-character alphanumeric nonce. Never reused across attempts.
#[must_use]
pub fn generate_nonce() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> SiweMessage {
        SiweMessage::new(
            "app.nameport.id",
            "https://app.nameport.id",
            "0x36de81e06e59b9674e985b00ba05acbb96d4f1a3",
            1116,
        )
    }

    #[test]
    fn test_message_layout() {
        let msg = message();
        let text = msg.to_message();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "app.nameport.id wants you to sign in with your Ethereum account:"
        );
        assert_eq!(lines[1], "0x36de81e06e59b9674e985b00ba05acbb96d4f1a3");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], SIGN_IN_STATEMENT);
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "URI: https://app.nameport.id");
        assert_eq!(lines[6], "Version: 1");
        assert_eq!(lines[7], "Chain ID: 1116");
        assert!(lines[8].starts_with("Nonce: "));
        assert!(lines[9].starts_with("Issued At: "));
    }

    #[test]
    fn test_nonce_shape() {
        let nonce = generate_nonce();
        assert_eq!(nonce.len(), 17);
        assert!(nonce.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_fresh_nonce_per_message() {
        assert_ne!(message().nonce, message().nonce);
    }
}

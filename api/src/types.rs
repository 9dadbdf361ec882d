//! Chain data types shared by the api and ui crates.

use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Number of bytes in an ed25519 public key.
const PUBKEY_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("wallet address is empty")]
    Empty,
    #[error("wallet address is not valid base58: {0}")]
    InvalidBase58(String),
    #[error("wallet address decodes to {0} bytes, expected 32")]
    InvalidLength(usize),
}

/// The public identity of a connected wallet.
///
/// The value is opaque to the UI: it is only displayed and passed to the
/// chain connection. Identities handed over by a wallet are trusted as-is via
/// [`WalletIdentity::new`], user input goes through [`WalletIdentity::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletIdentity(String);

impl WalletIdentity {
    pub fn new(base58: impl Into<String>) -> Self {
        Self(base58.into())
    }

    /// Validates a user-supplied address as a base58 encoded 32 byte key.
    pub fn parse(input: &str) -> Result<Self, IdentityError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(IdentityError::Empty);
        }
        let decoded = bs58::decode(trimmed)
            .into_vec()
            .map_err(|e| IdentityError::InvalidBase58(e.to_string()))?;
        if decoded.len() != PUBKEY_LEN {
            return Err(IdentityError::InvalidLength(decoded.len()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for WalletIdentity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A base58 transaction signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    pub fn new(base58: impl Into<String>) -> Self {
        Self(base58.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of a `getSignaturesForAddress` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInfo {
    pub signature: Signature,
    pub slot: u64,
    #[serde(default)]
    pub err: Option<serde_json::Value>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub confirmation_status: Option<String>,
}

/// The signed part of a parsed transaction. Only the signatures are kept.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedTransaction {
    #[serde(default)]
    pub signatures: Vec<Signature>,
}

/// Execution status metadata of a confirmed transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMeta {
    #[serde(default)]
    pub fee: u64,
    #[serde(default)]
    pub err: Option<serde_json::Value>,
}

/// A transaction as returned by `getTransaction` with `jsonParsed` encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub slot: u64,
    /// Seconds since the unix epoch, if the node knows it.
    #[serde(default)]
    pub block_time: Option<i64>,
    pub transaction: ParsedTransaction,
    #[serde(default)]
    pub meta: Option<TransactionMeta>,
}

impl TransactionRecord {
    pub fn first_signature(&self) -> Option<&Signature> {
        self.transaction.signatures.first()
    }
}

/// Recent transactions of a wallet, newest first.
pub type TransactionList = Vec<TransactionRecord>;

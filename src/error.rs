//! Error types for faucet page operations.
//!
//! Setup failures are fatal and surface as [`FaucetError`]. Everything that can go
//! wrong after setup is one of the kind enumerations below; the pages turn those into
//! status messages instead of propagating them.

use thiserror::Error;

/// Errors that halt page initialization.
#[derive(Debug, Error)]
pub enum FaucetError {
    /// A required configuration value is absent.
    #[error("Missing configuration: {key} is not set")]
    MissingConfig { key: &'static str },
    /// A configuration value is present but unusable.
    #[error("Invalid configuration {key}: {reason}")]
    InvalidConfig { key: &'static str, reason: String },
    /// Network/RPC setup error
    #[error("Network error: {reason}")]
    Network { reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for setup operations.
pub type Result<T> = core::result::Result<T, FaucetError>;

/// Failures talking to the wallet provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WalletError {
    /// No wallet provider answered.
    #[error("wallet provider unavailable: {reason}")]
    ProviderUnavailable { reason: String },
    #[error("request rejected by the user")]
    UserRejected,
    /// The wallet does not know the requested chain.
    #[error("chain {chain_id} is not configured in the wallet")]
    UnknownChain { chain_id: u64 },
    /// Another permission request is already open in the wallet.
    #[error("a wallet request is already pending")]
    RequestPending,
    #[error("wallet returned no accounts")]
    NoAccounts,
    #[error("{message}")]
    Other { message: String },
}

/// A balance read that did not produce a value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReadError {
    #[error("balance read failed: {reason}")]
    Read { reason: String },
}

/// Classified failure of a disbursement transaction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransactionError {
    /// The sending account cannot cover the value or gas.
    #[error("insufficient funds for gas or value")]
    InsufficientFunds,
    /// Execution reverted on chain; `reason` carries the contract's message when supplied.
    #[error("execution reverted{}", revert_suffix(.reason))]
    Reverted { reason: Option<String> },
    /// The wallet user declined to sign.
    #[error("transaction rejected by the user")]
    UserRejected,
    #[error("{message}")]
    Other { message: String },
}

fn revert_suffix(reason: &Option<String>) -> String {
    reason.as_deref().map(|r| format!(": {r}")).unwrap_or_default()
}

impl TransactionError {
    /// Conditions that are expected in steady state and need no operator action
    /// beyond refilling the faucet.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::InsufficientFunds | Self::Reverted { .. })
    }
}

//! Status projector.
//!
//! Maps the latest page event to the single status line shown to the user. Only the
//! last status is kept; each event overwrites it. Every update is also published on
//! a `watch` channel so a renderer can show intermediate states while a request is
//! being awaited.

use ethers::types::TxHash;
use serde::Serialize;
use tokio::sync::watch;

use crate::error::{TransactionError, WalletError};

/// Style of the status region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Info,
    Success,
    Failure,
}

impl StatusTone {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Info => "status",
            Self::Success => "status status-success",
            Self::Failure => "status status-error",
        }
    }
}

/// What the status region shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub message: String,
    pub tone: StatusTone,
}

impl Status {
    fn new(message: impl Into<String>, tone: StatusTone) -> Self {
        Self { message: message.into(), tone }
    }

    pub fn is_success(&self) -> bool {
        self.tone == StatusTone::Success
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::new("", StatusTone::Info)
    }
}

/// Events the pages report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    Connected,
    Disconnected,
    ConnectFailed(WalletError),
    /// The wallet rejected the chain switch with an unknown chain.
    AddNetwork { chain_id: u64 },
    /// Account access was granted but the chain switch failed.
    ChainSwitchFailed { chain_id: u64, error: WalletError },
    BalanceFetchFailed,
    NotConnected,
    InvalidAddress,
    RequestInProgress,
    AlreadyFunded,
    FaucetDepleted,
    Submitted { tx_hash: TxHash },
    Confirmed { tx_hash: TxHash },
    RequestFailed(TransactionError),
}

/// `0x`-prefixed lowercase hex of a transaction hash.
pub fn tx_hash_hex(tx_hash: &TxHash) -> String {
    format!("0x{}", hex::encode(tx_hash.as_bytes()))
}

/// Maps an event to its status line.
pub fn project(event: &StatusEvent) -> Status {
    use StatusTone::*;

    match event {
        StatusEvent::Connected => Status::new("Wallet connected.", Success),
        StatusEvent::Disconnected => Status::new("Wallet disconnected.", Info),
        StatusEvent::ConnectFailed(err) => {
            let message = match err {
                WalletError::ProviderUnavailable { .. } => {
                    "No wallet provider found. Install or start a wallet to continue.".to_string()
                }
                WalletError::UserRejected => "Connection request rejected in the wallet.".to_string(),
                WalletError::UnknownChain { chain_id } => {
                    return project(&StatusEvent::AddNetwork { chain_id: *chain_id })
                }
                WalletError::RequestPending => {
                    "A connection request is already pending. Check your wallet.".to_string()
                }
                WalletError::NoAccounts => "The wallet did not share any account.".to_string(),
                WalletError::Other { message } => format!("Wallet error: {message}"),
            };
            Status::new(message, Failure)
        }
        StatusEvent::AddNetwork { chain_id } => Status::new(
            format!("Please add the network (chain id {chain_id}) to your wallet."),
            Failure,
        ),
        StatusEvent::ChainSwitchFailed { chain_id, error } => {
            let message = match error {
                WalletError::UnknownChain { .. } => {
                    return project(&StatusEvent::AddNetwork { chain_id: *chain_id })
                }
                WalletError::UserRejected => format!(
                    "Wallet connected, but the switch to chain {chain_id} was rejected. Switch networks in your wallet."
                ),
                other => format!("Wallet connected, but switching to chain {chain_id} failed: {other}"),
            };
            Status::new(message, Failure)
        }
        StatusEvent::BalanceFetchFailed => Status::new("Failed to fetch balances.", Failure),
        StatusEvent::NotConnected => Status::new("Connect your wallet first.", Failure),
        StatusEvent::InvalidAddress => Status::new("Please enter a valid address.", Failure),
        StatusEvent::RequestInProgress => Status::new("A request is already in progress.", Info),
        StatusEvent::AlreadyFunded => {
            Status::new("This address already has enough tokens.", Info)
        }
        StatusEvent::FaucetDepleted => {
            Status::new("The faucet is running low. Please try again later.", Failure)
        }
        StatusEvent::Submitted { tx_hash } => Status::new(
            format!("Transaction {} submitted, awaiting confirmation...", tx_hash_hex(tx_hash)),
            Info,
        ),
        StatusEvent::Confirmed { tx_hash } => Status::new(
            format!("Tokens sent! Transaction hash: {}", tx_hash_hex(tx_hash)),
            Success,
        ),
        StatusEvent::RequestFailed(err) => {
            let message = match err {
                TransactionError::InsufficientFunds => {
                    "The faucet is out of funds or gas. Please try again later.".to_string()
                }
                TransactionError::Reverted { reason: None } => {
                    "Transaction reverted: this address was likely already funded or is rate-limited."
                        .to_string()
                }
                TransactionError::Reverted { reason: Some(reason) } => format!(
                    "Transaction reverted: this address was likely already funded or is rate-limited ({reason})."
                ),
                TransactionError::UserRejected => "Transaction rejected in the wallet.".to_string(),
                TransactionError::Other { message } => format!("Request failed: {message}"),
            };
            Status::new(message, Failure)
        }
    }
}

/// Holds the last status and publishes every change.
#[derive(Debug)]
pub struct StatusProjector {
    current: watch::Sender<Status>,
}

impl StatusProjector {
    pub fn new() -> Self {
        let (current, _) = watch::channel(Status::default());
        Self { current }
    }

    /// Overwrites the current status with the projection of `event`.
    pub fn apply(&self, event: StatusEvent) -> Status {
        let status = project(&event);
        self.current.send_replace(status.clone());
        status
    }

    pub fn clear(&self) {
        self.current.send_replace(Status::default());
    }

    pub fn current(&self) -> Status {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Status> {
        self.current.subscribe()
    }
}

impl Default for StatusProjector {
    fn default() -> Self {
        Self::new()
    }
}

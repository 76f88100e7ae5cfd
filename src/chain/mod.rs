//! Chain-facing seams.
//!
//! The pages only see the traits below. The `ethers` implementations live in the
//! submodules; tests plug in in-memory doubles.

mod classify;
mod contracts;
mod rpc;
mod signer;
mod subscription;
mod wallet;

pub use classify::{classify_rpc_error, classify_transaction_error, classify_wallet_error};
pub use rpc::RpcBalanceSource;
pub use signer::KeyDisburser;
pub use subscription::AccountSubscription;
pub use wallet::JsonRpcWallet;

use async_trait::async_trait;
use ethers::types::{Address, TxHash, U256};

use crate::error::{ReadError, TransactionError, WalletError};

/// Read-only balance queries.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    /// `balanceOf(owner)` on the token contract, in base units.
    async fn token_balance(&self, owner: Address) -> Result<U256, ReadError>;

    /// Native currency balance of `owner`, in wei.
    async fn native_balance(&self, owner: Address) -> Result<U256, ReadError>;
}

/// A wallet the user controls (EIP-1193 style).
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Asks the wallet for account access. May prompt the user.
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError>;

    /// Starts delivering account-change notifications. Dropping the returned
    /// subscription unsubscribes.
    fn subscribe_accounts(&self) -> AccountSubscription;
}

/// Parameters of one `disburse(recipient)` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisbursementRequest {
    /// Signing account when the signer holds several (the wallet page); `None` lets
    /// the disburser use its own key.
    pub sender: Option<Address>,
    pub recipient: Address,
    pub gas_limit: u64,
}

/// Something that can send the faucet's state-changing call.
#[async_trait]
pub trait Disburser: Send + Sync {
    /// Signs and broadcasts the call, returning once the node accepted it.
    async fn submit(&self, request: DisbursementRequest) -> Result<TxHash, TransactionError>;

    /// Waits for the inclusion receipt. A mined but failed transaction is a revert.
    async fn confirm(&self, tx_hash: TxHash) -> Result<TxHash, TransactionError>;
}

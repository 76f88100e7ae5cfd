//! Read-only balance source over an HTTP RPC node.

use std::sync::Arc;

use async_trait::async_trait;
use ethers::providers::{Http, Middleware, PendingTransaction, Provider};
use ethers::types::{Address, TxHash, U256, U64};
use tracing::{debug, info, warn};

use super::contracts::TokenContract;
use super::classify::classify_provider_transaction_error;
use super::BalanceSource;
use crate::config::FaucetConfig;
use crate::error::{FaucetError, ReadError, Result, TransactionError};

/// Balance reads against the configured RPC endpoint. Holds no signer.
#[derive(Debug, Clone)]
pub struct RpcBalanceSource {
    provider: Arc<Provider<Http>>,
    token: TokenContract<Provider<Http>>,
}

impl RpcBalanceSource {
    pub fn new(rpc_url: &str, token_address: Address) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url).map_err(|e| FaucetError::Network {
            reason: format!("Invalid RPC URL: {}", e),
        })?;
        let provider = Arc::new(provider);
        let token = TokenContract::new(token_address, provider.clone());
        Ok(Self { provider, token })
    }

    pub fn from_config(config: &FaucetConfig) -> Result<Self> {
        Self::new(&config.rpc_url, config.token_address)
    }
}

#[async_trait]
impl BalanceSource for RpcBalanceSource {
    async fn token_balance(&self, owner: Address) -> core::result::Result<U256, ReadError> {
        debug!(?owner, "reading token balance");
        self.token
            .balance_of(owner)
            .call()
            .await
            .map_err(|e| ReadError::Read { reason: format!("balanceOf failed: {}", e) })
    }

    async fn native_balance(&self, owner: Address) -> core::result::Result<U256, ReadError> {
        debug!(?owner, "reading native balance");
        self.provider
            .get_balance(owner, None)
            .await
            .map_err(|e| ReadError::Read { reason: format!("Failed to get balance: {}", e) })
    }
}

/// Waits for `tx_hash` to be mined. A receipt with failed status counts as a revert.
pub(crate) async fn wait_for_receipt(
    provider: &Provider<Http>,
    tx_hash: TxHash,
) -> core::result::Result<TxHash, TransactionError> {
    let receipt = PendingTransaction::new(tx_hash, provider)
        .await
        .map_err(|e| classify_provider_transaction_error(&e))?
        .ok_or_else(|| TransactionError::Other { message: "Transaction dropped".to_string() })?;

    if receipt.status == Some(U64::zero()) {
        warn!(?tx_hash, "disbursement mined but reverted");
        return Err(TransactionError::Reverted { reason: None });
    }
    info!(?tx_hash, block = ?receipt.block_number, "disbursement confirmed");
    Ok(receipt.transaction_hash)
}

//! Wallet provider reached over JSON-RPC.
//!
//! Desktop wallets such as Frame expose the EIP-1193 request methods on a local HTTP
//! endpoint. Account access, chain switching and signing all happen inside the
//! wallet; this side only issues requests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{Address, TxHash};
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::classify::{classify_provider_transaction_error, classify_provider_wallet_error};
use super::rpc::wait_for_receipt;
use super::contracts::FaucetContract;
use super::{AccountSubscription, DisbursementRequest, Disburser, WalletProvider};
use crate::config::FaucetConfig;
use crate::error::{FaucetError, Result, TransactionError, WalletError};

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// EIP-1193 wallet behind an HTTP JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct JsonRpcWallet {
    provider: Provider<Http>,
    faucet: FaucetContract<Provider<Http>>,
    chain_id: u64,
    poll_interval: Duration,
}

impl JsonRpcWallet {
    pub fn new(wallet_url: &str, faucet_address: Address, chain_id: u64, poll_interval: Duration) -> Result<Self> {
        let provider = Provider::<Http>::try_from(wallet_url).map_err(|e| FaucetError::Network {
            reason: format!("Invalid wallet URL: {}", e),
        })?;
        let faucet = FaucetContract::new(faucet_address, Arc::new(provider.clone()));
        Ok(Self { provider, faucet, chain_id, poll_interval })
    }

    pub fn from_config(config: &FaucetConfig) -> Result<Self> {
        Self::new(
            &config.wallet_rpc_url,
            config.faucet_address,
            config.chain_id,
            config.account_poll_interval,
        )
    }
}

#[async_trait]
impl WalletProvider for JsonRpcWallet {
    async fn request_accounts(&self) -> core::result::Result<Vec<Address>, WalletError> {
        self.provider
            .request::<_, Vec<Address>>("eth_requestAccounts", ())
            .await
            .map_err(|e| classify_provider_wallet_error(&e, self.chain_id))
    }

    async fn switch_chain(&self, chain_id: u64) -> core::result::Result<(), WalletError> {
        let params = [json!({ "chainId": format!("0x{:x}", chain_id) })];
        self.provider
            .request::<_, serde_json::Value>("wallet_switchEthereumChain", params)
            .await
            .map(|_| ())
            .map_err(|e| classify_provider_wallet_error(&e, chain_id))
    }

    /// Polls `eth_accounts` and forwards every change.
    fn subscribe_accounts(&self) -> AccountSubscription {
        let (events, rx) = mpsc::unbounded_channel();
        let provider = self.provider.clone();
        let poll_interval = self.poll_interval;

        let watcher = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval.max(MIN_POLL_INTERVAL));
            let mut last: Option<Vec<Address>> = None;
            loop {
                ticker.tick().await;
                let accounts = match provider.get_accounts().await {
                    Ok(accounts) => accounts,
                    Err(e) => {
                        debug!(error = %e, "account poll failed");
                        continue;
                    }
                };
                // The first answer is the baseline, not a change.
                let changed = last.as_ref().is_some_and(|prev| *prev != accounts);
                if changed {
                    debug!(count = accounts.len(), "wallet accounts changed");
                    if events.send(accounts.clone()).is_err() {
                        break;
                    }
                }
                last = Some(accounts);
            }
        });

        AccountSubscription::new(rx, Some(watcher))
    }
}

#[async_trait]
impl Disburser for JsonRpcWallet {
    async fn submit(&self, request: DisbursementRequest) -> core::result::Result<TxHash, TransactionError> {
        let mut call = self.faucet.disburse(request.recipient).gas(request.gas_limit);
        if let Some(sender) = request.sender {
            call = call.from(sender);
        }
        // Goes out as eth_sendTransaction; the wallet prompts and signs.
        let pending = self
            .provider
            .send_transaction(call.tx, None)
            .await
            .map_err(|e| {
                let kind = classify_provider_transaction_error(&e);
                warn!(recipient = ?request.recipient, error = %e, ?kind, "wallet submission failed");
                kind
            })?;
        let tx_hash = pending.tx_hash();
        info!(?tx_hash, recipient = ?request.recipient, "disbursement submitted through wallet");
        Ok(tx_hash)
    }

    async fn confirm(&self, tx_hash: TxHash) -> core::result::Result<TxHash, TransactionError> {
        wait_for_receipt(&self.provider, tx_hash).await
    }
}

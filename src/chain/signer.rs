//! Key-signed disbursement for the address page.
//!
//! The faucet's own key signs `disburse(recipient)`; nobody on the page holds a wallet.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, TxHash};
use tracing::{info, warn};

use super::classify::classify_transaction_error;
use super::rpc::wait_for_receipt;
use super::contracts::FaucetContract;
use super::{DisbursementRequest, Disburser};
use crate::config::{FaucetConfig, ENV_PRIVATE_KEY};
use crate::error::{FaucetError, Result, TransactionError};

type SigningClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Sends disbursements signed by the configured private key.
pub struct KeyDisburser {
    provider: Provider<Http>,
    faucet: FaucetContract<SigningClient>,
    signer_address: Address,
}

impl KeyDisburser {
    pub fn new(rpc_url: &str, faucet_address: Address, private_key: &str, chain_id: u64) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url).map_err(|e| FaucetError::Network {
            reason: format!("Invalid RPC URL: {}", e),
        })?;
        let wallet = LocalWallet::from_str(private_key.trim_start_matches("0x"))
            .map_err(|e| FaucetError::InvalidConfig {
                key: ENV_PRIVATE_KEY,
                reason: format!("Invalid private key: {}", e),
            })?
            .with_chain_id(chain_id);
        let signer_address = wallet.address();

        let client = Arc::new(SignerMiddleware::new(provider.clone(), wallet));
        let faucet = FaucetContract::new(faucet_address, client);

        Ok(Self { provider, faucet, signer_address })
    }

    /// Fails when the config carries no signing key.
    pub fn from_config(config: &FaucetConfig) -> Result<Self> {
        Self::new(&config.rpc_url, config.faucet_address, config.signing_key()?, config.chain_id)
    }

    /// Account paying gas for every disbursement.
    pub fn signer_address(&self) -> Address {
        self.signer_address
    }
}

#[async_trait]
impl Disburser for KeyDisburser {
    async fn submit(&self, request: DisbursementRequest) -> core::result::Result<TxHash, TransactionError> {
        let call = self.faucet.disburse(request.recipient).gas(request.gas_limit);
        let pending = call.send().await.map_err(|e| {
            let kind = classify_transaction_error(&e);
            warn!(recipient = ?request.recipient, error = %e, ?kind, "disbursement submission failed");
            kind
        })?;
        let tx_hash = pending.tx_hash();
        info!(?tx_hash, recipient = ?request.recipient, "disbursement submitted");
        Ok(tx_hash)
    }

    async fn confirm(&self, tx_hash: TxHash) -> core::result::Result<TxHash, TransactionError> {
        wait_for_receipt(&self.provider, tx_hash).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Anvil's first dev account.
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_signer_address_from_key() {
        let disburser = KeyDisburser::new("http://localhost:8545", Address::zero(), DEV_KEY, 31337).unwrap();
        assert_eq!(
            disburser.signer_address(),
            Address::from_str("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap()
        );
    }

    #[test]
    fn test_invalid_key_rejected() {
        let result = KeyDisburser::new("http://localhost:8545", Address::zero(), "not-a-key", 31337);
        assert!(matches!(result, Err(FaucetError::InvalidConfig { key: ENV_PRIVATE_KEY, .. })));
    }
}

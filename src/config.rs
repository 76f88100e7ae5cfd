//! Page configuration.
//!
//! Loaded once at startup. Anything missing or malformed fails here, before a page
//! is mounted.

use std::str::FromStr;
use std::time::Duration;

use ethers::types::Address;
use zeroize::Zeroizing;

use crate::error::{FaucetError, Result};

pub const ENV_FAUCET_ADDRESS: &str = "FAUCET_CONTRACT_ADDRESS";
pub const ENV_TOKEN_ADDRESS: &str = "TOKEN_CONTRACT_ADDRESS";
pub const ENV_RPC_URL: &str = "FAUCET_RPC_URL";
pub const ENV_CHAIN_ID: &str = "FAUCET_CHAIN_ID";
pub const ENV_PRIVATE_KEY: &str = "FAUCET_PRIVATE_KEY";
pub const ENV_WALLET_RPC_URL: &str = "WALLET_RPC_URL";
pub const ENV_GAS_LIMIT: &str = "FAUCET_GAS_LIMIT";
pub const ENV_ACCOUNT_POLL_MS: &str = "ACCOUNT_POLL_MS";

/// Keys `from_env` refuses to start without. The signing key is checked separately,
/// when a key-signed page is built.
pub const REQUIRED_KEYS: [&str; 4] = [ENV_FAUCET_ADDRESS, ENV_TOKEN_ADDRESS, ENV_RPC_URL, ENV_CHAIN_ID];

/// Local wallet endpoint speaking EIP-1193 methods over JSON-RPC (Frame's default port).
pub const DEFAULT_WALLET_RPC_URL: &str = "http://127.0.0.1:1248";

/// Gas-limit hint attached to every disbursement.
pub const DEFAULT_GAS_LIMIT: u64 = 200_000;

pub const DEFAULT_ACCOUNT_POLL: Duration = Duration::from_millis(1000);

/// Settings shared by both pages.
#[derive(Clone)]
pub struct FaucetConfig {
    pub faucet_address: Address,
    pub token_address: Address,
    pub rpc_url: String,
    pub chain_id: u64,
    pub wallet_rpc_url: String,
    pub gas_limit: u64,
    pub account_poll_interval: Duration,
    signing_key: Option<Zeroizing<String>>,
}

impl core::fmt::Debug for FaucetConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FaucetConfig")
            .field("faucet_address", &self.faucet_address)
            .field("token_address", &self.token_address)
            .field("rpc_url", &self.rpc_url)
            .field("chain_id", &self.chain_id)
            .field("wallet_rpc_url", &self.wallet_rpc_url)
            .field("gas_limit", &self.gas_limit)
            .field("account_poll_interval", &self.account_poll_interval)
            .field("signing_key", &self.signing_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl FaucetConfig {
    /// Create a config from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create a config from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(FaucetError::MissingConfig { key })
        };
        let optional = |key: &'static str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let faucet_address = parse_config_address(ENV_FAUCET_ADDRESS, &required(ENV_FAUCET_ADDRESS)?)?;
        let token_address = parse_config_address(ENV_TOKEN_ADDRESS, &required(ENV_TOKEN_ADDRESS)?)?;
        let rpc_url = required(ENV_RPC_URL)?;
        let chain_id = parse_chain_id(&required(ENV_CHAIN_ID)?)?;

        let gas_limit = match optional(ENV_GAS_LIMIT) {
            Some(raw) => raw.parse::<u64>().map_err(|e| FaucetError::InvalidConfig {
                key: ENV_GAS_LIMIT,
                reason: e.to_string(),
            })?,
            None => DEFAULT_GAS_LIMIT,
        };
        let account_poll_interval = match optional(ENV_ACCOUNT_POLL_MS) {
            Some(raw) => Duration::from_millis(raw.parse::<u64>().map_err(|e| {
                FaucetError::InvalidConfig { key: ENV_ACCOUNT_POLL_MS, reason: e.to_string() }
            })?),
            None => DEFAULT_ACCOUNT_POLL,
        };

        Ok(Self {
            faucet_address,
            token_address,
            rpc_url,
            chain_id,
            wallet_rpc_url: optional(ENV_WALLET_RPC_URL).unwrap_or_else(|| DEFAULT_WALLET_RPC_URL.to_string()),
            gas_limit,
            account_poll_interval,
            signing_key: optional(ENV_PRIVATE_KEY).map(Zeroizing::new),
        })
    }

    /// The faucet signing key; only the address page needs it.
    pub fn signing_key(&self) -> Result<&str> {
        self.signing_key
            .as_deref()
            .map(String::as_str)
            .ok_or(FaucetError::MissingConfig { key: ENV_PRIVATE_KEY })
    }

    pub fn with_signing_key(mut self, key: impl Into<String>) -> Self {
        self.signing_key = Some(Zeroizing::new(key.into()));
        self
    }
}

fn parse_config_address(key: &'static str, raw: &str) -> Result<Address> {
    Address::from_str(raw).map_err(|e| FaucetError::InvalidConfig { key, reason: e.to_string() })
}

/// Accepts decimal (`11155111`) or hex (`0xaa36a7`).
fn parse_chain_id(raw: &str) -> Result<u64> {
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => raw.parse::<u64>(),
    };
    parsed.map_err(|e| FaucetError::InvalidConfig { key: ENV_CHAIN_ID, reason: e.to_string() })
}

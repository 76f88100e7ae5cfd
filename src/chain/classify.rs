//! Maps JSON-RPC failures onto the crate's error kinds.
//!
//! Upstream wording only matters here; the pages match on the enums.

use ethers::contract::{ContractError, EthError};
use ethers::providers::{JsonRpcError, Middleware, MiddlewareError, ProviderError, RpcError};

use crate::error::{TransactionError, WalletError};

/// EIP-1193: the user rejected the request.
pub const CODE_USER_REJECTED: i64 = 4001;
/// EIP-3326: the wallet does not know the chain.
pub const CODE_UNRECOGNIZED_CHAIN: i64 = 4902;
/// EIP-1474 resource unavailable; wallets use it for an already-open permission prompt.
pub const CODE_REQUEST_PENDING: i64 = -32002;
/// Geth's code for `execution reverted` with revert data.
pub const CODE_EXECUTION_REVERTED: i64 = 3;

/// Classifies a wallet-interaction error response.
pub fn classify_wallet_error(code: i64, message: &str, chain_id: u64) -> WalletError {
    match code {
        CODE_USER_REJECTED => WalletError::UserRejected,
        CODE_UNRECOGNIZED_CHAIN => WalletError::UnknownChain { chain_id },
        CODE_REQUEST_PENDING => WalletError::RequestPending,
        _ => WalletError::Other { message: message.to_string() },
    }
}

/// Classifies a transaction error response. A decoded contract reason wins over the
/// node's generic message.
pub fn classify_rpc_error(code: i64, message: &str, revert_reason: Option<String>) -> TransactionError {
    let lowered = message.to_ascii_lowercase();
    if code == CODE_USER_REJECTED {
        return TransactionError::UserRejected;
    }
    if lowered.contains("insufficient funds") || lowered.contains("gas required exceeds allowance") {
        return TransactionError::InsufficientFunds;
    }
    if code == CODE_EXECUTION_REVERTED || lowered.contains("revert") {
        return TransactionError::Reverted { reason: revert_reason };
    }
    match revert_reason {
        Some(reason) => TransactionError::Other { message: reason },
        None => TransactionError::Other { message: message.to_string() },
    }
}

/// `Error(string)` payload carried in the response's revert data, if any.
fn revert_reason(response: &JsonRpcError) -> Option<String> {
    let data = response.as_revert_data()?;
    String::decode_with_selector(&data)
}

fn classify_response(response: &JsonRpcError) -> TransactionError {
    classify_rpc_error(response.code, &response.message, revert_reason(response))
}

/// Classifies a failed contract call sent through any middleware.
pub fn classify_transaction_error<M: Middleware>(err: &ContractError<M>) -> TransactionError {
    if err.is_revert() {
        return TransactionError::Reverted { reason: err.decode_revert::<String>() };
    }
    let response = match err {
        ContractError::MiddlewareError { e } => MiddlewareError::as_error_response(e),
        ContractError::ProviderError { e } => RpcError::as_error_response(e),
        _ => None,
    };
    match response {
        Some(response) => classify_response(response),
        None => TransactionError::Other { message: err.to_string() },
    }
}

/// Classifies a transaction sent straight through a provider (wallet endpoint).
pub(crate) fn classify_provider_transaction_error(err: &ProviderError) -> TransactionError {
    match RpcError::as_error_response(err) {
        Some(response) => classify_response(response),
        None => TransactionError::Other { message: err.to_string() },
    }
}

/// Classifies a wallet request failure. Anything that is not a JSON-RPC error
/// response means the wallet endpoint did not answer.
pub(crate) fn classify_provider_wallet_error(err: &ProviderError, chain_id: u64) -> WalletError {
    match RpcError::as_error_response(err) {
        Some(response) => classify_wallet_error(response.code, &response.message, chain_id),
        None if RpcError::as_serde_error(err).is_some() => WalletError::Other { message: err.to_string() },
        None => WalletError::ProviderUnavailable { reason: err.to_string() },
    }
}

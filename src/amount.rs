//! Fixed-point token amounts.
//!
//! Balances travel as raw `U256` base units scaled by 10^18. Display strings are
//! derived from the raw value; threshold comparisons never look at the string.

use ethers::types::U256;
use ethers::utils::format_units;
use serde::Serialize;

/// Fractional digits of both the token and the native currency.
pub const TOKEN_DECIMALS: u32 = 18;

/// Display value of a balance that could not be read.
pub const ERROR_SENTINEL: &str = "error";

/// `whole` tokens expressed in base units.
pub fn whole_tokens(whole: u64) -> U256 {
    U256::from(whole) * U256::exp10(TOKEN_DECIMALS as usize)
}

/// `numerator / denominator` tokens in base units, e.g. `fraction_of_token(1, 2)` for 0.5.
pub fn fraction_of_token(numerator: u64, denominator: u64) -> U256 {
    U256::from(numerator) * U256::exp10(TOKEN_DECIMALS as usize) / U256::from(denominator.max(1))
}

/// Formats base units as a decimal string with trailing zeros trimmed, keeping at
/// least one fractional digit: `1000.0`, `0.5`, `12.000000000000000001`.
pub fn format_token_amount(amount: U256) -> String {
    let full = match format_units(amount, TOKEN_DECIMALS) {
        Ok(s) => s,
        Err(_) => return amount.to_string(),
    };
    match full.split_once('.') {
        Some((int, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                format!("{int}.0")
            } else {
                format!("{int}.{frac}")
            }
        }
        None => format!("{full}.0"),
    }
}

/// One balance field of a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BalanceField {
    /// Not fetched yet, or reset after a disconnect.
    #[default]
    NotFetched,
    Amount(U256),
    /// The last read failed.
    Error,
}

impl BalanceField {
    pub fn amount(&self) -> Option<U256> {
        match self {
            Self::Amount(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// Display text: `None` while unfetched, the error sentinel on failure.
    pub fn display(&self) -> Option<String> {
        match self {
            Self::NotFetched => None,
            Self::Amount(v) => Some(format_token_amount(*v)),
            Self::Error => Some(ERROR_SENTINEL.to_string()),
        }
    }
}

impl<E> From<core::result::Result<U256, E>> for BalanceField {
    fn from(res: core::result::Result<U256, E>) -> Self {
        match res {
            Ok(v) => Self::Amount(v),
            Err(_) => Self::Error,
        }
    }
}

/// Token and native balances of one address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub token: BalanceField,
    /// Only read by the address page; stays `NotFetched` on the wallet page.
    pub native: BalanceField,
}

impl BalanceSnapshot {
    pub fn has_error(&self) -> bool {
        self.token.is_error() || self.native.is_error()
    }

    pub fn view(&self) -> BalanceView {
        BalanceView {
            token: self.token.display(),
            native: self.native.display(),
        }
    }
}

/// Rendered form of a [`BalanceSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceView {
    pub token: Option<String>,
    pub native: Option<String>,
}

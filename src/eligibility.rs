//! Eligibility gate.
//!
//! Decides whether the disbursement button is live. The two pages compare the
//! subject's balance against the threshold differently: the wallet page gates only
//! above 1000 tokens while the address page gates at 1000 already. Both modes are kept.

use ethers::types::U256;
use serde::Serialize;

use crate::amount::{fraction_of_token, whole_tokens, BalanceSnapshot};

/// Subject balance (in whole tokens) at which a request is pointless.
pub const SUBJECT_THRESHOLD_TOKENS: u64 = 1000;

/// Minimum faucet token reserve (in whole tokens) on the address page.
pub const FAUCET_TOKEN_RESERVE_TOKENS: u64 = 1000;

/// How the subject balance is compared with the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdComparison {
    /// Gated when `balance > threshold`.
    StrictlyAbove,
    /// Gated when `balance >= threshold`.
    AtLeast,
}

impl ThresholdComparison {
    pub fn exceeds(self, balance: U256, threshold: U256) -> bool {
        match self {
            Self::StrictlyAbove => balance > threshold,
            Self::AtLeast => balance >= threshold,
        }
    }
}

/// Result of evaluating the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Eligibility {
    Eligible,
    /// The subject already holds enough tokens.
    AlreadyFunded,
    /// The faucet cannot pay out (token or native reserve too low).
    FaucetDepleted,
}

impl Eligibility {
    pub fn is_gated(self) -> bool {
        self != Self::Eligible
    }
}

/// Gate parameters for one page variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityRules {
    pub subject_threshold: U256,
    pub comparison: ThresholdComparison,
    /// Faucet token balance below this gates the page; `None` disables the check.
    pub faucet_token_reserve: Option<U256>,
    /// Faucet native balance below this gates the page; `None` disables the check.
    pub faucet_native_reserve: Option<U256>,
}

impl EligibilityRules {
    /// Wallet-signed page: strict comparison, no reserve checks.
    pub fn wallet_page() -> Self {
        Self {
            subject_threshold: whole_tokens(SUBJECT_THRESHOLD_TOKENS),
            comparison: ThresholdComparison::StrictlyAbove,
            faucet_token_reserve: None,
            faucet_native_reserve: None,
        }
    }

    /// Key-signed page: inclusive comparison plus token and native (0.5) reserves.
    pub fn address_page() -> Self {
        Self {
            subject_threshold: whole_tokens(SUBJECT_THRESHOLD_TOKENS),
            comparison: ThresholdComparison::AtLeast,
            faucet_token_reserve: Some(whole_tokens(FAUCET_TOKEN_RESERVE_TOKENS)),
            faucet_native_reserve: Some(fraction_of_token(1, 2)),
        }
    }

    /// True when `balance` alone is enough to refuse a request.
    pub fn subject_funded(&self, balance: U256) -> bool {
        self.comparison.exceeds(balance, self.subject_threshold)
    }

    /// Unknown or errored balances never gate.
    pub fn evaluate(&self, subject: &BalanceSnapshot, faucet: &BalanceSnapshot) -> Eligibility {
        if subject.token.amount().is_some_and(|b| self.subject_funded(b)) {
            return Eligibility::AlreadyFunded;
        }
        let below = |reserve: Option<U256>, held: Option<U256>| match (reserve, held) {
            (Some(min), Some(held)) => held < min,
            _ => false,
        };
        if below(self.faucet_token_reserve, faucet.token.amount())
            || below(self.faucet_native_reserve, faucet.native.amount())
        {
            return Eligibility::FaucetDepleted;
        }
        Eligibility::Eligible
    }
}

//! Balance reader.
//!
//! One-shot reads, no retries. A failed read yields [`BalanceField::Error`] so the
//! page never keeps showing a stale value.

use ethers::types::Address;
use tracing::warn;

use crate::amount::{BalanceField, BalanceSnapshot};
use crate::chain::BalanceSource;

/// Reads subject and faucet balances through a [`BalanceSource`].
#[derive(Debug, Clone)]
pub struct BalanceReader<S> {
    source: S,
    faucet_address: Address,
    /// Account whose native balance counts as the faucet's gas reserve. `None` skips
    /// native reads entirely.
    native_holder: Option<Address>,
}

impl<S: BalanceSource> BalanceReader<S> {
    /// Token balances only.
    pub fn new(source: S, faucet_address: Address) -> Self {
        Self { source, faucet_address, native_holder: None }
    }

    /// Also read native balances; the faucet's is taken from `holder`.
    pub fn with_native(mut self, holder: Address) -> Self {
        self.native_holder = Some(holder);
        self
    }

    pub fn faucet_address(&self) -> Address {
        self.faucet_address
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Token balance of `subject`, or the error sentinel.
    pub async fn fetch_subject_token(&self, subject: Address) -> BalanceField {
        let res = self.source.token_balance(subject).await;
        if let Err(e) = &res {
            warn!(?subject, error = %e, "subject token balance read failed");
        }
        res.into()
    }

    pub async fn fetch_subject_balance(&self, subject: Address) -> BalanceSnapshot {
        let token = self.fetch_subject_token(subject).await;
        let native = match self.native_holder {
            Some(_) => self.read_native(subject).await,
            None => BalanceField::NotFetched,
        };
        BalanceSnapshot { token, native }
    }

    pub async fn fetch_faucet_balance(&self) -> BalanceSnapshot {
        let res = self.source.token_balance(self.faucet_address).await;
        if let Err(e) = &res {
            warn!(faucet = ?self.faucet_address, error = %e, "faucet token balance read failed");
        }
        let native = match self.native_holder {
            Some(holder) => self.read_native(holder).await,
            None => BalanceField::NotFetched,
        };
        BalanceSnapshot { token: res.into(), native }
    }

    async fn read_native(&self, owner: Address) -> BalanceField {
        let res = self.source.native_balance(owner).await;
        if let Err(e) = &res {
            warn!(?owner, error = %e, "native balance read failed");
        }
        res.into()
    }
}

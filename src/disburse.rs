//! Disbursement initiator.
//!
//! Shared by both pages: submit, report "awaiting confirmation", wait for the
//! receipt, report the result. Preconditions are checked by the pages before this
//! runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ethers::types::TxHash;
use serde::Serialize;
use tracing::{info, warn};

use crate::chain::{DisbursementRequest, Disburser};
use crate::error::TransactionError;
use crate::status::{StatusEvent, StatusProjector};

/// Why a request was stopped before any transaction was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Refusal {
    NotConnected,
    InvalidAddress,
    InProgress,
    AlreadyFunded,
    FaucetDepleted,
    /// The pre-flight balance read failed.
    BalanceUnavailable,
}

impl From<Refusal> for StatusEvent {
    fn from(refusal: Refusal) -> Self {
        match refusal {
            Refusal::NotConnected => StatusEvent::NotConnected,
            Refusal::InvalidAddress => StatusEvent::InvalidAddress,
            Refusal::InProgress => StatusEvent::RequestInProgress,
            Refusal::AlreadyFunded => StatusEvent::AlreadyFunded,
            Refusal::FaucetDepleted => StatusEvent::FaucetDepleted,
            Refusal::BalanceUnavailable => StatusEvent::BalanceFetchFailed,
        }
    }
}

/// Result of one request attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Mined successfully.
    Success { tx_hash: TxHash },
    /// Submission or confirmation failed.
    Failure(TransactionError),
    /// Nothing was sent.
    Refused(Refusal),
}

impl RequestOutcome {
    /// True when a transaction was attempted, i.e. balances may have moved.
    pub fn reached_chain(&self) -> bool {
        !matches!(self, Self::Refused(_))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// In-flight marker of a page. Set through [`PendingFlag::acquire`] only, so it is
/// cleared on every exit path, including a dropped request future.
#[derive(Debug, Clone, Default)]
pub struct PendingFlag(Arc<AtomicBool>);

impl PendingFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Marks a request in flight. `None` if one already is.
    pub fn acquire(&self) -> Option<PendingGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PendingGuard(self.0.clone()))
    }
}

/// Clears the owning [`PendingFlag`] on drop.
#[derive(Debug)]
pub struct PendingGuard(Arc<AtomicBool>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Submits `request` and waits for it, publishing each step on `status`.
pub async fn disburse<D: Disburser + ?Sized>(
    disburser: &D,
    request: DisbursementRequest,
    status: &StatusProjector,
) -> RequestOutcome {
    let tx_hash = match disburser.submit(request).await {
        Ok(tx_hash) => tx_hash,
        Err(err) => return fail(err, status),
    };
    status.apply(StatusEvent::Submitted { tx_hash });

    match disburser.confirm(tx_hash).await {
        Ok(tx_hash) => {
            info!(?tx_hash, recipient = ?request.recipient, "disbursement complete");
            status.apply(StatusEvent::Confirmed { tx_hash });
            RequestOutcome::Success { tx_hash }
        }
        Err(err) => fail(err, status),
    }
}

fn fail(err: TransactionError, status: &StatusProjector) -> RequestOutcome {
    if err.is_expected() {
        info!(error = %err, "disbursement declined by chain");
    } else {
        warn!(error = %err, "disbursement failed");
    }
    status.apply(StatusEvent::RequestFailed(err.clone()));
    RequestOutcome::Failure(err)
}

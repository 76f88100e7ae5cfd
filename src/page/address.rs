//! Key-signed faucet page.
//!
//! The user pastes an address; the faucet's own key pays for and signs the request.

use ethers::types::Address;
use tokio::sync::watch;
use tracing::{debug, info};

use super::{gated_button, ButtonView, PageView, LABEL_ENTER_ADDRESS, LABEL_SEND, LABEL_SENDING};
use crate::address::{display_address, parse_address};
use crate::amount::{BalanceField, BalanceSnapshot};
use crate::balance::BalanceReader;
use crate::chain::{BalanceSource, DisbursementRequest, Disburser};
use crate::config::DEFAULT_GAS_LIMIT;
use crate::disburse::{disburse, PendingFlag, Refusal, RequestOutcome};
use crate::eligibility::{Eligibility, EligibilityRules};
use crate::status::{Status, StatusEvent, StatusProjector};

pub struct AddressFaucetPage<D, S> {
    disburser: D,
    balances: BalanceReader<S>,
    rules: EligibilityRules,
    gas_limit: u64,
    input: String,
    subject: BalanceSnapshot,
    faucet: BalanceSnapshot,
    pending: PendingFlag,
    status: StatusProjector,
}

impl<D, S> AddressFaucetPage<D, S>
where
    D: Disburser,
    S: BalanceSource,
{
    /// `balances` should read native balances, with the signing account as holder.
    pub fn new(disburser: D, balances: BalanceReader<S>) -> Self {
        Self {
            disburser,
            balances,
            rules: EligibilityRules::address_page(),
            gas_limit: DEFAULT_GAS_LIMIT,
            input: String::new(),
            subject: BalanceSnapshot::default(),
            faucet: BalanceSnapshot::default(),
            pending: PendingFlag::default(),
            status: StatusProjector::new(),
        }
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    /// Initial faucet read after mounting.
    pub async fn load(&mut self) {
        self.faucet = self.balances.fetch_faucet_balance().await;
        if self.faucet.has_error() {
            self.status.apply(StatusEvent::BalanceFetchFailed);
        }
    }

    /// Input edits. A valid address triggers a subject read; anything else clears
    /// the subject balances without touching the network.
    pub async fn set_address_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
        self.subject = BalanceSnapshot::default();
        if let Some(subject) = parse_address(&self.input) {
            self.subject = self.balances.fetch_subject_balance(subject).await;
            if self.subject.has_error() {
                self.status.apply(StatusEvent::BalanceFetchFailed);
            }
        }
    }

    pub fn address_input(&self) -> &str {
        &self.input
    }

    /// Re-reads subject (when the input is valid) and faucet balances.
    pub async fn refresh(&mut self) {
        if !self.refresh_balances().await {
            self.status.apply(StatusEvent::BalanceFetchFailed);
        }
    }

    pub async fn refresh_balances(&mut self) -> bool {
        if let Some(subject) = parse_address(&self.input) {
            self.subject = self.balances.fetch_subject_balance(subject).await;
        }
        self.faucet = self.balances.fetch_faucet_balance().await;
        debug!(subject = ?self.subject, faucet = ?self.faucet, "balances refreshed");
        !(self.subject.has_error() || self.faucet.has_error())
    }

    /// The send button.
    pub async fn request_funds(&mut self) -> RequestOutcome {
        let Some(recipient) = parse_address(&self.input) else {
            return self.refuse(Refusal::InvalidAddress);
        };
        if self.pending.is_set() {
            return self.refuse(Refusal::InProgress);
        }
        match self.eligibility() {
            Eligibility::Eligible => {}
            Eligibility::AlreadyFunded => return self.refuse(Refusal::AlreadyFunded),
            Eligibility::FaucetDepleted => return self.refuse(Refusal::FaucetDepleted),
        }

        let Some(in_flight) = self.pending.acquire() else {
            return self.refuse(Refusal::InProgress);
        };
        let outcome = self.dispatch(recipient).await;
        drop(in_flight);

        if outcome.reached_chain() {
            self.refresh_balances().await;
        }
        outcome
    }

    /// Pre-flight read, then the key-signed call.
    async fn dispatch(&mut self, recipient: Address) -> RequestOutcome {
        self.subject.token = self.balances.fetch_subject_token(recipient).await;
        match self.subject.token {
            BalanceField::Amount(balance) if self.rules.subject_funded(balance) => {
                info!(?recipient, "recipient already funded, nothing sent");
                return self.refuse(Refusal::AlreadyFunded);
            }
            BalanceField::Amount(_) => {}
            BalanceField::Error | BalanceField::NotFetched => {
                return self.refuse(Refusal::BalanceUnavailable);
            }
        }

        let request = DisbursementRequest {
            sender: None,
            recipient,
            gas_limit: self.gas_limit,
        };
        disburse(&self.disburser, request, &self.status).await
    }

    fn refuse(&self, refusal: Refusal) -> RequestOutcome {
        self.status.apply(refusal.into());
        RequestOutcome::Refused(refusal)
    }

    pub fn eligibility(&self) -> Eligibility {
        self.rules.evaluate(&self.subject, &self.faucet)
    }

    pub fn button(&self) -> ButtonView {
        if self.pending.is_set() {
            return ButtonView::disabled(LABEL_SENDING);
        }
        if parse_address(&self.input).is_none() {
            return ButtonView::disabled(LABEL_ENTER_ADDRESS);
        }
        gated_button(self.eligibility()).unwrap_or_else(|| ButtonView::enabled(LABEL_SEND))
    }

    pub fn view(&self) -> PageView {
        let status = self.status.current();
        PageView {
            subject_address: parse_address(&self.input).map(|a| display_address(&a)),
            subject: self.subject.view(),
            faucet: self.faucet.view(),
            eligibility: self.eligibility(),
            pending: self.pending.is_set(),
            button: self.button(),
            status_class: status.tone.css_class(),
            status,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_set()
    }

    pub fn subject_balance(&self) -> &BalanceSnapshot {
        &self.subject
    }

    pub fn faucet_balance(&self) -> &BalanceSnapshot {
        &self.faucet
    }

    pub fn status(&self) -> Status {
        self.status.current()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<Status> {
        self.status.subscribe()
    }
}

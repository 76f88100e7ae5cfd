//! Wallet-signed faucet page.

use ethers::types::Address;
use tokio::sync::watch;
use tracing::debug;

use super::{gated_button, ButtonView, PageView, LABEL_CONNECT, LABEL_PROCESSING, LABEL_REQUEST};
use crate::address::display_address;
use crate::amount::BalanceSnapshot;
use crate::balance::BalanceReader;
use crate::chain::{BalanceSource, DisbursementRequest, Disburser, WalletProvider};
use crate::config::DEFAULT_GAS_LIMIT;
use crate::connection::{AccountChange, ConnectOutcome, ConnectionManager, Session};
use crate::disburse::{disburse, PendingFlag, Refusal, RequestOutcome};
use crate::eligibility::{Eligibility, EligibilityRules};
use crate::error::WalletError;
use crate::status::{Status, StatusEvent, StatusProjector};

/// Page where the user connects a wallet and signs the request themselves.
pub struct WalletFaucetPage<W, S> {
    connection: ConnectionManager<W>,
    balances: BalanceReader<S>,
    rules: EligibilityRules,
    gas_limit: u64,
    subject: BalanceSnapshot,
    faucet: BalanceSnapshot,
    pending: PendingFlag,
    status: StatusProjector,
}

impl<W, S> WalletFaucetPage<W, S>
where
    W: WalletProvider + Disburser,
    S: BalanceSource,
{
    /// Builds the page and subscribes to account changes.
    pub fn mount(wallet: W, balances: BalanceReader<S>, chain_id: u64) -> Self {
        let mut connection = ConnectionManager::new(wallet, chain_id);
        connection.subscribe();
        Self {
            connection,
            balances,
            rules: EligibilityRules::wallet_page(),
            gas_limit: DEFAULT_GAS_LIMIT,
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

    /// Releases the account-change subscription.
    pub fn unmount(mut self) {
        self.connection.unsubscribe();
    }

    /// Primary button while disconnected.
    pub async fn connect(&mut self) {
        match self.connection.connect().await {
            ConnectOutcome::Failed(err) => {
                self.status.apply(StatusEvent::ConnectFailed(err));
            }
            ConnectOutcome::Connected { chain_switch, .. } => {
                let event = match chain_switch {
                    Ok(()) => StatusEvent::Connected,
                    Err(WalletError::UnknownChain { chain_id }) => StatusEvent::AddNetwork { chain_id },
                    Err(error) => StatusEvent::ChainSwitchFailed { chain_id: self.connection.chain_id(), error },
                };
                self.status.apply(event);
                self.refresh().await;
            }
        }
    }

    /// Waits for the next account-change notification.
    pub async fn next_account_change(&mut self) -> Option<Vec<Address>> {
        self.connection.next_accounts().await
    }

    pub async fn handle_accounts_changed(&mut self, accounts: Vec<Address>) {
        match self.connection.apply_accounts(&accounts) {
            AccountChange::Cleared => {
                self.subject = BalanceSnapshot::default();
                self.faucet = BalanceSnapshot::default();
                self.status.apply(StatusEvent::Disconnected);
            }
            AccountChange::Adopted(_) => {
                self.refresh().await;
            }
        }
    }

    /// Re-reads balances and reports a failed read on the status line.
    pub async fn refresh(&mut self) {
        if !self.refresh_balances().await {
            self.status.apply(StatusEvent::BalanceFetchFailed);
        }
    }

    /// Re-reads subject (when connected) and faucet balances. Returns `false` if any
    /// read failed; the failed fields hold the error sentinel.
    pub async fn refresh_balances(&mut self) -> bool {
        if let Some(account) = self.connection.session().account() {
            self.subject = self.balances.fetch_subject_balance(account).await;
        }
        self.faucet = self.balances.fetch_faucet_balance().await;
        debug!(subject = ?self.subject, faucet = ?self.faucet, "balances refreshed");
        !(self.subject.has_error() || self.faucet.has_error())
    }

    /// Primary button while connected.
    pub async fn request_tokens(&mut self) -> RequestOutcome {
        let Some(account) = self.connection.session().account() else {
            return self.refuse(Refusal::NotConnected);
        };
        if self.pending.is_set() {
            return self.refuse(Refusal::InProgress);
        }
        match self.eligibility() {
            Eligibility::Eligible => {}
            Eligibility::AlreadyFunded => return self.refuse(Refusal::AlreadyFunded),
            Eligibility::FaucetDepleted => return self.refuse(Refusal::FaucetDepleted),
        }

        let request = DisbursementRequest {
            sender: Some(account),
            recipient: account,
            gas_limit: self.gas_limit,
        };
        let Some(in_flight) = self.pending.acquire() else {
            return self.refuse(Refusal::InProgress);
        };
        let outcome = disburse(self.connection.wallet(), request, &self.status).await;
        drop(in_flight);

        // Keep the result message; a failed re-read only shows in the fields.
        self.refresh_balances().await;
        outcome
    }

    fn refuse(&self, refusal: Refusal) -> RequestOutcome {
        self.status.apply(refusal.into());
        RequestOutcome::Refused(refusal)
    }

    pub fn eligibility(&self) -> Eligibility {
        self.rules.evaluate(&self.subject, &self.faucet)
    }

    pub fn button(&self) -> ButtonView {
        if !self.connection.session().is_connected() {
            return ButtonView::enabled(LABEL_CONNECT);
        }
        if self.pending.is_set() {
            return ButtonView::disabled(LABEL_PROCESSING);
        }
        gated_button(self.eligibility()).unwrap_or_else(|| ButtonView::enabled(LABEL_REQUEST))
    }

    pub fn view(&self) -> PageView {
        let status = self.status.current();
        PageView {
            subject_address: self.connection.session().account().map(|a| display_address(&a)),
            subject: self.subject.view(),
            faucet: self.faucet.view(),
            eligibility: self.eligibility(),
            pending: self.pending.is_set(),
            button: self.button(),
            status_class: status.tone.css_class(),
            status,
        }
    }

    pub fn session(&self) -> &Session {
        self.connection.session()
    }

    pub fn is_subscribed(&self) -> bool {
        self.connection.is_subscribed()
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

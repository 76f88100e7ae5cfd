//! Connection manager for the wallet page.
//!
//! Owns the session and the account-change subscription. The subscription is held
//! from mount until unmount (or drop).

use ethers::types::Address;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::chain::{AccountSubscription, WalletProvider};
use crate::error::WalletError;

/// Connected-wallet state of one page instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    account: Option<Address>,
}

impl Session {
    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    pub fn account(&self) -> Option<Address> {
        self.account
    }
}

/// Result of [`ConnectionManager::connect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// Account access granted. The chain switch result is reported separately since
    /// the session stays connected either way.
    Connected { account: Address, chain_switch: Result<(), WalletError> },
    Failed(WalletError),
}

/// What an account-change notification did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountChange {
    Cleared,
    Adopted(Address),
}

pub struct ConnectionManager<W> {
    wallet: W,
    chain_id: u64,
    session: Session,
    subscription: Option<AccountSubscription>,
}

impl<W: WalletProvider> ConnectionManager<W> {
    pub fn new(wallet: W, chain_id: u64) -> Self {
        Self { wallet, chain_id, session: Session::default(), subscription: None }
    }

    /// Subscribes to account changes. Idempotent.
    pub fn subscribe(&mut self) {
        if self.subscription.is_none() {
            debug!("subscribing to wallet account changes");
            self.subscription = Some(self.wallet.subscribe_accounts());
        }
    }

    pub fn unsubscribe(&mut self) {
        if self.subscription.take().is_some() {
            debug!("unsubscribed from wallet account changes");
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Next account-change notification; `None` when not subscribed or the feed ended.
    pub async fn next_accounts(&mut self) -> Option<Vec<Address>> {
        match self.subscription.as_mut() {
            Some(subscription) => subscription.next().await,
            None => None,
        }
    }

    /// Requests account access, then a switch to the configured chain.
    pub async fn connect(&mut self) -> ConnectOutcome {
        let accounts = match self.wallet.request_accounts().await {
            Ok(accounts) => accounts,
            Err(err) => {
                warn!(error = %err, "wallet connection failed");
                return ConnectOutcome::Failed(err);
            }
        };
        let Some(&account) = accounts.first() else {
            return ConnectOutcome::Failed(WalletError::NoAccounts);
        };
        self.session.account = Some(account);
        info!(?account, "wallet connected");

        let chain_switch = self.wallet.switch_chain(self.chain_id).await;
        if let Err(err) = &chain_switch {
            warn!(chain_id = self.chain_id, error = %err, "chain switch failed");
        }
        ConnectOutcome::Connected { account, chain_switch }
    }

    /// Applies an account-change notification.
    pub fn apply_accounts(&mut self, accounts: &[Address]) -> AccountChange {
        match accounts.first() {
            Some(&account) => {
                info!(?account, "wallet account changed");
                self.session.account = Some(account);
                AccountChange::Adopted(account)
            }
            None => {
                info!("wallet disconnected");
                self.session = Session::default();
                AccountChange::Cleared
            }
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

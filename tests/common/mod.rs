//! In-memory chain doubles shared by the page tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ethers::types::{Address, TxHash, U256};
use tokio::sync::{mpsc, watch};

use faucet_pages::chain::{AccountSubscription, BalanceSource, DisbursementRequest, Disburser, WalletProvider};
use faucet_pages::error::{ReadError, TransactionError, WalletError};
use faucet_pages::Status;

pub fn addr(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

pub fn tokens(whole: u64) -> U256 {
    faucet_pages::amount::whole_tokens(whole)
}

pub const FAUCET: u8 = 0xfa;
pub const SIGNER: u8 = 0x5e;

#[derive(Default)]
struct ChainState {
    token: HashMap<Address, U256>,
    native: HashMap<Address, U256>,
    failing: HashSet<Address>,
    token_reads: Vec<Address>,
    native_reads: Vec<Address>,
}

/// Balance source backed by maps. Clones share state.
#[derive(Clone, Default)]
pub struct MockChain {
    state: Arc<Mutex<ChainState>>,
}

impl MockChain {
    pub fn set_token(&self, owner: Address, amount: U256) {
        self.state.lock().unwrap().token.insert(owner, amount);
    }

    pub fn set_native(&self, owner: Address, amount: U256) {
        self.state.lock().unwrap().native.insert(owner, amount);
    }

    pub fn fail_reads_for(&self, owner: Address) {
        self.state.lock().unwrap().failing.insert(owner);
    }

    pub fn heal_reads_for(&self, owner: Address) {
        self.state.lock().unwrap().failing.remove(&owner);
    }

    pub fn token_reads_of(&self, owner: Address) -> usize {
        self.state.lock().unwrap().token_reads.iter().filter(|a| **a == owner).count()
    }

    pub fn total_reads(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.token_reads.len() + state.native_reads.len()
    }

    /// A healthy faucet: plenty of tokens in the contract and gas for the signer.
    pub fn funded() -> Self {
        let chain = Self::default();
        chain.set_token(addr(FAUCET), tokens(1_000_000));
        chain.set_native(addr(SIGNER), tokens(10));
        chain
    }
}

#[async_trait]
impl BalanceSource for MockChain {
    async fn token_balance(&self, owner: Address) -> Result<U256, ReadError> {
        let mut state = self.state.lock().unwrap();
        state.token_reads.push(owner);
        if state.failing.contains(&owner) {
            return Err(ReadError::Read { reason: "node unavailable".into() });
        }
        Ok(state.token.get(&owner).copied().unwrap_or_default())
    }

    async fn native_balance(&self, owner: Address) -> Result<U256, ReadError> {
        let mut state = self.state.lock().unwrap();
        state.native_reads.push(owner);
        if state.failing.contains(&owner) {
            return Err(ReadError::Read { reason: "node unavailable".into() });
        }
        Ok(state.native.get(&owner).copied().unwrap_or_default())
    }
}

struct TxState {
    submit_result: Result<TxHash, TransactionError>,
    confirm_result: Option<TransactionError>,
    submissions: Vec<DisbursementRequest>,
    /// Credited to the recipient when a request confirms.
    payout: Option<(MockChain, U256)>,
    status_probe: Option<watch::Receiver<Status>>,
    status_during_confirm: Option<Status>,
    /// `confirm` never resolves while set.
    stall_confirm: bool,
}

impl Default for TxState {
    fn default() -> Self {
        Self {
            submit_result: Ok(TxHash::repeat_byte(0x77)),
            confirm_result: None,
            submissions: Vec::new(),
            payout: None,
            status_probe: None,
            status_during_confirm: None,
            stall_confirm: false,
        }
    }
}

/// Disburser that records requests. Clones share state.
#[derive(Clone, Default)]
pub struct MockDisburser {
    state: Arc<Mutex<TxState>>,
}

impl MockDisburser {
    pub fn paying_out(chain: &MockChain, amount: U256) -> Self {
        let disburser = Self::default();
        disburser.state.lock().unwrap().payout = Some((chain.clone(), amount));
        disburser
    }

    pub fn fail_submit(&self, err: TransactionError) {
        self.state.lock().unwrap().submit_result = Err(err);
    }

    pub fn fail_confirm(&self, err: TransactionError) {
        self.state.lock().unwrap().confirm_result = Some(err);
    }

    /// Makes `confirm` hang, like a receipt that never arrives.
    pub fn stall_confirm(&self, stall: bool) {
        self.state.lock().unwrap().stall_confirm = stall;
    }

    pub fn submissions(&self) -> Vec<DisbursementRequest> {
        self.state.lock().unwrap().submissions.clone()
    }

    /// Records the page status at the moment `confirm` is entered.
    pub fn probe_status(&self, rx: watch::Receiver<Status>) {
        self.state.lock().unwrap().status_probe = Some(rx);
    }

    pub fn status_during_confirm(&self) -> Option<Status> {
        self.state.lock().unwrap().status_during_confirm.clone()
    }
}

#[async_trait]
impl Disburser for MockDisburser {
    async fn submit(&self, request: DisbursementRequest) -> Result<TxHash, TransactionError> {
        let mut state = self.state.lock().unwrap();
        state.submissions.push(request);
        state.submit_result.clone()
    }

    async fn confirm(&self, tx_hash: TxHash) -> Result<TxHash, TransactionError> {
        let stall = {
            let mut state = self.state.lock().unwrap();
            state.status_during_confirm = state.status_probe.as_ref().map(|rx| rx.borrow().clone());
            state.stall_confirm
        };
        if stall {
            std::future::pending::<()>().await;
        }

        let state = self.state.lock().unwrap();
        if let Some(err) = state.confirm_result.clone() {
            return Err(err);
        }
        if let (Some((chain, amount)), Some(request)) = (state.payout.as_ref(), state.submissions.last()) {
            let recipient = request.recipient;
            let mut chain_state = chain.state.lock().unwrap();
            let held = chain_state.token.get(&recipient).copied().unwrap_or_default();
            chain_state.token.insert(recipient, held + *amount);
        }
        Ok(tx_hash)
    }
}

struct WalletState {
    accounts: Result<Vec<Address>, WalletError>,
    switch_result: Result<(), WalletError>,
    switch_requests: Vec<u64>,
    feed: Option<mpsc::UnboundedSender<Vec<Address>>>,
}

/// Wallet double: scripted connect answers, a push-driven account feed and the
/// disbursement recorder of [`MockDisburser`].
#[derive(Clone)]
pub struct MockWallet {
    state: Arc<Mutex<WalletState>>,
    pub tx: MockDisburser,
}

impl MockWallet {
    pub fn with_accounts(accounts: Vec<Address>) -> Self {
        Self {
            state: Arc::new(Mutex::new(WalletState {
                accounts: Ok(accounts),
                switch_result: Ok(()),
                switch_requests: Vec::new(),
                feed: None,
            })),
            tx: MockDisburser::default(),
        }
    }

    pub fn failing_connect(err: WalletError) -> Self {
        let wallet = Self::with_accounts(Vec::new());
        wallet.state.lock().unwrap().accounts = Err(err);
        wallet
    }

    pub fn fail_switch(&self, err: WalletError) {
        self.state.lock().unwrap().switch_result = Err(err);
    }

    pub fn switch_requests(&self) -> Vec<u64> {
        self.state.lock().unwrap().switch_requests.clone()
    }

    /// Pushes an account-change notification. Returns `false` if nobody listens.
    pub fn emit_accounts(&self, accounts: Vec<Address>) -> bool {
        match self.state.lock().unwrap().feed.as_ref() {
            Some(feed) => feed.send(accounts).is_ok(),
            None => false,
        }
    }

    pub fn feed_closed(&self) -> bool {
        self.state.lock().unwrap().feed.as_ref().map_or(true, |feed| feed.is_closed())
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.state.lock().unwrap().accounts.clone()
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
        let mut state = self.state.lock().unwrap();
        state.switch_requests.push(chain_id);
        state.switch_result.clone()
    }

    fn subscribe_accounts(&self) -> AccountSubscription {
        let (feed, rx) = mpsc::unbounded_channel();
        self.state.lock().unwrap().feed = Some(feed);
        AccountSubscription::new(rx, None)
    }
}

#[async_trait]
impl Disburser for MockWallet {
    async fn submit(&self, request: DisbursementRequest) -> Result<TxHash, TransactionError> {
        self.tx.submit(request).await
    }

    async fn confirm(&self, tx_hash: TxHash) -> Result<TxHash, TransactionError> {
        self.tx.confirm(tx_hash).await
    }
}

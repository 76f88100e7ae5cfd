//! Key-signed page: address input, pre-flight check and reserve gating.

mod common;

use common::*;
use faucet_pages::amount::fraction_of_token;
use faucet_pages::chain::DisbursementRequest;
use faucet_pages::page::{LABEL_ALREADY_FUNDED, LABEL_ENTER_ADDRESS, LABEL_FAUCET_EMPTY, LABEL_SEND};
use faucet_pages::{
    AddressFaucetPage, BalanceField, BalanceReader, Eligibility, Refusal, RequestOutcome, StatusTone,
    TransactionError,
};

const RECIPIENT: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

fn recipient() -> ethers::types::Address {
    RECIPIENT.parse().unwrap()
}

async fn loaded_page(
    chain: &MockChain,
    disburser: &MockDisburser,
) -> AddressFaucetPage<MockDisburser, MockChain> {
    let balances = BalanceReader::new(chain.clone(), addr(FAUCET)).with_native(addr(SIGNER));
    let mut page = AddressFaucetPage::new(disburser.clone(), balances);
    page.load().await;
    page
}

#[tokio::test]
async fn test_invalid_address_never_touches_the_network() {
    let chain = MockChain::funded();
    let disburser = MockDisburser::default();
    let balances = BalanceReader::new(chain.clone(), addr(FAUCET)).with_native(addr(SIGNER));
    let mut page = AddressFaucetPage::new(disburser.clone(), balances);

    for input in ["", "hello", "0x1234", "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD"] {
        page.set_address_input(input).await;
        assert_eq!(page.button().label, LABEL_ENTER_ADDRESS);
        assert!(!page.button().enabled);

        let outcome = page.request_funds().await;
        assert_eq!(outcome, RequestOutcome::Refused(Refusal::InvalidAddress));
        assert_eq!(page.status().message, "Please enter a valid address.");
    }

    assert_eq!(chain.total_reads(), 0);
    assert!(disburser.submissions().is_empty());
}

#[tokio::test]
async fn test_valid_address_reads_subject_balances() {
    let chain = MockChain::funded();
    chain.set_token(recipient(), fraction_of_token(1, 4));
    let mut page = loaded_page(&chain, &MockDisburser::default()).await;

    page.set_address_input(format!("  {RECIPIENT} ")).await;

    assert_eq!(page.subject_balance().token, BalanceField::Amount(fraction_of_token(1, 4)));
    assert_eq!(page.subject_balance().native, BalanceField::Amount(ethers::types::U256::zero()));
    let view = page.view();
    assert_eq!(view.subject_address.as_deref(), Some(RECIPIENT));
    assert_eq!(view.subject.token.as_deref(), Some("0.25"));
    assert_eq!(view.button.label, LABEL_SEND);
    assert!(view.button.enabled);
}

#[tokio::test]
async fn test_send_funds_uses_faucet_key_and_refreshes() {
    let chain = MockChain::funded();
    chain.set_token(recipient(), tokens(500));
    let disburser = MockDisburser::paying_out(&chain, tokens(1000));
    let mut page = loaded_page(&chain, &disburser).await;
    page.set_address_input(RECIPIENT).await;
    disburser.probe_status(page.subscribe_status());

    let outcome = page.request_funds().await;

    assert!(outcome.is_success());
    assert_eq!(
        disburser.submissions(),
        vec![DisbursementRequest { sender: None, recipient: recipient(), gas_limit: 200_000 }]
    );
    assert!(disburser.status_during_confirm().unwrap().message.contains("awaiting confirmation"));
    assert!(page.status().message.starts_with("Tokens sent! Transaction hash: 0x"));
    assert_eq!(page.status().tone, StatusTone::Success);
    assert!(!page.is_pending());
    assert_eq!(page.subject_balance().token, BalanceField::Amount(tokens(1500)));
    assert_eq!(page.button().label, LABEL_ALREADY_FUNDED);
}

#[tokio::test]
async fn test_threshold_is_inclusive() {
    let chain = MockChain::funded();
    chain.set_token(recipient(), tokens(1000));
    let disburser = MockDisburser::default();
    let mut page = loaded_page(&chain, &disburser).await;
    page.set_address_input(RECIPIENT).await;

    assert_eq!(page.eligibility(), Eligibility::AlreadyFunded);
    assert!(!page.button().enabled);
    assert_eq!(page.request_funds().await, RequestOutcome::Refused(Refusal::AlreadyFunded));
    assert_eq!(page.status().message, "This address already has enough tokens.");
    assert!(disburser.submissions().is_empty());
}

#[tokio::test]
async fn test_preflight_catches_balance_that_rose_after_input() {
    let chain = MockChain::funded();
    chain.set_token(recipient(), tokens(500));
    let disburser = MockDisburser::default();
    let mut page = loaded_page(&chain, &disburser).await;
    page.set_address_input(RECIPIENT).await;
    assert!(page.button().enabled);

    chain.set_token(recipient(), tokens(1200));
    let outcome = page.request_funds().await;

    assert_eq!(outcome, RequestOutcome::Refused(Refusal::AlreadyFunded));
    assert!(disburser.submissions().is_empty());
    assert_eq!(page.subject_balance().token, BalanceField::Amount(tokens(1200)));
    assert!(!page.is_pending());
}

#[tokio::test]
async fn test_preflight_read_failure_aborts() {
    let chain = MockChain::funded();
    let disburser = MockDisburser::default();
    let mut page = loaded_page(&chain, &disburser).await;
    page.set_address_input(RECIPIENT).await;

    chain.fail_reads_for(recipient());
    let outcome = page.request_funds().await;

    assert_eq!(outcome, RequestOutcome::Refused(Refusal::BalanceUnavailable));
    assert_eq!(page.subject_balance().token, BalanceField::Error);
    assert!(disburser.submissions().is_empty());
}

#[tokio::test]
async fn test_low_gas_reserve_disables_button() {
    let chain = MockChain::funded();
    chain.set_native(addr(SIGNER), fraction_of_token(1, 4));
    let disburser = MockDisburser::default();
    let mut page = loaded_page(&chain, &disburser).await;
    page.set_address_input(RECIPIENT).await;

    assert_eq!(page.eligibility(), Eligibility::FaucetDepleted);
    assert_eq!(page.button().label, LABEL_FAUCET_EMPTY);
    assert_eq!(page.view().faucet.native.as_deref(), Some("0.25"));
    assert_eq!(page.request_funds().await, RequestOutcome::Refused(Refusal::FaucetDepleted));
    assert!(disburser.submissions().is_empty());
}

#[tokio::test]
async fn test_low_token_reserve_disables_button() {
    let chain = MockChain::funded();
    chain.set_token(addr(FAUCET), tokens(999));
    let mut page = loaded_page(&chain, &MockDisburser::default()).await;
    page.set_address_input(RECIPIENT).await;

    assert_eq!(page.button().label, LABEL_FAUCET_EMPTY);
}

#[tokio::test]
async fn test_unreadable_faucet_does_not_gate() {
    let chain = MockChain::funded();
    chain.fail_reads_for(addr(FAUCET));
    chain.fail_reads_for(addr(SIGNER));
    let mut page = loaded_page(&chain, &MockDisburser::default()).await;

    assert_eq!(page.status().message, "Failed to fetch balances.");
    page.set_address_input(RECIPIENT).await;
    assert_eq!(page.eligibility(), Eligibility::Eligible);
    assert_eq!(page.view().faucet.token.as_deref(), Some("error"));
}

#[tokio::test]
async fn test_revert_refreshes_and_clears_pending() {
    let chain = MockChain::funded();
    let disburser = MockDisburser::default();
    disburser.fail_confirm(TransactionError::Reverted { reason: Some("cooldown".into()) });
    let mut page = loaded_page(&chain, &disburser).await;
    page.set_address_input(RECIPIENT).await;
    let reads_before = chain.token_reads_of(recipient());

    let outcome = page.request_funds().await;

    assert!(matches!(outcome, RequestOutcome::Failure(TransactionError::Reverted { .. })));
    assert!(page.status().message.contains("rate-limited (cooldown)"));
    assert!(!page.is_pending());
    // Pre-flight read plus one refresh.
    assert_eq!(chain.token_reads_of(recipient()), reads_before + 2);
}

#[tokio::test]
async fn test_faucet_out_of_gas_is_reported() {
    let chain = MockChain::funded();
    let disburser = MockDisburser::default();
    disburser.fail_submit(TransactionError::InsufficientFunds);
    let mut page = loaded_page(&chain, &disburser).await;
    page.set_address_input(RECIPIENT).await;

    let outcome = page.request_funds().await;

    assert_eq!(outcome, RequestOutcome::Failure(TransactionError::InsufficientFunds));
    assert!(page.status().message.contains("out of funds or gas"));
    assert_eq!(page.status().tone, StatusTone::Failure);
    assert!(!page.is_pending());
}

#[tokio::test]
async fn test_editing_to_invalid_clears_subject() {
    let chain = MockChain::funded();
    chain.set_token(recipient(), tokens(42));
    let mut page = loaded_page(&chain, &MockDisburser::default()).await;
    page.set_address_input(RECIPIENT).await;
    assert_eq!(page.subject_balance().token, BalanceField::Amount(tokens(42)));

    page.set_address_input(&RECIPIENT[..20]).await;

    assert_eq!(page.subject_balance().token, BalanceField::NotFetched);
    assert_eq!(page.view().subject_address, None);
    assert_eq!(page.address_input(), &RECIPIENT[..20]);
}

#[tokio::test]
async fn test_cancelled_request_releases_pending() {
    let chain = MockChain::funded();
    let disburser = MockDisburser::default();
    disburser.stall_confirm(true);
    let mut page = loaded_page(&chain, &disburser).await;
    page.set_address_input(RECIPIENT).await;

    let attempt = tokio::time::timeout(std::time::Duration::from_millis(50), page.request_funds()).await;
    assert!(attempt.is_err());

    assert!(!page.is_pending());
    assert_eq!(page.button().label, LABEL_SEND);
    assert!(page.button().enabled);

    disburser.stall_confirm(false);
    let outcome = page.request_funds().await;
    assert_ne!(outcome, RequestOutcome::Refused(Refusal::InProgress));
    assert!(outcome.is_success());
    assert_eq!(disburser.submissions().len(), 2);
}

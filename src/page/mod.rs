//! Page view models.
//!
//! Each page is an explicit state container. Event handlers (`connect`, account
//! change, input change, button click) mutate it; [`PageView`] is what a renderer
//! draws.

mod address;
mod wallet;

pub use address::AddressFaucetPage;
pub use wallet::WalletFaucetPage;

use serde::Serialize;

use crate::amount::BalanceView;
use crate::eligibility::Eligibility;
use crate::status::Status;

/// The page's single action button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonView {
    pub label: &'static str,
    pub enabled: bool,
}

impl ButtonView {
    fn enabled(label: &'static str) -> Self {
        Self { label, enabled: true }
    }

    fn disabled(label: &'static str) -> Self {
        Self { label, enabled: false }
    }
}

/// Renderable snapshot of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    /// Connected account (wallet page) or parsed input address (address page).
    pub subject_address: Option<String>,
    pub subject: BalanceView,
    pub faucet: BalanceView,
    pub eligibility: Eligibility,
    pub pending: bool,
    pub button: ButtonView,
    pub status: Status,
    pub status_class: &'static str,
}

impl PageView {
    /// Plain-text rendering for terminals.
    pub fn render_text(&self) -> String {
        let dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
        let mut out = String::new();
        out.push_str(&format!("address : {}\n", dash(&self.subject_address)));
        out.push_str(&format!("tokens  : {}", dash(&self.subject.token)));
        if self.subject.native.is_some() {
            out.push_str(&format!("  native: {}", dash(&self.subject.native)));
        }
        out.push('\n');
        out.push_str(&format!("faucet  : {}", dash(&self.faucet.token)));
        if self.faucet.native.is_some() {
            out.push_str(&format!("  native: {}", dash(&self.faucet.native)));
        }
        out.push('\n');
        let marker = if self.button.enabled { ' ' } else { 'x' };
        out.push_str(&format!("[{}] {}\n", marker, self.button.label));
        if !self.status.message.is_empty() {
            out.push_str(&format!("status  : {}\n", self.status.message));
        }
        out
    }
}

pub const LABEL_CONNECT: &str = "Connect Wallet";
pub const LABEL_REQUEST: &str = "Request Tokens";
pub const LABEL_PROCESSING: &str = "Processing...";
pub const LABEL_ALREADY_FUNDED: &str = "Already has funds";
pub const LABEL_FAUCET_EMPTY: &str = "Faucet is empty";
pub const LABEL_SEND: &str = "Send Funds";
pub const LABEL_SENDING: &str = "Sending...";
pub const LABEL_ENTER_ADDRESS: &str = "Enter an address";

fn gated_button(eligibility: Eligibility) -> Option<ButtonView> {
    match eligibility {
        Eligibility::Eligible => None,
        Eligibility::AlreadyFunded => Some(ButtonView::disabled(LABEL_ALREADY_FUNDED)),
        Eligibility::FaucetDepleted => Some(ButtonView::disabled(LABEL_FAUCET_EMPTY)),
    }
}

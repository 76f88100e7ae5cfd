//! # faucet-pages
//!
//! State machines behind two test-token faucet pages:
//!
//! - [`WalletFaucetPage`]: the user connects a wallet and signs `disburse(recipient)`
//!   themselves.
//! - [`AddressFaucetPage`]: the user pastes an address and the faucet's own key signs
//!   the request.
//!
//! Both pages are explicit view models. Discrete events (connect, account change,
//! input edit, button click) update them, and [`page::PageView`] is what gets drawn.
//! Chain access goes through the traits in [`chain`], implemented on top of `ethers`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use faucet_pages::{AddressFaucetPage, BalanceReader, FaucetConfig};
//! use faucet_pages::chain::{KeyDisburser, RpcBalanceSource};
//!
//! # async fn run() -> faucet_pages::Result<()> {
//! let config = FaucetConfig::from_env()?;
//! let disburser = KeyDisburser::from_config(&config)?;
//! let balances = BalanceReader::new(RpcBalanceSource::from_config(&config)?, config.faucet_address)
//!     .with_native(disburser.signer_address());
//!
//! let mut page = AddressFaucetPage::new(disburser, balances).with_gas_limit(config.gas_limit);
//! page.load().await;
//! page.set_address_input("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").await;
//! let outcome = page.request_funds().await;
//! println!("{:?}: {}", outcome, page.status().message);
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod amount;
pub mod balance;
pub mod chain;
pub mod config;
pub mod connection;
pub mod disburse;
pub mod eligibility;
pub mod error;
pub mod page;
pub mod status;

pub use amount::{BalanceField, BalanceSnapshot};
pub use balance::BalanceReader;
pub use config::FaucetConfig;
pub use disburse::{Refusal, RequestOutcome};
pub use eligibility::{Eligibility, EligibilityRules};
pub use error::{FaucetError, Result, TransactionError, WalletError};
pub use page::{AddressFaucetPage, PageView, WalletFaucetPage};
pub use status::{Status, StatusTone};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

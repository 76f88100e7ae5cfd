//! Faucet page driver.
//!
//! Mounts one of the two faucet pages and drives it from stdin, one command per
//! line. The page is redrawn on stdout after every event; logs go to stderr.
//!
//! Usage:
//!   faucet-page wallet                  # commands: connect, request, refresh, quit
//!   faucet-page address [--address 0x…] # commands: address <0x…>, send, refresh, quit

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use faucet_pages::chain::{JsonRpcWallet, KeyDisburser, RpcBalanceSource};
use faucet_pages::{AddressFaucetPage, BalanceReader, FaucetConfig, PageView, Status, WalletFaucetPage};

#[derive(Parser)]
#[command(name = "faucet-page", version, about = "Test-token faucet pages")]
struct Cli {
    /// Render the page as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    page: PageKind,
}

#[derive(Subcommand)]
enum PageKind {
    /// Connect a wallet and sign the request with it.
    Wallet,
    /// Paste an address; the faucet key signs the request.
    Address {
        /// Pre-fill the address input.
        #[arg(long)]
        address: Option<String>,
    },
}

#[tokio::main]
async fn main() -> faucet_pages::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = FaucetConfig::from_env()?;
    tracing::info!(chain_id = config.chain_id, faucet = ?config.faucet_address, "configuration loaded");

    match cli.page {
        PageKind::Wallet => run_wallet_page(&config, cli.json).await,
        PageKind::Address { address } => run_address_page(&config, address, cli.json).await,
    }
}

async fn run_wallet_page(config: &FaucetConfig, json: bool) -> faucet_pages::Result<()> {
    let wallet = JsonRpcWallet::from_config(config)?;
    let balances = BalanceReader::new(RpcBalanceSource::from_config(config)?, config.faucet_address);
    let mut page = WalletFaucetPage::mount(wallet, balances, config.chain_id).with_gas_limit(config.gas_limit);
    let printer = spawn_status_printer(page.subscribe_status(), json);

    page.refresh_balances().await;
    render(&page.view(), json);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    "connect" => page.connect().await,
                    "request" => {
                        page.request_tokens().await;
                    }
                    "refresh" => page.refresh().await,
                    "quit" | "exit" => break,
                    "" => continue,
                    other => {
                        eprintln!("unknown command: {other} (connect, request, refresh, quit)");
                        continue;
                    }
                }
            }
            Some(accounts) = page.next_account_change() => {
                page.handle_accounts_changed(accounts).await;
            }
        }
        render(&page.view(), json);
    }

    page.unmount();
    printer.abort();
    Ok(())
}

async fn run_address_page(config: &FaucetConfig, address: Option<String>, json: bool) -> faucet_pages::Result<()> {
    let disburser = KeyDisburser::from_config(config)?;
    let balances = BalanceReader::new(RpcBalanceSource::from_config(config)?, config.faucet_address)
        .with_native(disburser.signer_address());
    let mut page = AddressFaucetPage::new(disburser, balances).with_gas_limit(config.gas_limit);
    let printer = spawn_status_printer(page.subscribe_status(), json);

    page.load().await;
    if let Some(address) = address {
        page.set_address_input(address).await;
    }
    render(&page.view(), json);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line.split_once(' ').map_or((line, ""), |(cmd, rest)| (cmd, rest.trim())) {
            ("address", input) => page.set_address_input(input).await,
            ("send", _) => {
                page.request_funds().await;
            }
            ("refresh", _) => page.refresh().await,
            ("quit" | "exit", _) => break,
            ("", _) => continue,
            (other, _) => {
                eprintln!("unknown command: {other} (address <0x…>, send, refresh, quit)");
                continue;
            }
        }
        render(&page.view(), json);
    }

    printer.abort();
    Ok(())
}

/// Echoes status changes as they happen, so "awaiting confirmation" shows while the
/// receipt is pending.
fn spawn_status_printer(mut updates: watch::Receiver<Status>, json: bool) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let status = updates.borrow_and_update().clone();
            if !json && !status.message.is_empty() {
                println!("» {}", status.message);
            }
        }
    })
}

fn render(view: &PageView, json: bool) {
    if json {
        match serde_json::to_string(view) {
            Ok(out) => println!("{out}"),
            Err(e) => eprintln!("failed to encode page view: {e}"),
        }
    } else {
        println!("{}", view.render_text());
    }
}

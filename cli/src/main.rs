//! feescan CLI: scan Hive for CW20 fees sent to the Astroport maker.
//!
//! Usage:
//! ```bash
//! # Scan the built-in height range and print every unique fee as JSON
//! feescan
//!
//! # CW20 balances of a wallet
//! feescan holdings --wallet terra1... --token terra1... --token terra1...
//! ```

mod logging;

use std::env;
use std::process;

use anyhow::{bail, Context};

use feescan_core::config::ScanConfig;
use feescan_hive::holdings::{token_holdings, DEFAULT_HOLDINGS_BATCH};
use feescan_hive::HiveClient;
use feescan_scanner::FeeScanner;

use logging::{init_tracing, LogConfig};

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    init_tracing(&LogConfig::default());

    let result = match args.get(1).map(String::as_str) {
        None | Some("scan") => {
            cmd_scan(&ScanConfig::default()).await;
            Ok(())
        }
        Some("holdings") => cmd_holdings(&args[2..]).await,
        Some("version" | "--version" | "-V") => {
            println!("feescan {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some("help" | "--help" | "-h") => {
            print_usage();
            Ok(())
        }
        Some(other) => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn print_usage() {
    println!("feescan {}", env!("CARGO_PKG_VERSION"));
    println!("Find CW20 fees sent to the Astroport maker\n");
    println!("USAGE:");
    println!("    feescan [COMMAND]\n");
    println!("COMMANDS:");
    println!("    scan       Scan the built-in height range (default)");
    println!("    holdings   Print CW20 balances of a wallet");
    println!("    version    Print version");
    println!("    help       Print this help\n");
    println!("HOLDINGS FLAGS:");
    println!("    --wallet <ADDR>   Wallet address  [required]");
    println!("    --token <ADDR>    CW20 contract, repeatable  [required]");
    println!("    --url <URL>       Hive endpoint  [default: {}]", ScanConfig::default().endpoint);
}

/// Run a scan. Failures are logged; the process still exits 0.
async fn cmd_scan(config: &ScanConfig) {
    let client = match HiveClient::default_for(&config.endpoint) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "could not create Hive client");
            return;
        }
    };

    let scanner = FeeScanner::new(client);
    let report = match scanner.scan_config(config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, "invalid scan configuration");
            return;
        }
    };

    for window in &report.failed_windows {
        tracing::warn!(start = window.start, end = window.end, reason = %window.reason, "heights not scanned");
    }

    println!("\nFees found:\n");
    for fee in &report.fees {
        match serde_json::to_string(fee) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::error!(error = %e, "could not encode fee"),
        }
    }
}

async fn cmd_holdings(args: &[String]) -> anyhow::Result<()> {
    let wallet = parse_flag(args, "--wallet").context("--wallet is required")?;
    let tokens = parse_flags(args, "--token");
    if tokens.is_empty() {
        bail!("at least one --token is required");
    }
    let url = parse_flag(args, "--url").unwrap_or_else(|| ScanConfig::default().endpoint);

    let client = HiveClient::default_for(&url)?;
    let holdings = token_holdings(&client, &tokens, &wallet, DEFAULT_HOLDINGS_BATCH).await;

    println!("{}", serde_json::to_string_pretty(&holdings)?);
    Ok(())
}

fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == flag)?;
    args.get(pos + 1).cloned()
}

fn parse_flags(args: &[String], flag: &str) -> Vec<String> {
    args.windows(2)
        .filter(|pair| pair[0] == flag)
        .map(|pair| pair[1].clone())
        .collect()
}

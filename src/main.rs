//! Onex network parameter inspector
//!
//! Selects a network the way a node does at startup and prints the
//! constants it would run with.

use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

use onex_params::chainparams::{all_profiles, Base58Type};
use onex_params::consensus::DeploymentPos;
use onex_params::constants::{CHAIN_NAME, COIN, DECIMAL_PLACES};
use onex_params::node::GenesisInfo;
use onex_params::p2p::dns_seed_targets;
use onex_params::{select_network, NetworkProfile};

/// Inspect Onex network parameters
#[derive(Parser, Debug)]
#[command(name = "onex-params")]
#[command(about = "Print the consensus parameters of an Onex network")]
struct Args {
    /// Network to select: main, test or regtest
    #[arg(short, long, env = "ONEX_NETWORK", default_value = "main")]
    network: String,

    /// Dump the full selected profile as JSON
    #[arg(long)]
    json: bool,

    /// Print a one-line summary for every network
    #[arg(long, conflicts_with = "json")]
    all: bool,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let profile = match select_network(&args.network) {
        Ok(profile) => profile,
        Err(e) => {
            error!(error = %e, "Network selection failed");
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if args.all {
        for profile in all_profiles() {
            print_summary_line(profile);
        }
        return ExitCode::SUCCESS;
    }

    if args.json {
        return match serde_json::to_string_pretty(profile) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, "Failed to serialize profile");
                ExitCode::FAILURE
            }
        };
    }

    print_profile(profile);
    ExitCode::SUCCESS
}

fn print_summary_line(profile: &NetworkProfile) {
    println!(
        "{:<8} port {:<6} magic {} genesis {} checkpoints {}",
        profile.network,
        profile.default_port,
        hex::encode(profile.message_start),
        profile.genesis_hash(),
        profile.checkpoint_data.checkpoints.len(),
    );
}

fn print_profile(profile: &NetworkProfile) {
    let consensus = &profile.consensus;

    println!("{} network: {}", CHAIN_NAME, profile.network);
    println!("  Port:         {}", profile.default_port);
    println!("  Magic:        {}", hex::encode(profile.message_start));
    println!();

    let genesis = GenesisInfo::from_block(&profile.genesis);
    println!("Genesis Block Information:");
    println!("  Hash:        {}", genesis.hash);
    println!("  Merkle Root: {}", genesis.merkle_root);
    println!("  Timestamp:   {}", genesis.time);
    println!("  Bits:        0x{:08x}", genesis.bits);
    println!("  Nonce:       {}", genesis.nonce);
    println!(
        "  Reward:      {}.{:0width$} {}",
        genesis.reward / COIN,
        genesis.reward % COIN,
        CHAIN_NAME,
        width = DECIMAL_PLACES as usize
    );
    println!();

    println!("Consensus:");
    println!("  Block spacing:       {}s", consensus.pow_target_spacing);
    println!("  Retarget interval:   {} blocks", consensus.difficulty_adjustment_interval());
    println!("  Pow limit:           0x{:08x}", consensus.pow_limit_compact());
    println!("  Halving interval:    {} blocks", consensus.subsidy_halving_interval);
    println!(
        "  Activation:          {}/{} blocks",
        consensus.rule_change_activation_threshold, consensus.miner_confirmation_window
    );
    for pos in DeploymentPos::ALL {
        let d = profile.deployment(pos);
        println!("  {:<20} bit {:<2} {} -> {}", format!("{pos}:"), d.bit, d.start_time, d.timeout);
    }
    println!();

    println!("Address prefixes:");
    for kind in Base58Type::ALL {
        println!("  {:<20} {}", format!("{kind:?}:"), hex::encode(profile.base58_prefix(kind)));
    }
    println!();

    let checkpoints = &profile.checkpoint_data;
    println!("Checkpoints:");
    for checkpoint in checkpoints.checkpoints {
        println!("  {:>6}  {}", checkpoint.height, checkpoint.hash);
    }
    println!("  Estimated height: >= {}", checkpoints.total_blocks_estimate());
    println!();

    println!("Seeds:");
    for target in dns_seed_targets(profile.dns_seeds, profile.default_port) {
        println!("  dns    {target}");
    }
    for addr in profile.fixed_seed_addresses() {
        println!("  fixed  {addr}");
    }
}

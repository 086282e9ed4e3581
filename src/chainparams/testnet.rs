//! Public test network

use super::mainnet::{MASTERNODE_PAYMENTS_PUBKEY, SPORK_PUBKEY};
use super::{AddressPrefixes, IntegrityError, Network, NetworkProfile, PolicyFlags};
use crate::consensus::{Bip9Deployment, Checkpoint, CheckpointData, ConsensusParams, DeploymentTable};
use crate::crypto::Hash;
use crate::node::{create_genesis_block, verify_genesis, GENESIS_HASH, GENESIS_MERKLE_ROOT, ONEX_GENESIS};
use crate::p2p::{TESTNET_DNS_SEEDS, TESTNET_FIXED_SEEDS};

static CHECKPOINTS: [Checkpoint; 1] = [Checkpoint { height: 0, hash: GENESIS_HASH }];

pub(super) fn build() -> Result<NetworkProfile, IntegrityError> {
    let genesis = create_genesis_block(&ONEX_GENESIS);
    verify_genesis(&genesis, &GENESIS_HASH, &GENESIS_MERKLE_ROOT)?;

    let consensus = ConsensusParams {
        hash_genesis_block: genesis.hash(),
        subsidy_halving_interval: 262_800,
        // below masternode_payments_increase_block
        masternode_payments_start_block: 10_000,
        masternode_payments_increase_block: 46_000,
        masternode_payments_increase_period: 576,
        instant_send_keep_lock: 6,
        budget_payments_start_block: 2_100_000_000,
        budget_payments_cycle_blocks: 50,
        budget_payments_window_blocks: 10,
        budget_proposal_establishing_time: 60 * 20,
        superblock_start_block: 2_100_000_000,
        // hourly
        superblock_cycle: 24,
        governance_min_quorum: 1,
        governance_filter_elements: 500,
        masternode_minimum_confirmations: 1,
        majority_enforce_block_upgrade: 51,
        majority_reject_block_outdated: 75,
        majority_window: 100,
        bip34_height: Some(21_111),
        bip34_hash: Hash::from_hex_literal(
            "0000000023b3a96d3484e5abb3755c413e7d41500f8e2a5c3f0dd01299cd8ef8",
        ),
        pow_limit: Hash::from_hex_literal(
            "00000fffff000000000000000000000000000000000000000000000000000000",
        ),
        pow_target_timespan: 60 * 60,
        pow_target_spacing: 2 * 60,
        pow_allow_min_difficulty_blocks: true,
        pow_no_retargeting: false,
        // 75% for testchains
        rule_change_activation_threshold: 1512,
        miner_confirmation_window: 2016,
        deployments: DeploymentTable::new([
            Bip9Deployment::new(28, 1_199_145_601, 1_230_767_999),
            Bip9Deployment::new(0, 1_502_280_000, 1_533_816_000),
        ]),
    };

    Ok(NetworkProfile {
        network: Network::Testnet,
        consensus,
        genesis,
        message_start: [0x1c, 0x14, 0xb2, 0x4b],
        alert_pubkey: Some("04560e810aa354c07e84467095ea58fb1838e754bd63fdc078774184833e0d8f2834a709602a4b49655fc54668454b61c2e59ea5b4f43f3615fcf74f95b7baf7cc"),
        default_port: 28291,
        // allow mining on top of old blocks
        max_tip_age: 0x7fff_ffff,
        prune_after_height: 1000,
        dns_seeds: TESTNET_DNS_SEEDS,
        fixed_seeds: TESTNET_FIXED_SEEDS,
        base58_prefixes: AddressPrefixes {
            // addresses start with 'n'
            pubkey_address: &[112],
            script_address: &[20],
            secret_key: &[240],
            // tpub / tprv
            ext_public_key: &[0x04, 0x35, 0x87, 0xCF],
            ext_secret_key: &[0x04, 0x35, 0x83, 0x94],
            ext_coin_type: &[0x80, 0x00, 0x00, 0x01],
        },
        flags: PolicyFlags {
            mining_requires_peers: true,
            default_consistency_checks: false,
            require_standard: false,
            mine_blocks_on_demand: false,
            testnet_to_be_deprecated_field_rpc: true,
        },
        pool_max_transactions: 3,
        fulfilled_request_expire_time: 5 * 60,
        spork_pubkey: Some(SPORK_PUBKEY),
        masternode_payments_pubkey: Some(MASTERNODE_PAYMENTS_PUBKEY),
        checkpoint_data: CheckpointData {
            checkpoints: &CHECKPOINTS,
            last_checkpoint_time: 1_510_444_800,
            transactions_last_checkpoint: 0,
            transactions_per_day: 500.0,
        },
    })
}

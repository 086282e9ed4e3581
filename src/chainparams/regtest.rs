//! Local regression-test network
//!
//! Instant, permissionless chain for tests: no seeds, no signing keys,
//! retargeting off and blocks mined on demand.

use super::{AddressPrefixes, IntegrityError, Network, NetworkProfile, PolicyFlags};
use crate::consensus::{Bip9Deployment, Checkpoint, CheckpointData, ConsensusParams, DeploymentTable};
use crate::crypto::Hash;
use crate::node::{create_genesis_block, verify_genesis, GENESIS_HASH, GENESIS_MERKLE_ROOT, ONEX_GENESIS};

static CHECKPOINTS: [Checkpoint; 1] = [Checkpoint { height: 0, hash: GENESIS_HASH }];

const NEVER_TIMES_OUT: i64 = 999_999_999_999;

pub(super) fn build() -> Result<NetworkProfile, IntegrityError> {
    let genesis = create_genesis_block(&ONEX_GENESIS);
    verify_genesis(&genesis, &GENESIS_HASH, &GENESIS_MERKLE_ROOT)?;

    let consensus = ConsensusParams {
        hash_genesis_block: genesis.hash(),
        subsidy_halving_interval: 150,
        masternode_payments_start_block: 240,
        masternode_payments_increase_block: 350,
        masternode_payments_increase_period: 10,
        instant_send_keep_lock: 6,
        budget_payments_start_block: 1000,
        budget_payments_cycle_blocks: 50,
        budget_payments_window_blocks: 10,
        budget_proposal_establishing_time: 60 * 20,
        superblock_start_block: 1500,
        superblock_cycle: 10,
        governance_min_quorum: 1,
        governance_filter_elements: 100,
        masternode_minimum_confirmations: 1,
        majority_enforce_block_upgrade: 750,
        majority_reject_block_outdated: 950,
        majority_window: 1000,
        bip34_height: None,
        bip34_hash: Hash::zero(),
        pow_limit: Hash::from_hex_literal(
            "7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        ),
        pow_target_timespan: 60 * 60,
        pow_target_spacing: 2 * 60,
        pow_allow_min_difficulty_blocks: true,
        pow_no_retargeting: true,
        rule_change_activation_threshold: 108,
        // 144 instead of 2016
        miner_confirmation_window: 144,
        deployments: DeploymentTable::new([
            Bip9Deployment::new(28, 0, NEVER_TIMES_OUT),
            Bip9Deployment::new(0, 0, NEVER_TIMES_OUT),
        ]),
    };

    Ok(NetworkProfile {
        network: Network::Regtest,
        consensus,
        genesis,
        message_start: [0x1d, 0x14, 0xb2, 0x4b],
        alert_pubkey: None,
        default_port: 38291,
        max_tip_age: 12 * 60 * 60,
        prune_after_height: 1000,
        dns_seeds: &[],
        fixed_seeds: &[],
        base58_prefixes: AddressPrefixes {
            pubkey_address: &[112],
            script_address: &[20],
            secret_key: &[240],
            ext_public_key: &[0x04, 0x35, 0x87, 0xCF],
            ext_secret_key: &[0x04, 0x35, 0x83, 0x94],
            ext_coin_type: &[0x80, 0x00, 0x00, 0x01],
        },
        flags: PolicyFlags {
            mining_requires_peers: false,
            default_consistency_checks: true,
            require_standard: false,
            mine_blocks_on_demand: true,
            testnet_to_be_deprecated_field_rpc: false,
        },
        pool_max_transactions: 3,
        fulfilled_request_expire_time: 5 * 60,
        spork_pubkey: None,
        masternode_payments_pubkey: None,
        checkpoint_data: CheckpointData {
            checkpoints: &CHECKPOINTS,
            last_checkpoint_time: 0,
            transactions_last_checkpoint: 0,
            transactions_per_day: 0.0,
        },
    })
}

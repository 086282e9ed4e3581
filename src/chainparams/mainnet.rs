//! Main network

use super::{AddressPrefixes, IntegrityError, Network, NetworkProfile, PolicyFlags};
use crate::consensus::{Bip9Deployment, Checkpoint, CheckpointData, ConsensusParams, DeploymentTable};
use crate::crypto::Hash;
use crate::node::{create_genesis_block, verify_genesis, GENESIS_HASH, GENESIS_MERKLE_ROOT, ONEX_GENESIS};
use crate::p2p::{MAINNET_DNS_SEEDS, MAINNET_FIXED_SEEDS};

/// Blocks pinned on the main chain.
///
/// Height 0 is the double SHA-256 content hash of the genesis header.
/// Heights past 0 keep the X11 proof-of-work hashes published by the
/// chain's operators (the genesis one is [`crate::node::GENESIS_X11_HASH`]),
/// so they only match blocks identified by their X11 hash, never
/// [`crate::consensus::Block::hash`].
static CHECKPOINTS: [Checkpoint; 8] = [
    Checkpoint { height: 0, hash: GENESIS_HASH },
    Checkpoint::new(33, "00000b4792fdd8f5e7435984fb0f9fbd31f3284ba6d182ff0fb226c1b0c14d1c"),
    Checkpoint::new(198, "000000378db684ba7ed54ea9442192877e265a533cdf87bc6094e98021aa000f"),
    Checkpoint::new(897, "0000000004dda89ffa5dc6bc50478a12db416b054c9040101a3182294c7835e8"),
    Checkpoint::new(1018, "0000000006b794f31ffb74e1ba593050f82c040839107fe37ef1016f51d8916b"),
    Checkpoint::new(1541, "0000000001864de05d6ef3ec744fdb008b2072b5122ddcefd72db16af3fb872b"),
    Checkpoint::new(1756, "0000000005559d698cc173c5a46684888ecb90ce9d2b8b591e76cc8fb19508b1"),
    Checkpoint::new(1989, "00000000027fd98e6761ef76ca5312272304d6882c9b1f82a2edd5be3ba66472"),
];

pub(super) fn build() -> Result<NetworkProfile, IntegrityError> {
    let genesis = create_genesis_block(&ONEX_GENESIS);
    verify_genesis(&genesis, &GENESIS_HASH, &GENESIS_MERKLE_ROOT)?;

    let consensus = ConsensusParams {
        hash_genesis_block: genesis.hash(),
        // one year
        subsidy_halving_interval: 394_200,
        masternode_payments_start_block: 10_080,
        masternode_payments_increase_block: 158_000,
        masternode_payments_increase_period: 576 * 30,
        instant_send_keep_lock: 24,
        // budget and superblocks are parked far in the future
        budget_payments_start_block: 2_100_000_000,
        budget_payments_cycle_blocks: 16_616,
        budget_payments_window_blocks: 100,
        budget_proposal_establishing_time: 60 * 60 * 24,
        superblock_start_block: 2_100_000_000,
        superblock_cycle: 16_616,
        governance_min_quorum: 10,
        governance_filter_elements: 20_000,
        masternode_minimum_confirmations: 15,
        majority_enforce_block_upgrade: 750,
        majority_reject_block_outdated: 950,
        majority_window: 1000,
        bip34_height: Some(227_931),
        bip34_hash: Hash::from_hex_literal(
            "000000000000024b89b42a942fe0d9fea3bb44ab7bd1b19115dd6a759c0808b8",
        ),
        pow_limit: Hash::from_hex_literal(
            "00000fffff000000000000000000000000000000000000000000000000000000",
        ),
        // 1 hour, 40 blocks of 90 seconds
        pow_target_timespan: 60 * 60,
        pow_target_spacing: 90,
        pow_allow_min_difficulty_blocks: false,
        pow_no_retargeting: false,
        // 95% of 2016
        rule_change_activation_threshold: 1916,
        miner_confirmation_window: 2016,
        deployments: DeploymentTable::new([
            // January 1 2008 to December 31 2008
            Bip9Deployment::new(28, 1_199_145_601, 1_230_767_999),
            // BIP68, BIP112 and BIP113: August 9 2017 to August 9 2018
            Bip9Deployment::new(0, 1_502_280_000, 1_533_816_000),
        ]),
    };

    Ok(NetworkProfile {
        network: Network::Main,
        consensus,
        genesis,
        message_start: [0x1b, 0x14, 0xb2, 0x4b],
        alert_pubkey: Some("040dffb6f5de41d01b2f6da8d5048d57c63cdf91051b6204f30b75f7183b88bca4746b754ce8e3573ce30a2c54ff9e7d318b1807249f8dd781d1ec470c800ad42b"),
        default_port: 18291,
        // about 240 blocks behind
        max_tip_age: 6 * 60 * 60,
        prune_after_height: 100_000,
        dns_seeds: MAINNET_DNS_SEEDS,
        fixed_seeds: MAINNET_FIXED_SEEDS,
        base58_prefixes: AddressPrefixes {
            // addresses start with 'X'
            pubkey_address: &[75],
            script_address: &[0],
            // provisional: shares the address byte
            secret_key: &[75],
            ext_public_key: &[0x04, 0x88, 0xB2, 0x1E],
            ext_secret_key: &[0x04, 0x88, 0xAD, 0xE4],
            ext_coin_type: &[0x80, 0x00, 0x00, 0x05],
        },
        flags: PolicyFlags {
            mining_requires_peers: true,
            default_consistency_checks: false,
            require_standard: true,
            mine_blocks_on_demand: false,
            testnet_to_be_deprecated_field_rpc: false,
        },
        pool_max_transactions: 3,
        fulfilled_request_expire_time: 60 * 60,
        spork_pubkey: Some(SPORK_PUBKEY),
        masternode_payments_pubkey: Some(MASTERNODE_PAYMENTS_PUBKEY),
        checkpoint_data: CheckpointData {
            checkpoints: &CHECKPOINTS,
            last_checkpoint_time: 1_510_643_344,
            transactions_last_checkpoint: 0,
            transactions_per_day: 2800.0,
        },
    })
}

/// Shared with testnet
pub(super) const SPORK_PUBKEY: &str = "0481869ed71446c6ce9036dab7b7375501e61a45c884723e81e7fb8fdd1b730b6dbf4fe764442c38fdd8ea1c2f1a8581478db59783219a3a873b0a9a954889e951";

/// Shared with testnet
pub(super) const MASTERNODE_PAYMENTS_PUBKEY: &str = "048615e041d52773052482df9bd081192234f1fba583e4d4781a85ee9f0f5af0a606fd6990f6edbdb0cb149673a7197d7e758282ffe901189677ba68134810ca0f";

//! Consensus parameters
//!
//! Timing and threshold constants that validation, mining and the
//! masternode/governance layers read from the active network.

use serde::Serialize;

use super::{target_to_compact, DeploymentTable};
use crate::crypto::Hash;

/// Consensus constants for one network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsensusParams {
    pub hash_genesis_block: Hash,
    pub subsidy_halving_interval: u32,

    pub masternode_payments_start_block: u32,
    pub masternode_payments_increase_block: u32,
    pub masternode_payments_increase_period: u32,
    pub instant_send_keep_lock: u32,

    pub budget_payments_start_block: u32,
    pub budget_payments_cycle_blocks: u32,
    pub budget_payments_window_blocks: u32,
    /// Seconds
    pub budget_proposal_establishing_time: i64,
    pub superblock_start_block: u32,
    pub superblock_cycle: u32,
    pub governance_min_quorum: u32,
    pub governance_filter_elements: u32,
    pub masternode_minimum_confirmations: u32,

    /// Used to check majorities for block version upgrade
    pub majority_enforce_block_upgrade: u32,
    pub majority_reject_block_outdated: u32,
    pub majority_window: u32,

    /// Block height and hash at which BIP34 becomes active; `None` when it
    /// has not necessarily activated on this chain
    pub bip34_height: Option<u32>,
    pub bip34_hash: Hash,

    /// Easiest target a block may claim
    pub pow_limit: Hash,
    /// Seconds
    pub pow_target_timespan: i64,
    /// Seconds
    pub pow_target_spacing: i64,
    pub pow_allow_min_difficulty_blocks: bool,
    pub pow_no_retargeting: bool,

    /// Minimum blocks including miner confirmation of the total of
    /// `miner_confirmation_window` blocks in a retargeting period
    pub rule_change_activation_threshold: u32,
    pub miner_confirmation_window: u32,
    pub deployments: DeploymentTable,
}

impl ConsensusParams {
    /// Blocks between difficulty retargets
    pub fn difficulty_adjustment_interval(&self) -> i64 {
        self.pow_target_timespan / self.pow_target_spacing
    }

    pub fn pow_limit_compact(&self) -> u32 {
        target_to_compact(&self.pow_limit)
    }

    /// Whether height-in-coinbase is enforced at `height`
    pub fn bip34_active_at(&self, height: u32) -> bool {
        self.bip34_height.is_some_and(|h| height >= h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::Bip9Deployment;

    fn params() -> ConsensusParams {
        ConsensusParams {
            hash_genesis_block: Hash::zero(),
            subsidy_halving_interval: 150,
            masternode_payments_start_block: 240,
            masternode_payments_increase_block: 350,
            masternode_payments_increase_period: 10,
            instant_send_keep_lock: 6,
            budget_payments_start_block: 1000,
            budget_payments_cycle_blocks: 50,
            budget_payments_window_blocks: 10,
            budget_proposal_establishing_time: 1200,
            superblock_start_block: 1500,
            superblock_cycle: 10,
            governance_min_quorum: 1,
            governance_filter_elements: 100,
            masternode_minimum_confirmations: 1,
            majority_enforce_block_upgrade: 750,
            majority_reject_block_outdated: 950,
            majority_window: 1000,
            bip34_height: Some(100),
            bip34_hash: Hash::zero(),
            pow_limit: Hash::from_hex_literal(
                "00000fffff000000000000000000000000000000000000000000000000000000",
            ),
            pow_target_timespan: 3600,
            pow_target_spacing: 90,
            pow_allow_min_difficulty_blocks: false,
            pow_no_retargeting: false,
            rule_change_activation_threshold: 108,
            miner_confirmation_window: 144,
            deployments: DeploymentTable::new([
                Bip9Deployment::new(28, 0, 999_999_999_999),
                Bip9Deployment::new(0, 0, 999_999_999_999),
            ]),
        }
    }

    #[test]
    fn test_difficulty_adjustment_interval() {
        assert_eq!(params().difficulty_adjustment_interval(), 40);
    }

    #[test]
    fn test_pow_limit_compact() {
        assert_eq!(params().pow_limit_compact(), 0x1e0fffff);
    }

    #[test]
    fn test_bip34_activation() {
        let mut p = params();
        assert!(!p.bip34_active_at(99));
        assert!(p.bip34_active_at(100));

        p.bip34_height = None;
        assert!(!p.bip34_active_at(u32::MAX));
    }
}

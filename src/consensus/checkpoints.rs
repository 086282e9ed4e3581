//! Hard-coded checkpoints
//!
//! A checkpoint pins the block hash expected at a given height. Any chain
//! that disagrees with a checkpoint is rejected no matter how much work it
//! carries, and no branch may fork off below the last checkpoint.

use serde::Serialize;
use thiserror::Error;

use crate::crypto::Hash;

/// How much more expensive a fully verified block is than one below the
/// last checkpoint, for progress estimation.
pub const SIGCHECK_VERIFICATION_FACTOR: f64 = 5.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Checkpoint errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckpointError {
    #[error("Block {found} at height {height} conflicts with checkpoint {expected}")]
    Mismatch {
        height: u32,
        expected: Hash,
        found: Hash,
    },
    #[error("Fork at height {fork_height} is below checkpoint at height {checkpoint_height}")]
    ForkBelowCheckpoint {
        fork_height: u32,
        checkpoint_height: u32,
    },
    #[error("Checkpoint heights not strictly increasing: {previous} then {next}")]
    NotIncreasing { previous: u32, next: u32 },
    #[error("Checkpoint at height 0 is {found}, genesis is {genesis}")]
    GenesisMismatch { genesis: Hash, found: Hash },
}

/// A single (height, hash) anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Checkpoint {
    pub height: u32,
    pub hash: Hash,
}

impl Checkpoint {
    pub const fn new(height: u32, hash: &str) -> Self {
        Self {
            height,
            hash: Hash::from_hex_literal(hash),
        }
    }
}

/// Checkpoints plus the chain statistics at the last one
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CheckpointData {
    /// Sorted by height
    pub checkpoints: &'static [Checkpoint],
    /// UNIX timestamp of last checkpoint block
    pub last_checkpoint_time: i64,
    /// Total number of transactions between genesis and last checkpoint
    pub transactions_last_checkpoint: u64,
    /// Estimated number of transactions per day after checkpoint
    pub transactions_per_day: f64,
}

impl CheckpointData {
    /// Expected hash at `height`, if it is checkpointed
    pub fn get(&self, height: u32) -> Option<&Hash> {
        self.checkpoints
            .binary_search_by_key(&height, |c| c.height)
            .ok()
            .map(|i| &self.checkpoints[i].hash)
    }

    /// Reject a block whose hash disagrees with the checkpoint at its height
    pub fn check_block(&self, height: u32, hash: &Hash) -> Result<(), CheckpointError> {
        match self.get(height) {
            Some(expected) if expected != hash => Err(CheckpointError::Mismatch {
                height,
                expected: *expected,
                found: *hash,
            }),
            _ => Ok(()),
        }
    }

    /// Check every (height, hash) of a candidate chain
    pub fn validate_chain<I>(&self, blocks: I) -> Result<(), CheckpointError>
    where
        I: IntoIterator<Item = (u32, Hash)>,
    {
        blocks
            .into_iter()
            .try_for_each(|(height, hash)| self.check_block(height, &hash))
    }

    /// Reject a branch that splits from the active chain below the last checkpoint
    pub fn check_fork_point(&self, fork_height: u32) -> Result<(), CheckpointError> {
        match self.last_checkpoint() {
            Some(last) if fork_height < last.height => Err(CheckpointError::ForkBelowCheckpoint {
                fork_height,
                checkpoint_height: last.height,
            }),
            _ => Ok(()),
        }
    }

    pub fn last_checkpoint(&self) -> Option<&Checkpoint> {
        self.checkpoints.last()
    }

    /// Height of the last checkpoint, a lower bound on the chain height
    pub fn total_blocks_estimate(&self) -> u32 {
        self.last_checkpoint().map_or(0, |c| c.height)
    }

    /// Table must be strictly increasing and agree with genesis at height 0
    pub fn validate(&self, genesis_hash: &Hash) -> Result<(), CheckpointError> {
        for pair in self.checkpoints.windows(2) {
            if pair[1].height <= pair[0].height {
                return Err(CheckpointError::NotIncreasing {
                    previous: pair[0].height,
                    next: pair[1].height,
                });
            }
        }

        match self.get(0) {
            Some(found) if found != genesis_hash => Err(CheckpointError::GenesisMismatch {
                genesis: *genesis_hash,
                found: *found,
            }),
            _ => Ok(()),
        }
    }

    /// Rough fraction (0.0 to 1.0) of the verification work done at a tip
    /// with `tip_time` and `tip_chain_tx` total transactions.
    ///
    /// Informational only; never feeds into consensus.
    pub fn guess_verification_progress(
        &self,
        tip_time: i64,
        tip_chain_tx: u64,
        now: i64,
        sigchecks: bool,
    ) -> f64 {
        let factor = if sigchecks {
            SIGCHECK_VERIFICATION_FACTOR
        } else {
            1.0
        };
        let per_day = self.transactions_per_day;
        let checkpoint_tx = self.transactions_last_checkpoint as f64;
        let tip_tx = tip_chain_tx as f64;

        let (work_before, work_after) = if tip_chain_tx <= self.transactions_last_checkpoint {
            let cheap_after = checkpoint_tx - tip_tx;
            let expensive_after =
                (now - self.last_checkpoint_time) as f64 / SECONDS_PER_DAY * per_day;
            (tip_tx, cheap_after + expensive_after * factor)
        } else {
            let expensive_before = tip_tx - checkpoint_tx;
            let expensive_after = (now - tip_time) as f64 / SECONDS_PER_DAY * per_day;
            (
                checkpoint_tx + expensive_before * factor,
                expensive_after * factor,
            )
        };

        let total = work_before + work_after;
        if total <= 0.0 {
            return 1.0;
        }
        (work_before / total).clamp(0.0, 1.0)
    }
}

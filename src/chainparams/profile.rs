//! Network profile
//!
//! One complete, self-consistent bundle of constants for a network. A
//! profile is built once from literals, verified, and never mutated.

use serde::{Serialize, Serializer};
use std::net::SocketAddr;
use thiserror::Error;

use super::Network;
use crate::consensus::{
    compact_to_target, target_exceeds, Block, Bip9Deployment, CheckpointData, CheckpointError,
    CompactError, ConsensusParams, DeploymentError, DeploymentPos,
};
use crate::crypto::Hash;
use crate::node::GenesisError;
use crate::p2p::{fixed_seed_addresses, DnsSeed, SeedSpec6};

/// Length of an uncompressed secp256k1 public key
const UNCOMPRESSED_PUBKEY_LEN: usize = 65;

/// Encoding purposes that carry a base58 version prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Base58Type {
    PubkeyAddress,
    ScriptAddress,
    SecretKey,
    ExtPublicKey,
    ExtSecretKey,
    ExtCoinType,
}

impl Base58Type {
    pub const ALL: [Base58Type; 6] = [
        Base58Type::PubkeyAddress,
        Base58Type::ScriptAddress,
        Base58Type::SecretKey,
        Base58Type::ExtPublicKey,
        Base58Type::ExtSecretKey,
        Base58Type::ExtCoinType,
    ];

    /// Prefix width the encoder expects
    pub const fn expected_len(self) -> usize {
        match self {
            Base58Type::PubkeyAddress | Base58Type::ScriptAddress | Base58Type::SecretKey => 1,
            Base58Type::ExtPublicKey | Base58Type::ExtSecretKey | Base58Type::ExtCoinType => 4,
        }
    }
}

/// Version bytes per [`Base58Type`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddressPrefixes {
    #[serde(serialize_with = "serialize_hex")]
    pub pubkey_address: &'static [u8],
    #[serde(serialize_with = "serialize_hex")]
    pub script_address: &'static [u8],
    #[serde(serialize_with = "serialize_hex")]
    pub secret_key: &'static [u8],
    #[serde(serialize_with = "serialize_hex")]
    pub ext_public_key: &'static [u8],
    #[serde(serialize_with = "serialize_hex")]
    pub ext_secret_key: &'static [u8],
    #[serde(serialize_with = "serialize_hex")]
    pub ext_coin_type: &'static [u8],
}

impl AddressPrefixes {
    pub fn get(&self, kind: Base58Type) -> &'static [u8] {
        match kind {
            Base58Type::PubkeyAddress => self.pubkey_address,
            Base58Type::ScriptAddress => self.script_address,
            Base58Type::SecretKey => self.secret_key,
            Base58Type::ExtPublicKey => self.ext_public_key,
            Base58Type::ExtSecretKey => self.ext_secret_key,
            Base58Type::ExtCoinType => self.ext_coin_type,
        }
    }
}

/// Node policy switches that differ between networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PolicyFlags {
    pub mining_requires_peers: bool,
    pub default_consistency_checks: bool,
    pub require_standard: bool,
    pub mine_blocks_on_demand: bool,
    pub testnet_to_be_deprecated_field_rpc: bool,
}

/// Configuration-integrity failures found while building a profile.
///
/// Any of these means the compiled-in constants are corrupt; the node must
/// not start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error(transparent)]
    Genesis(#[from] GenesisError),
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
    #[error(transparent)]
    Deployment(#[from] DeploymentError),
    #[error("Genesis bits are not a valid target: {0}")]
    GenesisBits(#[from] CompactError),
    #[error("Genesis target {target} exceeds pow limit {limit}")]
    GenesisAbovePowLimit { target: Hash, limit: Hash },
    #[error("{kind:?} prefix is {len} bytes, expected {expected}")]
    PrefixLength {
        kind: Base58Type,
        len: usize,
        expected: usize,
    },
    #[error("{name} is not a valid uncompressed public key")]
    InvalidKey { name: &'static str },
}

/// Every constant a node needs for one network
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkProfile {
    pub network: Network,
    pub consensus: ConsensusParams,
    pub genesis: Block,
    /// Wire message framing tag
    #[serde(serialize_with = "serialize_hex")]
    pub message_start: [u8; 4],
    /// Raw alert public key, hex
    pub alert_pubkey: Option<&'static str>,
    pub default_port: u16,
    /// Seconds a tip may lag before the node reports itself out of sync
    pub max_tip_age: i64,
    pub prune_after_height: u64,
    pub dns_seeds: &'static [DnsSeed],
    pub fixed_seeds: &'static [SeedSpec6],
    pub base58_prefixes: AddressPrefixes,
    pub flags: PolicyFlags,
    pub pool_max_transactions: u32,
    /// Seconds before a fulfilled network request may be repeated
    pub fulfilled_request_expire_time: i64,
    pub spork_pubkey: Option<&'static str>,
    pub masternode_payments_pubkey: Option<&'static str>,
    pub checkpoint_data: CheckpointData,
}

impl NetworkProfile {
    pub fn genesis_hash(&self) -> Hash {
        self.consensus.hash_genesis_block
    }

    pub fn base58_prefix(&self, kind: Base58Type) -> &'static [u8] {
        self.base58_prefixes.get(kind)
    }

    pub fn deployment(&self, pos: DeploymentPos) -> &Bip9Deployment {
        self.consensus.deployments.get(pos)
    }

    pub fn fixed_seed_addresses(&self) -> Vec<SocketAddr> {
        fixed_seed_addresses(self.fixed_seeds)
    }

    /// Check every internal invariant of the profile
    pub fn verify(&self) -> Result<(), IntegrityError> {
        let computed = self.genesis.hash();
        if computed != self.consensus.hash_genesis_block {
            return Err(GenesisError::HashMismatch {
                expected: self.consensus.hash_genesis_block,
                computed,
            }
            .into());
        }

        let merkle = self.genesis.compute_merkle_root();
        if merkle != self.genesis.header.merkle_root {
            return Err(GenesisError::MerkleRootMismatch {
                expected: self.genesis.header.merkle_root,
                computed: merkle,
            }
            .into());
        }

        let target = compact_to_target(self.genesis.header.bits)?;
        if target_exceeds(&target, &self.consensus.pow_limit) {
            return Err(IntegrityError::GenesisAbovePowLimit {
                target,
                limit: self.consensus.pow_limit,
            });
        }

        self.checkpoint_data.validate(&computed)?;

        self.consensus.deployments.validate(
            self.consensus.rule_change_activation_threshold,
            self.consensus.miner_confirmation_window,
        )?;

        for kind in Base58Type::ALL {
            let len = self.base58_prefix(kind).len();
            if len != kind.expected_len() {
                return Err(IntegrityError::PrefixLength {
                    kind,
                    len,
                    expected: kind.expected_len(),
                });
            }
        }

        let keys = [
            ("alert key", self.alert_pubkey),
            ("spork key", self.spork_pubkey),
            ("masternode payments key", self.masternode_payments_pubkey),
        ];
        for (name, key) in keys {
            if let Some(key) = key {
                let valid = hex::decode(key)
                    .map(|bytes| bytes.len() == UNCOMPRESSED_PUBKEY_LEN && bytes[0] == 0x04)
                    .unwrap_or(false);
                if !valid {
                    return Err(IntegrityError::InvalidKey { name });
                }
            }
        }

        Ok(())
    }
}

fn serialize_hex<T, S>(bytes: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: AsRef<[u8]>,
    S: Serializer,
{
    serializer.serialize_str(&hex::encode(bytes))
}

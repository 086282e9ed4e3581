//! Genesis block generation for the Onex chain
//!
//! Builds the parentless first block from a handful of literals and checks
//! it against the hashes every peer has pinned. All three networks share
//! the same genesis inputs.

use serde::Serialize;
use thiserror::Error;

use crate::consensus::{opcodes::OP_CHECKSIG, Block, BlockHeader, Script, Transaction};
use crate::constants::{Amount, COIN};
use crate::crypto::Hash;

/// Message embedded in the genesis coinbase
pub const GENESIS_TIMESTAMP_TEXT: &str = "Onex Cash Genesis Block mined by Onex Cash Team";

/// Uncompressed public key the genesis reward is paid to
pub const GENESIS_OUTPUT_PUBKEY: [u8; 65] = [
    0x04, 0x67, 0x8a, 0xfd, 0xb0, 0xfe, 0x55, 0x48, 0x27, 0x19, 0x67, 0xf1, 0xa6, 0x71, 0x30,
    0xb7, 0x10, 0x5c, 0xd6, 0xa8, 0x28, 0xe0, 0x39, 0x09, 0xa6, 0x79, 0x62, 0xe0, 0xea, 0x1f,
    0x61, 0xde, 0xb6, 0x49, 0xf6, 0xbc, 0x3f, 0x4c, 0xef, 0x38, 0xc4, 0xf3, 0x55, 0x04, 0xe5,
    0x1e, 0xc1, 0x12, 0xde, 0x5c, 0x38, 0x4d, 0xf7, 0xba, 0x0b, 0x8d, 0x57, 0x8a, 0x4c, 0x70,
    0x2b, 0x6b, 0xf1, 0x1d, 0x5f,
];

/// Compact bits literal pushed first in the coinbase unlocking script
const COINBASE_BITS_PUSH: i64 = 486_604_799;

/// Extra counter pushed after the bits literal
const COINBASE_EXTRA_NONCE: i64 = 4;

/// Header and reward literals of a genesis block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenesisParams {
    pub time: u32,
    pub nonce: u32,
    pub bits: u32,
    pub version: i32,
    pub reward: Amount,
}

/// Genesis inputs shared by main, test and regtest
pub const ONEX_GENESIS: GenesisParams = GenesisParams {
    time: 1_510_444_800,
    nonce: 240_798,
    bits: 0x1e0ffff0,
    version: 1,
    reward: 50 * COIN,
};

/// Double SHA-256 of the genesis header built from [`ONEX_GENESIS`]
pub const GENESIS_HASH: Hash =
    Hash::from_hex_literal("718bc42b3f30540f41e142f960049bf1c8be5663a7394e8efcef6abea69196dc");

/// X11 proof-of-work hash of the same header, as the running network
/// identifies its genesis block. Reference only: no X11 hasher is built in.
pub const GENESIS_X11_HASH: Hash =
    Hash::from_hex_literal("00000ee3a55532114881619e15da9dac3bb73f2875b2dc775106d2d37478cdeb");

pub const GENESIS_MERKLE_ROOT: Hash =
    Hash::from_hex_literal("991548dbdcf66408146039b1309cd39b439e54ddfccd4008556944397a8803e6");

/// Genesis verification errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenesisError {
    #[error("Genesis hash mismatch: expected {expected}, computed {computed}")]
    HashMismatch { expected: Hash, computed: Hash },
    #[error("Genesis merkle root mismatch: expected {expected}, computed {computed}")]
    MerkleRootMismatch { expected: Hash, computed: Hash },
}

/// Pay-to-pubkey script for the genesis reward
pub fn genesis_output_script() -> Script {
    Script::new()
        .push_slice(&GENESIS_OUTPUT_PUBKEY)
        .push_opcode(OP_CHECKSIG)
}

/// Build a genesis block whose coinbase embeds `timestamp_text` and pays
/// `params.reward` to `output_script`.
///
/// Pure: identical inputs always produce an identical block and hash.
pub fn create_genesis_block_with(
    timestamp_text: &str,
    output_script: Script,
    params: &GenesisParams,
) -> Block {
    let script_sig = Script::new()
        .push_int(COINBASE_BITS_PUSH)
        .push_num(COINBASE_EXTRA_NONCE)
        .push_slice(timestamp_text.as_bytes());

    let coinbase = Transaction::coinbase(script_sig, params.reward, output_script);

    let mut block = Block::new(
        BlockHeader {
            version: params.version,
            prev_hash: Hash::zero(),
            merkle_root: Hash::zero(),
            time: params.time,
            bits: params.bits,
            nonce: params.nonce,
        },
        vec![coinbase],
    );
    block.header.merkle_root = block.compute_merkle_root();
    block
}

/// Build the genesis block with the Onex coinbase message and output script
pub fn create_genesis_block(params: &GenesisParams) -> Block {
    create_genesis_block_with(GENESIS_TIMESTAMP_TEXT, genesis_output_script(), params)
}

/// Check a constructed genesis block against its pinned hashes
pub fn verify_genesis(
    block: &Block,
    expected_hash: &Hash,
    expected_merkle_root: &Hash,
) -> Result<(), GenesisError> {
    let computed = block.hash();
    if computed != *expected_hash {
        return Err(GenesisError::HashMismatch {
            expected: *expected_hash,
            computed,
        });
    }

    let computed = block.header.merkle_root;
    if computed != *expected_merkle_root {
        return Err(GenesisError::MerkleRootMismatch {
            expected: *expected_merkle_root,
            computed,
        });
    }

    Ok(())
}

/// Genesis block statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenesisInfo {
    pub hash: Hash,
    pub merkle_root: Hash,
    pub time: u32,
    pub bits: u32,
    pub nonce: u32,
    pub reward: Amount,
}

impl GenesisInfo {
    pub fn from_block(block: &Block) -> Self {
        Self {
            hash: block.hash(),
            merkle_root: block.header.merkle_root,
            time: block.header.time,
            bits: block.header.bits,
            nonce: block.header.nonce,
            reward: block.transactions.iter().map(|tx| tx.total_output()).sum(),
        }
    }
}

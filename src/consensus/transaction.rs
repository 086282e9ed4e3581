//! Transaction structure and consensus encoding
//!
//! Only the shape needed to build and hash the genesis coinbase.

use serde::Serialize;

use super::Script;
use crate::constants::Amount;
use crate::crypto::{sha256d, Hash};

/// Sequence number of a final input
pub const SEQUENCE_FINAL: u32 = 0xFFFF_FFFF;

/// Reference to a previous transaction output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutPoint {
    /// Hash of the transaction containing the output
    pub hash: Hash,
    /// Index of the output in that transaction
    pub index: u32,
}

impl OutPoint {
    /// The "no previous output" marker carried by coinbase inputs
    pub const fn null() -> Self {
        Self {
            hash: Hash::zero(),
            index: u32::MAX,
        }
    }

    pub fn is_null(&self) -> bool {
        self.hash.is_zero() && self.index == u32::MAX
    }
}

/// A transaction input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxInput {
    pub prevout: OutPoint,
    /// Unlocking script
    pub script_sig: Script,
    pub sequence: u32,
}

/// A transaction output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxOutput {
    /// Amount in base units
    pub value: Amount,
    /// Locking script
    pub script_pubkey: Script,
}

/// A complete transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub version: i32,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    pub lock_time: u32,
}

impl Transaction {
    /// Create a coinbase transaction paying `value` to `script_pubkey`
    pub fn coinbase(script_sig: Script, value: Amount, script_pubkey: Script) -> Self {
        Self {
            version: 1,
            inputs: vec![TxInput {
                prevout: OutPoint::null(),
                script_sig,
                sequence: SEQUENCE_FINAL,
            }],
            outputs: vec![TxOutput {
                value,
                script_pubkey,
            }],
            lock_time: 0,
        }
    }

    /// Check if this is a coinbase transaction
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].prevout.is_null()
    }

    /// Sum of all output values
    pub fn total_output(&self) -> Amount {
        self.outputs.iter().map(|o| o.value).sum()
    }

    /// Transaction id
    pub fn hash(&self) -> Hash {
        sha256d(&self.to_bytes())
    }

    /// Consensus wire encoding
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();

        bytes.extend_from_slice(&self.version.to_le_bytes());

        write_compact_size(&mut bytes, self.inputs.len() as u64);
        for input in &self.inputs {
            bytes.extend_from_slice(input.prevout.hash.as_bytes());
            bytes.extend_from_slice(&input.prevout.index.to_le_bytes());
            write_compact_size(&mut bytes, input.script_sig.len() as u64);
            bytes.extend_from_slice(input.script_sig.as_bytes());
            bytes.extend_from_slice(&input.sequence.to_le_bytes());
        }

        write_compact_size(&mut bytes, self.outputs.len() as u64);
        for output in &self.outputs {
            bytes.extend_from_slice(&output.value.to_le_bytes());
            write_compact_size(&mut bytes, output.script_pubkey.len() as u64);
            bytes.extend_from_slice(output.script_pubkey.as_bytes());
        }

        bytes.extend_from_slice(&self.lock_time.to_le_bytes());

        bytes
    }
}

/// Append a CompactSize length prefix
pub(crate) fn write_compact_size(bytes: &mut Vec<u8>, n: u64) {
    match n {
        0..=0xfc => bytes.push(n as u8),
        0xfd..=0xffff => {
            bytes.push(0xfd);
            bytes.extend_from_slice(&(n as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            bytes.push(0xfe);
            bytes.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            bytes.push(0xff);
            bytes.extend_from_slice(&n.to_le_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compact(n: u64) -> Vec<u8> {
        let mut out = Vec::new();
        write_compact_size(&mut out, n);
        out
    }

    #[test]
    fn test_compact_size_boundaries() {
        assert_eq!(compact(0), vec![0x00]);
        assert_eq!(compact(0xfc), vec![0xfc]);
        assert_eq!(compact(0xfd), vec![0xfd, 0xfd, 0x00]);
        assert_eq!(compact(0xffff), vec![0xfd, 0xff, 0xff]);
        assert_eq!(compact(0x1_0000), vec![0xfe, 0x00, 0x00, 0x01, 0x00]);
        assert_eq!(compact(0x1_0000_0000).len(), 9);
    }

    #[test]
    fn test_coinbase_detection() {
        let tx = Transaction::coinbase(Script::new().push_int(1), 50, Script::new());
        assert!(tx.is_coinbase());
        assert_eq!(tx.total_output(), 50);
    }

    #[test]
    fn test_coinbase_encoding_layout() {
        let tx = Transaction::coinbase(
            Script::new().push_int(17),
            1,
            Script::new().push_opcode(0xac),
        );
        let bytes = tx.to_bytes();
        // version(4) + vin count(1) + outpoint(36) + script len(1) + script(2)
        // + sequence(4) + vout count(1) + value(8) + script len(1) + script(1) + lock_time(4)
        assert_eq!(bytes.len(), 4 + 1 + 36 + 1 + 2 + 4 + 1 + 8 + 1 + 1 + 4);
        assert_eq!(&bytes[..4], &1i32.to_le_bytes());
        assert_eq!(&bytes[37..41], &[0xff, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn test_txid_changes_with_value() {
        let a = Transaction::coinbase(Script::new().push_int(17), 1, Script::new());
        let b = Transaction::coinbase(Script::new().push_int(17), 2, Script::new());
        assert_ne!(a.hash(), b.hash());
    }
}

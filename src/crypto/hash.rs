//! Double SHA-256 hashing
//!
//! Block headers, transaction ids and Merkle nodes are all hashed with
//! SHA-256 applied twice. Hashes are stored in the byte order the digest
//! produces and displayed reversed, the way 256-bit hashes are written
//! everywhere on this chain family.

use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

/// 32-byte hash in internal (little-endian) byte order
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hash(pub [u8; 32]);

impl Hash {
    /// All-zero hash (predecessor of the genesis block)
    pub const fn zero() -> Self {
        Hash([0u8; 32])
    }

    /// Create hash from bytes in internal order
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Hash(bytes)
    }

    /// Parse a display-order hex string, with or without a `0x` prefix.
    pub fn from_hex(hex: &str) -> Result<Self, hex::FromHexError> {
        let digits = hex
            .strip_prefix("0x")
            .or_else(|| hex.strip_prefix("0X"))
            .unwrap_or(hex);
        let mut bytes = hex::decode(digits)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        bytes.reverse();
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Hash(arr))
    }

    /// Compile-time twin of [`Hash::from_hex`] for hard-coded tables.
    ///
    /// A malformed literal is a build failure when used in a `const` item.
    pub const fn from_hex_literal(literal: &str) -> Self {
        let digits = literal.as_bytes();
        let mut start = 0;
        if digits.len() >= 2 && digits[0] == b'0' && (digits[1] == b'x' || digits[1] == b'X') {
            start = 2;
        }
        if digits.len() - start != 64 {
            panic!("hash literal must have exactly 64 hex digits");
        }

        let mut out = [0u8; 32];
        let mut i = 0;
        while i < 32 {
            let hi = hex_digit(digits[start + 2 * i]);
            let lo = hex_digit(digits[start + 2 * i + 1]);
            out[31 - i] = (hi << 4) | lo;
            i += 1;
        }
        Hash(out)
    }

    /// Display-order hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_be_bytes())
    }

    /// Get as bytes (internal order)
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Bytes in display order, i.e. as a big-endian 256-bit number
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut out = self.0;
        out.reverse();
        out
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

const fn hex_digit(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => panic!("invalid hex digit in hash literal"),
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.to_hex())
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Default for Hash {
    fn default() -> Self {
        Self::zero()
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// SHA256(SHA256(data))
pub fn sha256d(data: &[u8]) -> Hash {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    let mut out = [0u8; 32];
    out.copy_from_slice(&second);
    Hash(out)
}

/// Hash two hashes together (for Merkle tree)
pub fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut data = Vec::with_capacity(64);
    data.extend_from_slice(&left.0);
    data.extend_from_slice(&right.0);
    sha256d(&data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256d_known_vector() {
        // SHA256d("hello"), internal byte order
        let hash = sha256d(b"hello");
        assert_eq!(
            hex::encode(hash.0),
            "9595c9df90075148eb06860365df33584b75bff782a510c6cd4883a419833d50"
        );
    }

    #[test]
    fn test_hash_different_inputs() {
        assert_ne!(sha256d(b"hello"), sha256d(b"world"));
    }

    #[test]
    fn test_zero_hash() {
        let zero = Hash::zero();
        assert_eq!(zero.0, [0u8; 32]);
        assert!(zero.is_zero());
    }

    #[test]
    fn test_display_order_is_reversed() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0xab;
        let hash = Hash::from_bytes(bytes);
        assert!(hash.to_hex().ends_with("ab"));
        assert!(hash.to_hex().starts_with("00"));
    }

    #[test]
    fn test_hex_roundtrip() {
        let hash = sha256d(b"test");
        let recovered = Hash::from_hex(&hash.to_hex()).unwrap();
        assert_eq!(hash, recovered);
    }

    #[test]
    fn test_from_hex_accepts_prefix() {
        let plain = Hash::from_hex(
            "00000fffff000000000000000000000000000000000000000000000000000000",
        )
        .unwrap();
        let prefixed = Hash::from_hex(
            "0x00000fffff000000000000000000000000000000000000000000000000000000",
        )
        .unwrap();
        assert_eq!(plain, prefixed);
    }

    #[test]
    fn test_from_hex_rejects_short_input() {
        assert!(Hash::from_hex("00ff").is_err());
    }

    #[test]
    fn test_literal_matches_runtime_parser() {
        const LIT: Hash = Hash::from_hex_literal(
            "0x991548dbdcf66408146039b1309cd39b439e54ddfccd4008556944397a8803e6",
        );
        let parsed = Hash::from_hex(
            "991548dbdcf66408146039b1309cd39b439e54ddfccd4008556944397a8803e6",
        )
        .unwrap();
        assert_eq!(LIT, parsed);
    }

    #[test]
    fn test_hash_pair_order_matters() {
        let left = sha256d(b"left");
        let right = sha256d(b"right");
        assert_eq!(hash_pair(&left, &right), hash_pair(&left, &right));
        assert_ne!(hash_pair(&left, &right), hash_pair(&right, &left));
    }

    #[test]
    fn test_serializes_as_display_hex() {
        let hash = sha256d(b"json");
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", hash.to_hex()));
    }
}

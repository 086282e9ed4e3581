//! Compact difficulty encoding
//!
//! Conversion between the 32-bit compact `bits` field and 256-bit targets.
//! Retargeting itself lives with the validation layer.

use thiserror::Error;

use crate::crypto::Hash;

/// Compact target decoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CompactError {
    #[error("Negative compact target {0:#010x}")]
    Negative(u32),
    #[error("Compact target {0:#010x} overflows 256 bits")]
    Overflow(u32),
}

/// Decode compact difficulty into a 256-bit target
pub fn compact_to_target(compact: u32) -> Result<Hash, CompactError> {
    let size = (compact >> 24) as usize;
    let mut word = compact & 0x007f_ffff;

    if word != 0 && compact & 0x0080_0000 != 0 {
        return Err(CompactError::Negative(compact));
    }
    if word != 0 && (size > 34 || (word > 0xff && size > 33) || (word > 0xffff && size > 32)) {
        return Err(CompactError::Overflow(compact));
    }

    // Little-endian: byte k of the mantissa lands at position `shift + k`.
    let mut target = [0u8; 32];
    let shift = if size <= 3 {
        word >>= 8 * (3 - size);
        0
    } else {
        size - 3
    };
    for k in 0..3 {
        let pos = shift + k;
        if pos < 32 {
            target[pos] = ((word >> (8 * k)) & 0xff) as u8;
        }
    }

    Ok(Hash::from_bytes(target))
}

/// Encode a 256-bit target in compact form
pub fn target_to_compact(target: &Hash) -> u32 {
    let be = target.to_be_bytes();
    let Some(first) = be.iter().position(|&b| b != 0) else {
        return 0;
    };

    let mut size = (32 - first) as u32;
    let byte_at = |i: usize| be.get(i).copied().unwrap_or(0) as u32;
    let mut mantissa = (byte_at(first) << 16) | (byte_at(first + 1) << 8) | byte_at(first + 2);

    // The sign bit must stay clear
    if mantissa & 0x0080_0000 != 0 {
        mantissa >>= 8;
        size += 1;
    }

    (size << 24) | mantissa
}

/// True when `target` is numerically greater than `limit`
pub fn target_exceeds(target: &Hash, limit: &Hash) -> bool {
    target.to_be_bytes() > limit.to_be_bytes()
}

//! 32-bit FNV-1 and FNV-1a.
//!
//! Only used by [`IndexScheme::Fnv32Reference`](super::IndexScheme), which
//! reproduces an older index derivation bit for bit.

const FNV32_OFFSET: u32 = 0x811c_9dc5;
const FNV32_PRIME: u32 = 0x0100_0193;

/// FNV-1 32-bit: multiply, then XOR.
#[must_use]
#[inline]
pub fn fnv1_32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV32_OFFSET, |hash, &byte| {
        hash.wrapping_mul(FNV32_PRIME) ^ u32::from(byte)
    })
}

/// FNV-1a 32-bit: XOR, then multiply.
#[must_use]
#[inline]
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV32_OFFSET, |hash, &byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV32_PRIME)
    })
}

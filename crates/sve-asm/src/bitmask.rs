//! Bitmask-immediate encoding for the logical-immediate instruction class.
//!
//! ARM logical immediates compress a constant into `N:immr:imms`
//! (element size, rotation, run length). Only the contiguous-ones subset
//! `0…01…10…0` is supported here — rotated patterns are out of scope, so
//! a constant like `0x8000000000000001` is rejected even though the full
//! architecture could encode it.

use crate::operand::ElementType;

/// Decompose `v` into a contiguous run of set bits: returns
/// `(lsb, width)` where `lsb` is the number of zero bits below the run
/// and `width` the number of set bits. Zero and any non-contiguous
/// pattern return `None`.
pub fn bitfield_const(v: u64) -> Option<(u32, u32)> {
    if v == 0 {
        return None;
    }
    let lsb = v.trailing_zeros();
    let msb1 = 64 - v.leading_zeros();
    // A contiguous run satisfies v == 2^msb1 - 2^lsb.
    if (1u128 << msb1) - (1u128 << lsb) == u128::from(v) {
        Some((lsb, msb1 - lsb))
    } else {
        None
    }
}

/// Package a `(width, rotation)` pair as the 13-bit `N:immr:imms`
/// composite for element size `t`. `width` is the number of set bits,
/// `rotation` the number of zero bits below them.
///
/// Returns `None` for a 128-bit element type, which has no logical
/// immediate encoding.
pub fn logical_imm13(width: u32, rotation: u32, t: ElementType) -> Option<u32> {
    let imms = width - 1;
    let imm13 = match t {
        ElementType::B => imms | ((8 - rotation) & 7) << 6 | 0x30,
        ElementType::H => imms | ((16 - rotation) & 15) << 6 | 0x20,
        ElementType::S => imms | ((32 - rotation) & 31) << 6,
        ElementType::D => imms | 1 << 12 | ((64 - rotation) & 63) << 6,
        ElementType::Q => return None,
    };
    Some(imm13)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contiguous_runs() {
        assert_eq!(bitfield_const(0x1), Some((0, 1)));
        assert_eq!(bitfield_const(0xf), Some((0, 4)));
        assert_eq!(bitfield_const(0xfe), Some((1, 7)));
        assert_eq!(bitfield_const(0x3ffffffc), Some((2, 28)));
        assert_eq!(bitfield_const(u64::MAX), Some((0, 64)));
        assert_eq!(bitfield_const(0x8000000000000000), Some((63, 1)));
    }

    #[test]
    fn rejects_non_contiguous() {
        assert_eq!(bitfield_const(0), None);
        assert_eq!(bitfield_const(0b101), None);
        assert_eq!(bitfield_const(0xff00ff), None);
        // A rotated pattern the full architecture could encode.
        assert_eq!(bitfield_const(0x8000000000000001), None);
    }

    #[test]
    fn imm13_per_element_size() {
        // and x10, x11, #0xf → N:immr:imms for T=d
        let (lsb, width) = bitfield_const(0xf).unwrap();
        assert_eq!(logical_imm13(width, lsb, ElementType::D), Some(0x1003));
        // and z11.b, z11.b, #254 → imm13 carried in 0x05803ecb
        let (lsb, width) = bitfield_const(0xfe).unwrap();
        assert_eq!(logical_imm13(width, lsb, ElementType::B), Some(0b0_111_110_110));
        // q lanes have no encoding
        assert_eq!(logical_imm13(1, 0, ElementType::Q), None);
    }
}

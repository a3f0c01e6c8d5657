use core::ops::{Mul, MulAssign};

use crate::{Int128, Int128Error};

const MASK32: u64 = 0xFFFF_FFFF;

/// Exact unsigned 64×64 → 128 product, returned as `(hi, lo)`.
///
/// Splits both operands into 32-bit halves and recombines the four partial
/// products with carry propagation.
#[inline(always)]
pub const fn mul_u64x64(x: u64, y: u64) -> (u64, u64) {
    let x0 = x & MASK32;
    let x1 = x >> 32;
    let y0 = y & MASK32;
    let y1 = y >> 32;

    let p00 = x0 * y0;
    let p01 = x0 * y1;
    let p10 = x1 * y0;
    let p11 = x1 * y1;

    // Bits 32..96 of the low partials; three 32-bit terms cannot overflow
    let mid = (p00 >> 32) + (p01 & MASK32) + (p10 & MASK32);

    let lo = (p00 & MASK32) | (mid << 32);
    let hi = p11 + (p01 >> 32) + (p10 >> 32) + (mid >> 32);
    (hi, lo)
}

// ============================================================================
// Arithmetic Operations - Multiplication
// ============================================================================

impl Int128 {
    /// Wrapping multiplication, identical for signed and unsigned operands.
    ///
    /// The `hi × hi` cross term only contributes to bits ≥ 128 and is never
    /// computed.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn wrapping_mul(self, rhs: Self) -> Self {
        let (carry, lo) = mul_u64x64(self.lo_bits(), rhs.lo_bits());
        let hi = carry
            .wrapping_add(self.lo_bits().wrapping_mul(rhs.hi_bits()))
            .wrapping_add(self.hi_bits().wrapping_mul(rhs.lo_bits()));
        Self::from_bits(hi, lo)
    }

    /// Checked multiplication. Returns `None` if the signed product does not
    /// fit in 128 bits.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn checked_mul(self, rhs: Self) -> Option<Self> {
        if self.is_zero() || rhs.is_zero() {
            return Some(Self::ZERO);
        }

        let negative = self.is_negative() != rhs.is_negative();
        let a = self.abs();
        let b = rhs.abs();

        // Both magnitudes at least 2^64: product is at least 2^128
        if a.hi_bits() != 0 && b.hi_bits() != 0 {
            return None;
        }

        let (carry, lo) = mul_u64x64(a.lo_bits(), b.lo_bits());
        let (cross_hi, cross_lo) = if a.hi_bits() != 0 {
            mul_u64x64(a.hi_bits(), b.lo_bits())
        } else {
            mul_u64x64(a.lo_bits(), b.hi_bits())
        };
        if cross_hi != 0 {
            return None;
        }
        let (hi, overflow) = carry.overflowing_add(cross_lo);
        if overflow {
            return None;
        }

        let magnitude = Self::from_bits(hi, lo);
        if negative {
            // 2^127 is representable only as a negative result
            match magnitude.cmp_unsigned(Self::MIN) {
                core::cmp::Ordering::Greater => None,
                _ => Some(magnitude.wrapping_neg()),
            }
        } else if magnitude.is_negative() {
            None
        } else {
            Some(magnitude)
        }
    }

    /// Checked multiplication. Returns an error if overflow occurred.
    #[inline(always)]
    pub const fn try_mul(self, rhs: Self) -> crate::Result<Self> {
        match self.checked_mul(rhs) {
            Some(result) => Ok(result),
            None => Err(Int128Error::Overflow),
        }
    }
}

impl Mul for Int128 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self::Output {
        self.wrapping_mul(rhs)
    }
}

impl MulAssign for Int128 {
    #[inline(always)]
    fn mul_assign(&mut self, rhs: Self) {
        *self = self.wrapping_mul(rhs);
    }
}

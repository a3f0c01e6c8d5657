use core::cmp::Ordering;

use crate::Int128;
use crate::div::{div_rem_by_u64, div_rem_nonzero};

/// Largest exponent whose power of ten fits in the signed range.
pub const MAX_POW10_EXPONENT: u32 = 38;

/// Largest exponent whose power of ten fits in a single limb.
const MAX_SINGLE_LIMB_EXPONENT: u32 = 19;

/// Powers of ten `10^0 ..= 10^38`.
pub const POW10: [Int128; 39] = build_pow10();

const fn build_pow10() -> [Int128; 39] {
    let ten = Int128::from_i64(10);
    let mut table = [Int128::ONE; 39];
    let mut i = 1;
    while i < table.len() {
        table[i] = table[i - 1].wrapping_mul(ten);
        i += 1;
    }
    table
}

/// Returns `10^k`.
///
/// # Panics
/// Panics if `k > 38`.
#[inline(always)]
pub const fn pow10(k: u32) -> Int128 {
    assert!(k <= MAX_POW10_EXPONENT, "exponent must be <= 38");
    POW10[k as usize]
}

// ============================================================================
// Decimal Scaling
// ============================================================================

impl Int128 {
    /// Truncating division by `10^k`, returning `(quotient, remainder)`.
    ///
    /// Equal to `self.div_rem(10^k)` for every input. Exponents up to 19 use
    /// the single-limb division on the magnitude of `self`.
    ///
    /// # Panics
    /// Panics if `k > 38`.
    pub fn div_rem_pow10(self, k: u32) -> (Self, Self) {
        let divisor = pow10(k);
        if k > MAX_SINGLE_LIMB_EXPONENT {
            return div_rem_nonzero(self, divisor);
        }

        let magnitude = self.abs();
        let (q_hi, q_lo, r) =
            div_rem_by_u64(magnitude.hi_bits(), magnitude.lo_bits(), divisor.lo_bits());
        let q = Self::from_bits(q_hi, q_lo);
        let r = Self::from_u64(r);
        if self.is_negative() {
            (q.wrapping_neg(), r.wrapping_neg())
        } else {
            (q, r)
        }
    }

    /// Truncating division by `10^k`. Returns `None` if `k > 38`.
    #[inline]
    pub fn checked_div_rem_pow10(self, k: u32) -> Option<(Self, Self)> {
        if k > MAX_POW10_EXPONENT {
            return None;
        }
        Some(self.div_rem_pow10(k))
    }

    /// Divides by `10^k`, rounding half to even (banker's rounding).
    ///
    /// # Panics
    /// Panics if `k > 38`.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn div_round_half_even_pow10(self, k: u32) -> Self {
        let (q, r) = self.div_rem_pow10(k);
        match Self::cmp_half(r, k) {
            Ordering::Less => q,
            Ordering::Greater => self.away_from_zero(q),
            Ordering::Equal => {
                if q.lo_bits() & 1 == 0 {
                    q
                } else {
                    self.away_from_zero(q)
                }
            }
        }
    }

    /// Divides by `10^k`, rounding half away from zero.
    ///
    /// # Panics
    /// Panics if `k > 38`.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn div_round_half_up_pow10(self, k: u32) -> Self {
        let (q, r) = self.div_rem_pow10(k);
        match Self::cmp_half(r, k) {
            Ordering::Less => q,
            _ => self.away_from_zero(q),
        }
    }

    /// Divides by `10^k`, rounding towards negative infinity.
    ///
    /// # Panics
    /// Panics if `k > 38`.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn floor_div_pow10(self, k: u32) -> Self {
        let (q, r) = self.div_rem_pow10(k);
        if r.is_negative() { q.dec() } else { q }
    }

    /// Divides by `10^k`, rounding towards positive infinity.
    ///
    /// # Panics
    /// Panics if `k > 38`.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn ceil_div_pow10(self, k: u32) -> Self {
        let (q, r) = self.div_rem_pow10(k);
        if r.is_positive() { q.inc() } else { q }
    }

    /// Wrapping multiplication by `10^k`.
    ///
    /// # Panics
    /// Panics if `k > 38`.
    #[inline]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn mul_pow10(self, k: u32) -> Self {
        self.wrapping_mul(pow10(k))
    }

    /// Multiplication by `10^k`. Returns `None` on overflow.
    ///
    /// # Panics
    /// Panics if `k > 38`.
    #[inline]
    pub fn checked_mul_pow10(self, k: u32) -> Option<Self> {
        self.checked_mul(pow10(k))
    }

    /// Moves a fixed-point value from `from_scale` to `to_scale` decimal places.
    ///
    /// Scaling down rounds half to even; scaling up returns `None` on overflow.
    pub fn rescale(self, from_scale: u32, to_scale: u32) -> Option<Self> {
        if to_scale >= from_scale {
            let k = to_scale - from_scale;
            if k > MAX_POW10_EXPONENT {
                return if self.is_zero() { Some(Self::ZERO) } else { None };
            }
            self.checked_mul_pow10(k)
        } else {
            let k = from_scale - to_scale;
            if k > MAX_POW10_EXPONENT {
                // |self| <= 2^127 < 10^39 / 2
                return Some(Self::ZERO);
            }
            Some(self.div_round_half_even_pow10(k))
        }
    }

    /// Compares twice the remainder's magnitude with `10^k`.
    #[inline]
    fn cmp_half(r: Self, k: u32) -> Ordering {
        // |r| < 10^38 < 2^127, so doubling cannot leave the unsigned range
        r.abs().shift_left(1).cmp_unsigned(pow10(k))
    }

    /// Steps a truncated quotient one unit away from zero, following the
    /// sign of the dividend.
    #[inline]
    fn away_from_zero(self, q: Self) -> Self {
        if self.is_negative() { q.dec() } else { q.inc() }
    }
}

//! Signed 128-bit division.
//!
//! Division runs on unsigned magnitudes and restores signs afterwards. Two
//! unsigned paths exist:
//!
//! - **Fast path** when the divisor fits in one limb: a native 64-bit division
//!   of the high limb followed by a fixed 64-step restoring bit loop.
//! - **General path** when the divisor occupies both limbs: normalized
//!   two-limb long division (Knuth Algorithm D with a single-limb quotient).
//!
//! Every correction loop has a fixed iteration cap, so each call performs a
//! bounded amount of work regardless of its operands.

use core::cmp::Ordering;
use core::ops::{Div, DivAssign, Rem, RemAssign};

use crate::mul::mul_u64x64;
use crate::{Int128, Int128Error};

/// Maximum number of trial-quotient decrements against the low divisor limb.
const MAX_LOW_LIMB_CORRECTIONS: u32 = 2;

// ============================================================================
// Unsigned Kernels
// ============================================================================

/// Divides the two-limb value `(hi:lo)` by `d` where `hi < d`.
///
/// Returns `(quotient, remainder)`. Runs exactly 64 iterations.
#[inline]
pub(crate) fn div_128_by_64(hi: u64, lo: u64, d: u64) -> (u64, u64) {
    debug_assert!(hi < d, "quotient would not fit in one limb");

    let mut rem = hi;
    let mut quotient = 0u64;
    for bit in (0..64).rev() {
        // The running remainder is below d, so 2*rem + 1 < 2*d: one subtraction
        // restores it. `top` records the bit shifted out of the limb.
        let top = rem >> 63;
        rem = (rem << 1) | ((lo >> bit) & 1);
        if top != 0 || rem >= d {
            rem = rem.wrapping_sub(d);
            quotient |= 1 << bit;
        }
    }
    (quotient, rem)
}

/// Divides the unsigned two-limb value `(hi:lo)` by a one-limb divisor.
///
/// Returns `(quotient_hi, quotient_lo, remainder)`.
#[inline]
pub(crate) fn div_rem_by_u64(hi: u64, lo: u64, d: u64) -> (u64, u64, u64) {
    debug_assert!(d != 0);
    let q_hi = hi / d;
    let r = hi % d;
    let (q_lo, rem) = div_128_by_64(r, lo, d);
    (q_hi, q_lo, rem)
}

/// Long division for a divisor whose high limb is non-zero.
///
/// Returns `(quotient, remainder_hi, remainder_lo, corrections)`; the quotient
/// always fits in one limb and `corrections` counts the trial-quotient
/// decrements applied against the low divisor limb.
fn div_rem_two_limb(a_hi: u64, a_lo: u64, b_hi: u64, b_lo: u64) -> (u64, u64, u64, u32) {
    debug_assert!(b_hi != 0);

    // Normalize so the top bit of the divisor is set
    let s = b_hi.leading_zeros();
    let (d1, d0) = shl_pair(b_hi, b_lo, s);
    let n2 = if s == 0 { 0 } else { a_hi >> (64 - s) };
    let (n1, n0) = shl_pair(a_hi, a_lo, s);

    // Trial quotient from the top limbs. n2 < 2^s <= 2^63 <= d1 after
    // normalization, so the `n2 >= d1` arm is a guard that never runs here;
    // it caps the estimate at the largest limb value if it ever would.
    debug_assert!(n2 < d1);
    let (mut q_hat, mut r_hat, mut r_hat_overflow) = if n2 >= d1 {
        let (r, overflow) = n1.overflowing_add(d1);
        (u64::MAX, r, overflow)
    } else {
        let (q, r) = div_128_by_64(n2, n1, d1);
        (q, r, false)
    };

    // Refine against d0. Once r_hat needs more than one limb the product
    // test can no longer fail.
    let mut corrections = 0;
    while corrections < MAX_LOW_LIMB_CORRECTIONS && !r_hat_overflow {
        let (p_hi, p_lo) = mul_u64x64(q_hat, d0);
        if (p_hi, p_lo) <= (r_hat, n0) {
            break;
        }
        q_hat -= 1;
        (r_hat, r_hat_overflow) = r_hat.overflowing_add(d1);
        corrections += 1;
    }

    // Multiply and subtract: (n2:n1:n0) - q_hat * (d1:d0)
    let (p0_hi, p0_lo) = mul_u64x64(q_hat, d0);
    let (p1_hi, p1_lo) = mul_u64x64(q_hat, d1);
    let (t1, carry) = p1_lo.overflowing_add(p0_hi);
    let t2 = p1_hi + carry as u64;

    let (mut r0, borrow0) = n0.overflowing_sub(p0_lo);
    let (r1, borrow1a) = n1.overflowing_sub(t1);
    let (mut r1, borrow1b) = r1.overflowing_sub(borrow0 as u64);
    let (r2, borrow2a) = n2.overflowing_sub(t2);
    let (_, borrow2b) = r2.overflowing_sub((borrow1a || borrow1b) as u64);
    let restored = borrow2a || borrow2b;

    if restored {
        // Add back once
        q_hat -= 1;
        let (sum0, carry) = r0.overflowing_add(d0);
        r0 = sum0;
        r1 = r1.wrapping_add(d1).wrapping_add(carry as u64);
    }

    trace!(corrections, restored, "fixint: general division path");

    let (rem_hi, rem_lo) = shr_pair(r1, r0, s);
    (q_hat, rem_hi, rem_lo, corrections)
}

#[inline(always)]
fn shl_pair(hi: u64, lo: u64, s: u32) -> (u64, u64) {
    if s == 0 {
        (hi, lo)
    } else {
        ((hi << s) | (lo >> (64 - s)), lo << s)
    }
}

#[inline(always)]
fn shr_pair(hi: u64, lo: u64, s: u32) -> (u64, u64) {
    if s == 0 {
        (hi, lo)
    } else {
        (hi >> s, (lo >> s) | (hi << (64 - s)))
    }
}

/// Unsigned 128÷128 on bit patterns. The divisor must be non-zero.
pub(crate) fn div_rem_unsigned_nonzero(a: Int128, b: Int128) -> (Int128, Int128) {
    debug_assert!(!b.is_zero());

    if a.cmp_unsigned(b) == Ordering::Less {
        trace!("fixint: dividend below divisor, quick exit");
        return (Int128::ZERO, a);
    }

    if b.hi_bits() == 0 {
        trace!("fixint: single-limb division path");
        let (q_hi, q_lo, r) = div_rem_by_u64(a.hi_bits(), a.lo_bits(), b.lo_bits());
        return (Int128::from_bits(q_hi, q_lo), Int128::from_u64(r));
    }

    let (q, r_hi, r_lo, _) = div_rem_two_limb(a.hi_bits(), a.lo_bits(), b.hi_bits(), b.lo_bits());
    (Int128::from_u64(q), Int128::from_bits(r_hi, r_lo))
}

/// Signed truncating division with a non-zero divisor.
pub(crate) fn div_rem_nonzero(dividend: Int128, divisor: Int128) -> (Int128, Int128) {
    let neg_a = dividend.is_negative();
    let neg_b = divisor.is_negative();

    // MIN is its own magnitude: read as unsigned it is exactly 2^127
    let (q, r) = div_rem_unsigned_nonzero(dividend.abs(), divisor.abs());

    let quotient = if neg_a != neg_b { q.wrapping_neg() } else { q };
    let remainder = if neg_a { r.wrapping_neg() } else { r };
    (quotient, remainder)
}

// ============================================================================
// Arithmetic Operations - Division
// ============================================================================

impl Int128 {
    /// Truncating signed division returning `(quotient, remainder)`.
    ///
    /// The result satisfies `self == quotient * divisor + remainder`,
    /// `|remainder| < |divisor|`, and the remainder is zero or carries the sign
    /// of `self`. `MIN / -1` wraps to `MIN`.
    ///
    /// # Errors
    /// Returns [`Int128Error::DivisionByZero`] if `divisor` is zero.
    #[inline]
    pub fn div_rem(self, divisor: Self) -> crate::Result<(Self, Self)> {
        if divisor.is_zero() {
            return Err(Int128Error::DivisionByZero);
        }
        Ok(div_rem_nonzero(self, divisor))
    }

    /// Divides both operands as unsigned 128-bit values.
    ///
    /// # Errors
    /// Returns [`Int128Error::DivisionByZero`] if `divisor` is zero.
    #[inline]
    pub fn div_rem_unsigned(self, divisor: Self) -> crate::Result<(Self, Self)> {
        if divisor.is_zero() {
            return Err(Int128Error::DivisionByZero);
        }
        Ok(div_rem_unsigned_nonzero(self, divisor))
    }

    /// Writes the quotient and remainder into caller-owned slots. Neither slot
    /// is touched when `divisor` is zero.
    ///
    /// # Errors
    /// Returns [`Int128Error::DivisionByZero`] if `divisor` is zero.
    #[inline]
    pub fn div_rem_into(
        self,
        divisor: Self,
        quotient: &mut Self,
        remainder: &mut Self,
    ) -> crate::Result<()> {
        let (q, r) = self.div_rem(divisor)?;
        *quotient = q;
        *remainder = r;
        Ok(())
    }

    /// Checked division. Returns `None` if `divisor` is zero or for `MIN / -1`.
    #[inline]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn checked_div(self, divisor: Self) -> Option<Self> {
        if divisor == Self::MINUS_ONE && self == Self::MIN {
            return None;
        }
        self.div_rem(divisor).ok().map(|(q, _)| q)
    }

    /// Checked remainder. Returns `None` if `divisor` is zero.
    #[inline]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn checked_rem(self, divisor: Self) -> Option<Self> {
        self.div_rem(divisor).ok().map(|(_, r)| r)
    }

    /// Wrapping division. Panics on a zero divisor like native integers.
    #[inline]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn wrapping_div(self, divisor: Self) -> Self {
        self / divisor
    }

    /// Division returning an error for a zero divisor.
    #[inline]
    pub fn try_div(self, divisor: Self) -> crate::Result<Self> {
        self.div_rem(divisor).map(|(q, _)| q)
    }

    /// Remainder returning an error for a zero divisor.
    #[inline]
    pub fn try_rem(self, divisor: Self) -> crate::Result<Self> {
        self.div_rem(divisor).map(|(_, r)| r)
    }
}

impl Div for Int128 {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self::Output {
        assert!(!rhs.is_zero(), "attempt to divide by zero");
        div_rem_nonzero(self, rhs).0
    }
}

impl Rem for Int128 {
    type Output = Self;

    #[inline]
    fn rem(self, rhs: Self) -> Self::Output {
        assert!(
            !rhs.is_zero(),
            "attempt to calculate the remainder with a divisor of zero"
        );
        div_rem_nonzero(self, rhs).1
    }
}

impl DivAssign for Int128 {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl RemAssign for Int128 {
    #[inline]
    fn rem_assign(&mut self, rhs: Self) {
        *self = *self % rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn i(v: i128) -> Int128 {
        Int128::from_i128(v)
    }

    /// Checks the division identity, the remainder bound and the remainder sign.
    fn assert_div_laws(a: Int128, d: Int128) {
        let (q, r) = a.div_rem(d).unwrap();
        assert_eq!(q * d + r, a, "identity failed for {a:?} / {d:?}");
        assert_eq!(
            r.abs().cmp_unsigned(d.abs()),
            Ordering::Less,
            "remainder bound failed for {a:?} / {d:?}"
        );
        assert!(
            r.is_zero() || r.is_negative() == a.is_negative(),
            "remainder sign failed for {a:?} / {d:?}"
        );
    }

    #[test]
    fn test_div_128_by_64_kernel() {
        assert_eq!(div_128_by_64(0, 100, 7), (14, 2));
        assert_eq!(div_128_by_64(6, u64::MAX, 7), (u64::MAX, 6));
        // Running remainder crosses 2^63 before the subtraction
        let d = (1u64 << 63) + 1;
        let n = ((1u128 << 63) << 64) | 12345;
        assert_eq!(
            div_128_by_64(1 << 63, 12345, d),
            ((n / d as u128) as u64, (n % d as u128) as u64)
        );
    }

    #[test]
    fn test_division() {
        assert_eq!(i(100).div_rem(i(7)).unwrap(), (i(14), i(2)));
        assert_eq!(i(-100).div_rem(i(7)).unwrap(), (i(-14), i(-2)));
        assert_eq!(i(100).div_rem(i(-7)).unwrap(), (i(-14), i(2)));
        assert_eq!(i(-100).div_rem(i(-7)).unwrap(), (i(14), i(-2)));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(i(1).div_rem(Int128::ZERO), Err(Int128Error::DivisionByZero));
        assert_eq!(
            i(1).div_rem_unsigned(Int128::ZERO),
            Err(Int128Error::DivisionByZero)
        );
        assert_eq!(i(1).checked_div(Int128::ZERO), None);
        assert_eq!(i(1).checked_rem(Int128::ZERO), None);
        assert_eq!(i(1).try_div(Int128::ZERO), Err(Int128Error::DivisionByZero));
        assert_eq!(i(1).try_rem(Int128::ZERO), Err(Int128Error::DivisionByZero));
    }

    #[test]
    #[should_panic(expected = "attempt to divide by zero")]
    fn test_div_operator_by_zero_panics() {
        let _ = core::hint::black_box(Int128::ONE) / Int128::ZERO;
    }

    #[test]
    #[should_panic(expected = "attempt to calculate the remainder with a divisor of zero")]
    fn test_rem_operator_by_zero_panics() {
        let _ = core::hint::black_box(Int128::ONE) % Int128::ZERO;
    }

    #[test]
    fn test_min_divided_by_minus_one_wraps() {
        assert_eq!(
            Int128::MIN.div_rem(Int128::MINUS_ONE).unwrap(),
            (Int128::MIN, Int128::ZERO)
        );
        assert_eq!(Int128::MIN.checked_div(Int128::MINUS_ONE), None);
        assert_eq!(Int128::MIN.wrapping_div(Int128::MINUS_ONE), Int128::MIN);
    }

    #[test]
    fn test_max_divided_by_one() {
        assert_eq!(
            Int128::MAX.div_rem(Int128::ONE).unwrap(),
            (Int128::MAX, Int128::ZERO)
        );
    }

    #[test]
    fn test_min_as_operand() {
        assert_eq!(
            Int128::MIN.div_rem(Int128::MIN).unwrap(),
            (Int128::ONE, Int128::ZERO)
        );
        assert_eq!(
            Int128::MAX.div_rem(Int128::MIN).unwrap(),
            (Int128::ZERO, Int128::MAX)
        );
        assert_eq!(
            Int128::MIN.div_rem(Int128::MAX).unwrap(),
            (Int128::MINUS_ONE, Int128::MINUS_ONE)
        );
        assert_eq!(
            Int128::MIN.div_rem(i(2)).unwrap(),
            (i(i128::MIN / 2), Int128::ZERO)
        );
        assert_eq!(
            Int128::MIN.div_rem(i(3)).unwrap(),
            (i(i128::MIN / 3), i(i128::MIN % 3))
        );
        assert_eq!(
            i(-5).div_rem(Int128::MIN).unwrap(),
            (Int128::ZERO, i(-5))
        );
        for d in [
            Int128::MIN,
            Int128::MAX,
            Int128::MINUS_ONE,
            i(3),
            i(-3),
            i(1 << 64),
            i(-(1 << 100) - 7),
        ] {
            assert_div_laws(Int128::MIN, d);
            assert_div_laws(d, Int128::MIN);
        }
    }

    #[test]
    fn test_adversarial_pair_terminates() {
        let a = Int128::from_u128(0xFFFF000000000000FFFF000000000000);
        let d = Int128::from_u128(0x0000FFFF00000000FFFFFFFF00000001);
        assert_div_laws(a, d);
        let (q, r) = a.div_rem(d).unwrap();
        let (na, nd) = (a.to_i128(), d.to_i128());
        assert_eq!((q.to_i128(), r.to_i128()), (na / nd, na % nd));

        let (uq, ur) = a.div_rem_unsigned(d).unwrap();
        let (ua, ud) = (a.to_u128(), d.to_u128());
        assert_eq!((uq.to_u128(), ur.to_u128()), (ua / ud, ua % ud));
    }

    #[test]
    fn test_general_path_corrections() {
        // Divisors with both limbs occupied, including saturated low limbs
        let cases: [(u128, u128); 6] = [
            (u128::MAX, (1 << 64) | u64::MAX as u128),
            (u128::MAX, (1u128 << 127) | 1),
            ((1u128 << 127) - 1, (1 << 64) + 1),
            (0x8000_0000_0000_0000_0000_0000_0000_0000, 0x8000_0000_0000_0000_FFFF_FFFF_FFFF_FFFF),
            (0x7FFF_FFFF_FFFF_FFFF_0000_0000_0000_0000, 0x0000_0000_0000_0001_FFFF_FFFF_FFFF_FFFF),
            (0xFFFF_FFFF_FFFF_FFFE_0000_0000_0000_0000, 0x0000_0000_FFFF_FFFF_FFFF_FFFF_FFFF_FFFF),
        ];
        for (a, d) in cases {
            let (q, r) = Int128::from_u128(a)
                .div_rem_unsigned(Int128::from_u128(d))
                .unwrap();
            assert_eq!((q.to_u128(), r.to_u128()), (a / d, a % d), "{a:#x} / {d:#x}");
        }
    }

    #[test]
    fn test_general_path_low_limb_correction() {
        // Trial quotient from the top limbs is one too large
        let cases: [(u128, u128); 4] = [
            (0xffff_ffff_ffff_ffff_f0e0_2bd5_68aa_2b3e, 0x1_442e_3d43_7204_e52d),
            (0x377b_9aa2_bb2e_db22_9649_42de_59ef_21e0, 0x2_92ed_cf45_1a1a_fe87),
            (0x8a88_7204_90a2_112c_5c6a_7bbc_40c9_69bc, 0x92_6bf5_9e05_39e7_d547),
            (0xba54_11ca_f3ac_3238_2a56_367b_f4b7_05f0, 0xc625_e17a_532f_2109_b067),
        ];
        for (a, d) in cases {
            let (q, r_hi, r_lo, corrections) =
                div_rem_two_limb((a >> 64) as u64, a as u64, (d >> 64) as u64, d as u64);
            assert_eq!(corrections, 1, "{a:#x} / {d:#x}");
            let r = ((r_hi as u128) << 64) | r_lo as u128;
            assert_eq!((q as u128, r), (a / d, a % d), "{a:#x} / {d:#x}");
        }

        let (q, r) = Int128::from_u128(cases[0].0)
            .div_rem_unsigned(Int128::from_u128(cases[0].1))
            .unwrap();
        assert_eq!(q.to_u128(), 0xca28_ae12_c779_cab2);
        assert_eq!(r.to_u128(), 0x1_00ba_f557_f728_4ff4);
    }

    #[test]
    fn test_quick_exit() {
        let a = i(-(1 << 70));
        let d = i(1 << 80);
        assert_eq!(a.div_rem(d).unwrap(), (Int128::ZERO, a));
    }

    #[test]
    fn test_div_rem_into() {
        let mut q = Int128::ZERO;
        let mut r = Int128::ZERO;
        i(-17).div_rem_into(i(5), &mut q, &mut r).unwrap();
        assert_eq!((q, r), (i(-3), i(-2)));

        let err = i(1).div_rem_into(Int128::ZERO, &mut q, &mut r);
        assert_eq!(err, Err(Int128Error::DivisionByZero));
        assert_eq!((q, r), (i(-3), i(-2)));
    }

    #[test]
    fn test_operators() {
        let mut v = i(1_000_000_000_000_000_000_000);
        assert_eq!(v / i(1_000), i(1_000_000_000_000_000_000));
        assert_eq!(v % i(7), i(1_000_000_000_000_000_000_000 % 7));
        v /= i(-10);
        assert_eq!(v, i(-100_000_000_000_000_000_000));
        v %= i(3);
        assert_eq!(v, i(-100_000_000_000_000_000_000 % 3));
    }
}

#[cfg(test)]
mod div_property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Operands biased towards limb boundaries and the sign edge.
    fn edgy_i128() -> impl Strategy<Value = i128> {
        prop_oneof![
            any::<i128>(),
            any::<i64>().prop_map(|v| v as i128),
            any::<u64>().prop_map(|v| (v as i128) << 64),
            (any::<u64>(), 0u32..64).prop_map(|(v, s)| ((v as i128) << 64 >> s) | 1),
            Just(i128::MIN),
            Just(i128::MAX),
            Just(-1i128),
        ]
    }

    proptest! {
        #[test]
        fn prop_div_rem_matches_native(a in edgy_i128(), d in edgy_i128()) {
            prop_assume!(d != 0);
            let (q, r) = Int128::from_i128(a).div_rem(Int128::from_i128(d)).unwrap();
            prop_assert_eq!(q.to_i128(), a.wrapping_div(d));
            prop_assert_eq!(r.to_i128(), a.wrapping_rem(d));
        }

        #[test]
        fn prop_div_rem_laws(a in edgy_i128(), d in edgy_i128()) {
            prop_assume!(d != 0);
            let x = Int128::from_i128(a);
            let y = Int128::from_i128(d);
            let (q, r) = x.div_rem(y).unwrap();
            prop_assert_eq!(q * y + r, x);
            prop_assert_eq!(r.abs().cmp_unsigned(y.abs()), Ordering::Less);
            prop_assert!(r.is_zero() || r.is_negative() == x.is_negative());
        }

        #[test]
        fn prop_unsigned_div_matches_native(a in any::<u128>(), d in any::<u128>()) {
            prop_assume!(d != 0);
            let (q, r) = Int128::from_u128(a).div_rem_unsigned(Int128::from_u128(d)).unwrap();
            prop_assert_eq!(q.to_u128(), a / d);
            prop_assert_eq!(r.to_u128(), a % d);
        }

        #[test]
        fn prop_div_128_by_64_matches_native(hi in any::<u64>(), lo in any::<u64>(), d in 1u64..) {
            let hi = hi % d;
            let n = ((hi as u128) << 64) | lo as u128;
            prop_assert_eq!(
                div_128_by_64(hi, lo, d),
                ((n / d as u128) as u64, (n % d as u128) as u64)
            );
        }
    }
}

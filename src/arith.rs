use core::cmp::Ordering;

use crate::Int128;

/// Operations a signed 128-bit implementation must provide to be used in
/// place of [`Int128`].
///
/// Implementations must wrap on add, subtract and multiply, truncate towards
/// zero on division, give the remainder the sign of the dividend, and map
/// `MIN / -1` to `MIN`.
pub trait Int128Arithmetic: Copy + Eq + core::fmt::Debug {
    /// Builds a value from its raw high and low limbs.
    fn from_parts(hi: i64, lo: i64) -> Self;

    fn high(self) -> i64;

    fn low(self) -> i64;

    fn wrapping_add(self, rhs: Self) -> Self;

    fn wrapping_sub(self, rhs: Self) -> Self;

    fn wrapping_mul(self, rhs: Self) -> Self;

    /// Truncating division. Fails only for a zero divisor.
    fn div_rem(self, divisor: Self) -> crate::Result<(Self, Self)>;

    fn cmp_signed(self, other: Self) -> Ordering;

    fn is_zero(self) -> bool;

    fn is_negative(self) -> bool;

    fn is_positive(self) -> bool;
}

impl Int128Arithmetic for Int128 {
    #[inline(always)]
    fn from_parts(hi: i64, lo: i64) -> Self {
        Int128::from_parts(hi, lo)
    }

    #[inline(always)]
    fn high(self) -> i64 {
        Int128::high(self)
    }

    #[inline(always)]
    fn low(self) -> i64 {
        Int128::low(self)
    }

    #[inline(always)]
    fn wrapping_add(self, rhs: Self) -> Self {
        Int128::wrapping_add(self, rhs)
    }

    #[inline(always)]
    fn wrapping_sub(self, rhs: Self) -> Self {
        Int128::wrapping_sub(self, rhs)
    }

    #[inline(always)]
    fn wrapping_mul(self, rhs: Self) -> Self {
        Int128::wrapping_mul(self, rhs)
    }

    #[inline(always)]
    fn div_rem(self, divisor: Self) -> crate::Result<(Self, Self)> {
        Int128::div_rem(self, divisor)
    }

    #[inline(always)]
    fn cmp_signed(self, other: Self) -> Ordering {
        Int128::cmp_signed(self, other)
    }

    #[inline(always)]
    fn is_zero(self) -> bool {
        Int128::is_zero(self)
    }

    #[inline(always)]
    fn is_negative(self) -> bool {
        Int128::is_negative(self)
    }

    #[inline(always)]
    fn is_positive(self) -> bool {
        Int128::is_positive(self)
    }
}

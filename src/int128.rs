use core::cmp::Ordering;
use core::fmt;
use core::iter::{Product, Sum};
use core::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Neg, Not,
    Shl, ShlAssign, Shr, ShrAssign, Sub, SubAssign,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::Int128Error;

/// Signed 128-bit two's-complement integer stored as two 64-bit limbs.
///
/// The value is `hi * 2^64 + lo (mod 2^128)`, where `hi` carries the sign bit
/// and `lo` is always combined as an unsigned limb even though it is stored as
/// an `i64`.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Int128 {
    hi: i64,
    lo: i64,
}

// ============================================================================
// Constants
// ============================================================================

impl Int128 {
    /// Zero
    pub const ZERO: Self = Self { hi: 0, lo: 0 };

    /// One
    pub const ONE: Self = Self { hi: 0, lo: 1 };

    /// Minus one (all bits set)
    pub const MINUS_ONE: Self = Self { hi: -1, lo: -1 };

    /// Largest value: 2^127 - 1
    pub const MAX: Self = Self {
        hi: i64::MAX,
        lo: -1,
    };

    /// Smallest value: -2^127. Has no positive counterpart.
    pub const MIN: Self = Self { hi: i64::MIN, lo: 0 };

    /// The number of bits in the representation.
    pub const BITS: u32 = 128;

    /// The size of this type in bytes.
    pub const BYTES: usize = 16;
}

// ============================================================================
// Constructors and Raw Access
// ============================================================================

impl Default for Int128 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Int128 {
    /// Creates a value from its raw limbs. Bit-exact, no validation.
    #[inline(always)]
    pub const fn from_parts(hi: i64, lo: i64) -> Self {
        Self { hi, lo }
    }

    /// Sign-extends a signed machine word into the high limb.
    #[inline(always)]
    pub const fn from_i64(value: i64) -> Self {
        Self {
            hi: value >> 63,
            lo: value,
        }
    }

    /// Zero-extends an unsigned machine word.
    #[inline(always)]
    pub const fn from_u64(value: u64) -> Self {
        Self {
            hi: 0,
            lo: value as i64,
        }
    }

    /// Splits a native `i128` into limbs.
    #[inline(always)]
    pub const fn from_i128(value: i128) -> Self {
        Self {
            hi: (value >> 64) as i64,
            lo: value as i64,
        }
    }

    /// Reinterprets the bits of a `u128`.
    #[inline(always)]
    pub const fn from_u128(value: u128) -> Self {
        Self {
            hi: (value >> 64) as i64,
            lo: value as i64,
        }
    }

    /// Returns the high (sign-carrying) limb.
    #[inline(always)]
    pub const fn high(self) -> i64 {
        self.hi
    }

    /// Returns the low limb as stored. Combine it as unsigned.
    #[inline(always)]
    pub const fn low(self) -> i64 {
        self.lo
    }

    #[inline(always)]
    pub(crate) const fn hi_bits(self) -> u64 {
        self.hi as u64
    }

    #[inline(always)]
    pub(crate) const fn lo_bits(self) -> u64 {
        self.lo as u64
    }

    #[inline(always)]
    pub(crate) const fn from_bits(hi: u64, lo: u64) -> Self {
        Self {
            hi: hi as i64,
            lo: lo as i64,
        }
    }

    /// Combines the limbs into a native `i128`.
    #[inline(always)]
    pub const fn to_i128(self) -> i128 {
        ((self.hi as i128) << 64) | (self.lo as u64 as i128)
    }

    /// Combines the limbs into a native `u128` bit pattern.
    #[inline(always)]
    pub const fn to_u128(self) -> u128 {
        ((self.hi as u64 as u128) << 64) | (self.lo as u64 as u128)
    }

    /// Returns the value as `i64` if it fits.
    #[inline(always)]
    pub const fn to_i64(self) -> Option<i64> {
        if self.hi == (self.lo >> 63) {
            Some(self.lo)
        } else {
            None
        }
    }
}

// ============================================================================
// Arithmetic Operations - Addition and Subtraction
// ============================================================================

impl Int128 {
    /// Wrapping addition. The carry out of the low limb is detected with an
    /// unsigned comparison.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn wrapping_add(self, rhs: Self) -> Self {
        let lo = self.lo_bits().wrapping_add(rhs.lo_bits());
        let carry = (lo < self.lo_bits()) as i64;
        Self {
            hi: self.hi.wrapping_add(rhs.hi).wrapping_add(carry),
            lo: lo as i64,
        }
    }

    /// Wrapping subtraction.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn wrapping_sub(self, rhs: Self) -> Self {
        let borrow = (self.lo_bits() < rhs.lo_bits()) as i64;
        Self {
            hi: self.hi.wrapping_sub(rhs.hi).wrapping_sub(borrow),
            lo: self.lo.wrapping_sub(rhs.lo),
        }
    }

    /// Checked addition. Returns `None` if the signed result overflowed.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        let sum = self.wrapping_add(rhs);
        // Operands agree in sign but the sum does not
        if (self.hi ^ sum.hi) & (rhs.hi ^ sum.hi) < 0 {
            None
        } else {
            Some(sum)
        }
    }

    /// Checked subtraction. Returns `None` if the signed result overflowed.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn checked_sub(self, rhs: Self) -> Option<Self> {
        let diff = self.wrapping_sub(rhs);
        if (self.hi ^ rhs.hi) & (self.hi ^ diff.hi) < 0 {
            None
        } else {
            Some(diff)
        }
    }

    /// Checked addition. Returns an error if overflow occurred.
    #[inline(always)]
    pub const fn try_add(self, rhs: Self) -> crate::Result<Self> {
        match self.checked_add(rhs) {
            Some(result) => Ok(result),
            None => Err(Int128Error::Overflow),
        }
    }

    /// Checked subtraction. Returns an error if overflow occurred.
    #[inline(always)]
    pub const fn try_sub(self, rhs: Self) -> crate::Result<Self> {
        match self.checked_sub(rhs) {
            Some(result) => Ok(result),
            None => Err(Int128Error::Overflow),
        }
    }

    /// Adds one, wrapping `MAX` to `MIN`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn inc(self) -> Self {
        let lo = self.lo.wrapping_add(1);
        Self {
            hi: self.hi.wrapping_add((lo == 0) as i64),
            lo,
        }
    }

    /// Subtracts one, wrapping `MIN` to `MAX`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn dec(self) -> Self {
        Self {
            hi: self.hi.wrapping_sub((self.lo == 0) as i64),
            lo: self.lo.wrapping_sub(1),
        }
    }
}

// ============================================================================
// Arithmetic Operations - Negation and Absolute Value
// ============================================================================

impl Int128 {
    /// Two's-complement negation: complement both limbs and add one.
    ///
    /// `MIN` maps to itself.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn wrapping_neg(self) -> Self {
        let lo = (!self.lo).wrapping_add(1);
        Self {
            hi: (!self.hi).wrapping_add((lo == 0) as i64),
            lo,
        }
    }

    /// Checked negation. Returns `None` for `MIN`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn checked_neg(self) -> Option<Self> {
        if self.is_min() {
            None
        } else {
            Some(self.wrapping_neg())
        }
    }

    /// Absolute value. `MIN.abs()` is `MIN`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn abs(self) -> Self {
        if self.is_negative() {
            self.wrapping_neg()
        } else {
            self
        }
    }

    /// Checked absolute value. Returns `None` for `MIN`.
    #[inline(always)]
    pub const fn checked_abs(self) -> Option<Self> {
        if self.is_min() { None } else { Some(self.abs()) }
    }

    /// Absolute value as an unsigned 128-bit pattern. Exact for every input,
    /// including `MIN` (2^127).
    #[inline(always)]
    pub const fn unsigned_abs(self) -> u128 {
        self.abs().to_u128()
    }

    #[inline(always)]
    const fn is_min(self) -> bool {
        self.hi == i64::MIN && self.lo == 0
    }
}

// ============================================================================
// Sign Operations
// ============================================================================

impl Int128 {
    /// Returns `true` if the value is strictly greater than zero.
    #[inline(always)]
    pub const fn is_positive(self) -> bool {
        self.hi > 0 || (self.hi == 0 && self.lo != 0)
    }

    /// Returns `true` if bit 127 is set.
    #[inline(always)]
    pub const fn is_negative(self) -> bool {
        self.hi < 0
    }

    /// Returns `true` if the value is zero.
    #[inline(always)]
    pub const fn is_zero(self) -> bool {
        self.hi == 0 && self.lo == 0
    }

    /// Returns `-1`, `0` or `1`.
    #[inline(always)]
    pub const fn signum(self) -> i32 {
        if self.is_negative() {
            -1
        } else if self.is_zero() {
            0
        } else {
            1
        }
    }
}

// ============================================================================
// Comparison
// ============================================================================

impl Int128 {
    /// Signed comparison: high limbs signed, low limbs unsigned.
    #[inline(always)]
    pub const fn cmp_signed(self, other: Self) -> Ordering {
        if self.hi < other.hi {
            Ordering::Less
        } else if self.hi > other.hi {
            Ordering::Greater
        } else {
            cmp_u64(self.lo_bits(), other.lo_bits())
        }
    }

    /// Compares the two values as unsigned 128-bit magnitudes.
    #[inline(always)]
    pub const fn cmp_unsigned(self, other: Self) -> Ordering {
        match cmp_u64(self.hi_bits(), other.hi_bits()) {
            Ordering::Equal => cmp_u64(self.lo_bits(), other.lo_bits()),
            ord => ord,
        }
    }
}

#[inline(always)]
const fn cmp_u64(a: u64, b: u64) -> Ordering {
    if a < b {
        Ordering::Less
    } else if a > b {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

impl Ord for Int128 {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_signed(*other)
    }
}

impl PartialOrd for Int128 {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================================
// Bit Operations
// ============================================================================

impl Int128 {
    #[inline(always)]
    const fn bit_mask(index: u32) -> Self {
        if index < 64 {
            Self::from_bits(0, 1 << index)
        } else {
            Self::from_bits(1 << (index - 64), 0)
        }
    }

    /// Returns whether bit `index` is set. Bit 127 is the sign bit.
    pub const fn test_bit(self, index: u32) -> crate::Result<bool> {
        if index >= Self::BITS {
            return Err(Int128Error::BitIndexOutOfRange(index));
        }
        Ok(!self.and_bits(Self::bit_mask(index)).is_zero())
    }

    /// Returns a copy with bit `index` set.
    pub const fn set_bit(self, index: u32) -> crate::Result<Self> {
        if index >= Self::BITS {
            return Err(Int128Error::BitIndexOutOfRange(index));
        }
        Ok(self.or_bits(Self::bit_mask(index)))
    }

    /// Returns a copy with bit `index` cleared.
    pub const fn clear_bit(self, index: u32) -> crate::Result<Self> {
        if index >= Self::BITS {
            return Err(Int128Error::BitIndexOutOfRange(index));
        }
        Ok(self.and_bits(Self::bit_mask(index).not_bits()))
    }

    /// Returns a copy with bit `index` toggled.
    pub const fn flip_bit(self, index: u32) -> crate::Result<Self> {
        if index >= Self::BITS {
            return Err(Int128Error::BitIndexOutOfRange(index));
        }
        Ok(self.xor_bits(Self::bit_mask(index)))
    }

    #[inline(always)]
    const fn and_bits(self, rhs: Self) -> Self {
        Self {
            hi: self.hi & rhs.hi,
            lo: self.lo & rhs.lo,
        }
    }

    #[inline(always)]
    const fn or_bits(self, rhs: Self) -> Self {
        Self {
            hi: self.hi | rhs.hi,
            lo: self.lo | rhs.lo,
        }
    }

    #[inline(always)]
    const fn xor_bits(self, rhs: Self) -> Self {
        Self {
            hi: self.hi ^ rhs.hi,
            lo: self.lo ^ rhs.lo,
        }
    }

    #[inline(always)]
    const fn not_bits(self) -> Self {
        Self {
            hi: !self.hi,
            lo: !self.lo,
        }
    }

    /// Number of leading zero bits in the 128-bit pattern.
    #[inline(always)]
    pub const fn leading_zeros(self) -> u32 {
        if self.hi != 0 {
            self.hi_bits().leading_zeros()
        } else {
            64 + self.lo_bits().leading_zeros()
        }
    }

    /// Number of trailing zero bits in the 128-bit pattern.
    #[inline(always)]
    pub const fn trailing_zeros(self) -> u32 {
        if self.lo != 0 {
            self.lo_bits().trailing_zeros()
        } else {
            64 + self.hi_bits().trailing_zeros()
        }
    }

    /// Number of set bits.
    #[inline(always)]
    pub const fn count_ones(self) -> u32 {
        self.hi_bits().count_ones() + self.lo_bits().count_ones()
    }

    /// Left shift. The shift count is taken modulo 128.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn shift_left(self, n: u32) -> Self {
        let n = n & 127;
        if n == 0 {
            self
        } else if n < 64 {
            Self::from_bits(
                (self.hi_bits() << n) | (self.lo_bits() >> (64 - n)),
                self.lo_bits() << n,
            )
        } else {
            Self::from_bits(self.lo_bits() << (n - 64), 0)
        }
    }

    /// Arithmetic (sign-filling) right shift. The shift count is taken modulo 128.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn shift_right(self, n: u32) -> Self {
        let n = n & 127;
        if n == 0 {
            self
        } else if n < 64 {
            Self {
                hi: self.hi >> n,
                lo: ((self.lo_bits() >> n) | (self.hi_bits() << (64 - n))) as i64,
            }
        } else {
            Self {
                hi: self.hi >> 63,
                lo: self.hi >> (n - 64),
            }
        }
    }

    /// Logical (zero-filling) right shift. The shift count is taken modulo 128.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn shift_right_unsigned(self, n: u32) -> Self {
        let n = n & 127;
        if n == 0 {
            self
        } else if n < 64 {
            Self::from_bits(
                self.hi_bits() >> n,
                (self.lo_bits() >> n) | (self.hi_bits() << (64 - n)),
            )
        } else {
            Self::from_bits(0, self.hi_bits() >> (n - 64))
        }
    }
}

// ============================================================================
// Bytes Operations
// ============================================================================

impl Int128 {
    /// Big-endian two's-complement encoding. Byte 0 is the most significant
    /// byte of the high limb.
    #[inline(always)]
    pub const fn to_be_bytes(self) -> [u8; Self::BYTES] {
        let hi = self.hi.to_be_bytes();
        let lo = self.lo.to_be_bytes();
        let mut out = [0u8; Self::BYTES];
        let mut i = 0;
        while i < 8 {
            out[i] = hi[i];
            out[i + 8] = lo[i];
            i += 1;
        }
        out
    }

    /// Decodes the big-endian two's-complement encoding.
    #[inline(always)]
    pub const fn from_be_bytes(bytes: [u8; Self::BYTES]) -> Self {
        let mut hi = [0u8; 8];
        let mut lo = [0u8; 8];
        let mut i = 0;
        while i < 8 {
            hi[i] = bytes[i];
            lo[i] = bytes[i + 8];
            i += 1;
        }
        Self {
            hi: i64::from_be_bytes(hi),
            lo: i64::from_be_bytes(lo),
        }
    }

    /// Little-endian two's-complement encoding.
    #[inline(always)]
    pub const fn to_le_bytes(self) -> [u8; Self::BYTES] {
        let hi = self.hi.to_le_bytes();
        let lo = self.lo.to_le_bytes();
        let mut out = [0u8; Self::BYTES];
        let mut i = 0;
        while i < 8 {
            out[i] = lo[i];
            out[i + 8] = hi[i];
            i += 1;
        }
        out
    }

    /// Decodes the little-endian two's-complement encoding.
    #[inline(always)]
    pub const fn from_le_bytes(bytes: [u8; Self::BYTES]) -> Self {
        let mut hi = [0u8; 8];
        let mut lo = [0u8; 8];
        let mut i = 0;
        while i < 8 {
            lo[i] = bytes[i];
            hi[i] = bytes[i + 8];
            i += 1;
        }
        Self {
            hi: i64::from_le_bytes(hi),
            lo: i64::from_le_bytes(lo),
        }
    }

    /// Writes the big-endian encoding into the first 16 bytes of `buf`.
    ///
    /// # Panics
    /// Panics if `buf` is shorter than 16 bytes.
    #[inline(always)]
    pub fn write_be_bytes(&self, buf: &mut [u8]) {
        buf[..Self::BYTES].copy_from_slice(&self.to_be_bytes());
    }

    /// Reads a big-endian encoding from the first 16 bytes of `buf`.
    ///
    /// # Panics
    /// Panics if `buf` is shorter than 16 bytes.
    #[inline(always)]
    pub fn read_be_bytes(buf: &[u8]) -> Self {
        let mut array = [0u8; Self::BYTES];
        array.copy_from_slice(&buf[..Self::BYTES]);
        Self::from_be_bytes(array)
    }

    /// Tries to write the big-endian encoding.
    #[inline(always)]
    pub fn try_write_be_bytes(&self, buf: &mut [u8]) -> Option<()> {
        if buf.len() < Self::BYTES {
            return None;
        }
        self.write_be_bytes(buf);
        Some(())
    }

    /// Tries to read a big-endian encoding.
    #[inline(always)]
    pub fn try_read_be_bytes(buf: &[u8]) -> Option<Self> {
        if buf.len() < Self::BYTES {
            return None;
        }
        Some(Self::read_be_bytes(buf))
    }
}

// ============================================================================
// Operator Overloading
// ============================================================================

impl Add for Int128 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        self.wrapping_add(rhs)
    }
}

impl Sub for Int128 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        self.wrapping_sub(rhs)
    }
}

impl Neg for Int128 {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        self.wrapping_neg()
    }
}

impl Not for Int128 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self::Output {
        self.not_bits()
    }
}

impl BitAnd for Int128 {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self::Output {
        Int128::and_bits(self, rhs)
    }
}

impl BitOr for Int128 {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self::Output {
        Int128::or_bits(self, rhs)
    }
}

impl BitXor for Int128 {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self::Output {
        Int128::xor_bits(self, rhs)
    }
}

impl Shl<u32> for Int128 {
    type Output = Self;

    #[inline(always)]
    fn shl(self, rhs: u32) -> Self::Output {
        self.shift_left(rhs)
    }
}

impl Shr<u32> for Int128 {
    type Output = Self;

    #[inline(always)]
    fn shr(self, rhs: u32) -> Self::Output {
        self.shift_right(rhs)
    }
}

impl AddAssign for Int128 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        *self = self.wrapping_add(rhs);
    }
}

impl SubAssign for Int128 {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        *self = self.wrapping_sub(rhs);
    }
}

impl BitAndAssign for Int128 {
    #[inline(always)]
    fn bitand_assign(&mut self, rhs: Self) {
        *self = Int128::and_bits(*self, rhs);
    }
}

impl BitOrAssign for Int128 {
    #[inline(always)]
    fn bitor_assign(&mut self, rhs: Self) {
        *self = Int128::or_bits(*self, rhs);
    }
}

impl BitXorAssign for Int128 {
    #[inline(always)]
    fn bitxor_assign(&mut self, rhs: Self) {
        *self = Int128::xor_bits(*self, rhs);
    }
}

impl ShlAssign<u32> for Int128 {
    #[inline(always)]
    fn shl_assign(&mut self, rhs: u32) {
        *self = self.shift_left(rhs);
    }
}

impl ShrAssign<u32> for Int128 {
    #[inline(always)]
    fn shr_assign(&mut self, rhs: u32) {
        *self = self.shift_right(rhs);
    }
}

// ============================================================================
// Standard Library Trait Implementations
// ============================================================================

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Int128 {
                #[inline(always)]
                fn from(value: $t) -> Self {
                    Self::from_i64(value as i64)
                }
            }
        )*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Int128 {
                #[inline(always)]
                fn from(value: $t) -> Self {
                    Self::from_u64(value as u64)
                }
            }
        )*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<i128> for Int128 {
    #[inline(always)]
    fn from(value: i128) -> Self {
        Self::from_i128(value)
    }
}

impl From<Int128> for i128 {
    #[inline(always)]
    fn from(value: Int128) -> Self {
        value.to_i128()
    }
}

impl TryFrom<Int128> for i64 {
    type Error = Int128Error;

    #[inline(always)]
    fn try_from(value: Int128) -> crate::Result<Self> {
        value.to_i64().ok_or(Int128Error::Overflow)
    }
}

impl fmt::Debug for Int128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.debug_struct("Int128")
                .field("hi", &self.hi)
                .field("lo", &self.lo)
                .finish()
        } else {
            write!(f, "Int128({})", self)
        }
    }
}

// ============================================================================
// Iterator Trait Implementations
// ============================================================================

impl Sum for Int128 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Int128> for Int128 {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + *x)
    }
}

impl Product for Int128 {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * x)
    }
}

impl<'a> Product<&'a Int128> for Int128 {
    fn product<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * *x)
    }
}

// ============================================================================
// Serde Support
// ============================================================================

#[cfg(feature = "serde")]
impl Serialize for Int128 {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            // JSON, TOML, etc. - decimal string, since many readers lose
            // precision on numbers beyond 2^53
            serializer.collect_str(self)
        } else {
            // Bincode, MessagePack, etc. - raw limbs
            (self.hi, self.lo).serialize(serializer)
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Int128 {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            struct Int128Visitor;

            impl<'de> de::Visitor<'de> for Int128Visitor {
                type Value = Int128;

                fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                    formatter.write_str("a decimal integer string")
                }

                fn visit_str<E>(self, v: &str) -> core::result::Result<Self::Value, E>
                where
                    E: de::Error,
                {
                    v.parse::<Int128>().map_err(de::Error::custom)
                }

                fn visit_i64<E>(self, v: i64) -> core::result::Result<Self::Value, E>
                where
                    E: de::Error,
                {
                    Ok(Int128::from_i64(v))
                }

                fn visit_u64<E>(self, v: u64) -> core::result::Result<Self::Value, E>
                where
                    E: de::Error,
                {
                    Ok(Int128::from_u64(v))
                }

                fn visit_i128<E>(self, v: i128) -> core::result::Result<Self::Value, E>
                where
                    E: de::Error,
                {
                    Ok(Int128::from_i128(v))
                }

                fn visit_u128<E>(self, v: u128) -> core::result::Result<Self::Value, E>
                where
                    E: de::Error,
                {
                    i128::try_from(v)
                        .map(Int128::from_i128)
                        .map_err(|_| de::Error::custom(Int128Error::Overflow))
                }
            }

            deserializer.deserialize_any(Int128Visitor)
        } else {
            let (hi, lo) = <(i64, i64)>::deserialize(deserializer)?;
            Ok(Self { hi, lo })
        }
    }
}

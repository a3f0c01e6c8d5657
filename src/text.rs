use core::fmt;
use core::str::FromStr;

use crate::div::div_rem_by_u64;
use crate::mul::mul_u64x64;
use crate::{Int128, Int128Error};

/// 10^19, the largest power of ten that fits in one limb.
const CHUNK_DIVISOR: u64 = 10_000_000_000_000_000_000;
const CHUNK_DIGITS: usize = 19;

/// Enough for "-170141183460469231731687303715884105728"
const MAX_DECIMAL_LEN: usize = 40;

// ============================================================================
// Formatting
// ============================================================================

impl Int128 {
    /// Writes the decimal digits of the magnitude into the tail of `buffer`
    /// and returns the index of the first digit.
    fn format_magnitude(self, buffer: &mut [u8; MAX_DECIMAL_LEN]) -> usize {
        let magnitude = self.abs();
        let (mut hi, mut lo) = (magnitude.hi_bits(), magnitude.lo_bits());
        let mut pos = buffer.len();

        loop {
            let (q_hi, q_lo, mut chunk) = div_rem_by_u64(hi, lo, CHUNK_DIVISOR);
            hi = q_hi;
            lo = q_lo;
            let last = hi == 0 && lo == 0;

            let mut written = 0;
            while chunk > 0 || (!last && written < CHUNK_DIGITS) || pos == buffer.len() {
                pos -= 1;
                buffer[pos] = b'0' + (chunk % 10) as u8;
                chunk /= 10;
                written += 1;
            }

            if last {
                return pos;
            }
        }
    }

    /// Writes the 32 hex digits of the bit pattern and returns the index of the
    /// first significant digit.
    fn format_hex(self, buffer: &mut [u8; 32], upper: bool) -> usize {
        let digits: &[u8; 16] = if upper {
            b"0123456789ABCDEF"
        } else {
            b"0123456789abcdef"
        };
        let bits = [self.hi_bits(), self.lo_bits()];
        for (limb_index, limb) in bits.iter().enumerate() {
            for nibble in 0..16 {
                let shift = 60 - 4 * nibble;
                buffer[limb_index * 16 + nibble] = digits[((limb >> shift) & 0xF) as usize];
            }
        }
        let leading = (self.leading_zeros() / 4) as usize;
        leading.min(31)
    }

    /// Formats the value in base 10 or 16 (two's-complement bit pattern).
    ///
    /// # Errors
    /// Returns [`Int128Error::InvalidFormat`] for any other radix.
    #[cfg(feature = "alloc")]
    pub fn to_string_radix(&self, radix: u32) -> crate::Result<alloc::string::String> {
        match radix {
            10 => Ok(alloc::format!("{}", self)),
            16 => Ok(alloc::format!("{:x}", self)),
            _ => Err(Int128Error::InvalidFormat),
        }
    }
}

impl fmt::Display for Int128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buffer = [0u8; MAX_DECIMAL_LEN];
        let start = self.format_magnitude(&mut buffer);
        // Only ASCII digits were written
        let digits = core::str::from_utf8(&buffer[start..]).map_err(|_| fmt::Error)?;
        f.pad_integral(!self.is_negative(), "", digits)
    }
}

impl fmt::LowerHex for Int128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buffer = [0u8; 32];
        let start = self.format_hex(&mut buffer, false);
        let digits = core::str::from_utf8(&buffer[start..]).map_err(|_| fmt::Error)?;
        f.pad_integral(true, "0x", digits)
    }
}

impl fmt::UpperHex for Int128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buffer = [0u8; 32];
        let start = self.format_hex(&mut buffer, true);
        let digits = core::str::from_utf8(&buffer[start..]).map_err(|_| fmt::Error)?;
        f.pad_integral(true, "0x", digits)
    }
}

// ============================================================================
// String Parsing
// ============================================================================

/// Splits an optional leading sign off `s`.
fn split_sign(s: &str) -> crate::Result<(bool, &[u8])> {
    let bytes = s.as_bytes();
    let (negative, digits) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        Some(b'+') => (false, &bytes[1..]),
        Some(_) => (false, bytes),
        None => return Err(Int128Error::InvalidFormat),
    };
    if digits.is_empty() {
        return Err(Int128Error::InvalidFormat);
    }
    Ok((negative, digits))
}

impl Int128 {
    /// Parses a signed decimal integer.
    ///
    /// Accepts an optional `+` or `-` followed by ASCII digits. Surrounding
    /// whitespace is ignored.
    ///
    /// # Errors
    /// [`Int128Error::InvalidFormat`] for malformed input and
    /// [`Int128Error::Overflow`] when the value is outside the signed range.
    pub fn from_str_exact(s: &str) -> crate::Result<Self> {
        let (negative, digits) = split_sign(s.trim())?;

        // Accumulate the unsigned magnitude
        let (mut hi, mut lo) = (0u64, 0u64);
        for &byte in digits {
            let digit = byte.wrapping_sub(b'0');
            if digit > 9 {
                return Err(Int128Error::InvalidFormat);
            }

            let (carry, lo10) = mul_u64x64(lo, 10);
            let (hi_over, hi10) = mul_u64x64(hi, 10);
            let (hi_sum, overflow) = hi10.overflowing_add(carry);
            if hi_over != 0 || overflow {
                return Err(Int128Error::Overflow);
            }
            let (lo_sum, c) = lo10.overflowing_add(digit as u64);
            let (hi_sum, overflow) = hi_sum.overflowing_add(c as u64);
            if overflow {
                return Err(Int128Error::Overflow);
            }
            hi = hi_sum;
            lo = lo_sum;
        }

        let magnitude = Self::from_bits(hi, lo);
        if negative {
            // -2^127 is the one magnitude above MAX that still fits
            if magnitude.cmp_unsigned(Self::MIN) == core::cmp::Ordering::Greater {
                return Err(Int128Error::Overflow);
            }
            Ok(magnitude.wrapping_neg())
        } else if magnitude.is_negative() {
            Err(Int128Error::Overflow)
        } else {
            Ok(magnitude)
        }
    }

    /// Parses hex digits as a two's-complement bit pattern, negated when a
    /// leading `-` is present. An optional `0x` prefix is accepted.
    ///
    /// # Errors
    /// [`Int128Error::InvalidFormat`] for malformed input and
    /// [`Int128Error::Overflow`] for more than 128 significant bits.
    pub fn from_hex_str(s: &str) -> crate::Result<Self> {
        let (negative, digits) = split_sign(s.trim())?;
        let digits = match digits {
            [b'0', b'x' | b'X', rest @ ..] if !rest.is_empty() => rest,
            _ => digits,
        };

        let mut value = Self::ZERO;
        for &byte in digits {
            let nibble = match byte {
                b'0'..=b'9' => byte - b'0',
                b'a'..=b'f' => byte - b'a' + 10,
                b'A'..=b'F' => byte - b'A' + 10,
                _ => return Err(Int128Error::InvalidFormat),
            };
            if value.hi_bits() >> 60 != 0 {
                return Err(Int128Error::Overflow);
            }
            value = value.shift_left(4) | Self::from_u64(nibble as u64);
        }

        Ok(if negative { value.wrapping_neg() } else { value })
    }

    /// Parses a string in base 10 or 16.
    ///
    /// # Errors
    /// [`Int128Error::InvalidFormat`] for other radixes or malformed input.
    pub fn from_str_radix(s: &str, radix: u32) -> crate::Result<Self> {
        match radix {
            10 => Self::from_str_exact(s),
            16 => Self::from_hex_str(s),
            _ => Err(Int128Error::InvalidFormat),
        }
    }
}

impl FromStr for Int128 {
    type Err = Int128Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_exact(s)
    }
}

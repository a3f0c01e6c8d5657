//! Exact two-limb signed 128-bit integers for fixed-point financial arithmetic
//!
//! This library provides a single value type, [`Int128`], built from two 64-bit
//! limbs and operated on without relying on native 128-bit arithmetic:
//!
//! - **Wrapping core**: add, subtract, negate and multiply reduce modulo 2^128
//!   and never fail
//! - **Exact division**: truncating signed `div_rem` with a 128÷64 fast path and
//!   a bounded two-limb long division for wide divisors
//! - **Decimal powers**: divide, round and rescale by 10^k for `k` in `0..=38`,
//!   the building blocks of fixed-point money code
//!
//! ## Features
//!
//! - **no_std compatible**: Works in embedded and WebAssembly environments
//! - **Bounded division**: every correction loop has a fixed iteration cap
//! - **Serde support**: Decimal strings for JSON, raw limbs for binary formats
//! - **Tracing**: Optional `trace` events from the division engine
//!
//! ## Example
//!
//! ```rust
//! use fixint::Int128;
//!
//! let cents = Int128::from_i64(-1234);
//! let (units, rest) = cents.div_rem_pow10(2);
//! assert_eq!(units, Int128::from_i64(-12));
//! assert_eq!(rest, Int128::from_i64(-34));
//!
//! let half = Int128::from_i64(25).div_round_half_even_pow10(1);
//! assert_eq!(half, Int128::from_i64(2));
//! ```

#![no_std]
#![cfg_attr(test, allow(unused_imports))]

#[cfg(any(test, feature = "std"))]
extern crate std;

#[cfg(feature = "alloc")]
extern crate alloc;

/// Emits a `tracing::trace!` event when the `tracing` feature is enabled.
macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::trace!($($arg)*);
    };
}

mod arith;
mod div;
mod int128;
mod mul;
mod pow10;
mod text;

pub use arith::Int128Arithmetic;
pub use int128::Int128;
pub use mul::mul_u64x64;
pub use pow10::{MAX_POW10_EXPONENT, POW10, pow10};

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Int128Error {
    #[error("division by zero")]
    DivisionByZero,

    #[error("bit index {0} out of range 0..=127")]
    BitIndexOutOfRange(u32),

    #[error("invalid string format")]
    InvalidFormat,

    #[error("overflow: value too large to represent")]
    Overflow,
}

pub type Result<T> = core::result::Result<T, Int128Error>;

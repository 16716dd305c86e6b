//! Winning coefficient and threshold arithmetic
//!
//! All math here is integer-only over `U256`/`U512`. The threshold is
//! `floor(2^256 * coefficient / (players * 10^scale))`; computing it with
//! 64-bit or floating-point arithmetic silently corrupts every downstream
//! comparison, so nothing in this module touches `f64`.

use crate::error::{Error, Result};
use primitive_types::{U256, U512};
use tracing::warn;

/// Fixed-point scale used by round configs unless overridden.
pub const DEFAULT_SCALE_DIGITS: u32 = 15;

/// Decimal digits of precision carried by threshold percentages.
const PERCENT_FRACTION_DIGITS: usize = 16;

/// Expected winner count, as a fixed-point scaled integer.
///
/// A coefficient of `183 * 10^15` at scale 15 means 183 expected winners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coefficient {
    scaled: U256,
    scale_digits: u32,
}

impl Coefficient {
    /// Parse from the hex wire form, e.g. `0x28A2587C9E58000`.
    pub fn from_hex(input: &str, scale_digits: u32) -> Result<Self> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidCoefficient(input.to_string()));
        }
        let scaled = U256::from_str_radix(digits, 16)
            .map_err(|_| Error::InvalidCoefficient(input.to_string()))?;
        if scaled.is_zero() {
            return Err(Error::InvalidCoefficient(input.to_string()));
        }
        Ok(Self {
            scaled,
            scale_digits,
        })
    }

    pub fn from_scaled(scaled: U256, scale_digits: u32) -> Self {
        Self {
            scaled,
            scale_digits,
        }
    }

    pub fn scaled(&self) -> U256 {
        self.scaled
    }

    pub fn scale_digits(&self) -> u32 {
        self.scale_digits
    }

    /// Hex wire form, uppercase digits without zero padding (`0x28A...`).
    pub fn hex(&self) -> String {
        format!("0x{}", format!("{:x}", self.scaled).to_uppercase())
    }

    /// Decimal display form with the fixed-point applied, trailing zeros
    /// stripped: `183`, `1.5`, `0.25`.
    pub fn decimal(&self) -> String {
        format_scaled_decimal(&self.scaled.to_string(), self.scale_digits as usize)
    }
}

/// The 256-bit winning cutoff for one round.
///
/// A derived value wins iff it is `<=` the threshold. Monotonic in the
/// coefficient for a fixed player count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinThreshold {
    value: U256,
    clamped: bool,
}

impl WinThreshold {
    /// `floor(2^256 * coefficient / (total_players * 10^scale))`,
    /// saturated to `U256::MAX` when the win chance reaches 1.
    ///
    /// A ratio strictly above 1 means the caller asked for more expected
    /// winners than there are players; the chance is clamped to 1 and the
    /// clamp is recorded so the audit can disclose it.
    pub fn compute(coefficient: &Coefficient, total_players: usize) -> Self {
        let denominator = U512::from(total_players) * pow10(coefficient.scale_digits());
        let clamped = U512::from(coefficient.scaled()) > denominator;
        if clamped {
            warn!(
                coefficient = %coefficient.decimal(),
                total_players,
                "win chance above 1, clamping to 1 (everyone wins)"
            );
        }

        let numerator = (U512::one() << 256) * U512::from(coefficient.scaled());
        let raw = numerator / denominator;
        let value = if raw >= U512::one() << 256 {
            U256::MAX
        } else {
            let buf = raw.to_big_endian();
            U256::from_big_endian(&buf[32..])
        };
        Self { value, clamped }
    }

    pub fn is_winner(&self, value: &U256) -> bool {
        *value <= self.value
    }

    pub fn value(&self) -> U256 {
        self.value
    }

    /// Whether the win chance was clamped to 1.
    pub fn clamped(&self) -> bool {
        self.clamped
    }
}

/// Threshold as a percentage string with 16 fractional digits of integer
/// precision, trailing zeros stripped. Never computed via floats.
pub fn percent_string(coefficient: &Coefficient, total_players: usize) -> String {
    let numerator = U512::from(coefficient.scaled())
        * pow10(PERCENT_FRACTION_DIGITS as u32)
        * U512::from(100u8);
    let denominator = U512::from(total_players) * pow10(coefficient.scale_digits());
    let quotient = numerator / denominator;
    format_scaled_decimal(&quotient.to_string(), PERCENT_FRACTION_DIGITS)
}

/// Render a `0x`-prefixed, zero-padded, lowercase 64-hex-char 256-bit
/// value; the exact external representation audit consumers expect.
pub fn format_u256(value: &U256) -> String {
    format!("0x{}", hex::encode(value.to_big_endian()))
}

fn pow10(digits: u32) -> U512 {
    U512::from(10u8).pow(U512::from(digits))
}

/// Interpret `value` (a decimal string) as a fixed-point number with
/// `scale` fractional digits and render it with trailing zeros stripped.
fn format_scaled_decimal(value: &str, scale: usize) -> String {
    if scale == 0 {
        return value.to_string();
    }
    let padded = if value.len() <= scale {
        format!("{value:0>width$}", width = scale + 1)
    } else {
        value.to_string()
    };
    let split = padded.len() - scale;
    let integer = &padded[..split];
    let fraction = padded[split..].trim_end_matches('0');
    if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{integer}.{fraction}")
    }
}

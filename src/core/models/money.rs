//! Fixed-point money.
//!
//! Amounts are an integer count of minor currency units (cents for USD).
//! Nothing in the ledger ever holds an amount as a binary float.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;
use utoipa::ToSchema;

/// Integer amount of minor units in the ledger's single currency.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Money(i64);

/// ISO 4217 currencies accepted by the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Jpy,
    Idr,
    Sgd,
    Inr,
    Cad,
    Aud,
}

impl Currency {
    /// Number of decimal places between the major and the minor unit.
    pub fn minor_unit_exponent(self) -> u32 {
        match self {
            Currency::Jpy | Currency::Idr => 0,
            _ => 2,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Idr => "IDR",
            Currency::Sgd => "SGD",
            Currency::Inr => "INR",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "JPY" => Ok(Currency::Jpy),
            "IDR" => Ok(Currency::Idr),
            "SGD" => Ok(Currency::Sgd),
            "INR" => Ok(Currency::Inr),
            "CAD" => Ok(Currency::Cad),
            "AUD" => Ok(Currency::Aud),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor_units: i64) -> Self {
        Money(minor_units)
    }

    pub const fn minor_units(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn abs(self) -> Money {
        Money(self.0.abs())
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Splits a positive amount into `parts` equal integer shares.
    ///
    /// Returns the base share and the number of leftover minor units; the
    /// caller hands those out one unit at a time. `None` when `parts` is zero
    /// or the amount is not positive.
    pub fn split_even(self, parts: usize) -> Option<(Money, usize)> {
        if parts == 0 || self.0 <= 0 {
            return None;
        }
        let parts = i64::try_from(parts).ok()?;
        let base = self.0 / parts;
        let remainder = usize::try_from(self.0 % parts).ok()?;
        Some((Money(base), remainder))
    }

    /// Parses a fixed-point decimal string such as `"12.34"` exactly.
    ///
    /// More fractional digits than the currency allows is an error, not a
    /// rounding opportunity.
    pub fn parse_decimal(input: &str, currency: Currency) -> Result<Money, String> {
        let exponent = currency.minor_unit_exponent();
        let trimmed = input.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (digits, ""),
        };
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("`{}` is not a decimal amount", input));
        }
        if !fraction.bytes().all(|b| b.is_ascii_digit()) || (digits.contains('.') && fraction.is_empty()) {
            return Err(format!("`{}` is not a decimal amount", input));
        }
        if fraction.len() > exponent as usize {
            return Err(format!(
                "`{}` has more than {} decimal places for {}",
                input, exponent, currency
            ));
        }

        let overflow = || format!("`{}` is out of range", input);
        let scale = 10_i64.pow(exponent);
        let whole: i64 = whole.parse().map_err(|_| overflow())?;
        let mut fraction_units: i64 = if fraction.is_empty() {
            0
        } else {
            fraction.parse().map_err(|_| overflow())?
        };
        for _ in fraction.len()..exponent as usize {
            fraction_units *= 10;
        }
        let units = whole
            .checked_mul(scale)
            .and_then(|units| units.checked_add(fraction_units))
            .ok_or_else(overflow)?;
        Ok(Money(if negative { -units } else { units }))
    }

    /// Formats the amount as a fixed-point decimal string in `currency`.
    pub fn to_decimal_string(self, currency: Currency) -> String {
        let exponent = currency.minor_unit_exponent();
        if exponent == 0 {
            return self.0.to_string();
        }
        let scale = 10_u64.pow(exponent);
        let magnitude = self.0.unsigned_abs();
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{}.{:0width$}",
            sign,
            magnitude / scale,
            magnitude % scale,
            width = exponent as usize
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::ops;

use crate::errors::*;

/// Signed amount in minor currency units. Outflows are negative.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Cents(i64);

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TransactionId(pub String);

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct YnabAccountId(pub String);

/// Which side of a reconciliation a transaction set belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Origin {
    A,
    B,
}

impl Cents {
    const SCALE: u32 = 2;

    pub fn new(value: i64) -> Cents {
        Cents(value)
    }

    pub fn to_i64(self) -> i64 {
        self.0
    }

    /// Rounds half away from zero to the nearest minor unit.
    pub fn from_decimal(value: Decimal) -> Result<Cents> {
        value
            .checked_mul(Decimal::new(10i64.pow(Self::SCALE), 0))
            .and_then(|scaled| {
                scaled
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                    .to_i64()
            })
            .map(Cents)
            .chain_err(|| format!("Amount out of range: {}", value))
    }

    /// YNAB expresses amounts in thousandths of a currency unit.
    pub fn from_milliunits(value: i64) -> Result<Cents> {
        Cents::from_decimal(Decimal::new(value, 3))
    }

    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, Self::SCALE)
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn checked_sub(self, other: Cents) -> Result<Cents> {
        self.0
            .checked_sub(other.0)
            .map(Cents)
            .chain_err(|| format!("Amount out of range: {} - {}", self, other))
    }
}

impl ops::Neg for Cents {
    type Output = Cents;
    fn neg(self) -> Cents {
        Cents(-self.0)
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for YnabAccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::A => write!(f, "A"),
            Origin::B => write!(f, "B"),
        }
    }
}

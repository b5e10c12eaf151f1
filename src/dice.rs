//! Dice notation (`NdM+K`) and seeded rolls.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::seed::Generator;

pub const MAX_DICE: u32 = 100;
pub const MIN_SIDES: u32 = 2;
pub const MAX_SIDES: u32 = 1000;
pub const MAX_MODIFIER: i32 = 10_000;

/// Parsed dice notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DiceSpec {
    pub count: u32,
    pub sides: u32,
    pub modifier: i32,
}

/// Outcome of rolling a [`DiceSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DiceRoll {
    pub spec: DiceSpec,
    pub rolls: Vec<u32>,
    pub total: i64,
}

impl DiceSpec {
    /// Parse `NdM`, `dM`, `NdM+K` or `NdM-K`.
    ///
    /// Whitespace is ignored and `d` is case-insensitive.
    ///
    /// ```
    /// use tidbit::dice::DiceSpec;
    ///
    /// let spec = DiceSpec::parse("3d6 + 2").unwrap();
    /// assert_eq!((spec.count, spec.sides, spec.modifier), (3, 6, 2));
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        let invalid = |why: &str| Error::InvalidDice(format!("{why} in {input:?}"));

        let (count, rest) = compact
            .split_once(['d', 'D'])
            .ok_or_else(|| invalid("missing 'd'"))?;
        let count = if count.is_empty() {
            1
        } else {
            count.parse::<u32>().map_err(|_| invalid("bad dice count"))?
        };

        let (sides, modifier) = match rest.find(['+', '-']) {
            Some(at) => {
                let modifier = rest[at..]
                    .parse::<i32>()
                    .map_err(|_| invalid("bad modifier"))?;
                (&rest[..at], modifier)
            }
            None => (rest, 0),
        };
        let sides = sides.parse::<u32>().map_err(|_| invalid("bad side count"))?;

        if !(1..=MAX_DICE).contains(&count) {
            return Err(invalid("dice count out of range"));
        }
        if !(MIN_SIDES..=MAX_SIDES).contains(&sides) {
            return Err(invalid("side count out of range"));
        }
        if modifier.unsigned_abs() > MAX_MODIFIER.unsigned_abs() {
            return Err(invalid("modifier out of range"));
        }

        Ok(Self {
            count,
            sides,
            modifier,
        })
    }

    /// Roll every die, one draw each, in order.
    pub fn roll(&self, rng: &mut Generator) -> DiceRoll {
        let rolls: Vec<u32> = (0..self.count)
            .map(|_| rng.range_u32(1, self.sides))
            .collect();
        let total = rolls.iter().map(|&r| i64::from(r)).sum::<i64>() + i64::from(self.modifier);
        DiceRoll {
            spec: *self,
            rolls,
            total,
        }
    }

    /// Smallest and largest possible totals.
    pub fn bounds(&self) -> (i64, i64) {
        let m = i64::from(self.modifier);
        let n = i64::from(self.count);
        (n + m, n * i64::from(self.sides) + m)
    }
}

impl FromStr for DiceSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DiceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{m}"),
            m => write!(f, "{m}"),
        }
    }
}

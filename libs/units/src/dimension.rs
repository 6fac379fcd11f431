//! SI dimension vectors
//!
//! A dimension is the tuple of integer exponents over the seven SI base
//! dimensions. Exponents are stored in canonical rendering order
//! (`kg, m, s, A, K, mol, cd`), so the canonical string of force is `kg.m/s2`.

use crate::error::{Error, Result};
use std::fmt;
use std::ops::{Div, Mul};
use std::str::FromStr;

pub const NUMBER_OF_DIMENSIONS: usize = 7;

/// The seven SI base dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BaseDimension {
    Mass = 0,
    Length = 1,
    Time = 2,
    Current = 3,
    Temperature = 4,
    AmountOfSubstance = 5,
    LuminousIntensity = 6,
}

impl BaseDimension {
    pub const ALL: [BaseDimension; NUMBER_OF_DIMENSIONS] = [
        BaseDimension::Mass,
        BaseDimension::Length,
        BaseDimension::Time,
        BaseDimension::Current,
        BaseDimension::Temperature,
        BaseDimension::AmountOfSubstance,
        BaseDimension::LuminousIntensity,
    ];

    /// Symbol of the SI base unit for this dimension.
    pub fn symbol(self) -> &'static str {
        match self {
            BaseDimension::Mass => "kg",
            BaseDimension::Length => "m",
            BaseDimension::Time => "s",
            BaseDimension::Current => "A",
            BaseDimension::Temperature => "K",
            BaseDimension::AmountOfSubstance => "mol",
            BaseDimension::LuminousIntensity => "cd",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Immutable dimension vector, usable as a map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SiDimensions([i8; NUMBER_OF_DIMENSIONS]);

impl SiDimensions {
    pub const DIMENSIONLESS: SiDimensions = SiDimensions([0; NUMBER_OF_DIMENSIONS]);
    pub const MASS: SiDimensions = SiDimensions([1, 0, 0, 0, 0, 0, 0]);
    pub const LENGTH: SiDimensions = SiDimensions([0, 1, 0, 0, 0, 0, 0]);
    pub const TIME: SiDimensions = SiDimensions([0, 0, 1, 0, 0, 0, 0]);
    pub const CURRENT: SiDimensions = SiDimensions([0, 0, 0, 1, 0, 0, 0]);
    pub const TEMPERATURE: SiDimensions = SiDimensions([0, 0, 0, 0, 1, 0, 0]);
    pub const AMOUNT_OF_SUBSTANCE: SiDimensions = SiDimensions([0, 0, 0, 0, 0, 1, 0]);
    pub const LUMINOUS_INTENSITY: SiDimensions = SiDimensions([0, 0, 0, 0, 0, 0, 1]);

    /// Build from named exponents. Argument order follows the canonical
    /// rendering order: mass, length, time, current, temperature, amount, luminous intensity.
    pub const fn new(
        mass: i8,
        length: i8,
        time: i8,
        current: i8,
        temperature: i8,
        amount: i8,
        luminous_intensity: i8,
    ) -> Self {
        SiDimensions([
            mass,
            length,
            time,
            current,
            temperature,
            amount,
            luminous_intensity,
        ])
    }

    pub const fn from_exponents(exponents: [i8; NUMBER_OF_DIMENSIONS]) -> Self {
        SiDimensions(exponents)
    }

    pub fn of(base: BaseDimension) -> Self {
        Self::DIMENSIONLESS.with(base, 1)
    }

    pub fn exponents(&self) -> [i8; NUMBER_OF_DIMENSIONS] {
        self.0
    }

    pub fn exponent(&self, base: BaseDimension) -> i8 {
        self.0[base.index()]
    }

    pub fn with(mut self, base: BaseDimension, exponent: i8) -> Self {
        self.0[base.index()] = exponent;
        self
    }

    pub fn is_dimensionless(&self) -> bool {
        self.0.iter().all(|&e| e == 0)
    }

    pub fn max_abs_exponent(&self) -> u8 {
        self.0.iter().map(|e| e.unsigned_abs()).max().unwrap_or(0)
    }

    /// Dimension of a product of two quantities.
    pub fn plus(&self, other: &SiDimensions) -> Result<SiDimensions> {
        self.zip_with(other, i8::checked_add)
    }

    /// Dimension of a quotient of two quantities.
    pub fn minus(&self, other: &SiDimensions) -> Result<SiDimensions> {
        self.zip_with(other, i8::checked_sub)
    }

    /// Reciprocal dimension (m/s becomes s/m).
    pub fn invert(&self) -> Result<SiDimensions> {
        let mut out = [0i8; NUMBER_OF_DIMENSIONS];
        for (slot, &e) in out.iter_mut().zip(self.0.iter()) {
            *slot = e
                .checked_neg()
                .ok_or_else(|| Error::InvalidDimension(format!("1/({self}) overflows")))?;
        }
        Ok(SiDimensions(out))
    }

    pub fn pow(&self, n: i8) -> Result<SiDimensions> {
        let mut out = [0i8; NUMBER_OF_DIMENSIONS];
        for (slot, &e) in out.iter_mut().zip(self.0.iter()) {
            *slot = e
                .checked_mul(n)
                .ok_or_else(|| Error::InvalidDimension(format!("({self})^{n} overflows")))?;
        }
        Ok(SiDimensions(out))
    }

    fn zip_with(
        &self,
        other: &SiDimensions,
        op: impl Fn(i8, i8) -> Option<i8>,
    ) -> Result<SiDimensions> {
        let mut out = [0i8; NUMBER_OF_DIMENSIONS];
        for i in 0..NUMBER_OF_DIMENSIONS {
            out[i] = op(self.0[i], other.0[i]).ok_or_else(|| {
                Error::InvalidDimension(format!("combining {self} and {other} overflows"))
            })?;
        }
        Ok(SiDimensions(out))
    }
}

impl fmt::Display for SiDimensions {
    /// Canonical form: positive exponents, then `/` and the negative ones, `.` as separator.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        let push = |out: &mut String, base: BaseDimension, exp: u8| {
            if !out.is_empty() && !out.ends_with('/') {
                out.push('.');
            }
            out.push_str(base.symbol());
            if exp != 1 {
                out.push_str(&exp.to_string());
            }
        };

        for base in BaseDimension::ALL {
            let exp = self.exponent(base);
            if exp > 0 {
                push(&mut out, base, exp.unsigned_abs());
            }
        }
        if out.is_empty() {
            out.push('1');
        }
        if self.0.iter().any(|&e| e < 0) {
            out.push('/');
            for base in BaseDimension::ALL {
                let exp = self.exponent(base);
                if exp < 0 {
                    push(&mut out, base, exp.unsigned_abs());
                }
            }
        }
        f.write_str(&out)
    }
}

impl FromStr for SiDimensions {
    type Err = Error;

    /// Parses the canonical form (`kg.m/s2`) as well as compact forms such as
    /// `kgm/s2`, `kg.m.s-2` or `kg.m/s^2`. Symbols may appear in any order and
    /// repeated symbols accumulate.
    fn from_str(s: &str) -> Result<Self> {
        let cleaned: String = s.chars().filter(|c| !matches!(c, ' ' | '.' | '^')).collect();
        let mut parts = cleaned.split('/');
        let numerator = parse_product(parts.next().unwrap_or(""), s)?;
        let Some(denominator) = parts.next() else {
            return Ok(numerator);
        };
        if parts.next().is_some() {
            return Err(Error::InvalidDimension(format!(
                "'{s}' contains more than one division sign"
            )));
        }
        numerator.minus(&parse_product(denominator, s)?)
    }
}

/// Symbols ordered so that longer ones win (`mol` before `m`).
const PARSE_ORDER: [BaseDimension; NUMBER_OF_DIMENSIONS] = [
    BaseDimension::AmountOfSubstance,
    BaseDimension::Mass,
    BaseDimension::LuminousIntensity,
    BaseDimension::Length,
    BaseDimension::Time,
    BaseDimension::Current,
    BaseDimension::Temperature,
];

fn parse_product(input: &str, original: &str) -> Result<SiDimensions> {
    let mut dims = SiDimensions::DIMENSIONLESS;
    if input.is_empty() || input == "1" {
        return Ok(dims);
    }

    let mut rest = input;
    while !rest.is_empty() {
        let base = PARSE_ORDER
            .iter()
            .copied()
            .find(|b| rest.starts_with(b.symbol()))
            .ok_or_else(|| {
                Error::InvalidDimension(format!("unexpected '{rest}' in '{original}'"))
            })?;
        rest = &rest[base.symbol().len()..];

        let negative = rest.starts_with('-');
        if negative {
            rest = &rest[1..];
        }
        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        let exponent: i8 = if digits == 0 {
            if negative {
                return Err(Error::InvalidDimension(format!(
                    "'{original}' has a minus sign for {} but no exponent",
                    base.symbol()
                )));
            }
            1
        } else {
            rest[..digits].parse().map_err(|_| {
                Error::InvalidDimension(format!("exponent out of range in '{original}'"))
            })?
        };
        rest = &rest[digits..];

        let exponent = if negative { -exponent } else { exponent };
        let current = dims.exponent(base);
        let total = current.checked_add(exponent).ok_or_else(|| {
            Error::InvalidDimension(format!("exponent out of range in '{original}'"))
        })?;
        dims = dims.with(base, total);
    }
    Ok(dims)
}

impl Mul for SiDimensions {
    type Output = Result<SiDimensions>;

    fn mul(self, rhs: SiDimensions) -> Self::Output {
        self.plus(&rhs)
    }
}

impl Div for SiDimensions {
    type Output = Result<SiDimensions>;

    fn div(self, rhs: SiDimensions) -> Self::Output {
        self.minus(&rhs)
    }
}

//! Conversion scales between a unit's own numeral space and the numeral space
//! of its family's standard unit.

use std::fmt;

/// Conversion strategy of a unit.
///
/// - `Identity`: the unit *is* the standard numeral space.
/// - `Linear`: `standard = value * factor`.
/// - `OffsetLinear`: `standard = (value + offset) * factor`, with `offset`
///   expressed in the unit's own numeral space.
/// - `Grade`: percentage-style slope, `standard = atan(value * factor)` in radians.
///   Not linear, so it never takes part in scale composition.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scale {
    Identity,
    Linear { factor: f64 },
    OffsetLinear { factor: f64, offset: f64 },
    Grade { factor: f64 },
}

impl Scale {
    pub fn linear(factor: f64) -> Self {
        Scale::Linear { factor }
    }

    pub fn offset_linear(factor: f64, offset: f64) -> Self {
        Scale::OffsetLinear { factor, offset }
    }

    pub fn grade(factor: f64) -> Self {
        Scale::Grade { factor }
    }

    /// Convert a value expressed in this scale to the standard numeral space.
    pub fn to_standard(&self, value: f64) -> f64 {
        match *self {
            Scale::Identity => value,
            Scale::Linear { factor } => value * factor,
            Scale::OffsetLinear { factor, offset } => (value + offset) * factor,
            Scale::Grade { factor } => (value * factor).atan(),
        }
    }

    /// Convert a value from the standard numeral space into this scale.
    pub fn from_standard(&self, value: f64) -> f64 {
        match *self {
            Scale::Identity => value,
            Scale::Linear { factor } => value / factor,
            Scale::OffsetLinear { factor, offset } => value / factor - offset,
            Scale::Grade { factor } => value.tan() / factor,
        }
    }

    /// The multiplicative factor to the standard unit (1 for `Identity`).
    pub fn factor(&self) -> f64 {
        match *self {
            Scale::Identity => 1.0,
            Scale::Linear { factor }
            | Scale::OffsetLinear { factor, .. }
            | Scale::Grade { factor } => factor,
        }
    }

    /// The offset in the unit's own numeral space (0 unless `OffsetLinear`).
    pub fn offset(&self) -> f64 {
        match *self {
            Scale::OffsetLinear { offset, .. } => offset,
            _ => 0.0,
        }
    }

    /// True when values in this scale need no conversion at all.
    pub fn is_base_numeral_space(&self) -> bool {
        match *self {
            Scale::Identity => true,
            Scale::Linear { factor } => factor == 1.0,
            Scale::OffsetLinear { factor, offset } => factor == 1.0 && offset == 0.0,
            Scale::Grade { .. } => false,
        }
    }

    /// Whether linear derivations may compose onto this scale.
    pub fn is_linear(&self) -> bool {
        matches!(self, Scale::Identity | Scale::Linear { .. })
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Scale::Identity => "identity",
            Scale::Linear { .. } => "linear",
            Scale::OffsetLinear { .. } => "offset-linear",
            Scale::Grade { .. } => "grade",
        }
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        match *self {
            Scale::Identity => true,
            Scale::Linear { factor } | Scale::Grade { factor } => {
                factor.is_finite() && factor != 0.0
            }
            Scale::OffsetLinear { factor, offset } => {
                factor.is_finite() && factor != 0.0 && offset.is_finite()
            }
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Scale::Identity => write!(f, "Identity"),
            Scale::Linear { factor } => write!(f, "Linear({factor})"),
            Scale::OffsetLinear { factor, offset } => write!(f, "OffsetLinear({factor}, {offset})"),
            Scale::Grade { factor } => write!(f, "Grade({factor})"),
        }
    }
}

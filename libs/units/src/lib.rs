#![forbid(unsafe_code)]
//! Units of measure with SI dimensional analysis.
//!
//! Units are grouped into families of one physical dimension, each with a
//! standard unit that every member's [`Scale`] converts into. The
//! [`UnitRegistry`] maps SI dimension vectors to families and synthesizes a
//! family for any dimension that has no predefined one, so arithmetic on
//! quantities can always find a unit for its result.
//!
//! ```rust,ignore
//! use dimensa_units::{global, SiDimensions};
//!
//! let force = global().lookup(&SiDimensions::new(1, 1, -2, 0, 0, 0, 0)).unwrap();
//! assert_eq!(force.id(), "N");
//! ```

pub mod catalog;
mod dimension;
mod error;
mod family;
mod prefix;
mod registry;
mod scale;
mod system;
mod unit;

use once_cell::sync::Lazy;

pub use dimension::{BaseDimension, SiDimensions, NUMBER_OF_DIMENSIONS};
pub use error::{Error, Result};
pub use family::{FamilyId, UnitFamily};
pub use prefix::{kilo_prefix, prefix, SiPrefix, SiPrefixPolicy, KILO_PREFIXES, UNIT_PREFIXES};
pub use registry::{RegistryOptions, UnitRegistry};
pub use scale::Scale;
pub use system::UnitSystem;
pub use unit::{Derivation, Unit, UnitBuilder, UnitKind};

static REGISTRY: Lazy<UnitRegistry> = Lazy::new(|| {
    UnitRegistry::with_standard_units().expect("failed to build the standard unit catalog")
});

/// Process-wide registry seeded with the predefined families.
pub fn global() -> &'static UnitRegistry {
    &REGISTRY
}

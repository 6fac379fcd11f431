//! SI prefix tables
//!
//! Uses a compile-time perfect hash map (phf) for symbol lookups, with ordered
//! static tables for expansion. Two tables exist:
//! - `UNIT_PREFIXES`: yocto..yotta applied to an un-prefixed standard unit (e.g. `m`).
//! - `KILO_PREFIXES`: the same prefixes re-expressed relative to a standard unit that
//!   already carries kilo (e.g. `kg`), plus the empty prefix for the bare unit (`g`).

use phf::phf_map;

/// Metadata of one metric prefix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiPrefix {
    /// Lookup key (`k`, `m`, `mu`, `da`, ...). Empty for the bare unit in the kilo table.
    pub symbol: &'static str,
    /// Long name prepended to unit names (`kilo`, `micro`, ...).
    pub name: &'static str,
    /// Power of ten of the prefix itself (milli = -3).
    pub exponent: i8,
    /// Factor applied to the unit being prefixed. For `KILO_PREFIXES` this is
    /// relative to kilo, so milli has multiplier 1e-6.
    pub multiplier: f64,
    /// Prefix used for the default display abbreviation (`μ` for micro).
    pub display_prefix: &'static str,
    /// Prefix used for ids and textual abbreviations (`mu` for micro).
    pub textual_prefix: &'static str,
}

const fn p(
    symbol: &'static str,
    name: &'static str,
    exponent: i8,
    multiplier: f64,
    display_prefix: &'static str,
) -> SiPrefix {
    SiPrefix {
        symbol,
        name,
        exponent,
        multiplier,
        display_prefix,
        textual_prefix: symbol,
    }
}

/// Prefixes from yocto to yotta, smallest first.
pub static UNIT_PREFIXES: [SiPrefix; 20] = [
    p("y", "yocto", -24, 1e-24, "y"),
    p("z", "zepto", -21, 1e-21, "z"),
    p("a", "atto", -18, 1e-18, "a"),
    p("f", "femto", -15, 1e-15, "f"),
    p("p", "pico", -12, 1e-12, "p"),
    p("n", "nano", -9, 1e-9, "n"),
    p("mu", "micro", -6, 1e-6, "\u{03BC}"),
    p("m", "milli", -3, 1e-3, "m"),
    p("c", "centi", -2, 1e-2, "c"),
    p("d", "deci", -1, 1e-1, "d"),
    p("da", "deca", 1, 1e1, "da"),
    p("h", "hecto", 2, 1e2, "h"),
    p("k", "kilo", 3, 1e3, "k"),
    p("M", "mega", 6, 1e6, "M"),
    p("G", "giga", 9, 1e9, "G"),
    p("T", "tera", 12, 1e12, "T"),
    p("P", "peta", 15, 1e15, "P"),
    p("E", "exa", 18, 1e18, "E"),
    p("Z", "zetta", 21, 1e21, "Z"),
    p("Y", "yotta", 24, 1e24, "Y"),
];

/// Prefixes relative to a kilo-anchored standard unit. Kilo itself is absent: it
/// is the standard unit.
pub static KILO_PREFIXES: [SiPrefix; 20] = [
    p("y", "yocto", -24, 1e-27, "y"),
    p("z", "zepto", -21, 1e-24, "z"),
    p("a", "atto", -18, 1e-21, "a"),
    p("f", "femto", -15, 1e-18, "f"),
    p("p", "pico", -12, 1e-15, "p"),
    p("n", "nano", -9, 1e-12, "n"),
    p("mu", "micro", -6, 1e-9, "\u{03BC}"),
    p("m", "milli", -3, 1e-6, "m"),
    p("c", "centi", -2, 1e-5, "c"),
    p("d", "deci", -1, 1e-4, "d"),
    p("", "", 0, 1e-3, ""),
    p("da", "deca", 1, 1e-2, "da"),
    p("h", "hecto", 2, 1e-1, "h"),
    p("M", "mega", 6, 1e3, "M"),
    p("G", "giga", 9, 1e6, "G"),
    p("T", "tera", 12, 1e9, "T"),
    p("P", "peta", 15, 1e12, "P"),
    p("E", "exa", 18, 1e15, "E"),
    p("Z", "zetta", 21, 1e18, "Z"),
    p("Y", "yotta", 24, 1e21, "Y"),
];

static UNIT_PREFIX_INDEX: phf::Map<&'static str, usize> = phf_map! {
    "y" => 0, "z" => 1, "a" => 2, "f" => 3, "p" => 4, "n" => 5,
    "mu" => 6, "\u{03BC}" => 6, "m" => 7, "c" => 8, "d" => 9,
    "da" => 10, "h" => 11, "k" => 12, "M" => 13, "G" => 14,
    "T" => 15, "P" => 16, "E" => 17, "Z" => 18, "Y" => 19,
};

static KILO_PREFIX_INDEX: phf::Map<&'static str, usize> = phf_map! {
    "y" => 0, "z" => 1, "a" => 2, "f" => 3, "p" => 4, "n" => 5,
    "mu" => 6, "\u{03BC}" => 6, "m" => 7, "c" => 8, "d" => 9,
    "" => 10, "da" => 11, "h" => 12, "M" => 13, "G" => 14,
    "T" => 15, "P" => 16, "E" => 17, "Z" => 18, "Y" => 19,
};

/// Look up a prefix by symbol (`k`, `m`, `mu`, ...). The display form `μ` is accepted too.
pub fn prefix(symbol: &str) -> Option<&'static SiPrefix> {
    UNIT_PREFIX_INDEX.get(symbol).map(|&i| &UNIT_PREFIXES[i])
}

/// Look up a prefix relative to kilo. The empty symbol yields the bare-unit entry.
pub fn kilo_prefix(symbol: &str) -> Option<&'static SiPrefix> {
    KILO_PREFIX_INDEX.get(symbol).map(|&i| &KILO_PREFIXES[i])
}

/// Which prefixed siblings a family generates when a unit is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SiPrefixPolicy {
    #[default]
    None,
    /// Every prefix from yocto to yotta.
    All,
    /// Only prefixes with a positive exponent (deca..yotta).
    Positive,
    /// The unit is itself a kilo multiple; expand from `KILO_PREFIXES`.
    Kilo,
}

impl SiPrefixPolicy {
    pub fn prefixes(&self) -> Vec<&'static SiPrefix> {
        match self {
            SiPrefixPolicy::None => Vec::new(),
            SiPrefixPolicy::All => UNIT_PREFIXES.iter().collect(),
            SiPrefixPolicy::Positive => UNIT_PREFIXES.iter().filter(|p| p.exponent > 0).collect(),
            SiPrefixPolicy::Kilo => KILO_PREFIXES.iter().collect(),
        }
    }
}

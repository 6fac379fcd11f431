use std::fmt;

/// Unit system a unit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitSystem {
    /// SI base units and their prefixed variants (m, kg, s, A, K, mol, cd).
    SiBase,
    /// Coherent SI derived units (N, J, Pa, degC, ...).
    SiDerived,
    /// Non-SI units accepted for use with SI (min, h, deg, L, ...).
    SiAccepted,
    Cgs,
    CgsEsu,
    CgsEmu,
    Imperial,
    UsCustomary,
    /// Meter-tonne-second.
    Mts,
    Other,
}

impl UnitSystem {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            UnitSystem::SiBase => "SI",
            UnitSystem::SiDerived => "SI derived",
            UnitSystem::SiAccepted => "SI accepted",
            UnitSystem::Cgs => "CGS",
            UnitSystem::CgsEsu => "CGS ESU",
            UnitSystem::CgsEmu => "CGS EMU",
            UnitSystem::Imperial => "Imperial",
            UnitSystem::UsCustomary => "US customary",
            UnitSystem::Mts => "MTS",
            UnitSystem::Other => "other",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

//! Unit families: every unit sharing one physical dimension
//!
//! A family owns its member units and designates one standard unit (the unit
//! that founded the family, with a base-numeral-space scale). Every member's
//! scale converts into the standard unit's numeral space.

use crate::dimension::SiDimensions;
use crate::error::{Error, Result};
use crate::prefix::SiPrefixPolicy;
use crate::registry::RegistryOptions;
use crate::unit::Unit;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Index of a family in its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FamilyId(pub(crate) usize);

impl FamilyId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
pub struct UnitFamily {
    id: FamilyId,
    name: String,
    dimensions: SiDimensions,
    standard: Arc<Unit>,
    /// Registration order.
    members: Vec<Arc<Unit>>,
    by_id: HashMap<String, usize>,
    by_abbreviation: HashMap<String, usize>,
}

impl UnitFamily {
    /// Create a family around its standard unit and register it (plus any
    /// requested prefixed siblings).
    pub(crate) fn found(
        name: String,
        standard: Unit,
        policy: SiPrefixPolicy,
        options: &RegistryOptions,
    ) -> Result<UnitFamily> {
        if !standard.is_base_numeral_space() {
            return Err(Error::validation(format!(
                "unit '{}' cannot found family '{name}': a standard unit needs factor 1 and no offset, got {}",
                standard.id(),
                standard.scale()
            )));
        }
        let standard = Arc::new(standard);
        let mut family = UnitFamily {
            id: standard.family(),
            name,
            dimensions: standard.dimensions(),
            standard: Arc::clone(&standard),
            members: Vec::new(),
            by_id: HashMap::new(),
            by_abbreviation: HashMap::new(),
        };
        family.insert(standard, policy, options)?;
        Ok(family)
    }

    pub fn id(&self) -> FamilyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimensions(&self) -> SiDimensions {
        self.dimensions
    }

    /// Whether the members are absolute units (with a meaningful zero point).
    pub fn is_absolute(&self) -> bool {
        self.standard.is_absolute()
    }

    pub fn standard_unit(&self) -> &Arc<Unit> {
        &self.standard
    }

    pub fn units(&self) -> impl Iterator<Item = &Arc<Unit>> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn unit_by_id(&self, id: &str) -> Option<&Arc<Unit>> {
        self.by_id.get(id).map(|&i| &self.members[i])
    }

    /// Look a unit up by abbreviation.
    ///
    /// Tries the abbreviation itself, then the abbreviation with spaces, `.` and
    /// `^` removed (so `kg.m/s^2` finds `kgm/s2`), and finally interprets it as an
    /// SI dimension string, which resolves to the standard unit when it matches
    /// this family's dimensions.
    pub fn unit_by_abbreviation(&self, abbreviation: &str) -> Option<&Arc<Unit>> {
        if let Some(&i) = self.by_abbreviation.get(abbreviation) {
            return Some(&self.members[i]);
        }
        let compact: String = abbreviation
            .chars()
            .filter(|c| !matches!(c, ' ' | '.' | '^'))
            .collect();
        if let Some(&i) = self.by_abbreviation.get(compact.as_str()) {
            return Some(&self.members[i]);
        }
        if self.is_absolute() {
            return None;
        }
        match abbreviation.parse::<SiDimensions>() {
            Ok(dims) if dims == self.dimensions => Some(&self.standard),
            _ => None,
        }
    }

    /// Register `unit` and, when `policy` asks for it, every prefixed sibling that
    /// is not registered yet.
    ///
    /// All siblings are computed before the family is touched, so a failure
    /// leaves the family unchanged.
    pub(crate) fn register_unit(
        &mut self,
        unit: Unit,
        policy: SiPrefixPolicy,
        options: &RegistryOptions,
    ) -> Result<Arc<Unit>> {
        if unit.family() != self.id {
            return Err(Error::validation(format!(
                "unit '{}' belongs to family {}, not to '{}'",
                unit.id(),
                unit.family(),
                self.name
            )));
        }
        if unit.is_absolute() != self.is_absolute() {
            return Err(Error::validation(format!(
                "unit '{}' is {} but family '{}' holds {} units",
                unit.id(),
                kind_label(unit.is_absolute()),
                self.name,
                kind_label(self.is_absolute())
            )));
        }
        self.insert(Arc::new(unit), policy, options)
    }

    fn insert(
        &mut self,
        unit: Arc<Unit>,
        policy: SiPrefixPolicy,
        options: &RegistryOptions,
    ) -> Result<Arc<Unit>> {
        let mut siblings = Vec::new();
        for prefix in policy.prefixes() {
            let builder = match policy {
                SiPrefixPolicy::Kilo => unit.kilo_prefixed(prefix, true)?,
                _ => unit.prefixed(prefix, true)?,
            };
            let (sibling, _) = builder.into_unit(self.id, self.dimensions)?;
            siblings.push(sibling);
        }

        let registered = match self.by_id.get(unit.id()).copied() {
            None => {
                self.push(Arc::clone(&unit));
                unit
            }
            Some(i) => {
                let existing = &self.members[i];
                let supersedes = existing.is_generated()
                    && !unit.is_generated()
                    && !options.strict_duplicates
                    && !Arc::ptr_eq(existing, &self.standard);
                if supersedes {
                    tracing::trace!(family = %self.name, unit = %unit.id(), "explicit unit supersedes generated unit");
                    self.by_abbreviation.retain(|_, slot| *slot != i);
                    self.members[i] = Arc::clone(&unit);
                    self.index_abbreviations(i);
                    unit
                } else if !existing.is_generated() && unit.is_generated() {
                    tracing::trace!(family = %self.name, unit = %unit.id(), "generated unit skipped, explicit unit exists");
                    return Ok(Arc::clone(existing));
                } else {
                    return Err(Error::DuplicateId {
                        family: self.name.clone(),
                        id: unit.id().to_string(),
                    });
                }
            }
        };

        for sibling in siblings {
            if self.by_id.contains_key(sibling.id()) {
                tracing::trace!(family = %self.name, unit = %sibling.id(), "prefixed unit already registered");
                continue;
            }
            self.push(Arc::new(sibling));
        }
        Ok(registered)
    }

    fn push(&mut self, unit: Arc<Unit>) {
        tracing::trace!(
            family = %self.name,
            unit = %unit.id(),
            scale = %unit.scale(),
            generated = unit.is_generated(),
            "registered unit"
        );
        let i = self.members.len();
        self.by_id.insert(unit.id().to_string(), i);
        self.members.push(unit);
        self.index_abbreviations(i);
    }

    /// Explicit units take abbreviations over generated ones; otherwise the first
    /// registration keeps the abbreviation.
    fn index_abbreviations(&mut self, i: usize) {
        let unit = Arc::clone(&self.members[i]);
        for abbreviation in unit.abbreviations() {
            match self.by_abbreviation.get(abbreviation.as_str()).copied() {
                None => {
                    self.by_abbreviation.insert(abbreviation.clone(), i);
                }
                Some(j) if j != i => {
                    if self.members[j].is_generated() && !unit.is_generated() {
                        self.by_abbreviation.insert(abbreviation.clone(), i);
                    }
                }
                Some(_) => {}
            }
        }
    }
}

fn kind_label(absolute: bool) -> &'static str {
    if absolute {
        "absolute"
    } else {
        "relative"
    }
}

//! Dimension registry and dynamic unit synthesis
//!
//! The registry owns every [`UnitFamily`] (arena style, addressed by
//! [`FamilyId`]) and maps each SI dimension vector to the first relative family
//! registered for it. Entries are added, never removed or replaced.
//!
//! [`UnitRegistry::lookup_or_create`] behaves like a structural type system over
//! dimensions with memoized nominal types: asking twice for the same dimension
//! vector yields the identical `Arc<Unit>`, synthesizing a family the first time
//! a dimension without a predefined name is requested.
//!
//! One `RwLock` guards the arena and the dimension map; "check for an existing
//! family, else create and insert" always runs under a single write guard.

use crate::dimension::SiDimensions;
use crate::error::{Error, Result};
use crate::family::{FamilyId, UnitFamily};
use crate::scale::Scale;
use crate::system::UnitSystem;
use crate::unit::{FamilyTarget, Unit, UnitBuilder};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Registry configuration.
#[derive(Clone, Debug)]
pub struct RegistryOptions {
    /// `lookup_or_create` rejects dimension vectors with an exponent whose
    /// absolute value exceeds this bound.
    pub max_exponent: u8,
    /// If `true`, an explicit unit may not reuse the id of a generated unit
    /// (by default the explicit unit supersedes it).
    pub strict_duplicates: bool,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            max_exponent: 12,
            strict_duplicates: false,
        }
    }
}

impl RegistryOptions {
    pub fn with_max_exponent(mut self, max_exponent: u8) -> Self {
        self.max_exponent = max_exponent;
        self
    }

    pub fn with_strict_duplicates(mut self, strict: bool) -> Self {
        self.strict_duplicates = strict;
        self
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    families: Vec<UnitFamily>,
    by_dimension: HashMap<SiDimensions, FamilyId>,
    by_name: HashMap<String, FamilyId>,
    frozen: bool,
}

impl RegistryState {
    fn family(&self, id: FamilyId) -> Result<&UnitFamily> {
        self.families.get(id.0).ok_or(Error::UnknownFamily(id.0))
    }

    fn standard_for(&self, dimensions: &SiDimensions) -> Option<Arc<Unit>> {
        let id = self.by_dimension.get(dimensions)?;
        self.families
            .get(id.0)
            .map(|family| Arc::clone(family.standard_unit()))
    }

    fn register(&mut self, builder: UnitBuilder, options: &RegistryOptions) -> Result<Arc<Unit>> {
        builder.validate()?;
        let Some(target) = builder.target().cloned() else {
            return Err(Error::validation(format!(
                "unit '{}': owning family cannot be unset",
                builder.id_or_empty()
            )));
        };

        match target {
            FamilyTarget::Existing(id) => {
                let dimensions = self.family(id)?.dimensions();
                let (unit, policy) = builder.into_unit(id, dimensions)?;
                let family = self
                    .families
                    .get_mut(id.0)
                    .ok_or(Error::UnknownFamily(id.0))?;
                family.register_unit(unit, policy, options)
            }
            FamilyTarget::New { name, dimensions } => {
                if self.by_name.contains_key(&name) {
                    return Err(Error::validation(format!(
                        "a unit family named '{name}' already exists"
                    )));
                }
                let id = FamilyId(self.families.len());
                let (unit, policy) = builder.into_unit(id, dimensions)?;
                let family = UnitFamily::found(name.clone(), unit, policy, options)?;
                let standard = Arc::clone(family.standard_unit());

                tracing::debug!(
                    family = %name,
                    dimensions = %dimensions,
                    absolute = family.is_absolute(),
                    standard = %standard.id(),
                    "registered unit family"
                );
                if !family.is_absolute() {
                    self.by_dimension.entry(dimensions).or_insert(id);
                }
                self.by_name.insert(name, id);
                self.families.push(family);
                Ok(standard)
            }
        }
    }
}

/// Process-wide map from dimension vector to unit family.
///
/// Created once, grows monotonically. Can be frozen after start-up, after which
/// only generated units (dimension synthesis, prefix expansion) are accepted.
#[derive(Debug, Default)]
pub struct UnitRegistry {
    state: RwLock<RegistryState>,
    options: RegistryOptions,
}

impl UnitRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RegistryOptions) -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            options,
        }
    }

    /// A registry seeded with the predefined families of [`crate::catalog`].
    pub fn with_standard_units() -> Result<Self> {
        let registry = Self::new();
        crate::catalog::install(&registry)?;
        Ok(registry)
    }

    /// The process-wide registry, see [`crate::global`].
    pub fn global() -> &'static UnitRegistry {
        crate::global()
    }

    pub fn options(&self) -> &RegistryOptions {
        &self.options
    }

    // Families are only ever appended, so a poisoned lock still guards a
    // consistent state.
    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn register(&self, builder: UnitBuilder) -> Result<Arc<Unit>> {
        let mut state = self.write();
        if state.frozen && !builder.is_generated() {
            return Err(Error::Frozen(builder.id_or_empty().to_string()));
        }
        state.register(builder, &self.options)
    }

    /// Standard unit of the family registered for `dimensions`, if any.
    pub fn lookup(&self, dimensions: &SiDimensions) -> Option<Arc<Unit>> {
        self.read().standard_for(dimensions)
    }

    /// Standard unit of the family for `dimensions`, synthesizing a new family
    /// (with a generated identity-scaled unit named after the canonical
    /// dimension string) when none exists.
    pub fn lookup_or_create(&self, dimensions: &SiDimensions) -> Result<Arc<Unit>> {
        if let Some(unit) = self.lookup(dimensions) {
            return Ok(unit);
        }
        if dimensions.max_abs_exponent() > self.options.max_exponent {
            tracing::warn!(
                dimensions = ?dimensions.exponents(),
                max_exponent = self.options.max_exponent,
                "refusing to synthesize unit for dimension vector"
            );
            return Err(Error::InvalidDimension(format!(
                "{dimensions} has an exponent beyond +/-{}",
                self.options.max_exponent
            )));
        }

        let mut state = self.write();
        // Another thread may have created it between the read and the write guard.
        if let Some(unit) = state.standard_for(dimensions) {
            return Ok(unit);
        }

        let symbol = dimensions.to_string();
        let builder = UnitBuilder::new()
            .id(symbol.clone())
            .name(symbol.clone())
            .scale(Scale::Identity)
            .unit_system(UnitSystem::SiDerived)
            .generated(true)
            .new_family(symbol.clone(), *dimensions);
        let unit = state.register(builder, &self.options)?;
        tracing::debug!(dimensions = %symbol, "synthesized unit for dimension");
        Ok(unit)
    }

    /// Unit for the product of quantities in `a` and `b`.
    pub fn product_unit(&self, a: &Unit, b: &Unit) -> Result<Arc<Unit>> {
        Self::require_relative(a, b)?;
        self.lookup_or_create(&a.dimensions().plus(&b.dimensions())?)
    }

    /// Unit for the quotient of a quantity in `a` by one in `b`.
    pub fn quotient_unit(&self, a: &Unit, b: &Unit) -> Result<Arc<Unit>> {
        Self::require_relative(a, b)?;
        self.lookup_or_create(&a.dimensions().minus(&b.dimensions())?)
    }

    fn require_relative(a: &Unit, b: &Unit) -> Result<()> {
        for unit in [a, b] {
            if unit.is_absolute() {
                return Err(Error::validation(format!(
                    "absolute unit '{}' cannot be multiplied or divided",
                    unit.id()
                )));
            }
        }
        Ok(())
    }

    /// Convert `value` between two units of one family of this registry.
    pub fn convert(&self, value: f64, from: &Unit, to: &Unit) -> Result<f64> {
        {
            let state = self.read();
            state.family(from.family())?;
            state.family(to.family())?;
        }
        from.convert_to(value, to)
    }

    pub fn family_id(&self, name: &str) -> Option<FamilyId> {
        self.read().by_name.get(name).copied()
    }

    /// Family registered for `dimensions` (never an absolute family).
    pub fn family_for(&self, dimensions: &SiDimensions) -> Option<FamilyId> {
        self.read().by_dimension.get(dimensions).copied()
    }

    /// Run `f` against a family while holding the read guard.
    ///
    /// The guard is not reentrant: `f` must not register units or call
    /// `lookup_or_create` on this registry, or it deadlocks.
    pub fn with_family<R>(&self, id: FamilyId, f: impl FnOnce(&UnitFamily) -> R) -> Result<R> {
        let state = self.read();
        Ok(f(state.family(id)?))
    }

    pub fn standard_unit(&self, id: FamilyId) -> Result<Arc<Unit>> {
        self.with_family(id, |family| Arc::clone(family.standard_unit()))
    }

    pub fn unit(&self, family: FamilyId, id: &str) -> Option<Arc<Unit>> {
        self.with_family(family, |f| f.unit_by_id(id).cloned())
            .ok()
            .flatten()
    }

    pub fn unit_by_abbreviation(&self, family: FamilyId, abbreviation: &str) -> Option<Arc<Unit>> {
        self.with_family(family, |f| f.unit_by_abbreviation(abbreviation).cloned())
            .ok()
            .flatten()
    }

    /// Number of registered families.
    pub fn family_count(&self) -> usize {
        self.read().families.len()
    }

    /// Stop accepting explicit declarations. Dimension synthesis and generated
    /// prefix variants (`derive_si` with `generated = true`) keep working.
    pub fn freeze(&self) {
        let mut state = self.write();
        if !state.frozen {
            tracing::debug!(families = state.families.len(), "unit registry frozen");
        }
        state.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.read().frozen
    }
}

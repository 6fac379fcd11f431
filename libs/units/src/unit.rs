//! Unit descriptors and their staged builder
//!
//! A [`Unit`] is immutable and only ever produced by [`UnitBuilder`] after
//! validation. Units belong to exactly one family; they refer to it through a
//! [`FamilyId`] and resolve it through the [`UnitRegistry`] that owns it.
//!
//! Derivations (`derive_linear`, `derive_si`, `derive_si_kilo`,
//! `derive_linear_offset`) compute the new unit's fields from the parent's and
//! run them through the same builder, so every unit passes the same checks.

use crate::dimension::SiDimensions;
use crate::error::{Error, Result};
use crate::family::FamilyId;
use crate::prefix::{kilo_prefix, SiPrefix, SiPrefixPolicy};
use crate::registry::UnitRegistry;
use crate::scale::Scale;
use crate::system::UnitSystem;
use std::fmt;
use std::sync::Arc;

/// Whether a unit measures a difference (relative) or a position on a scale
/// with a meaningful zero point (absolute).
#[derive(Debug, Clone)]
pub enum UnitKind {
    Relative,
    /// Absolute unit, paired with the relative unit its differences are expressed in.
    Absolute { relative: Arc<Unit> },
}

#[derive(Debug, Clone)]
pub struct Unit {
    id: String,
    name: String,
    abbreviations: Vec<String>,
    default_display_abbreviation: String,
    default_textual_abbreviation: String,
    scale: Scale,
    family: FamilyId,
    dimensions: SiDimensions,
    unit_system: UnitSystem,
    generated: bool,
    base_numeral_space: bool,
    kind: UnitKind,
}

impl Unit {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All abbreviations, default display and textual abbreviations first.
    pub fn abbreviations(&self) -> &[String] {
        &self.abbreviations
    }

    pub fn default_display_abbreviation(&self) -> &str {
        &self.default_display_abbreviation
    }

    pub fn default_textual_abbreviation(&self) -> &str {
        &self.default_textual_abbreviation
    }

    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    pub fn family(&self) -> FamilyId {
        self.family
    }

    pub fn dimensions(&self) -> SiDimensions {
        self.dimensions
    }

    pub fn unit_system(&self) -> UnitSystem {
        self.unit_system
    }

    /// True for units synthesized by prefix expansion or dimension lookup.
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// True when values in this unit are already in the family's standard numeral space.
    pub fn is_base_numeral_space(&self) -> bool {
        self.base_numeral_space
    }

    pub fn kind(&self) -> &UnitKind {
        &self.kind
    }

    pub fn is_absolute(&self) -> bool {
        matches!(self.kind, UnitKind::Absolute { .. })
    }

    /// The paired relative unit of an absolute unit.
    pub fn relative_unit(&self) -> Option<&Arc<Unit>> {
        match &self.kind {
            UnitKind::Absolute { relative } => Some(relative),
            UnitKind::Relative => None,
        }
    }

    pub fn to_standard(&self, value: f64) -> f64 {
        self.scale.to_standard(value)
    }

    pub fn from_standard(&self, value: f64) -> f64 {
        self.scale.from_standard(value)
    }

    /// Convert `value` from this unit into `target`, which must share this unit's family.
    pub fn convert_to(&self, value: f64, target: &Unit) -> Result<f64> {
        if self.family != target.family {
            return Err(Error::Incompatible {
                from: self.id.clone(),
                to: target.id.clone(),
            });
        }
        if self.base_numeral_space && target.base_numeral_space {
            return Ok(value);
        }
        Ok(target.scale.from_standard(self.scale.to_standard(value)))
    }

    /// Derive a unit whose scale is `factor` times this unit's scale.
    ///
    /// Only units with an identity or linear scale can be derived from.
    pub fn derive_linear(
        &self,
        registry: &UnitRegistry,
        factor: f64,
        derivation: Derivation,
    ) -> Result<Arc<Unit>> {
        if !self.scale.is_linear() {
            return Err(self.scale_incompatible());
        }
        let builder = derivation
            .apply(UnitBuilder::new(), self.unit_system)
            .family(self.family)
            .scale(Scale::linear(factor * self.scale.factor()));
        registry.register(builder)
    }

    /// Derive the SI-prefixed variant of this unit, e.g. `km` from `m`.
    pub fn derive_si(
        &self,
        registry: &UnitRegistry,
        prefix: &SiPrefix,
        generated: bool,
    ) -> Result<Arc<Unit>> {
        registry.register(self.prefixed(prefix, generated)?)
    }

    /// Derive a prefixed variant of a unit that already carries kilo, e.g. `mg`
    /// from `kg`. The kilo marker is stripped before the new prefix is applied;
    /// the multiplier is taken relative to kilo.
    pub fn derive_si_kilo(
        &self,
        registry: &UnitRegistry,
        prefix: &SiPrefix,
        generated: bool,
    ) -> Result<Arc<Unit>> {
        registry.register(self.kilo_prefixed(prefix, generated)?)
    }

    /// Derive an absolute unit with scale `OffsetLinear(factor, offset)`.
    ///
    /// The parent must be an absolute unit whose own scale has factor 1 and no
    /// offset; nested offset composition is rejected.
    pub fn derive_linear_offset(
        &self,
        registry: &UnitRegistry,
        factor: f64,
        offset: f64,
        relative: &Arc<Unit>,
        derivation: Derivation,
    ) -> Result<Arc<Unit>> {
        if !self.is_absolute() {
            return Err(Error::validation(format!(
                "cannot derive an offset unit from relative unit '{}'",
                self.id
            )));
        }
        if self.scale.offset() != 0.0 || self.scale.factor() != 1.0 {
            return Err(self.scale_incompatible());
        }
        let builder = derivation
            .apply(UnitBuilder::new(), self.unit_system)
            .family(self.family)
            .scale(Scale::offset_linear(factor, offset))
            .absolute()
            .relative_unit(Arc::clone(relative));
        registry.register(builder)
    }

    pub(crate) fn prefixed(&self, prefix: &SiPrefix, generated: bool) -> Result<UnitBuilder> {
        let scale = self.prefixed_scale(prefix.multiplier)?;
        Ok(self.sibling(
            prefix,
            scale,
            generated,
            format!("{}{}", prefix.textual_prefix, self.id),
            format!("{}{}", prefix.name, self.name),
            |abbreviation| abbreviation,
        ))
    }

    pub(crate) fn kilo_prefixed(&self, prefix: &SiPrefix, generated: bool) -> Result<UnitBuilder> {
        let prefix = kilo_prefix(prefix.symbol).ok_or_else(|| {
            Error::validation(format!(
                "prefix '{}' cannot be applied to kilo-unit '{}'",
                prefix.symbol, self.id
            ))
        })?;

        let id = self.strip_kilo(&self.id, "k", "id")?;
        let name = self.strip_kilo(&self.name, "kilo", "name")?;
        self.strip_kilo(&self.default_display_abbreviation, "k", "display abbreviation")?;
        self.strip_kilo(&self.default_textual_abbreviation, "k", "textual abbreviation")?;
        for abbreviation in &self.abbreviations {
            self.strip_kilo(abbreviation, "k", "abbreviation")?;
        }

        let scale = self.prefixed_scale(prefix.multiplier)?;
        Ok(self.sibling(
            prefix,
            scale,
            generated,
            format!("{}{}", prefix.textual_prefix, id),
            format!("{}{}", prefix.name, name),
            |abbreviation| abbreviation.strip_prefix('k').unwrap_or(abbreviation),
        ))
    }

    fn strip_kilo<'a>(&self, value: &'a str, marker: &str, field: &str) -> Result<&'a str> {
        value.strip_prefix(marker).ok_or_else(|| {
            Error::validation(format!(
                "deriving from kilo-unit '{}': {field} '{value}' should start with '{marker}'",
                self.id
            ))
        })
    }

    fn prefixed_scale(&self, multiplier: f64) -> Result<Scale> {
        match self.scale {
            Scale::Identity | Scale::Linear { .. } => {
                Ok(Scale::linear(multiplier * self.scale.factor()))
            }
            Scale::OffsetLinear { factor, offset } => {
                Ok(Scale::offset_linear(multiplier * factor, offset))
            }
            Scale::Grade { .. } => Err(self.scale_incompatible()),
        }
    }

    fn sibling(
        &self,
        prefix: &SiPrefix,
        scale: Scale,
        generated: bool,
        id: String,
        name: String,
        strip: impl Fn(&str) -> &str,
    ) -> UnitBuilder {
        let additional = self
            .abbreviations
            .iter()
            .map(|a| format!("{}{}", prefix.textual_prefix, strip(a)));
        let mut builder = UnitBuilder::new()
            .id(id)
            .name(name)
            .family(self.family)
            .scale(scale)
            .unit_system(self.unit_system)
            .default_display_abbreviation(format!(
                "{}{}",
                prefix.display_prefix,
                strip(&self.default_display_abbreviation)
            ))
            .default_textual_abbreviation(format!(
                "{}{}",
                prefix.textual_prefix,
                strip(&self.default_textual_abbreviation)
            ))
            .additional_abbreviations(additional)
            .generated(generated);
        if let UnitKind::Absolute { relative } = &self.kind {
            builder = builder.absolute().relative_unit(Arc::clone(relative));
        }
        builder
    }

    fn scale_incompatible(&self) -> Error {
        Error::ScaleIncompatible {
            unit: self.id.clone(),
            scale: self.scale.kind_name().to_string(),
        }
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.family == other.family && self.id == other.id
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.default_display_abbreviation)
    }
}

/// Where a built unit goes: an existing family, or a new family it founds.
#[derive(Debug, Clone)]
pub(crate) enum FamilyTarget {
    Existing(FamilyId),
    New {
        name: String,
        dimensions: SiDimensions,
    },
}

/// Staging record for a [`Unit`].
///
/// ```rust,ignore
/// let meter = UnitBuilder::new()
///     .id("m")
///     .name("meter")
///     .new_family("Length", SiDimensions::LENGTH)
///     .scale(Scale::Identity)
///     .unit_system(UnitSystem::SiBase)
///     .si_prefixes(SiPrefixPolicy::All)
///     .build(&registry)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct UnitBuilder {
    id: Option<String>,
    name: Option<String>,
    scale: Option<Scale>,
    unit_system: Option<UnitSystem>,
    family: Option<FamilyTarget>,
    default_display_abbreviation: Option<String>,
    default_textual_abbreviation: Option<String>,
    additional_abbreviations: Vec<String>,
    si_prefixes: SiPrefixPolicy,
    generated: bool,
    absolute: bool,
    relative_unit: Option<Arc<Unit>>,
}

impl UnitBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn scale(mut self, scale: Scale) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn unit_system(mut self, unit_system: UnitSystem) -> Self {
        self.unit_system = Some(unit_system);
        self
    }

    /// Add the unit to an existing family.
    pub fn family(mut self, family: FamilyId) -> Self {
        self.family = Some(FamilyTarget::Existing(family));
        self
    }

    /// Found a new family with this unit as its standard unit.
    pub fn new_family(mut self, name: impl Into<String>, dimensions: SiDimensions) -> Self {
        self.family = Some(FamilyTarget::New {
            name: name.into(),
            dimensions,
        });
        self
    }

    pub fn default_display_abbreviation(mut self, abbreviation: impl Into<String>) -> Self {
        self.default_display_abbreviation = Some(abbreviation.into());
        self
    }

    pub fn default_textual_abbreviation(mut self, abbreviation: impl Into<String>) -> Self {
        self.default_textual_abbreviation = Some(abbreviation.into());
        self
    }

    pub fn additional_abbreviations<I, S>(mut self, abbreviations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.additional_abbreviations
            .extend(abbreviations.into_iter().map(Into::into));
        self
    }

    /// Prefixed siblings to generate once the unit is registered.
    pub fn si_prefixes(mut self, policy: SiPrefixPolicy) -> Self {
        self.si_prefixes = policy;
        self
    }

    /// Generated units come from prefix expansion or dimension synthesis only;
    /// they stay accepted after the registry is frozen.
    pub(crate) fn generated(mut self, generated: bool) -> Self {
        self.generated = generated;
        self
    }

    /// Mark the unit as absolute. An absolute unit needs a paired relative unit
    /// and an offset-linear scale.
    pub fn absolute(mut self) -> Self {
        self.absolute = true;
        self
    }

    pub fn relative_unit(mut self, unit: Arc<Unit>) -> Self {
        self.relative_unit = Some(unit);
        self
    }

    pub(crate) fn is_generated(&self) -> bool {
        self.generated
    }

    pub(crate) fn target(&self) -> Option<&FamilyTarget> {
        self.family.as_ref()
    }

    pub(crate) fn id_or_empty(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    /// Check that every required field is present and consistent.
    pub fn validate(&self) -> Result<()> {
        let id = match self.id.as_deref() {
            None => return Err(Error::validation("id cannot be unset")),
            Some("") => return Err(Error::validation("id cannot be empty")),
            Some(id) => id,
        };
        match self.name.as_deref() {
            None => return Err(Error::validation(format!("unit '{id}': name cannot be unset"))),
            Some("") => return Err(Error::validation(format!("unit '{id}': name cannot be empty"))),
            Some(_) => {}
        }
        let Some(scale) = self.scale else {
            return Err(Error::validation(format!("unit '{id}': scale cannot be unset")));
        };
        if !scale.is_well_formed() {
            return Err(Error::validation(format!(
                "unit '{id}': scale {scale} must have a finite, non-zero factor"
            )));
        }
        if self.unit_system.is_none() {
            return Err(Error::validation(format!(
                "unit '{id}': unit system cannot be unset"
            )));
        }
        if self.family.is_none() {
            return Err(Error::validation(format!(
                "unit '{id}': owning family cannot be unset"
            )));
        }

        if self.absolute {
            let Some(relative) = &self.relative_unit else {
                return Err(Error::validation(format!(
                    "absolute unit '{id}': paired relative unit cannot be unset"
                )));
            };
            if relative.is_absolute() {
                return Err(Error::validation(format!(
                    "absolute unit '{id}': paired unit '{}' must be relative",
                    relative.id
                )));
            }
            if !matches!(scale, Scale::OffsetLinear { .. }) {
                return Err(Error::validation(format!(
                    "absolute unit '{id}': scale must be offset-linear, got {scale}"
                )));
            }
        } else if self.relative_unit.is_some() {
            return Err(Error::validation(format!(
                "unit '{id}': only absolute units can have a paired relative unit"
            )));
        }
        Ok(())
    }

    /// Validate and register the unit (and any requested prefixed siblings).
    pub fn build(self, registry: &UnitRegistry) -> Result<Arc<Unit>> {
        registry.register(self)
    }

    /// Produce the immutable unit for `family`. Does not touch any registry.
    pub(crate) fn into_unit(
        self,
        family: FamilyId,
        dimensions: SiDimensions,
    ) -> Result<(Unit, SiPrefixPolicy)> {
        self.validate()?;
        let UnitBuilder {
            id,
            name,
            scale,
            unit_system,
            default_display_abbreviation,
            default_textual_abbreviation,
            additional_abbreviations,
            si_prefixes,
            generated,
            absolute,
            relative_unit,
            ..
        } = self;
        let (Some(id), Some(name), Some(scale), Some(unit_system)) = (id, name, scale, unit_system)
        else {
            return Err(Error::validation("unit builder is incomplete"));
        };

        if let Some(relative) = &relative_unit {
            if relative.family == family {
                return Err(Error::validation(format!(
                    "absolute unit '{id}': paired unit '{}' must belong to a different family",
                    relative.id
                )));
            }
        }

        let display = default_display_abbreviation
            .or_else(|| default_textual_abbreviation.clone())
            .unwrap_or_else(|| id.clone());
        let textual = default_textual_abbreviation.unwrap_or_else(|| display.clone());

        let mut abbreviations: Vec<String> = Vec::with_capacity(2 + additional_abbreviations.len());
        for abbreviation in [display.clone(), textual.clone()]
            .into_iter()
            .chain(additional_abbreviations)
        {
            if !abbreviations.contains(&abbreviation) {
                abbreviations.push(abbreviation);
            }
        }

        let kind = match (absolute, relative_unit) {
            (true, Some(relative)) => UnitKind::Absolute { relative },
            _ => UnitKind::Relative,
        };

        let unit = Unit {
            id,
            name,
            abbreviations,
            default_display_abbreviation: display,
            default_textual_abbreviation: textual,
            base_numeral_space: scale.is_base_numeral_space(),
            scale,
            family,
            dimensions,
            unit_system,
            generated,
            kind,
        };
        Ok((unit, si_prefixes))
    }
}

/// Id, name and abbreviations of a unit derived from an existing one.
#[derive(Debug, Clone, Default)]
pub struct Derivation {
    id: String,
    name: String,
    unit_system: Option<UnitSystem>,
    default_display_abbreviation: Option<String>,
    default_textual_abbreviation: Option<String>,
    additional_abbreviations: Vec<String>,
}

impl Derivation {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Unit system of the derived unit; defaults to the parent's.
    pub fn unit_system(mut self, unit_system: UnitSystem) -> Self {
        self.unit_system = Some(unit_system);
        self
    }

    pub fn display_abbreviation(mut self, abbreviation: impl Into<String>) -> Self {
        self.default_display_abbreviation = Some(abbreviation.into());
        self
    }

    pub fn textual_abbreviation(mut self, abbreviation: impl Into<String>) -> Self {
        self.default_textual_abbreviation = Some(abbreviation.into());
        self
    }

    pub fn abbreviations<I, S>(mut self, abbreviations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.additional_abbreviations
            .extend(abbreviations.into_iter().map(Into::into));
        self
    }

    fn apply(self, mut builder: UnitBuilder, parent_system: UnitSystem) -> UnitBuilder {
        builder = builder
            .id(self.id)
            .name(self.name)
            .unit_system(self.unit_system.unwrap_or(parent_system))
            .additional_abbreviations(self.additional_abbreviations);
        if let Some(display) = self.default_display_abbreviation {
            builder = builder.default_display_abbreviation(display);
        }
        if let Some(textual) = self.default_textual_abbreviation {
            builder = builder.default_textual_abbreviation(textual);
        }
        builder
    }
}

use dimensa_units::{
    kilo_prefix, prefix, Derivation, Error, RegistryOptions, Scale, SiDimensions, SiPrefixPolicy,
    Unit, UnitBuilder, UnitRegistry, UnitSystem,
};
use std::sync::Arc;

fn standard(
    registry: &UnitRegistry,
    family: &str,
    dims: SiDimensions,
    id: &str,
    name: &str,
) -> Arc<Unit> {
    UnitBuilder::new()
        .id(id)
        .name(name)
        .new_family(family, dims)
        .scale(Scale::Identity)
        .unit_system(UnitSystem::SiBase)
        .build(registry)
        .unwrap()
}

fn family_len(registry: &UnitRegistry, unit: &Unit) -> usize {
    registry.with_family(unit.family(), |f| f.len()).unwrap()
}

/// Duration family with `s` and `min`, plus the absolute time family anchored at `s`.
fn time_registry() -> (UnitRegistry, Arc<Unit>, Arc<Unit>) {
    let registry = UnitRegistry::new();
    let second = standard(&registry, "Duration", SiDimensions::TIME, "s", "second");
    let minute = second
        .derive_linear(&registry, 60.0, Derivation::new("min", "minute"))
        .unwrap();
    let anchor = UnitBuilder::new()
        .id("s")
        .name("second")
        .new_family("Time", SiDimensions::TIME)
        .scale(Scale::offset_linear(1.0, 0.0))
        .unit_system(UnitSystem::SiBase)
        .absolute()
        .relative_unit(Arc::clone(&second))
        .build(&registry)
        .unwrap();
    (registry, anchor, minute)
}

#[test]
fn derive_linear_kilometer() {
    let registry = UnitRegistry::new();
    let meter = standard(&registry, "Length", SiDimensions::LENGTH, "m", "meter");
    let km = meter
        .derive_linear(&registry, 1000.0, Derivation::new("km", "kilometer"))
        .unwrap();

    assert_eq!(km.to_standard(2.5), 2500.0);
    assert_eq!(km.from_standard(2500.0), 2.5);
    assert_eq!(km.family(), meter.family());
    assert_eq!(km.dimensions(), SiDimensions::LENGTH);
    assert_eq!(km.unit_system(), UnitSystem::SiBase);
    assert!(!km.is_base_numeral_space());
    assert_eq!(registry.unit(meter.family(), "km").unwrap().as_ref(), km.as_ref());
}

#[test]
fn derive_linear_composes_factors() {
    let registry = UnitRegistry::new();
    let meter = standard(&registry, "Length", SiDimensions::LENGTH, "m", "meter");
    let ft = meter
        .derive_linear(&registry, 0.3048, Derivation::new("ft", "foot"))
        .unwrap();
    let yd = ft
        .derive_linear(&registry, 3.0, Derivation::new("yd", "yard"))
        .unwrap();
    assert!((yd.to_standard(1.0) - 0.9144).abs() < 1e-12);
}

#[test]
fn derive_si_kiloampere() {
    let registry = UnitRegistry::new();
    let ampere = standard(&registry, "ElectricalCurrent", SiDimensions::CURRENT, "A", "ampere");
    let ka = ampere
        .derive_si(&registry, prefix("k").unwrap(), false)
        .unwrap();

    assert_eq!(ka.id(), "kA");
    assert_eq!(ka.name(), "kiloampere");
    assert_eq!(ka.scale().factor(), 1000.0);
    assert_eq!(ka.default_display_abbreviation(), "kA");
    assert!(!ka.is_generated());
}

#[test]
fn derive_si_micro_uses_display_prefix() {
    let registry = UnitRegistry::new();
    let meter = standard(&registry, "Length", SiDimensions::LENGTH, "m", "meter");
    let um = meter
        .derive_si(&registry, prefix("mu").unwrap(), false)
        .unwrap();
    assert_eq!(um.id(), "mum");
    assert_eq!(um.default_display_abbreviation(), "\u{03BC}m");
    assert_eq!(um.default_textual_abbreviation(), "mum");
}

#[test]
fn grade_scale_cannot_be_derived_from() {
    let registry = UnitRegistry::new();
    let radian = standard(&registry, "Angle", SiDimensions::DIMENSIONLESS, "rad", "radian");
    let percent = UnitBuilder::new()
        .id("%")
        .name("percent")
        .family(radian.family())
        .scale(Scale::grade(0.01))
        .unit_system(UnitSystem::Other)
        .build(&registry)
        .unwrap();
    assert!((percent.to_standard(100.0) - std::f64::consts::FRAC_PI_4).abs() < 1e-12);

    let before = family_len(&registry, &radian);
    let err = percent
        .derive_linear(&registry, 2.0, Derivation::new("%%", "double percent"))
        .unwrap_err();
    assert!(matches!(err, Error::ScaleIncompatible { .. }));
    assert!(percent
        .derive_si(&registry, prefix("k").unwrap(), false)
        .is_err());
    assert_eq!(family_len(&registry, &radian), before);
    assert!(registry.unit(radian.family(), "%%").is_none());
}

#[test]
fn grade_scale_cannot_found_a_family() {
    let registry = UnitRegistry::new();
    let err = UnitBuilder::new()
        .id("%")
        .name("percent")
        .new_family("Slope", SiDimensions::DIMENSIONLESS)
        .scale(Scale::grade(0.01))
        .unit_system(UnitSystem::Other)
        .build(&registry)
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(registry.family_count(), 0);
}

#[test]
fn derive_linear_offset_minute() {
    let (registry, anchor, minute) = time_registry();
    let abs_minute = anchor
        .derive_linear_offset(&registry, 60.0, 0.0, &minute, Derivation::new("min", "minute"))
        .unwrap();

    assert_eq!(abs_minute.to_standard(2.0), 120.0);
    assert!(abs_minute.is_absolute());
    assert!(Arc::ptr_eq(abs_minute.relative_unit().unwrap(), &minute));
    assert_eq!(abs_minute.family(), anchor.family());
}

#[test]
fn derive_linear_offset_applies_offset_in_own_space() {
    let registry = UnitRegistry::new();
    let kelvin = standard(&registry, "Temperature", SiDimensions::TEMPERATURE, "K", "kelvin");
    let anchor = UnitBuilder::new()
        .id("K")
        .name("kelvin")
        .new_family("AbsoluteTemperature", SiDimensions::TEMPERATURE)
        .scale(Scale::offset_linear(1.0, 0.0))
        .unit_system(UnitSystem::SiBase)
        .absolute()
        .relative_unit(Arc::clone(&kelvin))
        .build(&registry)
        .unwrap();
    let celsius = anchor
        .derive_linear_offset(&registry, 1.0, 273.15, &kelvin, Derivation::new("degC", "degree Celsius"))
        .unwrap();
    assert!((celsius.to_standard(0.0) - 273.15).abs() < 1e-12);
    assert!((celsius.from_standard(373.15) - 100.0).abs() < 1e-9);

    // Composing onto a unit that already has an offset is not supported.
    let err = celsius
        .derive_linear_offset(&registry, 1.8, 32.0, &kelvin, Derivation::new("x", "nested"))
        .unwrap_err();
    assert!(matches!(err, Error::ScaleIncompatible { .. }));
}

#[test]
fn derive_linear_offset_needs_absolute_parent() {
    let (registry, _, minute) = time_registry();
    let err = minute
        .derive_linear_offset(&registry, 60.0, 0.0, &minute, Derivation::new("h", "hour"))
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn derive_linear_rejects_offset_scale() {
    let (registry, anchor, _) = time_registry();
    let err = anchor
        .derive_linear(&registry, 60.0, Derivation::new("min", "minute"))
        .unwrap_err();
    assert!(matches!(err, Error::ScaleIncompatible { .. }));
}

#[test]
fn derive_si_on_absolute_unit_keeps_pairing() {
    let (registry, anchor, _) = time_registry();
    let ks = anchor
        .derive_si(&registry, prefix("k").unwrap(), false)
        .unwrap();
    assert_eq!(ks.id(), "ks");
    assert!(ks.is_absolute());
    assert_eq!(ks.scale(), &Scale::offset_linear(1000.0, 0.0));
    assert!(Arc::ptr_eq(
        ks.relative_unit().unwrap(),
        anchor.relative_unit().unwrap()
    ));
}

#[test]
fn derive_si_keeps_existing_offset() {
    let registry = UnitRegistry::new();
    let kelvin = standard(&registry, "Temperature", SiDimensions::TEMPERATURE, "K", "kelvin");
    let anchor = UnitBuilder::new()
        .id("K")
        .name("kelvin")
        .new_family("AbsoluteTemperature", SiDimensions::TEMPERATURE)
        .scale(Scale::offset_linear(1.0, 0.0))
        .unit_system(UnitSystem::SiBase)
        .absolute()
        .relative_unit(Arc::clone(&kelvin))
        .build(&registry)
        .unwrap();
    let celsius = anchor
        .derive_linear_offset(
            &registry,
            1.0,
            273.15,
            &kelvin,
            Derivation::new("degC", "degree Celsius"),
        )
        .unwrap();

    let kilo = celsius
        .derive_si(&registry, prefix("k").unwrap(), false)
        .unwrap();
    assert_eq!(kilo.id(), "kdegC");
    assert_eq!(kilo.scale(), &Scale::offset_linear(1000.0, 273.15));
    assert!((kilo.to_standard(1.0) - 274_150.0).abs() < 1e-6);
    assert!((kilo.from_standard(274_150.0) - 1.0).abs() < 1e-9);
    assert!(Arc::ptr_eq(kilo.relative_unit().unwrap(), &kelvin));
}

#[test]
fn kilo_policy_expands_relative_to_kilogram() {
    let registry = UnitRegistry::new();
    let kilogram = UnitBuilder::new()
        .id("kg")
        .name("kilogram")
        .new_family("Mass", SiDimensions::MASS)
        .scale(Scale::Identity)
        .unit_system(UnitSystem::SiBase)
        .si_prefixes(SiPrefixPolicy::Kilo)
        .build(&registry)
        .unwrap();

    let gram = registry.unit(kilogram.family(), "g").unwrap();
    assert_eq!(gram.name(), "gram");
    assert!((gram.scale().factor() - 1e-3).abs() < 1e-18);
    assert!(gram.is_generated());

    let mg = registry.unit(kilogram.family(), "mg").unwrap();
    assert!((mg.scale().factor() - 1e-6).abs() < 1e-21);
    assert_eq!(mg.name(), "milligram");

    assert!(registry.unit(kilogram.family(), "kkg").is_none());
    assert_eq!(family_len(&registry, &kilogram), 21);
}

#[test]
fn derive_si_kilo_explicit_supersedes_generated() {
    let registry = UnitRegistry::new();
    let kilogram = UnitBuilder::new()
        .id("kg")
        .name("kilogram")
        .new_family("Mass", SiDimensions::MASS)
        .scale(Scale::Identity)
        .unit_system(UnitSystem::SiBase)
        .si_prefixes(SiPrefixPolicy::Kilo)
        .build(&registry)
        .unwrap();
    let before = family_len(&registry, &kilogram);

    let mg = kilogram
        .derive_si_kilo(&registry, prefix("m").unwrap(), false)
        .unwrap();
    assert!(!mg.is_generated());
    assert!(Arc::ptr_eq(&registry.unit(kilogram.family(), "mg").unwrap(), &mg));
    assert_eq!(family_len(&registry, &kilogram), before);

    // A generated duplicate of an explicit unit is skipped in favor of the existing one.
    let again = kilogram
        .derive_si_kilo(&registry, kilo_prefix("m").unwrap(), true)
        .unwrap();
    assert!(Arc::ptr_eq(&again, &mg));
}

#[test]
fn derive_si_kilo_requires_kilo_marker() {
    let registry = UnitRegistry::new();
    let meter = standard(&registry, "Length", SiDimensions::LENGTH, "m", "meter");
    let err = meter
        .derive_si_kilo(&registry, prefix("m").unwrap(), false)
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let kilogram = standard(&registry, "Mass", SiDimensions::MASS, "kg", "kilogram");
    let err = kilogram
        .derive_si_kilo(&registry, prefix("k").unwrap(), false)
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn explicit_unit_supersedes_generated_prefix_unit() {
    let registry = UnitRegistry::new();
    let meter = UnitBuilder::new()
        .id("m")
        .name("meter")
        .new_family("Length", SiDimensions::LENGTH)
        .scale(Scale::Identity)
        .unit_system(UnitSystem::SiBase)
        .si_prefixes(SiPrefixPolicy::All)
        .build(&registry)
        .unwrap();
    let generated = registry.unit(meter.family(), "km").unwrap();
    assert!(generated.is_generated());

    let km = meter
        .derive_si(&registry, prefix("k").unwrap(), false)
        .unwrap();
    assert!(!km.is_generated());
    assert!(Arc::ptr_eq(&registry.unit(meter.family(), "km").unwrap(), &km));
    assert!(Arc::ptr_eq(
        &registry.unit_by_abbreviation(meter.family(), "km").unwrap(),
        &km
    ));
}

#[test]
fn superseded_unit_releases_its_abbreviations() {
    let registry = UnitRegistry::new();
    let meter = UnitBuilder::new()
        .id("m")
        .name("meter")
        .new_family("Length", SiDimensions::LENGTH)
        .scale(Scale::Identity)
        .unit_system(UnitSystem::SiBase)
        .si_prefixes(SiPrefixPolicy::All)
        .build(&registry)
        .unwrap();
    let km = UnitBuilder::new()
        .id("km")
        .name("kilometer")
        .family(meter.family())
        .scale(Scale::linear(1000.0))
        .unit_system(UnitSystem::SiBase)
        .default_display_abbreviation("KM")
        .build(&registry)
        .unwrap();

    assert!(Arc::ptr_eq(&registry.unit(meter.family(), "km").unwrap(), &km));
    assert!(Arc::ptr_eq(
        &registry.unit_by_abbreviation(meter.family(), "KM").unwrap(),
        &km
    ));
    assert!(registry.unit_by_abbreviation(meter.family(), "km").is_none());
}

#[test]
fn strict_registry_rejects_superseding() {
    let registry = UnitRegistry::with_options(RegistryOptions::default().with_strict_duplicates(true));
    let meter = UnitBuilder::new()
        .id("m")
        .name("meter")
        .new_family("Length", SiDimensions::LENGTH)
        .scale(Scale::Identity)
        .unit_system(UnitSystem::SiBase)
        .si_prefixes(SiPrefixPolicy::Positive)
        .build(&registry)
        .unwrap();
    let err = meter
        .derive_si(&registry, prefix("k").unwrap(), false)
        .unwrap_err();
    assert_eq!(
        err,
        Error::DuplicateId {
            family: "Length".to_string(),
            id: "km".to_string()
        }
    );
}

#[test]
fn duplicate_explicit_id_is_rejected() {
    let registry = UnitRegistry::new();
    let meter = standard(&registry, "Length", SiDimensions::LENGTH, "m", "meter");
    meter
        .derive_linear(&registry, 0.3048, Derivation::new("ft", "foot"))
        .unwrap();
    let err = meter
        .derive_linear(&registry, 0.3048, Derivation::new("ft", "foot"))
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateId { .. }));
    assert_eq!(family_len(&registry, &meter), 2);
}

#[test]
fn derivation_carries_abbreviations_and_system() {
    let registry = UnitRegistry::new();
    let meter = standard(&registry, "Length", SiDimensions::LENGTH, "m", "meter");
    let inch = meter
        .derive_linear(
            &registry,
            0.0254,
            Derivation::new("in", "inch")
                .unit_system(UnitSystem::Imperial)
                .textual_abbreviation("in")
                .display_abbreviation("\u{2033}")
                .abbreviations(["inch", "\""]),
        )
        .unwrap();
    assert_eq!(inch.unit_system(), UnitSystem::Imperial);
    assert_eq!(inch.abbreviations(), ["\u{2033}", "in", "inch", "\""]);
    assert!(Arc::ptr_eq(
        &registry.unit_by_abbreviation(meter.family(), "\"").unwrap(),
        &inch
    ));
}

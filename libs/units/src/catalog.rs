//! Predefined unit families
//!
//! Seeds a registry with a compact set of quantities. Families are declared in
//! dependency order: derived families (speed, force, ...) after the families
//! whose units they are expressed in, absolute families after their relative
//! counterparts.

use crate::dimension::SiDimensions;
use crate::error::Result;
use crate::prefix::{prefix, SiPrefixPolicy};
use crate::registry::UnitRegistry;
use crate::scale::Scale;
use crate::system::UnitSystem;
use crate::unit::{Derivation, Unit, UnitBuilder};
use std::f64::consts::PI;
use std::sync::Arc;

/// Family names used by the catalog.
pub mod names {
    pub const DIMENSIONLESS: &str = "Dimensionless";
    pub const LENGTH: &str = "Length";
    pub const POSITION: &str = "Position";
    pub const MASS: &str = "Mass";
    pub const DURATION: &str = "Duration";
    pub const TIME: &str = "Time";
    pub const ANGLE: &str = "Angle";
    pub const DIRECTION: &str = "Direction";
    pub const ELECTRICAL_CURRENT: &str = "ElectricalCurrent";
    pub const TEMPERATURE: &str = "Temperature";
    pub const ABSOLUTE_TEMPERATURE: &str = "AbsoluteTemperature";
    pub const AMOUNT_OF_SUBSTANCE: &str = "AmountOfSubstance";
    pub const LUMINOUS_INTENSITY: &str = "LuminousIntensity";
    pub const FREQUENCY: &str = "Frequency";
    pub const SPEED: &str = "Speed";
    pub const ACCELERATION: &str = "Acceleration";
    pub const FORCE: &str = "Force";
    pub const ENERGY: &str = "Energy";
    pub const TORQUE: &str = "Torque";
    pub const POWER: &str = "Power";
    pub const PRESSURE: &str = "Pressure";
}

/// Declare every predefined family in `registry`.
pub fn install(registry: &UnitRegistry) -> Result<()> {
    standard(
        registry,
        names::DIMENSIONLESS,
        SiDimensions::DIMENSIONLESS,
        UnitBuilder::new().id("1").name("unit"),
        UnitSystem::SiDerived,
        SiPrefixPolicy::None,
    )?;

    let meter = length(registry)?;
    mass(registry)?;
    let (second, minute, hour, day) = duration(registry)?;
    let (radian, degree) = angle(registry)?;
    let (kelvin, celsius, fahrenheit, rankine) = temperature(registry)?;

    for (family, dims, id, name) in [
        (names::ELECTRICAL_CURRENT, SiDimensions::CURRENT, "A", "ampere"),
        (names::AMOUNT_OF_SUBSTANCE, SiDimensions::AMOUNT_OF_SUBSTANCE, "mol", "mole"),
        (names::LUMINOUS_INTENSITY, SiDimensions::LUMINOUS_INTENSITY, "cd", "candela"),
    ] {
        standard(
            registry,
            family,
            dims,
            UnitBuilder::new().id(id).name(name),
            UnitSystem::SiBase,
            SiPrefixPolicy::All,
        )?;
    }

    position(registry, &meter)?;
    time(registry, &second, &minute, &hour, &day)?;
    direction(registry, &radian, &degree)?;
    absolute_temperature(registry, &kelvin, &celsius, &fahrenheit, &rankine)?;

    derived(registry)?;
    Ok(())
}

fn standard(
    registry: &UnitRegistry,
    family: &str,
    dimensions: SiDimensions,
    builder: UnitBuilder,
    system: UnitSystem,
    policy: SiPrefixPolicy,
) -> Result<Arc<Unit>> {
    builder
        .new_family(family, dimensions)
        .scale(Scale::Identity)
        .unit_system(system)
        .si_prefixes(policy)
        .build(registry)
}

fn absolute_anchor(
    registry: &UnitRegistry,
    family: &str,
    dimensions: SiDimensions,
    relative: &Arc<Unit>,
    name: &str,
) -> Result<Arc<Unit>> {
    UnitBuilder::new()
        .id(relative.id())
        .name(name)
        .default_display_abbreviation(relative.default_display_abbreviation())
        .default_textual_abbreviation(relative.default_textual_abbreviation())
        .new_family(family, dimensions)
        .scale(Scale::offset_linear(1.0, 0.0))
        .unit_system(relative.unit_system())
        .absolute()
        .relative_unit(Arc::clone(relative))
        .build(registry)
}

fn length(registry: &UnitRegistry) -> Result<Arc<Unit>> {
    let meter = standard(
        registry,
        names::LENGTH,
        SiDimensions::LENGTH,
        UnitBuilder::new().id("m").name("meter"),
        UnitSystem::SiBase,
        SiPrefixPolicy::All,
    )?;
    // Explicit kilometer supersedes the one generated by prefix expansion.
    if let Some(kilo) = prefix("k") {
        meter.derive_si(registry, kilo, false)?;
    }
    let imperial = [
        (0.0254, "in", "inch", Some("\"")),
        (0.3048, "ft", "foot", Some("'")),
        (0.9144, "yd", "yard", None),
        (1609.344, "mi", "mile", None),
    ];
    for (factor, id, name, extra) in imperial {
        meter.derive_linear(
            registry,
            factor,
            Derivation::new(id, name)
                .unit_system(UnitSystem::Imperial)
                .abbreviations(extra),
        )?;
    }
    meter.derive_linear(
        registry,
        1852.0,
        Derivation::new("NM", "nautical mile").unit_system(UnitSystem::Other),
    )?;
    meter.derive_linear(
        registry,
        149_597_870_700.0,
        Derivation::new("AU", "astronomical unit").unit_system(UnitSystem::SiAccepted),
    )?;
    Ok(meter)
}

fn mass(registry: &UnitRegistry) -> Result<Arc<Unit>> {
    let kilogram = standard(
        registry,
        names::MASS,
        SiDimensions::MASS,
        UnitBuilder::new().id("kg").name("kilogram"),
        UnitSystem::SiBase,
        SiPrefixPolicy::Kilo,
    )?;
    kilogram.derive_linear(
        registry,
        1000.0,
        Derivation::new("t", "tonne").unit_system(UnitSystem::Mts),
    )?;
    kilogram.derive_linear(
        registry,
        0.453_592_37,
        Derivation::new("lb", "pound").unit_system(UnitSystem::Imperial),
    )?;
    kilogram.derive_linear(
        registry,
        0.028_349_523_125,
        Derivation::new("oz", "ounce").unit_system(UnitSystem::Imperial),
    )?;
    Ok(kilogram)
}

type DurationUnits = (Arc<Unit>, Arc<Unit>, Arc<Unit>, Arc<Unit>);

fn duration(registry: &UnitRegistry) -> Result<DurationUnits> {
    let second = standard(
        registry,
        names::DURATION,
        SiDimensions::TIME,
        UnitBuilder::new().id("s").name("second").additional_abbreviations(["sec"]),
        UnitSystem::SiBase,
        SiPrefixPolicy::All,
    )?;
    let accepted = |factor, id: &str, name: &str| {
        second.derive_linear(
            registry,
            factor,
            Derivation::new(id, name).unit_system(UnitSystem::SiAccepted),
        )
    };
    let minute = accepted(60.0, "min", "minute")?;
    let hour = accepted(3600.0, "h", "hour")?;
    let day = accepted(86_400.0, "day", "day")?;
    accepted(7.0 * 86_400.0, "wk", "week")?;
    Ok((second, minute, hour, day))
}

fn time(
    registry: &UnitRegistry,
    second: &Arc<Unit>,
    minute: &Arc<Unit>,
    hour: &Arc<Unit>,
    day: &Arc<Unit>,
) -> Result<()> {
    let anchor = absolute_anchor(registry, names::TIME, SiDimensions::TIME, second, "second")?;
    for (factor, relative) in [(60.0, minute), (3600.0, hour), (86_400.0, day)] {
        anchor.derive_linear_offset(
            registry,
            factor,
            0.0,
            relative,
            Derivation::new(relative.id(), relative.name()).unit_system(relative.unit_system()),
        )?;
    }
    Ok(())
}

fn position(registry: &UnitRegistry, meter: &Arc<Unit>) -> Result<()> {
    let anchor = absolute_anchor(registry, names::POSITION, SiDimensions::LENGTH, meter, "meter")?;
    for id in ["km", "in", "ft", "mi"] {
        let Some(relative) = registry.unit(meter.family(), id) else {
            continue;
        };
        anchor.derive_linear_offset(
            registry,
            relative.scale().factor(),
            0.0,
            &relative,
            Derivation::new(relative.id(), relative.name())
                .unit_system(relative.unit_system())
                .display_abbreviation(relative.default_display_abbreviation()),
        )?;
    }
    Ok(())
}

fn angle(registry: &UnitRegistry) -> Result<(Arc<Unit>, Arc<Unit>)> {
    let radian = standard(
        registry,
        names::ANGLE,
        SiDimensions::DIMENSIONLESS,
        UnitBuilder::new().id("rad").name("radian"),
        UnitSystem::SiDerived,
        SiPrefixPolicy::None,
    )?;
    let degree = radian.derive_linear(
        registry,
        PI / 180.0,
        Derivation::new("deg", "degree")
            .unit_system(UnitSystem::SiAccepted)
            .display_abbreviation("\u{00B0}"),
    )?;
    radian.derive_linear(
        registry,
        PI / 10_800.0,
        Derivation::new("arcmin", "arcminute")
            .unit_system(UnitSystem::SiAccepted)
            .display_abbreviation("'"),
    )?;
    radian.derive_linear(
        registry,
        PI / 648_000.0,
        Derivation::new("arcsec", "arcsecond")
            .unit_system(UnitSystem::SiAccepted)
            .display_abbreviation("\""),
    )?;
    radian.derive_linear(
        registry,
        PI / 200.0,
        Derivation::new("grad", "gradian").unit_system(UnitSystem::Other),
    )?;
    UnitBuilder::new()
        .id("%")
        .name("percent")
        .family(radian.family())
        .scale(Scale::grade(0.01))
        .unit_system(UnitSystem::Other)
        .build(registry)?;
    Ok((radian, degree))
}

fn direction(registry: &UnitRegistry, radian: &Arc<Unit>, degree: &Arc<Unit>) -> Result<()> {
    let anchor = absolute_anchor(
        registry,
        names::DIRECTION,
        SiDimensions::DIMENSIONLESS,
        radian,
        "radian",
    )?;
    anchor.derive_linear_offset(
        registry,
        PI / 180.0,
        0.0,
        degree,
        Derivation::new("deg", "degree")
            .unit_system(UnitSystem::SiAccepted)
            .display_abbreviation("\u{00B0}"),
    )?;
    Ok(())
}

type TemperatureUnits = (Arc<Unit>, Arc<Unit>, Arc<Unit>, Arc<Unit>);

fn temperature(registry: &UnitRegistry) -> Result<TemperatureUnits> {
    let kelvin = standard(
        registry,
        names::TEMPERATURE,
        SiDimensions::TEMPERATURE,
        UnitBuilder::new().id("K").name("kelvin"),
        UnitSystem::SiBase,
        SiPrefixPolicy::None,
    )?;
    let celsius = kelvin.derive_linear(
        registry,
        1.0,
        Derivation::new("degC", "degree Celsius")
            .unit_system(UnitSystem::SiDerived)
            .display_abbreviation("\u{00B0}C"),
    )?;
    let fahrenheit = kelvin.derive_linear(
        registry,
        5.0 / 9.0,
        Derivation::new("degF", "degree Fahrenheit")
            .unit_system(UnitSystem::Imperial)
            .display_abbreviation("\u{00B0}F"),
    )?;
    let rankine = kelvin.derive_linear(
        registry,
        5.0 / 9.0,
        Derivation::new("degR", "degree Rankine")
            .unit_system(UnitSystem::Other)
            .display_abbreviation("\u{00B0}R"),
    )?;
    Ok((kelvin, celsius, fahrenheit, rankine))
}

fn absolute_temperature(
    registry: &UnitRegistry,
    kelvin: &Arc<Unit>,
    celsius: &Arc<Unit>,
    fahrenheit: &Arc<Unit>,
    rankine: &Arc<Unit>,
) -> Result<()> {
    let anchor = absolute_anchor(
        registry,
        names::ABSOLUTE_TEMPERATURE,
        SiDimensions::TEMPERATURE,
        kelvin,
        "kelvin",
    )?;
    for (factor, offset, relative) in [
        (1.0, 273.15, celsius),
        (5.0 / 9.0, 459.67, fahrenheit),
        (5.0 / 9.0, 0.0, rankine),
    ] {
        anchor.derive_linear_offset(
            registry,
            factor,
            offset,
            relative,
            Derivation::new(relative.id(), relative.name())
                .unit_system(relative.unit_system())
                .display_abbreviation(relative.default_display_abbreviation()),
        )?;
    }
    Ok(())
}

fn derived(registry: &UnitRegistry) -> Result<()> {
    let hertz = standard(
        registry,
        names::FREQUENCY,
        SiDimensions::new(0, 0, -1, 0, 0, 0, 0),
        UnitBuilder::new().id("Hz").name("hertz"),
        UnitSystem::SiDerived,
        SiPrefixPolicy::All,
    )?;
    hertz.derive_linear(
        registry,
        1.0 / 60.0,
        Derivation::new("rpm", "revolutions per minute").unit_system(UnitSystem::Other),
    )?;

    let meter_per_second = standard(
        registry,
        names::SPEED,
        SiDimensions::new(0, 1, -1, 0, 0, 0, 0),
        UnitBuilder::new().id("m/s").name("meter per second"),
        UnitSystem::SiDerived,
        SiPrefixPolicy::None,
    )?;
    for (factor, id, name, system) in [
        (1000.0 / 3600.0, "km/h", "kilometer per hour", UnitSystem::SiAccepted),
        (1609.344 / 3600.0, "mi/h", "mile per hour", UnitSystem::Imperial),
        (1852.0 / 3600.0, "kt", "knot", UnitSystem::Other),
    ] {
        meter_per_second.derive_linear(registry, factor, Derivation::new(id, name).unit_system(system))?;
    }

    let meter_per_second_2 = standard(
        registry,
        names::ACCELERATION,
        SiDimensions::new(0, 1, -2, 0, 0, 0, 0),
        UnitBuilder::new().id("m/s2").name("meter per second squared"),
        UnitSystem::SiDerived,
        SiPrefixPolicy::None,
    )?;
    meter_per_second_2.derive_linear(
        registry,
        9.806_65,
        Derivation::new("g0", "standard gravity").unit_system(UnitSystem::Other),
    )?;

    let newton = standard(
        registry,
        names::FORCE,
        SiDimensions::new(1, 1, -2, 0, 0, 0, 0),
        UnitBuilder::new().id("N").name("newton"),
        UnitSystem::SiDerived,
        SiPrefixPolicy::All,
    )?;
    newton.derive_linear(
        registry,
        9.806_65,
        Derivation::new("kgf", "kilogram-force").unit_system(UnitSystem::Other),
    )?;
    newton.derive_linear(
        registry,
        4.448_221_615_260_5,
        Derivation::new("lbf", "pound-force").unit_system(UnitSystem::Imperial),
    )?;
    newton.derive_linear(
        registry,
        1e-5,
        Derivation::new("dyn", "dyne").unit_system(UnitSystem::Cgs),
    )?;

    let energy = SiDimensions::new(1, 2, -2, 0, 0, 0, 0);
    let joule = standard(
        registry,
        names::ENERGY,
        energy,
        UnitBuilder::new().id("J").name("joule"),
        UnitSystem::SiDerived,
        SiPrefixPolicy::All,
    )?;
    for (factor, id, name, system) in [
        (3600.0, "Wh", "watt-hour", UnitSystem::SiAccepted),
        (3.6e6, "kWh", "kilowatt-hour", UnitSystem::SiAccepted),
        (4.1868, "cal", "calorie", UnitSystem::Other),
        (1.602_176_634e-19, "eV", "electronvolt", UnitSystem::SiAccepted),
        (1e-7, "erg", "erg", UnitSystem::Cgs),
    ] {
        joule.derive_linear(registry, factor, Derivation::new(id, name).unit_system(system))?;
    }

    // Same dimensions as energy; lookups by dimension keep resolving to joule.
    standard(
        registry,
        names::TORQUE,
        energy,
        UnitBuilder::new().id("N.m").name("newton meter").additional_abbreviations(["Nm"]),
        UnitSystem::SiDerived,
        SiPrefixPolicy::None,
    )?;

    let watt = standard(
        registry,
        names::POWER,
        SiDimensions::new(1, 2, -3, 0, 0, 0, 0),
        UnitBuilder::new().id("W").name("watt"),
        UnitSystem::SiDerived,
        SiPrefixPolicy::All,
    )?;
    watt.derive_linear(
        registry,
        745.699_871_582_270_2,
        Derivation::new("hp", "horsepower").unit_system(UnitSystem::Imperial),
    )?;

    let pascal = standard(
        registry,
        names::PRESSURE,
        SiDimensions::new(1, -1, -2, 0, 0, 0, 0),
        UnitBuilder::new().id("Pa").name("pascal"),
        UnitSystem::SiDerived,
        SiPrefixPolicy::All,
    )?;
    for (factor, id, name, system) in [
        (1e5, "bar", "bar", UnitSystem::Other),
        (101_325.0, "atm", "standard atmosphere", UnitSystem::Other),
        (133.322_387_415, "mmHg", "millimeter of mercury", UnitSystem::Other),
        (6_894.757_293_168, "psi", "pound per square inch", UnitSystem::Imperial),
    ] {
        pascal.derive_linear(registry, factor, Derivation::new(id, name).unit_system(system))?;
    }

    Ok(())
}

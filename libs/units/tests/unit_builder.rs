use dimensa_units::{Error, Scale, SiDimensions, UnitBuilder, UnitKind, UnitRegistry, UnitSystem};
use std::sync::Arc;

fn length(registry: &UnitRegistry) -> UnitBuilder {
    let meter = UnitBuilder::new()
        .id("m")
        .name("meter")
        .new_family("Length", SiDimensions::LENGTH)
        .scale(Scale::Identity)
        .unit_system(UnitSystem::SiBase)
        .build(registry)
        .unwrap();
    UnitBuilder::new()
        .family(meter.family())
        .scale(Scale::linear(0.3048))
        .unit_system(UnitSystem::Imperial)
}

#[test]
fn abbreviations_fall_back_to_id() {
    let registry = UnitRegistry::new();
    let ft = length(&registry).id("ft").name("foot").build(&registry).unwrap();
    assert_eq!(ft.default_display_abbreviation(), "ft");
    assert_eq!(ft.default_textual_abbreviation(), "ft");
    assert_eq!(ft.to_string(), "ft");
}

#[test]
fn textual_abbreviation_falls_back_to_display() {
    let registry = UnitRegistry::new();
    let ft = length(&registry)
        .id("ft")
        .name("foot")
        .default_display_abbreviation("'")
        .build(&registry)
        .unwrap();
    assert_eq!(ft.default_display_abbreviation(), "'");
    assert_eq!(ft.default_textual_abbreviation(), "'");
}

#[test]
fn display_abbreviation_falls_back_to_textual() {
    let registry = UnitRegistry::new();
    let ft = length(&registry)
        .id("ft")
        .name("foot")
        .default_textual_abbreviation("feet")
        .build(&registry)
        .unwrap();
    assert_eq!(ft.default_display_abbreviation(), "feet");
    assert_eq!(ft.default_textual_abbreviation(), "feet");
    assert_eq!(ft.abbreviations(), ["feet"]);
}

#[test]
fn missing_fields_are_validation_errors() {
    let registry = UnitRegistry::new();
    let base = length(&registry);

    let cases = [
        base.clone().name("foot"),
        base.clone().id("").name("foot"),
        base.clone().id("ft"),
        base.clone().id("ft").name(""),
        UnitBuilder::new()
            .id("ft")
            .name("foot")
            .scale(Scale::Identity)
            .unit_system(UnitSystem::Other),
        UnitBuilder::new()
            .id("ft")
            .name("foot")
            .new_family("Other", SiDimensions::LENGTH)
            .unit_system(UnitSystem::Other),
        UnitBuilder::new()
            .id("ft")
            .name("foot")
            .new_family("Other", SiDimensions::LENGTH)
            .scale(Scale::Identity),
    ];
    for builder in cases {
        assert!(matches!(builder.validate(), Err(Error::Validation(_))));
        assert!(matches!(builder.build(&registry), Err(Error::Validation(_))));
    }
    assert_eq!(registry.family_count(), 1);
}

#[test]
fn degenerate_scales_are_rejected() {
    let registry = UnitRegistry::new();
    let base = length(&registry).id("x").name("x");
    for scale in [
        Scale::linear(0.0),
        Scale::linear(f64::NAN),
        Scale::offset_linear(1.0, f64::INFINITY),
    ] {
        let err = base.clone().scale(scale).validate().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}

#[test]
fn standard_unit_needs_base_numeral_space() {
    let registry = UnitRegistry::new();
    let err = UnitBuilder::new()
        .id("ft")
        .name("foot")
        .new_family("Feet", SiDimensions::LENGTH)
        .scale(Scale::linear(0.3048))
        .unit_system(UnitSystem::Imperial)
        .build(&registry)
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(registry.family_count(), 0);
}

#[test]
fn absolute_unit_needs_relative_pair_and_offset_scale() {
    let registry = UnitRegistry::new();
    let kelvin = UnitBuilder::new()
        .id("K")
        .name("kelvin")
        .new_family("Temperature", SiDimensions::TEMPERATURE)
        .scale(Scale::Identity)
        .unit_system(UnitSystem::SiBase)
        .build(&registry)
        .unwrap();
    let anchor = || {
        UnitBuilder::new()
            .id("K")
            .name("kelvin")
            .new_family("AbsoluteTemperature", SiDimensions::TEMPERATURE)
            .unit_system(UnitSystem::SiBase)
            .absolute()
    };

    let unpaired = anchor().scale(Scale::offset_linear(1.0, 0.0));
    assert!(matches!(unpaired.validate(), Err(Error::Validation(_))));

    let linear = anchor()
        .scale(Scale::Identity)
        .relative_unit(Arc::clone(&kelvin));
    assert!(matches!(linear.validate(), Err(Error::Validation(_))));

    let absolute = anchor()
        .scale(Scale::offset_linear(1.0, 0.0))
        .relative_unit(Arc::clone(&kelvin))
        .build(&registry)
        .unwrap();
    assert!(matches!(absolute.kind(), UnitKind::Absolute { .. }));

    // The paired unit must itself be relative.
    let err = UnitBuilder::new()
        .id("mK")
        .name("millikelvin")
        .family(absolute.family())
        .scale(Scale::offset_linear(1e-3, 0.0))
        .unit_system(UnitSystem::SiBase)
        .absolute()
        .relative_unit(Arc::clone(&absolute))
        .build(&registry)
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn relative_unit_cannot_join_absolute_family() {
    let registry = UnitRegistry::new();
    let kelvin = UnitBuilder::new()
        .id("K")
        .name("kelvin")
        .new_family("Temperature", SiDimensions::TEMPERATURE)
        .scale(Scale::Identity)
        .unit_system(UnitSystem::SiBase)
        .build(&registry)
        .unwrap();
    let absolute = UnitBuilder::new()
        .id("K")
        .name("kelvin")
        .new_family("AbsoluteTemperature", SiDimensions::TEMPERATURE)
        .scale(Scale::offset_linear(1.0, 0.0))
        .unit_system(UnitSystem::SiBase)
        .absolute()
        .relative_unit(kelvin)
        .build(&registry)
        .unwrap();

    let err = UnitBuilder::new()
        .id("mK")
        .name("millikelvin")
        .family(absolute.family())
        .scale(Scale::linear(1e-3))
        .unit_system(UnitSystem::SiBase)
        .build(&registry)
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

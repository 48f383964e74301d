//! Integration tests for complete retrofit estimates.
//!
//! Each scenario uses the reference emission factors
//! (gas 0.239, electricity 0.058, biomethane 0.0417 tCO₂/MWh) and an annual
//! consumption of 20 000 kWh, and checks every result field.

use co2gain::emissions::{compute_emissions, gas_mix_factor, CalculationInput, CalculationResult, EmissionFactors};
use co2gain::gain::{resolve_gain, GainSource};
use co2gain::reference::{GainCell, ReferenceTable};
use co2gain::session::Session;

const TOLERANCE: f64 = 1e-9;

/// Expected values for the reference scenarios
mod reference {
    pub const CONSUMPTION_BEFORE_MWH: f64 = 20.0;
    pub const CONSUMPTION_AFTER_MWH: f64 = 15.0;
    pub const EMISSIONS_BEFORE_T: f64 = 4.78;
}

fn factors() -> EmissionFactors {
    EmissionFactors::new(0.239, 0.058, 0.0417)
}

fn input(after: &str) -> CalculationInput {
    CalculationInput::new("Maison individuelle", "Chaudière gaz standard", after, 20000.0)
}

fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "{}: expected {}, got {}",
        what,
        expected,
        actual
    );
}

fn assert_result(result: &CalculationResult, after_mwh: f64, emissions_after_t: f64, gain_t: f64) {
    assert_close(result.consumption_before_mwh, reference::CONSUMPTION_BEFORE_MWH, "consumption before");
    assert_close(result.consumption_after_mwh, after_mwh, "consumption after");
    assert_close(result.emissions_before_t, reference::EMISSIONS_BEFORE_T, "emissions before");
    assert_close(result.emissions_after_t, emissions_after_t, "emissions after");
    assert_close(result.gain_t, gain_t, "gain");
}

#[test]
fn test_gas_boiler_upgrade() {
    let result = compute_emissions(&input("Chaudière gaz THPE"), -0.25, &factors());
    assert_close(gas_mix_factor(&factors(), 0.0), 0.239, "gas mix");
    assert_result(&result, reference::CONSUMPTION_AFTER_MWH, 3.585, 1.195);
}

#[test]
fn test_geothermal_heat_pump() {
    let result = compute_emissions(&input("PAC géothermique + THPE"), -0.25, &factors());
    assert_result(&result, reference::CONSUMPTION_AFTER_MWH, 0.87, 3.91);
}

#[test]
fn test_hybrid_half_electric() {
    let result = compute_emissions(&input("Chaudière gaz THPE").with_hybrid_split(50.0), -0.25, &factors());
    assert_result(&result, reference::CONSUMPTION_AFTER_MWH, 2.2275, 2.5525);
}

#[test]
fn test_full_green_gas_without_gain() {
    let result = compute_emissions(&input("Chaudière gaz THPE").with_green_gas_share(100.0), 0.0, &factors());
    assert_eq!(gas_mix_factor(&factors(), 100.0), 0.0417);
    assert_result(&result, reference::CONSUMPTION_BEFORE_MWH, 0.834, 3.946);
}

#[test]
fn test_lookup_miss_keeps_consumption() {
    let table = ReferenceTable::new().with_cell(
        "Appartement",
        "Chaudière gaz standard",
        "Chaudière gaz THPE",
        GainCell::Numeric(-0.2),
    );

    let gain = resolve_gain(&table, "Maison individuelle", "Chaudière gaz standard", "Chaudière gaz THPE", 0.0);
    assert_eq!(gain, 0.0);

    let result = compute_emissions(&input("Chaudière gaz THPE"), gain, &factors());
    assert_eq!(result.consumption_after_mwh, result.consumption_before_mwh);
}

#[test]
fn test_session_matches_direct_calculation() {
    let session = Session::new();
    let input = input("Chaudière gaz THPE").with_green_gas_share(20.0);

    let estimate = session.estimate(&input).unwrap();
    assert_eq!(estimate.gain.source, GainSource::Table);

    let direct = compute_emissions(&input, estimate.gain.ratio, session.factors());
    assert_eq!(estimate.result, direct);
}

#[test]
fn test_session_zero_override_uses_table() {
    let session = Session::new();
    let zero = session
        .estimate(&input("Chaudière gaz THPE").with_gain_override(0.0))
        .unwrap();
    let none = session.estimate(&input("Chaudière gaz THPE")).unwrap();

    assert_eq!(zero.gain.source, GainSource::Table);
    assert_eq!(zero.result, none.result);
}

#[test]
fn test_session_override_on_unknown_pair() {
    let session = Session::new();
    let mut custom = input("Poêle à granulés");
    custom.manual_gain_override = Some(-0.1);

    let estimate = session.estimate(&custom).unwrap();
    assert_eq!(estimate.gain.source, GainSource::Override);
    assert_eq!(estimate.gain.automatic, 0.0);
    assert_close(estimate.result.consumption_after_mwh, 18.0, "consumption after");
}

#[test]
fn test_gain_sign_follows_ratio() {
    for ratio in [-0.6, -0.25, -0.01] {
        let result = compute_emissions(&input("Chaudière gaz THPE"), ratio, &factors());
        assert!(result.gain_t > 0.0, "ratio {} should reduce emissions", ratio);
    }
    for ratio in [0.01, 0.25] {
        let result = compute_emissions(&input("Chaudière gaz THPE"), ratio, &factors());
        assert!(result.gain_t < 0.0, "ratio {} should increase emissions", ratio);
        assert_eq!(result.gain_t, result.emissions_before_t - result.emissions_after_t);
    }
}

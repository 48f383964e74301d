//! Boundary validation of user input.
//!
//! The calculator assumes clean numbers. Everything a user types goes through
//! [`validate_input`] first.

use crate::emissions::CalculationInput;
use crate::error::InputError;

/// Smallest accepted annual consumption (kWh PCI/year).
pub const MIN_ANNUAL_CONSUMPTION_KWH: f64 = 1000.0;

fn check_finite(field: &'static str, value: f64) -> Result<(), InputError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InputError::NotFinite { field })
    }
}

fn check_percent(field: &'static str, value: f64) -> Result<(), InputError> {
    check_finite(field, value)?;
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(InputError::PercentOutOfRange { field, value })
    }
}

fn check_selection(field: &'static str, value: &str) -> Result<(), InputError> {
    if value.trim().is_empty() {
        Err(InputError::EmptySelection { field })
    } else {
        Ok(())
    }
}

/// Rejects input the calculator must never see.
pub fn validate_input(input: &CalculationInput) -> Result<(), InputError> {
    check_selection("category", &input.category)?;
    check_selection("before_solution", &input.before_solution)?;
    check_selection("after_solution", &input.after_solution)?;

    check_finite("annual_consumption_kwh", input.annual_consumption_kwh)?;
    if input.annual_consumption_kwh < MIN_ANNUAL_CONSUMPTION_KWH {
        return Err(InputError::ConsumptionBelowMinimum {
            value: input.annual_consumption_kwh,
            minimum: MIN_ANNUAL_CONSUMPTION_KWH,
        });
    }

    check_percent("green_gas_share_percent", input.green_gas_share_percent)?;
    if let Some(share) = input.hybrid_electric_share_percent {
        check_percent("hybrid_electric_share_percent", share)?;
    }
    if let Some(ratio) = input.manual_gain_override {
        check_finite("manual_gain_override", ratio)?;
    }

    Ok(())
}

/// Parses a numeric text field, e.g. from a form or a CLI argument.
pub fn parse_number(field: &'static str, raw: &str) -> Result<f64, InputError> {
    let value = raw
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| InputError::NotFinite { field })?;
    check_finite(field, value)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> CalculationInput {
        CalculationInput::new("Appartement", "Chaudière gaz standard", "Chaudière gaz THPE", 20000.0)
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(validate_input(&valid()).is_ok());
        assert!(validate_input(&valid().with_green_gas_share(100.0).with_hybrid_split(0.0)).is_ok());
    }

    #[test]
    fn test_consumption_minimum() {
        let mut input = valid();
        input.annual_consumption_kwh = 1000.0;
        assert!(validate_input(&input).is_ok());

        input.annual_consumption_kwh = 999.9;
        assert_eq!(
            validate_input(&input),
            Err(InputError::ConsumptionBelowMinimum {
                value: 999.9,
                minimum: MIN_ANNUAL_CONSUMPTION_KWH
            })
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut input = valid();
        input.annual_consumption_kwh = f64::NAN;
        assert_eq!(
            validate_input(&input),
            Err(InputError::NotFinite {
                field: "annual_consumption_kwh"
            })
        );

        let input = valid().with_gain_override(f64::INFINITY);
        assert!(validate_input(&input).is_err());
    }

    #[test]
    fn test_percent_ranges() {
        assert!(validate_input(&valid().with_green_gas_share(-1.0)).is_err());
        assert!(validate_input(&valid().with_green_gas_share(100.5)).is_err());
        assert!(validate_input(&valid().with_hybrid_split(101.0)).is_err());
    }

    #[test]
    fn test_empty_selection() {
        let mut input = valid();
        input.after_solution = "  ".to_string();
        assert_eq!(
            validate_input(&input),
            Err(InputError::EmptySelection {
                field: "after_solution"
            })
        );
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("consumption", "20000"), Ok(20000.0));
        assert_eq!(parse_number("consumption", " 12,5 "), Ok(12.5));
        assert!(parse_number("consumption", "vingt").is_err());
        assert!(parse_number("consumption", "inf").is_err());
    }
}

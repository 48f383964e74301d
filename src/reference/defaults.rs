//! Embedded default reference table.
//!
//! Used whenever no external table is configured or the configured one cannot
//! be loaded. Gains are expected energy changes for a heating retrofit,
//! relative to the pre-retrofit gas consumption.

use crate::reference::{GainCell, ReferenceTable};

pub const SINGLE_FAMILY_HOUSE: &str = "Maison individuelle";
pub const APARTMENT: &str = "Appartement";
pub const TERTIARY: &str = "Tertiaire";

/// Building categories offered by default.
pub const CATEGORIES: [&str; 3] = [SINGLE_FAMILY_HOUSE, APARTMENT, TERTIARY];

const STANDARD_GAS_BOILER: &str = "Chaudière gaz standard";
const LOW_TEMPERATURE_GAS_BOILER: &str = "Chaudière gaz basse température";
const CONDENSING_GAS_BOILER: &str = "Chaudière gaz condensation";

const THPE_GAS_BOILER: &str = "Chaudière gaz THPE";
const HYBRID_HEAT_PUMP: &str = "PAC hybride gaz/électrique";
const AIR_WATER_HEAT_PUMP: &str = "PAC air/eau";
const GEOTHERMAL_HEAT_PUMP: &str = "PAC géothermique + THPE";
const THPE_WITH_SOLAR: &str = "Chaudière gaz THPE + solaire thermique";

/// Rows per category: (before, after, gain). `None` marks a "not applicable" cell.
type Row = (&'static str, &'static str, Option<f64>);

const HOUSE_ROWS: &[Row] = &[
    (STANDARD_GAS_BOILER, THPE_GAS_BOILER, Some(-0.25)),
    (STANDARD_GAS_BOILER, THPE_WITH_SOLAR, Some(-0.35)),
    (STANDARD_GAS_BOILER, HYBRID_HEAT_PUMP, Some(-0.45)),
    (STANDARD_GAS_BOILER, AIR_WATER_HEAT_PUMP, Some(-0.6)),
    (STANDARD_GAS_BOILER, GEOTHERMAL_HEAT_PUMP, Some(-0.7)),
    (LOW_TEMPERATURE_GAS_BOILER, THPE_GAS_BOILER, Some(-0.15)),
    (LOW_TEMPERATURE_GAS_BOILER, THPE_WITH_SOLAR, Some(-0.27)),
    (LOW_TEMPERATURE_GAS_BOILER, HYBRID_HEAT_PUMP, Some(-0.4)),
    (LOW_TEMPERATURE_GAS_BOILER, AIR_WATER_HEAT_PUMP, Some(-0.55)),
    (LOW_TEMPERATURE_GAS_BOILER, GEOTHERMAL_HEAT_PUMP, Some(-0.65)),
    (CONDENSING_GAS_BOILER, THPE_GAS_BOILER, Some(-0.05)),
    (CONDENSING_GAS_BOILER, THPE_WITH_SOLAR, Some(-0.18)),
    (CONDENSING_GAS_BOILER, HYBRID_HEAT_PUMP, Some(-0.35)),
    (CONDENSING_GAS_BOILER, AIR_WATER_HEAT_PUMP, Some(-0.5)),
    (CONDENSING_GAS_BOILER, GEOTHERMAL_HEAT_PUMP, Some(-0.6)),
];

const APARTMENT_ROWS: &[Row] = &[
    (STANDARD_GAS_BOILER, THPE_GAS_BOILER, Some(-0.2)),
    (STANDARD_GAS_BOILER, HYBRID_HEAT_PUMP, Some(-0.4)),
    (STANDARD_GAS_BOILER, AIR_WATER_HEAT_PUMP, Some(-0.55)),
    (STANDARD_GAS_BOILER, GEOTHERMAL_HEAT_PUMP, None),
    (LOW_TEMPERATURE_GAS_BOILER, THPE_GAS_BOILER, Some(-0.12)),
    (LOW_TEMPERATURE_GAS_BOILER, HYBRID_HEAT_PUMP, Some(-0.35)),
    (LOW_TEMPERATURE_GAS_BOILER, AIR_WATER_HEAT_PUMP, Some(-0.5)),
    (LOW_TEMPERATURE_GAS_BOILER, GEOTHERMAL_HEAT_PUMP, None),
    (CONDENSING_GAS_BOILER, THPE_GAS_BOILER, Some(-0.04)),
    (CONDENSING_GAS_BOILER, HYBRID_HEAT_PUMP, Some(-0.3)),
    (CONDENSING_GAS_BOILER, AIR_WATER_HEAT_PUMP, Some(-0.45)),
    (CONDENSING_GAS_BOILER, GEOTHERMAL_HEAT_PUMP, None),
];

const TERTIARY_ROWS: &[Row] = &[
    (STANDARD_GAS_BOILER, THPE_GAS_BOILER, Some(-0.22)),
    (STANDARD_GAS_BOILER, THPE_WITH_SOLAR, Some(-0.3)),
    (STANDARD_GAS_BOILER, HYBRID_HEAT_PUMP, Some(-0.42)),
    (STANDARD_GAS_BOILER, AIR_WATER_HEAT_PUMP, Some(-0.58)),
    (STANDARD_GAS_BOILER, GEOTHERMAL_HEAT_PUMP, Some(-0.68)),
    (LOW_TEMPERATURE_GAS_BOILER, THPE_GAS_BOILER, Some(-0.14)),
    (LOW_TEMPERATURE_GAS_BOILER, THPE_WITH_SOLAR, Some(-0.24)),
    (LOW_TEMPERATURE_GAS_BOILER, HYBRID_HEAT_PUMP, Some(-0.38)),
    (LOW_TEMPERATURE_GAS_BOILER, AIR_WATER_HEAT_PUMP, Some(-0.52)),
    (LOW_TEMPERATURE_GAS_BOILER, GEOTHERMAL_HEAT_PUMP, Some(-0.62)),
    (CONDENSING_GAS_BOILER, THPE_GAS_BOILER, Some(-0.05)),
    (CONDENSING_GAS_BOILER, THPE_WITH_SOLAR, Some(-0.15)),
    (CONDENSING_GAS_BOILER, HYBRID_HEAT_PUMP, Some(-0.32)),
    (CONDENSING_GAS_BOILER, AIR_WATER_HEAT_PUMP, Some(-0.48)),
    (CONDENSING_GAS_BOILER, GEOTHERMAL_HEAT_PUMP, Some(-0.58)),
];

/// Builds the embedded reference table.
///
/// # Example
///
/// ```
/// use co2gain::reference::defaults::{default_table, SINGLE_FAMILY_HOUSE};
/// use co2gain::reference::GainCell;
///
/// let table = default_table();
/// assert_eq!(
///     table.cell(SINGLE_FAMILY_HOUSE, "Chaudière gaz standard", "Chaudière gaz THPE"),
///     Some(GainCell::Numeric(-0.25))
/// );
/// ```
pub fn default_table() -> ReferenceTable {
    let mut table = ReferenceTable::new();

    for (category, rows) in [
        (SINGLE_FAMILY_HOUSE, HOUSE_ROWS),
        (APARTMENT, APARTMENT_ROWS),
        (TERTIARY, TERTIARY_ROWS),
    ] {
        for (before, after, gain) in rows {
            let cell = match gain {
                Some(value) => GainCell::Numeric(*value),
                None => GainCell::NotApplicable,
            };
            table.insert(category, *before, *after, cell);
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::Technology;

    #[test]
    fn test_default_table_has_all_categories() {
        let table = default_table();
        assert_eq!(table.categories().len(), CATEGORIES.len());
        for category in CATEGORIES {
            assert_eq!(table.before_solutions(category).len(), 3);
        }
    }

    #[test]
    fn test_default_table_is_clean() {
        let table = default_table();
        assert!(table.warnings().is_empty(), "{:?}", table.warnings());
    }

    #[test]
    fn test_default_gains_are_reductions() {
        let table = default_table();
        for category in table.categories() {
            for before in table.before_solutions(category) {
                for after in table.after_solutions(category, before) {
                    let gain = table
                        .cell(category, before, after)
                        .and_then(|cell| cell.ratio())
                        .unwrap();
                    assert!(gain < 0.0 && gain > -1.0);
                }
            }
        }
    }

    #[test]
    fn test_geothermal_not_applicable_in_apartments() {
        let table = default_table();
        assert_eq!(
            table.cell(APARTMENT, STANDARD_GAS_BOILER, GEOTHERMAL_HEAT_PUMP),
            Some(GainCell::NotApplicable)
        );
        assert!(!table
            .after_solutions(APARTMENT, STANDARD_GAS_BOILER)
            .contains(&GEOTHERMAL_HEAT_PUMP));
    }

    #[test]
    fn test_default_labels_classify_as_expected() {
        let table = default_table();
        assert_eq!(table.technology_of(THPE_GAS_BOILER), Technology::Gas);
        assert_eq!(table.technology_of(THPE_WITH_SOLAR), Technology::Gas);
        assert_eq!(table.technology_of(AIR_WATER_HEAT_PUMP), Technology::HeatPump);
        assert_eq!(table.technology_of(GEOTHERMAL_HEAT_PUMP), Technology::HeatPump);
    }
}

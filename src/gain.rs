//! Gain resolver.
//!
//! Resolves the energy gain ratio for a (category, before, after) choice:
//! the reference table gives the automatic value, a manual override replaces
//! it. Resolution never fails. Unknown keys and "not applicable" cells
//! resolve to a gain of 0.

use crate::reference::{GainCell, ReferenceTable};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Below this magnitude a raw override counts as "not supplied".
pub const OVERRIDE_EPSILON: f64 = 1e-9;

/// Manual gain override.
///
/// Raw user input encodes "no override" as 0, so [`GainOverride::from_raw`]
/// maps anything within [`OVERRIDE_EPSILON`] of zero to an inactive
/// override. An override of exactly 0 therefore always falls back to the
/// table value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GainOverride {
    pub use_override: bool,
    pub value: f64,
}

impl GainOverride {
    pub fn none() -> Self {
        Self::default()
    }

    /// Interprets a raw override value.
    ///
    /// # Example
    ///
    /// ```
    /// use co2gain::gain::GainOverride;
    ///
    /// assert!(GainOverride::from_raw(-0.3).use_override);
    /// assert!(!GainOverride::from_raw(0.0).use_override);
    /// assert!(!GainOverride::from_raw(1e-12).use_override);
    /// ```
    pub fn from_raw(value: f64) -> Self {
        Self {
            use_override: value.abs() >= OVERRIDE_EPSILON,
            value,
        }
    }

    pub fn from_optional(value: Option<f64>) -> Self {
        value.map(Self::from_raw).unwrap_or_default()
    }

    /// The override value when active.
    pub fn active(&self) -> Option<f64> {
        self.use_override.then_some(self.value)
    }
}

/// Where a resolved gain came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GainSource {
    /// Numeric table cell
    Table,
    /// Table cell marked "not applicable"
    NotApplicable,
    /// No cell for this combination
    Missing,
    /// Manual override
    Override,
}

impl GainSource {
    pub fn display_name(&self) -> &str {
        match self {
            GainSource::Table => "reference table",
            GainSource::NotApplicable => "not applicable (0)",
            GainSource::Missing => "not in table (0)",
            GainSource::Override => "manual override",
        }
    }
}

impl fmt::Display for GainSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A gain ratio together with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedGain {
    pub ratio: f64,
    pub source: GainSource,
    /// Table value, reported even when an override replaced it
    pub automatic: f64,
}

/// Resolves the gain and reports where it came from.
pub fn resolve(
    table: &ReferenceTable,
    category: &str,
    before: &str,
    after: &str,
    gain_override: GainOverride,
) -> ResolvedGain {
    let (automatic, auto_source) = match table.cell(category, before, after) {
        Some(GainCell::Numeric(value)) => (value, GainSource::Table),
        Some(GainCell::NotApplicable) => (0.0, GainSource::NotApplicable),
        None => (0.0, GainSource::Missing),
    };

    let resolved = match gain_override.active() {
        Some(value) => ResolvedGain {
            ratio: value,
            source: GainSource::Override,
            automatic,
        },
        None => ResolvedGain {
            ratio: automatic,
            source: auto_source,
            automatic,
        },
    };

    debug!(
        "gain for '{}' / '{}' -> '{}': {} ({})",
        category, before, after, resolved.ratio, resolved.source
    );

    resolved
}

/// Resolves the gain ratio from a raw override value (0 means none).
///
/// # Example
///
/// ```
/// use co2gain::gain::resolve_gain;
/// use co2gain::reference::{GainCell, ReferenceTable};
///
/// let table = ReferenceTable::new().with_cell("Appartement", "A", "B", GainCell::Numeric(-0.2));
///
/// assert_eq!(resolve_gain(&table, "Appartement", "A", "B", 0.0), -0.2);
/// assert_eq!(resolve_gain(&table, "Appartement", "A", "B", -0.5), -0.5);
/// assert_eq!(resolve_gain(&table, "Tertiaire", "A", "B", 0.0), 0.0);
/// ```
pub fn resolve_gain(
    table: &ReferenceTable,
    category: &str,
    before: &str,
    after: &str,
    raw_override: f64,
) -> f64 {
    resolve(table, category, before, after, GainOverride::from_raw(raw_override)).ratio
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ReferenceTable {
        ReferenceTable::new()
            .with_cell("Maison individuelle", "Chaudière gaz standard", "Chaudière gaz THPE", GainCell::Numeric(-0.25))
            .with_cell("Maison individuelle", "Chaudière gaz standard", "PAC air/eau", GainCell::NotApplicable)
    }

    #[test]
    fn test_table_value() {
        let resolved = resolve(
            &table(),
            "Maison individuelle",
            "Chaudière gaz standard",
            "Chaudière gaz THPE",
            GainOverride::none(),
        );
        assert_eq!(resolved.ratio, -0.25);
        assert_eq!(resolved.source, GainSource::Table);
    }

    #[test]
    fn test_missing_keys_resolve_to_zero() {
        let t = table();
        for (category, before, after) in [
            ("Appartement", "Chaudière gaz standard", "Chaudière gaz THPE"),
            ("Maison individuelle", "Chaudière fioul", "Chaudière gaz THPE"),
            ("Maison individuelle", "Chaudière gaz standard", "Poêle à bois"),
            ("", "", ""),
        ] {
            let resolved = resolve(&t, category, before, after, GainOverride::none());
            assert_eq!(resolved.ratio, 0.0);
            assert_eq!(resolved.source, GainSource::Missing);
        }
    }

    #[test]
    fn test_not_applicable_resolves_to_zero() {
        let resolved = resolve(
            &table(),
            "Maison individuelle",
            "Chaudière gaz standard",
            "PAC air/eau",
            GainOverride::none(),
        );
        assert_eq!(resolved.ratio, 0.0);
        assert_eq!(resolved.source, GainSource::NotApplicable);
    }

    #[test]
    fn test_nonzero_override_replaces_table() {
        let t = table();
        for value in [-0.6, 0.15, 1e-9, -1e-9, 3.0] {
            assert_eq!(
                resolve_gain(&t, "Maison individuelle", "Chaudière gaz standard", "Chaudière gaz THPE", value),
                value
            );
            assert_eq!(resolve_gain(&t, "Tertiaire", "x", "y", value), value);
        }
    }

    #[test]
    fn test_zero_override_falls_back_to_table() {
        let t = table();
        assert_eq!(
            resolve_gain(&t, "Maison individuelle", "Chaudière gaz standard", "Chaudière gaz THPE", 0.0),
            -0.25
        );
        assert_eq!(
            resolve_gain(&t, "Maison individuelle", "Chaudière gaz standard", "Chaudière gaz THPE", 5e-10),
            -0.25
        );
    }

    #[test]
    fn test_override_keeps_automatic_value() {
        let resolved = resolve(
            &table(),
            "Maison individuelle",
            "Chaudière gaz standard",
            "Chaudière gaz THPE",
            GainOverride::from_raw(-0.4),
        );
        assert_eq!(resolved.source, GainSource::Override);
        assert_eq!(resolved.ratio, -0.4);
        assert_eq!(resolved.automatic, -0.25);
    }

    #[test]
    fn test_from_optional() {
        assert_eq!(GainOverride::from_optional(None), GainOverride::none());
        assert!(!GainOverride::from_optional(Some(0.0)).use_override);
        assert_eq!(GainOverride::from_optional(Some(-0.2)).active(), Some(-0.2));
    }
}

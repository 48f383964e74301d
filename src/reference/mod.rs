//! Reference data for retrofit gain lookups.
//!
//! The reference table maps a building category, a pre-retrofit heating
//! solution and a post-retrofit solution to an expected energy gain. Gains are
//! fractions of the pre-retrofit consumption: `-0.25` means the new solution
//! uses 25 % less energy.
//!
//! # Overview
//!
//! - [`GainCell`]: a table leaf, numeric gain or "not applicable"
//! - [`ReferenceTable`]: the three-level ordered lookup
//! - [`Technology`]: how a post-retrofit solution is supplied with energy
//! - [`TableWarning`]: non-blocking findings from [`ReferenceTable::warnings`]
//!
//! # Sources
//!
//! - **Embedded defaults**: [`defaults::default_table`]
//! - **JSON files**: [`source::JsonFileSource`]

pub mod defaults;
pub mod source;

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Marker written in place of a gain when a combination does not apply.
pub const NOT_APPLICABLE_MARKER: &str = "NA";

/// A single leaf of the reference table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GainCell {
    /// Energy gain ratio (negative is a reduction).
    Numeric(f64),
    /// The after-solution does not apply to this before-solution.
    NotApplicable,
}

impl GainCell {
    /// Returns the gain ratio if the cell is numeric.
    pub fn ratio(&self) -> Option<f64> {
        match self {
            GainCell::Numeric(value) => Some(*value),
            GainCell::NotApplicable => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, GainCell::Numeric(_))
    }
}

impl Serialize for GainCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GainCell::Numeric(value) => serializer.serialize_f64(*value),
            GainCell::NotApplicable => serializer.serialize_str(NOT_APPLICABLE_MARKER),
        }
    }
}

/// Energy supply of a post-retrofit heating solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Technology {
    /// Gas-fired, possibly green-gas blended
    Gas,
    /// Fully electric heat pump
    HeatPump,
}

impl Technology {
    /// Classifies a solution from its display label.
    ///
    /// A label containing "PAC" or "pompe" (any case) is a heat pump,
    /// everything else is gas-fired.
    ///
    /// # Example
    ///
    /// ```
    /// use co2gain::reference::Technology;
    ///
    /// assert_eq!(Technology::from_label("PAC géothermique + THPE"), Technology::HeatPump);
    /// assert_eq!(Technology::from_label("Pompe à chaleur air/eau"), Technology::HeatPump);
    /// assert_eq!(Technology::from_label("Chaudière gaz THPE"), Technology::Gas);
    /// ```
    pub fn from_label(label: &str) -> Self {
        let lowered = label.to_lowercase();
        if lowered.contains("pac") || lowered.contains("pompe") {
            Technology::HeatPump
        } else {
            Technology::Gas
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Technology::Gas => "Gas",
            Technology::HeatPump => "Heat pump",
        }
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

type AfterMap = BTreeMap<String, GainCell>;
type BeforeMap = BTreeMap<String, AfterMap>;

/// Category → before-solution → after-solution → [`GainCell`].
///
/// Keys are kept ordered so listings and serialized output are stable.
/// Explicit technology tags are optional; untagged solutions fall back to
/// [`Technology::from_label`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceTable {
    categories: BTreeMap<String, BeforeMap>,
    technologies: BTreeMap<String, Technology>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a single cell, creating intermediate levels.
    pub fn insert(
        &mut self,
        category: impl Into<String>,
        before: impl Into<String>,
        after: impl Into<String>,
        cell: GainCell,
    ) {
        self.categories
            .entry(category.into())
            .or_default()
            .entry(before.into())
            .or_default()
            .insert(after.into(), cell);
    }

    /// Builder form of [`ReferenceTable::insert`].
    pub fn with_cell(
        mut self,
        category: impl Into<String>,
        before: impl Into<String>,
        after: impl Into<String>,
        cell: GainCell,
    ) -> Self {
        self.insert(category, before, after, cell);
        self
    }

    /// Registers an empty before-solution so it shows up in listings.
    pub fn insert_before(&mut self, category: impl Into<String>, before: impl Into<String>) {
        self.categories
            .entry(category.into())
            .or_default()
            .entry(before.into())
            .or_default();
    }

    /// Registers a category with no before-solutions.
    pub fn insert_category(&mut self, category: impl Into<String>) {
        self.categories.entry(category.into()).or_default();
    }

    /// Looks up a cell. Any missing level yields `None`.
    pub fn cell(&self, category: &str, before: &str, after: &str) -> Option<GainCell> {
        self.categories
            .get(category)?
            .get(before)?
            .get(after)
            .copied()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn categories(&self) -> Vec<&str> {
        self.categories.keys().map(String::as_str).collect()
    }

    /// Before-solutions listed for a category, empty for an unknown category.
    pub fn before_solutions(&self, category: &str) -> Vec<&str> {
        self.categories
            .get(category)
            .map(|befores| befores.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// After-solutions with a numeric gain for the given pair.
    ///
    /// "Not applicable" cells are skipped.
    pub fn after_solutions(&self, category: &str, before: &str) -> Vec<&str> {
        self.categories
            .get(category)
            .and_then(|befores| befores.get(before))
            .map(|afters| {
                afters
                    .iter()
                    .filter(|(_, cell)| cell.is_applicable())
                    .map(|(after, _)| after.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Tags a solution label with an explicit technology.
    ///
    /// Tags live only in memory. The JSON form of a table carries the gain
    /// cells alone, so a serialized and reparsed table is untagged and its
    /// solutions are classified from their labels again.
    pub fn tag_technology(&mut self, label: impl Into<String>, technology: Technology) {
        self.technologies.insert(label.into(), technology);
    }

    /// Technology of a solution: explicit tag first, label classification otherwise.
    pub fn technology_of(&self, label: &str) -> Technology {
        self.technologies
            .get(label)
            .copied()
            .unwrap_or_else(|| Technology::from_label(label))
    }

    /// Number of cells holding a numeric gain.
    pub fn numeric_cell_count(&self) -> usize {
        self.categories
            .values()
            .flat_map(|befores| befores.values())
            .flat_map(|afters| afters.values())
            .filter(|cell| cell.is_applicable())
            .count()
    }

    /// Structural findings that do not prevent the table from being used.
    pub fn warnings(&self) -> Vec<TableWarning> {
        let mut warnings = Vec::new();

        for (category, befores) in &self.categories {
            if befores.is_empty() {
                warnings.push(TableWarning::EmptyCategory {
                    category: category.clone(),
                });
                continue;
            }

            for (before, afters) in befores {
                if !afters.values().any(GainCell::is_applicable) {
                    warnings.push(TableWarning::NoApplicableAfter {
                        category: category.clone(),
                        before: before.clone(),
                    });
                }

                for (after, cell) in afters {
                    if let GainCell::Numeric(value) = cell {
                        if *value > 0.0 {
                            warnings.push(TableWarning::PositiveGain {
                                category: category.clone(),
                                before: before.clone(),
                                after: after.clone(),
                                value: *value,
                            });
                        }
                    }
                }
            }
        }

        warnings
    }
}

/// Serializes the gain cells only; technology tags are not written.
impl Serialize for ReferenceTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.categories.serialize(serializer)
    }
}

/// Non-blocking finding reported by [`ReferenceTable::warnings`].
#[derive(Debug, Clone, PartialEq)]
pub enum TableWarning {
    /// A category has no before-solutions at all.
    EmptyCategory { category: String },
    /// Every after-solution of a before-solution is missing or "not applicable".
    NoApplicableAfter { category: String, before: String },
    /// A gain is positive, i.e. the after-solution consumes more energy.
    PositiveGain {
        category: String,
        before: String,
        after: String,
        value: f64,
    },
}

impl fmt::Display for TableWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableWarning::EmptyCategory { category } => {
                write!(f, "category '{}' has no before-solution", category)
            }
            TableWarning::NoApplicableAfter { category, before } => write!(
                f,
                "'{}' / '{}' has no applicable after-solution",
                category, before
            ),
            TableWarning::PositiveGain {
                category,
                before,
                after,
                value,
            } => write!(
                f,
                "'{}' / '{}' -> '{}' increases consumption ({:+.2} %)",
                category,
                before,
                after,
                value * 100.0
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> ReferenceTable {
        ReferenceTable::new()
            .with_cell("Appartement", "Chaudière gaz standard", "Chaudière gaz THPE", GainCell::Numeric(-0.2))
            .with_cell("Appartement", "Chaudière gaz standard", "PAC air/eau", GainCell::NotApplicable)
            .with_cell("Appartement", "Chaudière fioul", "PAC air/eau", GainCell::NotApplicable)
    }

    #[test]
    fn test_cell_lookup() {
        let table = sample_table();
        assert_eq!(
            table.cell("Appartement", "Chaudière gaz standard", "Chaudière gaz THPE"),
            Some(GainCell::Numeric(-0.2))
        );
        assert_eq!(
            table.cell("Appartement", "Chaudière gaz standard", "PAC air/eau"),
            Some(GainCell::NotApplicable)
        );
        assert_eq!(table.cell("Tertiaire", "Chaudière gaz standard", "PAC air/eau"), None);
    }

    #[test]
    fn test_after_solutions_skip_not_applicable() {
        let table = sample_table();
        assert_eq!(
            table.after_solutions("Appartement", "Chaudière gaz standard"),
            vec!["Chaudière gaz THPE"]
        );
        assert!(table.after_solutions("Appartement", "Chaudière fioul").is_empty());
        assert!(table.after_solutions("Inconnu", "Chaudière fioul").is_empty());
    }

    #[test]
    fn test_technology_from_label() {
        assert_eq!(Technology::from_label("PAC hybride"), Technology::HeatPump);
        assert_eq!(Technology::from_label("pac air/eau"), Technology::HeatPump);
        assert_eq!(Technology::from_label("POMPE à chaleur"), Technology::HeatPump);
        assert_eq!(Technology::from_label("Chaudière gaz THPE"), Technology::Gas);
        assert_eq!(Technology::from_label(""), Technology::Gas);
    }

    #[test]
    fn test_explicit_tag_wins_over_label() {
        let mut table = sample_table();
        assert_eq!(table.technology_of("Chaudière gaz THPE"), Technology::Gas);
        table.tag_technology("Chaudière gaz THPE", Technology::HeatPump);
        assert_eq!(table.technology_of("Chaudière gaz THPE"), Technology::HeatPump);
        assert_eq!(table.technology_of("PAC air/eau"), Technology::HeatPump);
    }

    #[test]
    fn test_warnings() {
        let mut table = sample_table()
            .with_cell("Tertiaire", "Chaudière gaz standard", "Radiateurs électriques", GainCell::Numeric(0.1));
        table.insert_category("Vide");

        let warnings = table.warnings();
        assert_eq!(warnings.len(), 3);
        assert!(warnings.contains(&TableWarning::NoApplicableAfter {
            category: "Appartement".to_string(),
            before: "Chaudière fioul".to_string(),
        }));
        assert!(warnings.contains(&TableWarning::EmptyCategory {
            category: "Vide".to_string(),
        }));
        assert!(warnings
            .iter()
            .any(|w| matches!(w, TableWarning::PositiveGain { value, .. } if *value == 0.1)));
    }

    #[test]
    fn test_serialize_uses_marker() {
        let table = sample_table();
        let json = serde_json::to_value(&table).expect("Failed to serialize");
        assert_eq!(
            json["Appartement"]["Chaudière gaz standard"]["PAC air/eau"],
            serde_json::json!(NOT_APPLICABLE_MARKER)
        );
        assert_eq!(
            json["Appartement"]["Chaudière gaz standard"]["Chaudière gaz THPE"],
            serde_json::json!(-0.2)
        );
    }
}

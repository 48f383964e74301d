//! Reference data sources and JSON parsing.
//!
//! A reference table document is a JSON object of objects of objects whose
//! leaves are scalars:
//!
//! ```text
//! {
//!   "Maison individuelle": {
//!     "Chaudière gaz standard": {
//!       "Chaudière gaz THPE": -0.25,
//!       "PAC géothermique + THPE": "NA"
//!     }
//!   }
//! }
//! ```
//!
//! Numbers become [`GainCell::Numeric`]. Strings, booleans and `null` are
//! "not applicable" markers. Arrays or objects at the leaf level are rejected.
//!
//! Emission factors are a flat object `{"gas": .., "electricity": .., "biomethane": ..}`.

use crate::emissions::EmissionFactors;
use crate::error::ReferenceError;
use crate::reference::defaults::default_table;
use crate::reference::{GainCell, ReferenceTable};
use log::{info, warn};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expect_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, ReferenceError> {
    value.as_object().ok_or_else(|| ReferenceError::Malformed {
        path: path.to_string(),
        reason: format!("expected an object, found {}", json_kind(value)),
    })
}

fn parse_cell(value: &Value, path: &str) -> Result<GainCell, ReferenceError> {
    match value {
        Value::Number(number) => number
            .as_f64()
            .map(GainCell::Numeric)
            .ok_or_else(|| ReferenceError::Malformed {
                path: path.to_string(),
                reason: format!("number {} is not representable as f64", number),
            }),
        Value::String(_) | Value::Bool(_) | Value::Null => Ok(GainCell::NotApplicable),
        Value::Array(_) | Value::Object(_) => Err(ReferenceError::Malformed {
            path: path.to_string(),
            reason: format!("expected a gain or a marker, found {}", json_kind(value)),
        }),
    }
}

/// Builds a table from an already parsed JSON document.
pub fn table_from_value(document: &Value) -> Result<ReferenceTable, ReferenceError> {
    let mut table = ReferenceTable::new();

    for (category, befores) in expect_object(document, "$")? {
        let category_path = format!("$[{:?}]", category);
        let befores = expect_object(befores, &category_path)?;
        table.insert_category(category.as_str());

        for (before, afters) in befores {
            let before_path = format!("{}[{:?}]", category_path, before);
            let afters = expect_object(afters, &before_path)?;
            table.insert_before(category.as_str(), before.as_str());

            for (after, cell) in afters {
                let cell_path = format!("{}[{:?}]", before_path, after);
                let cell = parse_cell(cell, &cell_path)?;
                table.insert(category.as_str(), before.as_str(), after.as_str(), cell);
            }
        }
    }

    Ok(table)
}

/// Parses and validates a reference table document.
///
/// # Example
///
/// ```
/// use co2gain::reference::source::parse_table;
/// use co2gain::reference::GainCell;
///
/// let table = parse_table(r#"{"Tertiaire": {"A": {"B": -0.3, "C": "NA"}}}"#).unwrap();
/// assert_eq!(table.cell("Tertiaire", "A", "B"), Some(GainCell::Numeric(-0.3)));
/// assert_eq!(table.cell("Tertiaire", "A", "C"), Some(GainCell::NotApplicable));
///
/// assert!(parse_table(r#"{"Tertiaire": {"A": -0.3}}"#).is_err());
/// ```
pub fn parse_table(json: &str) -> Result<ReferenceTable, ReferenceError> {
    let document: Value = serde_json::from_str(json)?;
    table_from_value(&document)
}

/// Checks that a parsed table can be used for estimates.
///
/// A shape-valid document with no category is still unusable.
pub fn check_table(table: &ReferenceTable) -> Result<(), ReferenceError> {
    if table.is_empty() {
        return Err(ReferenceError::Malformed {
            path: "$".to_string(),
            reason: "table has no category".to_string(),
        });
    }
    Ok(())
}

/// Parses and validates an emission factor document.
pub fn parse_factors(json: &str) -> Result<EmissionFactors, ReferenceError> {
    let factors: EmissionFactors = serde_json::from_str(json)?;
    factors.validate()?;
    Ok(factors)
}

fn read_file(path: &Path) -> Result<String, ReferenceError> {
    fs::read_to_string(path).map_err(|e| ReferenceError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Trait for abstracting where reference data comes from.
pub trait ReferenceSource {
    /// Short description used in log messages.
    fn name(&self) -> String;

    fn load_table(&self) -> Result<ReferenceTable, ReferenceError>;

    fn load_factors(&self) -> Result<EmissionFactors, ReferenceError>;
}

/// The embedded defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSource;

impl ReferenceSource for BuiltinSource {
    fn name(&self) -> String {
        "built-in defaults".to_string()
    }

    fn load_table(&self) -> Result<ReferenceTable, ReferenceError> {
        Ok(default_table())
    }

    fn load_factors(&self) -> Result<EmissionFactors, ReferenceError> {
        Ok(EmissionFactors::default())
    }
}

/// JSON files on disk. A part without a path uses the embedded defaults.
#[derive(Debug, Clone, Default)]
pub struct JsonFileSource {
    pub table_path: Option<PathBuf>,
    pub factors_path: Option<PathBuf>,
}

impl JsonFileSource {
    pub fn new(table_path: Option<PathBuf>, factors_path: Option<PathBuf>) -> Self {
        Self {
            table_path,
            factors_path,
        }
    }
}

impl ReferenceSource for JsonFileSource {
    fn name(&self) -> String {
        let describe = |path: &Option<PathBuf>| {
            path.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in".to_string())
        };
        format!(
            "table: {}, factors: {}",
            describe(&self.table_path),
            describe(&self.factors_path)
        )
    }

    fn load_table(&self) -> Result<ReferenceTable, ReferenceError> {
        match &self.table_path {
            Some(path) => parse_table(&read_file(path)?),
            None => BuiltinSource.load_table(),
        }
    }

    fn load_factors(&self) -> Result<EmissionFactors, ReferenceError> {
        match &self.factors_path {
            Some(path) => parse_factors(&read_file(path)?),
            None => BuiltinSource.load_factors(),
        }
    }
}

/// A reference table and the emission factors used with it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceData {
    pub table: ReferenceTable,
    pub factors: EmissionFactors,
}

impl ReferenceData {
    pub fn builtin() -> Self {
        Self {
            table: default_table(),
            factors: EmissionFactors::default(),
        }
    }

    /// Loads from a source, falling back to the defaults part by part.
    ///
    /// Never fails. Every fallback is logged and returned as a diagnostic.
    pub fn load_or_default(source: &dyn ReferenceSource) -> (Self, Vec<ReferenceError>) {
        let mut diagnostics = Vec::new();

        let table = match source.load_table().and_then(|table| check_table(&table).map(|()| table)) {
            Ok(table) => {
                for warning in table.warnings() {
                    warn!("reference table: {}", warning);
                }
                table
            }
            Err(err) => {
                warn!("cannot load reference table ({}): {}, using defaults", source.name(), err);
                diagnostics.push(err);
                default_table()
            }
        };

        let factors = match source.load_factors() {
            Ok(factors) => factors,
            Err(err) => {
                warn!("cannot load emission factors ({}): {}, using defaults", source.name(), err);
                diagnostics.push(err);
                EmissionFactors::default()
            }
        };

        info!(
            "reference data loaded from {}: {} categories, {} numeric gains",
            source.name(),
            table.categories().len(),
            table.numeric_cell_count()
        );

        (Self { table, factors }, diagnostics)
    }
}

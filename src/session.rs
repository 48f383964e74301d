//! Per-session calculation context.
//!
//! A [`Session`] owns the reference table and emission factors for one user.
//! It is the only place where reference data is swapped: replacements are
//! validated first, and a rejected replacement keeps the previous data but
//! blocks estimates until a valid replacement of the same data set arrives or
//! the rejected edit is discarded. A rejected table edit and a rejected factor
//! edit are tracked separately, so fixing one never clears the other.
//! Sessions share nothing, so edits in one never leak into another.

use crate::emissions::{compute_emissions_for, AfterSupply, CalculationInput, CalculationResult, EmissionFactors};
use crate::error::{ReferenceError, SessionError};
use crate::gain::{resolve, GainOverride, ResolvedGain};
use crate::input::validate_input;
use crate::reference::source::{check_table, parse_factors, parse_table, ReferenceData, ReferenceSource};
use crate::reference::{ReferenceTable, TableWarning};
use log::{info, warn};
use serde::Serialize;

/// What can be chosen after a (category, before) selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// After-solutions with a numeric gain
    Options(Vec<String>),
    /// Nothing applicable for this selection. Guidance for the user, not an error.
    NoApplicableAfter,
}

impl Availability {
    pub fn options(&self) -> &[String] {
        match self {
            Availability::Options(options) => options.as_slice(),
            Availability::NoApplicableAfter => &[],
        }
    }
}

/// A complete estimate: the input, how the gain was resolved, and the result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    pub input: CalculationInput,
    pub gain: ResolvedGain,
    pub supply: AfterSupply,
    pub factors: EmissionFactors,
    pub result: CalculationResult,
}

/// Owning context for one user's reference data.
#[derive(Debug, Clone)]
pub struct Session {
    data: ReferenceData,
    rejected_table: Option<String>,
    rejected_factors: Option<String>,
}

/// The data set an edit targets.
#[derive(Debug, Clone, Copy)]
enum EditTarget {
    Table,
    Factors,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session on the embedded defaults.
    pub fn new() -> Self {
        Self::with_data(ReferenceData::builtin())
    }

    pub fn with_data(data: ReferenceData) -> Self {
        Self {
            data,
            rejected_table: None,
            rejected_factors: None,
        }
    }

    /// A session loaded from a source, with defaults for anything unusable.
    pub fn from_source(source: &dyn ReferenceSource) -> (Self, Vec<ReferenceError>) {
        let (data, diagnostics) = ReferenceData::load_or_default(source);
        (Self::with_data(data), diagnostics)
    }

    pub fn table(&self) -> &ReferenceTable {
        &self.data.table
    }

    pub fn factors(&self) -> &EmissionFactors {
        &self.data.factors
    }

    pub fn is_blocked(&self) -> bool {
        self.rejected_table.is_some() || self.rejected_factors.is_some()
    }

    /// Diagnostic of the rejected edit blocking this session, if any.
    ///
    /// A pending table rejection is reported before a factor rejection.
    pub fn blocking_reason(&self) -> Option<&str> {
        self.rejected_table
            .as_deref()
            .or(self.rejected_factors.as_deref())
    }

    fn reject<T>(&mut self, target: EditTarget, err: ReferenceError) -> Result<T, ReferenceError> {
        warn!("{:?} edit rejected, keeping previous data: {}", target, err);
        let reason = Some(err.to_string());
        match target {
            EditTarget::Table => self.rejected_table = reason,
            EditTarget::Factors => self.rejected_factors = reason,
        }
        Err(err)
    }

    /// Swaps in a new table. Empty tables are rejected.
    ///
    /// Only clears a pending table rejection; a pending factor rejection
    /// keeps blocking.
    pub fn replace_table(&mut self, table: ReferenceTable) -> Result<Vec<TableWarning>, ReferenceError> {
        if let Err(err) = check_table(&table) {
            return self.reject(EditTarget::Table, err);
        }

        let warnings = table.warnings();
        for warning in &warnings {
            warn!("reference table: {}", warning);
        }

        info!(
            "reference table replaced: {} categories, {} numeric gains",
            table.categories().len(),
            table.numeric_cell_count()
        );
        self.data.table = table;
        self.rejected_table = None;
        Ok(warnings)
    }

    /// Validates a JSON table document and swaps it in.
    pub fn replace_table_json(&mut self, json: &str) -> Result<Vec<TableWarning>, ReferenceError> {
        match parse_table(json) {
            Ok(table) => self.replace_table(table),
            Err(err) => self.reject(EditTarget::Table, err),
        }
    }

    /// Swaps in new emission factors. Only clears a pending factor rejection.
    pub fn replace_factors(&mut self, factors: EmissionFactors) -> Result<(), ReferenceError> {
        if let Err(err) = factors.validate() {
            return self.reject(EditTarget::Factors, err);
        }
        info!(
            "emission factors replaced: gas {}, electricity {}, biomethane {}",
            factors.gas, factors.electricity, factors.biomethane
        );
        self.data.factors = factors;
        self.rejected_factors = None;
        Ok(())
    }

    /// Validates a JSON emission factor document and swaps it in.
    pub fn replace_factors_json(&mut self, json: &str) -> Result<(), ReferenceError> {
        match parse_factors(json) {
            Ok(factors) => self.replace_factors(factors),
            Err(err) => self.reject(EditTarget::Factors, err),
        }
    }

    /// Gives up on rejected edits and unblocks the session with the data it kept.
    pub fn discard_rejected_edit(&mut self) {
        self.rejected_table = None;
        self.rejected_factors = None;
    }

    pub fn reset_to_defaults(&mut self) {
        self.data = ReferenceData::builtin();
        self.discard_rejected_edit();
    }

    pub fn availability(&self, category: &str, before: &str) -> Availability {
        let options: Vec<String> = self
            .data
            .table
            .after_solutions(category, before)
            .into_iter()
            .map(str::to_string)
            .collect();

        if options.is_empty() {
            Availability::NoApplicableAfter
        } else {
            Availability::Options(options)
        }
    }

    /// Validates the input, resolves the gain and computes emissions.
    pub fn estimate(&self, input: &CalculationInput) -> Result<Estimate, SessionError> {
        if let Some(reason) = self.blocking_reason() {
            return Err(SessionError::Blocked(reason.to_string()));
        }
        validate_input(input)?;

        let table = &self.data.table;
        let gain = resolve(
            table,
            &input.category,
            &input.before_solution,
            &input.after_solution,
            GainOverride::from_optional(input.manual_gain_override),
        );
        let supply = AfterSupply::select(
            table.technology_of(&input.after_solution),
            input.hybrid_electric_share_percent,
        );
        let result = compute_emissions_for(
            input.annual_consumption_kwh,
            input.green_gas_share_percent,
            supply,
            gain.ratio,
            &self.data.factors,
        );

        Ok(Estimate {
            input: input.clone(),
            gain,
            supply,
            factors: self.data.factors,
            result,
        })
    }
}

//! Emissions calculator.
//!
//! Turns an annual gas consumption and a resolved energy gain into
//! before/after CO₂ emissions. The pre-retrofit state is always modelled as
//! 100 % natural gas. The post-retrofit state is gas (blended with the
//! green-gas contract share), fully electric for heat pumps, or a hybrid
//! electric/gas split.
//!
//! Everything here is plain arithmetic: no range checks, no rounding. Inputs
//! are validated upstream (see [`crate::input`]).

use crate::error::ReferenceError;
use crate::reference::Technology;
use serde::{Deserialize, Serialize};

/// Emission factor of natural gas (tCO₂/MWh)
pub const DEFAULT_GAS_FACTOR: f64 = 0.239;
/// Emission factor of grid electricity (tCO₂/MWh)
pub const DEFAULT_ELECTRICITY_FACTOR: f64 = 0.058;
/// Emission factor of biomethane (tCO₂/MWh)
pub const DEFAULT_BIOMETHANE_FACTOR: f64 = 0.0417;

/// Emission factors in tCO₂ per MWh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmissionFactors {
    pub gas: f64,
    pub electricity: f64,
    pub biomethane: f64,
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self {
            gas: DEFAULT_GAS_FACTOR,
            electricity: DEFAULT_ELECTRICITY_FACTOR,
            biomethane: DEFAULT_BIOMETHANE_FACTOR,
        }
    }
}

impl EmissionFactors {
    pub fn new(gas: f64, electricity: f64, biomethane: f64) -> Self {
        Self {
            gas,
            electricity,
            biomethane,
        }
    }

    /// Checks that every factor is finite and non-negative.
    pub fn validate(&self) -> Result<(), ReferenceError> {
        for (name, value) in [
            ("gas", self.gas),
            ("electricity", self.electricity),
            ("biomethane", self.biomethane),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ReferenceError::InvalidFactor { name, value });
            }
        }
        Ok(())
    }
}

/// One complete set of user choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    pub category: String,
    pub before_solution: String,
    pub after_solution: String,
    /// Annual gas consumption before retrofit (kWh PCI/year)
    pub annual_consumption_kwh: f64,
    /// Green-gas share of the gas contract (0-100 %)
    pub green_gas_share_percent: f64,
    /// Electric share (0-100 %) when the after-solution runs as a hybrid
    #[serde(default)]
    pub hybrid_electric_share_percent: Option<f64>,
    /// Manual gain ratio. `Some(0.0)` behaves like `None`.
    #[serde(default)]
    pub manual_gain_override: Option<f64>,
}

impl CalculationInput {
    pub fn new(
        category: impl Into<String>,
        before_solution: impl Into<String>,
        after_solution: impl Into<String>,
        annual_consumption_kwh: f64,
    ) -> Self {
        Self {
            category: category.into(),
            before_solution: before_solution.into(),
            after_solution: after_solution.into(),
            annual_consumption_kwh,
            green_gas_share_percent: 0.0,
            hybrid_electric_share_percent: None,
            manual_gain_override: None,
        }
    }

    pub fn with_green_gas_share(mut self, percent: f64) -> Self {
        self.green_gas_share_percent = percent;
        self
    }

    pub fn with_hybrid_split(mut self, electric_share_percent: f64) -> Self {
        self.hybrid_electric_share_percent = Some(electric_share_percent);
        self
    }

    pub fn with_gain_override(mut self, ratio: f64) -> Self {
        self.manual_gain_override = Some(ratio);
        self
    }

    pub fn is_hybrid(&self) -> bool {
        self.hybrid_electric_share_percent.is_some()
    }
}

/// How the post-retrofit consumption is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AfterSupply {
    /// 100 % gas at the green-gas blended factor
    Gas,
    /// 100 % electricity
    Electric,
    /// Electric share on electricity, the remainder on blended gas
    Hybrid { electric_share_percent: f64 },
}

impl AfterSupply {
    /// Hybrid split takes precedence over the technology of the label.
    pub fn select(technology: Technology, hybrid_electric_share_percent: Option<f64>) -> Self {
        match (hybrid_electric_share_percent, technology) {
            (Some(electric_share_percent), _) => AfterSupply::Hybrid {
                electric_share_percent,
            },
            (None, Technology::HeatPump) => AfterSupply::Electric,
            (None, Technology::Gas) => AfterSupply::Gas,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            AfterSupply::Gas => "Gas".to_string(),
            AfterSupply::Electric => "Electric".to_string(),
            AfterSupply::Hybrid {
                electric_share_percent,
            } => format!("Hybrid ({}% electric)", electric_share_percent),
        }
    }
}

/// Before/after consumption and emissions of one calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub consumption_before_mwh: f64,
    pub consumption_after_mwh: f64,
    pub emissions_before_t: f64,
    pub emissions_after_t: f64,
    /// Positive is a reduction, negative a regression
    pub gain_t: f64,
}

/// Gas factor blended linearly with biomethane by the green-gas share.
///
/// # Example
///
/// ```
/// use co2gain::emissions::{gas_mix_factor, EmissionFactors};
///
/// let factors = EmissionFactors::default();
/// assert_eq!(gas_mix_factor(&factors, 0.0), factors.gas);
/// assert_eq!(gas_mix_factor(&factors, 100.0), factors.biomethane);
/// ```
pub fn gas_mix_factor(factors: &EmissionFactors, green_gas_share_percent: f64) -> f64 {
    let green = green_gas_share_percent / 100.0;
    factors.gas * (1.0 - green) + factors.biomethane * green
}

/// Computes emissions for an explicit post-retrofit supply.
pub fn compute_emissions_for(
    annual_consumption_kwh: f64,
    green_gas_share_percent: f64,
    supply: AfterSupply,
    gain_ratio: f64,
    factors: &EmissionFactors,
) -> CalculationResult {
    let consumption_before_mwh = annual_consumption_kwh / 1000.0;
    let consumption_after_mwh = consumption_before_mwh * (1.0 + gain_ratio);

    let emissions_before_t = consumption_before_mwh * factors.gas;
    let gas_mix = gas_mix_factor(factors, green_gas_share_percent);

    let emissions_after_t = match supply {
        AfterSupply::Hybrid {
            electric_share_percent,
        } => {
            let gas_share_percent = 100.0 - electric_share_percent;
            consumption_after_mwh * (electric_share_percent / 100.0) * factors.electricity
                + consumption_after_mwh * (gas_share_percent / 100.0) * gas_mix
        }
        AfterSupply::Electric => consumption_after_mwh * factors.electricity,
        AfterSupply::Gas => consumption_after_mwh * gas_mix,
    };

    CalculationResult {
        consumption_before_mwh,
        consumption_after_mwh,
        emissions_before_t,
        emissions_after_t,
        gain_t: emissions_before_t - emissions_after_t,
    }
}

/// Computes emissions, classifying the after-solution from its label.
///
/// # Example
///
/// ```
/// use co2gain::emissions::{compute_emissions, CalculationInput, EmissionFactors};
///
/// let input = CalculationInput::new(
///     "Maison individuelle",
///     "Chaudière gaz standard",
///     "Chaudière gaz THPE",
///     20000.0,
/// );
/// let result = compute_emissions(&input, -0.25, &EmissionFactors::default());
///
/// assert!((result.consumption_after_mwh - 15.0).abs() < 1e-9);
/// assert!((result.gain_t - 1.195).abs() < 1e-9);
/// ```
pub fn compute_emissions(
    input: &CalculationInput,
    gain_ratio: f64,
    factors: &EmissionFactors,
) -> CalculationResult {
    let supply = AfterSupply::select(
        Technology::from_label(&input.after_solution),
        input.hybrid_electric_share_percent,
    );
    compute_emissions_for(
        input.annual_consumption_kwh,
        input.green_gas_share_percent,
        supply,
        gain_ratio,
        factors,
    )
}

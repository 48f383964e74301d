pub mod config;
pub mod emissions;
pub mod equivalence;
pub mod error;
pub mod gain;
pub mod input;
pub mod reference;
pub mod report;
pub mod session;

pub use emissions::{compute_emissions, CalculationInput, CalculationResult, EmissionFactors};
pub use gain::{resolve_gain, GainOverride};
pub use reference::{GainCell, ReferenceTable, Technology};
pub use session::{Availability, Estimate, Session};

#[cfg(feature = "python")]
mod python {
    use crate::emissions::CalculationInput;
    use crate::session::Session;
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    #[pyclass]
    pub struct Simulator {
        session: Session,
    }

    #[pymethods]
    impl Simulator {
        #[new]
        fn new() -> Self {
            Simulator {
                session: Session::new(),
            }
        }

        /// Returns (consumption_before_mwh, consumption_after_mwh,
        /// emissions_before_t, emissions_after_t, gain_t, gain_ratio).
        #[pyo3(signature = (category, before, after, consumption_kwh, green_gas_percent=0.0, electric_share_percent=None, gain_override=None))]
        #[allow(clippy::too_many_arguments)]
        fn estimate(
            &self,
            category: &str,
            before: &str,
            after: &str,
            consumption_kwh: f64,
            green_gas_percent: f64,
            electric_share_percent: Option<f64>,
            gain_override: Option<f64>,
        ) -> PyResult<(f64, f64, f64, f64, f64, f64)> {
            let mut input = CalculationInput::new(category, before, after, consumption_kwh)
                .with_green_gas_share(green_gas_percent);
            input.hybrid_electric_share_percent = electric_share_percent;
            input.manual_gain_override = gain_override;

            let estimate = self
                .session
                .estimate(&input)
                .map_err(|e| PyValueError::new_err(e.to_string()))?;
            let r = estimate.result;
            Ok((
                r.consumption_before_mwh,
                r.consumption_after_mwh,
                r.emissions_before_t,
                r.emissions_after_t,
                r.gain_t,
                estimate.gain.ratio,
            ))
        }

        /// Swaps in a JSON reference table and returns its warnings.
        fn load_table_json(&mut self, json: &str) -> PyResult<Vec<String>> {
            let warnings = self
                .session
                .replace_table_json(json)
                .map_err(|e| PyValueError::new_err(e.to_string()))?;
            Ok(warnings.iter().map(|w| w.to_string()).collect())
        }

        fn after_solutions(&self, category: &str, before: &str) -> Vec<String> {
            self.session.availability(category, before).options().to_vec()
        }
    }

    #[pymodule]
    fn co2gain(_py: Python, m: &PyModule) -> PyResult<()> {
        m.add_class::<Simulator>()?;
        Ok(())
    }
}

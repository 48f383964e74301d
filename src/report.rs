//! Estimate report generation.
//!
//! Renders an [`Estimate`] with its equivalences as Markdown, plain text or
//! JSON. Values are rounded here, at display time only.

use crate::equivalence::{EquivalenceFactors, Equivalences};
use crate::session::Estimate;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Output formats supported by [`EstimateReport::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Markdown,
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Some(ReportFormat::Markdown),
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

/// Whether the retrofit lowers or raises emissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Reduction,
    Increase,
    Unchanged,
}

impl Outcome {
    pub fn from_gain(gain_t: f64) -> Self {
        if gain_t > 0.0 {
            Outcome::Reduction
        } else if gain_t < 0.0 {
            Outcome::Increase
        } else {
            Outcome::Unchanged
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Reduction => "reduction",
            Outcome::Increase => "increase",
            Outcome::Unchanged => "unchanged",
        };
        write!(f, "{}", label)
    }
}

/// An estimate ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct EstimateReport {
    pub estimate: Estimate,
    pub outcome: Outcome,
    pub equivalences: Equivalences,
}

impl EstimateReport {
    pub fn new(estimate: Estimate, factors: &EquivalenceFactors) -> Self {
        let gain_t = estimate.result.gain_t;
        Self {
            estimate,
            outcome: Outcome::from_gain(gain_t),
            equivalences: Equivalences::from_tonnes(gain_t, factors),
        }
    }

    pub fn render(&self, format: ReportFormat) -> String {
        match format {
            ReportFormat::Markdown => self.to_markdown(),
            ReportFormat::Text => self.to_text(),
            ReportFormat::Json => self.to_json(),
        }
    }

    /// Generates a Markdown report.
    pub fn to_markdown(&self) -> String {
        let input = &self.estimate.input;
        let gain = &self.estimate.gain;
        let result = &self.estimate.result;
        let mut md = String::new();

        md.push_str("# CO₂ retrofit estimate\n\n");

        md.push_str("## Selection\n\n");
        md.push_str(&format!("- **Building:** {}\n", input.category));
        md.push_str(&format!("- **Before:** {}\n", input.before_solution));
        md.push_str(&format!("- **After:** {}\n", input.after_solution));
        md.push_str(&format!("- **Supply after retrofit:** {}\n", self.estimate.supply.display_name()));
        md.push_str(&format!("- **Green gas share:** {:.0} %\n", input.green_gas_share_percent));
        md.push_str(&format!(
            "- **Energy gain:** {:+.2} % ({})\n\n",
            gain.ratio * 100.0,
            gain.source
        ));

        md.push_str("## Results\n\n");
        md.push_str("| | Before | After |\n");
        md.push_str("|---|---:|---:|\n");
        md.push_str(&format!(
            "| Consumption (MWh/yr) | {:.2} | {:.2} |\n",
            result.consumption_before_mwh, result.consumption_after_mwh
        ));
        md.push_str(&format!(
            "| Emissions (tCO₂/yr) | {:.2} | {:.2} |\n\n",
            result.emissions_before_t, result.emissions_after_t
        ));

        md.push_str(&format!(
            "**CO₂ gain:** {:.2} t/yr ({})\n\n",
            result.gain_t, self.outcome
        ));

        md.push_str("## Equivalences\n\n");
        md.push_str(&format!("- {:.0} km by car\n", self.equivalences.car_km));
        md.push_str(&format!(
            "- {:.2} Paris–New York return flights\n",
            self.equivalences.return_flights
        ));

        md
    }

    /// Generates a compact plain-text report.
    pub fn to_text(&self) -> String {
        let result = &self.estimate.result;
        format!(
            "consumption: {:.2} -> {:.2} MWh/yr\n\
             emissions:   {:.2} -> {:.2} tCO2/yr\n\
             gain:        {:.2} tCO2/yr ({})\n\
             gain ratio:  {:+.2} % ({})\n\
             equivalent:  {:.0} km by car, {:.2} return flights\n",
            result.consumption_before_mwh,
            result.consumption_after_mwh,
            result.emissions_before_t,
            result.emissions_after_t,
            result.gain_t,
            self.outcome,
            self.estimate.gain.ratio * 100.0,
            self.estimate.gain.source,
            self.equivalences.car_km,
            self.equivalences.return_flights
        )
    }

    /// Generates a pretty-printed JSON report with unrounded values.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Saves the report to a file based on the extension.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let path = path.as_ref();
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ReportFormat::from_name)
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "Unsupported file extension. Use .md, .txt, or .json",
                )
            })?;

        self.write_to(path, format)
    }

    /// Writes the report in the given format, whatever the file extension.
    pub fn write_to<P: AsRef<Path>>(&self, path: P, format: ReportFormat) -> std::io::Result<()> {
        std::fs::write(path, self.render(format))
    }
}

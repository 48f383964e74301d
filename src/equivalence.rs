//! Human-relatable equivalences of an emission tonnage.

use serde::{Deserialize, Serialize};

/// Average passenger car emissions (kgCO₂/km)
pub const DEFAULT_CAR_KG_PER_KM: f64 = 0.218;
/// Paris–New York return flight, per passenger (tCO₂)
pub const DEFAULT_FLIGHT_T: f64 = 1.77;

/// Conversion factors used for equivalences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EquivalenceFactors {
    pub car_kg_per_km: f64,
    pub flight_t: f64,
}

impl Default for EquivalenceFactors {
    fn default() -> Self {
        Self {
            car_kg_per_km: DEFAULT_CAR_KG_PER_KM,
            flight_t: DEFAULT_FLIGHT_T,
        }
    }
}

/// Equivalent car distance and flights for a tonnage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Equivalences {
    pub car_km: f64,
    pub return_flights: f64,
}

impl Equivalences {
    /// Converts tonnes of CO₂. The sign of `tonnes` is kept.
    ///
    /// A zero factor yields 0 for that equivalence.
    ///
    /// # Example
    ///
    /// ```
    /// use co2gain::equivalence::{EquivalenceFactors, Equivalences};
    ///
    /// let eq = Equivalences::from_tonnes(1.77, &EquivalenceFactors::default());
    /// assert!((eq.return_flights - 1.0).abs() < 1e-12);
    /// ```
    pub fn from_tonnes(tonnes: f64, factors: &EquivalenceFactors) -> Self {
        let car_km = if factors.car_kg_per_km > 0.0 {
            tonnes * 1000.0 / factors.car_kg_per_km
        } else {
            0.0
        };
        let return_flights = if factors.flight_t > 0.0 {
            tonnes / factors.flight_t
        } else {
            0.0
        };

        Self {
            car_km,
            return_flights,
        }
    }
}

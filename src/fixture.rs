//! Fixtures for tests
use crate::config::{CostParameters, SimulationConfig, Tariffs};
use crate::units::{Energy, EnergyPerPower, Power};
use rstest::fixture;

/// Two 175 kW chargers, 600 kW of panels and no battery
#[fixture]
pub fn config() -> SimulationConfig {
    SimulationConfig {
        charging_speed: Power(175.0),
        n_chargers: 2,
        average_charge: Energy(30.0),
        vehicles_per_day: 100,
        annual_yield_per_kw: EnergyPerPower(900.0),
        solar_capacity: Power(600.0),
        battery_capacity: Energy(0.0),
        seed: Some(42),
        tariffs: Tariffs::default(),
        costs: CostParameters::default(),
    }
}

/// As [`config`], but with a 500 kWh battery
#[fixture]
pub fn config_with_battery(mut config: SimulationConfig) -> SimulationConfig {
    config.battery_capacity = Energy(500.0);
    config
}

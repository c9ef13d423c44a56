//! Defines the `SimulationConfig` struct, which represents the contents of `park.toml`.
use crate::input::{input_err_msg, read_toml};
use crate::solar::HOURS_PER_DAY;
use crate::units::{
    Dimensionless, Energy, EnergyPerPower, Hours, Money, MoneyPerEnergy, MoneyPerPower, Power,
};
use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// The name of the file describing a scenario
pub const CONFIG_FILE_NAME: &str = "park.toml";

/// A problem with the values in a scenario file
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A rate, capacity, price or cost is below zero, infinite or NaN
    #[error("`{field}` must be a finite, non-negative number, got {value}")]
    Negative {
        /// The offending parameter
        field: &'static str,
        /// Its value
        value: f64,
    },
    /// A lifetime used to compute depreciation is zero
    #[error("`{field}` must be greater than zero")]
    ZeroLifetime {
        /// The offending parameter
        field: &'static str,
    },
}

/// Prices paid and received for electricity
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Tariffs {
    /// Price charged to drivers, including VAT
    pub sales_price: MoneyPerEnergy,
    /// VAT rate included in `sales_price`
    pub vat_rate: Dimensionless,
    /// Price received for energy exported to the grid
    pub grid_sell_price: MoneyPerEnergy,
    /// Price paid for energy imported from the grid
    pub grid_buy_price: MoneyPerEnergy,
}

impl Default for Tariffs {
    fn default() -> Self {
        Self {
            sales_price: MoneyPerEnergy(0.25),
            vat_rate: Dimensionless(0.19),
            grid_sell_price: MoneyPerEnergy(0.05),
            grid_buy_price: MoneyPerEnergy(0.2),
        }
    }
}

impl Tariffs {
    /// The price drivers pay, net of VAT
    pub fn net_sales_price(&self) -> MoneyPerEnergy {
        self.sales_price / (Dimensionless(1.0) + self.vat_rate)
    }
}

/// Installation costs and asset lifetimes
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CostParameters {
    /// Cost of solar panels per kW installed
    pub panel_per_kw: MoneyPerPower,
    /// Cost of inverters per kW of panels
    pub inverter_per_kw: MoneyPerPower,
    /// Cost of battery storage per kWh
    pub battery_per_kwh: MoneyPerEnergy,
    /// Cost of a single charger
    pub charger: Money,
    /// Extra cost for every pair of chargers (shared power cabinet)
    pub charger_pair_extra: Money,
    /// Cost of the grid connection per kW of connection size
    pub grid_connection_per_kw: MoneyPerPower,
    /// Years over which chargers are written off
    pub charger_lifetime: u32,
    /// Years over which the grid connection is written off
    pub grid_connection_lifetime: u32,
    /// Years over which inverters are written off
    pub inverter_lifetime: u32,
    /// Years over which panels are written off
    pub panel_lifetime: u32,
    /// Number of full cycles the battery is rated for
    pub battery_cycle_life: u32,
}

impl Default for CostParameters {
    fn default() -> Self {
        Self {
            panel_per_kw: MoneyPerPower(250.0),
            inverter_per_kw: MoneyPerPower(100.0),
            battery_per_kwh: MoneyPerEnergy(1200.0),
            charger: Money(22_500.0),
            charger_pair_extra: Money(45_000.0),
            grid_connection_per_kw: MoneyPerPower(100.0),
            charger_lifetime: 7,
            grid_connection_lifetime: 30,
            inverter_lifetime: 15,
            panel_lifetime: 25,
            battery_cycle_life: 4000,
        }
    }
}

/// Everything needed to simulate one year of a charging park
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SimulationConfig {
    /// Power of each charger
    pub charging_speed: Power,
    /// Number of chargers
    pub n_chargers: u32,
    /// Energy each vehicle needs on arrival
    pub average_charge: Energy,
    /// Number of vehicles arriving per day
    pub vehicles_per_day: u32,
    /// Yearly yield of one kW of panels
    pub annual_yield_per_kw: EnergyPerPower,
    /// Installed panel capacity
    pub solar_capacity: Power,
    /// Battery storage capacity
    #[serde(default)]
    pub battery_capacity: Energy,
    /// Seed for the random number generator. Drawn at random if absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Electricity prices
    #[serde(default)]
    pub tariffs: Tariffs,
    /// Installation costs
    #[serde(default)]
    pub costs: CostParameters,
}

/// Check that a quantity is finite and not below zero
fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

/// Check that a lifetime is not zero
fn check_lifetime(field: &'static str, value: u32) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::ZeroLifetime { field })
    } else {
        Ok(())
    }
}

impl SimulationConfig {
    /// Read a scenario file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `scenario_dir` - Folder containing `park.toml`
    ///
    /// # Returns
    ///
    /// The validated configuration or an error if the file is missing or invalid
    pub fn from_path<P: AsRef<Path>>(scenario_dir: P) -> Result<SimulationConfig> {
        let file_path = scenario_dir.as_ref().join(CONFIG_FILE_NAME);
        let config: SimulationConfig = read_toml(&file_path)?;

        config
            .validate()
            .with_context(|| input_err_msg(&file_path))?;
        config.warn_about_queue_growth();

        Ok(config)
    }

    /// Check that every quantity is physically meaningful
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("charging_speed", self.charging_speed.value())?;
        check_non_negative("average_charge", self.average_charge.value())?;
        check_non_negative("annual_yield_per_kw", self.annual_yield_per_kw.value())?;
        check_non_negative("solar_capacity", self.solar_capacity.value())?;
        check_non_negative("battery_capacity", self.battery_capacity.value())?;

        let tariffs = &self.tariffs;
        check_non_negative("tariffs.sales_price", tariffs.sales_price.value())?;
        check_non_negative("tariffs.vat_rate", tariffs.vat_rate.value())?;
        check_non_negative("tariffs.grid_sell_price", tariffs.grid_sell_price.value())?;
        check_non_negative("tariffs.grid_buy_price", tariffs.grid_buy_price.value())?;

        let costs = &self.costs;
        check_non_negative("costs.panel_per_kw", costs.panel_per_kw.value())?;
        check_non_negative("costs.inverter_per_kw", costs.inverter_per_kw.value())?;
        check_non_negative("costs.battery_per_kwh", costs.battery_per_kwh.value())?;
        check_non_negative("costs.charger", costs.charger.value())?;
        check_non_negative("costs.charger_pair_extra", costs.charger_pair_extra.value())?;
        check_non_negative(
            "costs.grid_connection_per_kw",
            costs.grid_connection_per_kw.value(),
        )?;
        check_lifetime("costs.charger_lifetime", costs.charger_lifetime)?;
        check_lifetime(
            "costs.grid_connection_lifetime",
            costs.grid_connection_lifetime,
        )?;
        check_lifetime("costs.inverter_lifetime", costs.inverter_lifetime)?;
        check_lifetime("costs.panel_lifetime", costs.panel_lifetime)?;
        check_lifetime("costs.battery_cycle_life", costs.battery_cycle_life)?;

        Ok(())
    }

    /// The configured seed, or a freshly drawn one.
    ///
    /// Drawn seeds are kept within 32 bits so they can be recorded in TOML.
    pub fn seed_or_random(&self) -> u64 {
        self.seed
            .unwrap_or_else(|| u64::from(rand::random::<u32>()))
    }

    /// Combined power of all chargers
    pub fn charger_power(&self) -> Power {
        self.charging_speed * Dimensionless(f64::from(self.n_chargers))
    }

    /// Energy the chargers can deliver in one hour
    pub fn charge_capacity(&self) -> Energy {
        self.charger_power() * Hours(1.0)
    }

    /// Energy demanded by all the vehicles arriving in one day
    pub fn daily_demand(&self) -> Energy {
        self.average_charge * Dimensionless(f64::from(self.vehicles_per_day))
    }

    /// Energy the chargers can deliver over a whole day
    fn daily_charge_capacity(&self) -> Energy {
        self.charge_capacity() * Dimensionless(f64::from(HOURS_PER_DAY))
    }

    /// Whether more energy arrives each day than the chargers can deliver
    pub fn exceeds_daily_capacity(&self) -> bool {
        self.daily_demand() > self.daily_charge_capacity()
    }

    /// Warn if the chargers can't keep up with demand, as the queue will then grow all year
    fn warn_about_queue_growth(&self) {
        if self.exceeds_daily_capacity() {
            warn!(
                "Daily demand ({:.0} kWh) exceeds what the chargers can deliver in a day \
                ({:.0} kWh). Vehicles will queue for the whole year.",
                self.daily_demand().value(),
                self.daily_charge_capacity().value()
            );
        }
    }
}

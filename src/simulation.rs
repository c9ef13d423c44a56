//! Functionality for running the charging park simulation.
use crate::battery::{BatteryState, HourlyBalance, balance_hour};
use crate::charging::ChargingQueue;
use crate::config::SimulationConfig;
use crate::demand::{DayArrivals, DemandGenerator};
use crate::finance::FinancialReport;
use crate::output::DataWriter;
use crate::solar::{DAYS_PER_YEAR, HOURS_PER_DAY, hourly_yield};
use crate::units::{Dimensionless, Energy};
use anyhow::Result;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;

/// Running totals over a simulation run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnergyAccumulators {
    /// Energy delivered to vehicles
    pub car_charging: Energy,
    /// Energy imported from the grid
    pub grid_bought: Energy,
    /// Energy exported to the grid
    pub grid_sold: Energy,
    /// Energy drawn from the battery
    pub battery_throughput: Energy,
}

impl EnergyAccumulators {
    /// Add one hour's flows to the totals
    fn record(&mut self, car_charging: Energy, balance: &HourlyBalance) {
        self.car_charging += car_charging;
        self.grid_bought += balance.grid_bought;
        self.grid_sold += balance.grid_sold;
        self.battery_throughput += balance.battery_discharged;
    }
}

/// Everything that happened in one simulated hour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourRecord {
    /// Day of the year, from zero
    pub day: u32,
    /// Hour of the day, from zero
    pub hour: u32,
    /// Vehicles arriving this hour
    pub arrivals: u32,
    /// Solar energy generated
    pub solar: Energy,
    /// Energy delivered to vehicles
    pub car_charging: Energy,
    /// How the charging load and solar output were balanced
    pub balance: HourlyBalance,
    /// Energy in the battery at the end of the hour
    pub battery_level: Energy,
    /// Vehicles still waiting at the end of the hour
    pub queue_length: usize,
}

/// The state of the park at the end of a run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResults {
    /// Year totals
    pub totals: EnergyAccumulators,
    /// The battery at the end of the year
    pub battery: BatteryState,
    /// Vehicles still waiting at the end of the year
    pub waiting_vehicles: usize,
    /// Energy still owed to waiting vehicles
    pub unserved_demand: Energy,
}

impl SimulationResults {
    /// Number of complete charge cycles the battery went through
    pub fn battery_cycles(&self) -> u32 {
        let capacity = self.battery.capacity();
        if capacity > Energy(0.0) {
            (self.totals.battery_throughput / capacity).value().floor() as u32
        } else {
            0
        }
    }
}

/// One run of the park model.
///
/// The queue and the battery carry over from one day to the next: a vehicle still waiting at 23:00
/// is first in line at midnight.
pub struct Simulation<'a, R: Rng> {
    config: &'a SimulationConfig,
    demand: DemandGenerator<R>,
    queue: ChargingQueue,
    battery: BatteryState,
    totals: EnergyAccumulators,
}

impl<'a, R: Rng> Simulation<'a, R> {
    /// Set up a run with an empty queue and a full battery
    pub fn new(config: &'a SimulationConfig, rng: R) -> Self {
        Self {
            config,
            demand: DemandGenerator::new(config.vehicles_per_day, rng),
            queue: ChargingQueue::new(),
            battery: BatteryState::new_full(config.battery_capacity),
            totals: EnergyAccumulators::default(),
        }
    }

    /// Simulate one hour in which `arrivals` vehicles join the queue
    pub fn step_hour(&mut self, day: u32, hour: u32, arrivals: u32) -> HourRecord {
        self.queue.push_many(arrivals, self.config.average_charge);
        let car_charging = self.queue.serve(self.config.charge_capacity());

        let solar = hourly_yield(
            day,
            hour,
            self.config.annual_yield_per_kw,
            self.config.solar_capacity,
        );
        let balance = balance_hour(car_charging, solar, &mut self.battery);
        self.totals.record(car_charging, &balance);

        HourRecord {
            day,
            hour,
            arrivals,
            solar,
            car_charging,
            balance,
            battery_level: self.battery.stored(),
            queue_length: self.queue.len(),
        }
    }

    /// Simulate all hours of `day` with the given arrivals
    pub fn run_day_with_arrivals(&mut self, day: u32, arrivals: &DayArrivals) -> Vec<HourRecord> {
        (0..HOURS_PER_DAY)
            .map(|hour| self.step_hour(day, hour, arrivals.in_hour(hour)))
            .collect()
    }

    /// Draw the arrivals for `day` and simulate all its hours
    pub fn run_day(&mut self, day: u32) -> Vec<HourRecord> {
        let arrivals = self.demand.arrivals_for_day();
        let records = self.run_day_with_arrivals(day, &arrivals);
        debug!(
            "Day {day}: {} arrivals, {} vehicles waiting at midnight, battery at {:.1} kWh",
            arrivals.total(),
            self.queue.len(),
            self.battery.stored().value()
        );

        records
    }

    /// End the run
    pub fn finish(self) -> SimulationResults {
        SimulationResults {
            totals: self.totals,
            battery: self.battery,
            waiting_vehicles: self.queue.len(),
            unserved_demand: self.queue.outstanding(),
        }
    }
}

/// Simulate a full year, passing each day's hourly records to `on_day` as they are produced.
///
/// # Arguments
///
/// * `config` - The park to simulate
/// * `rng` - Source of randomness for vehicle arrivals
/// * `on_day` - Called after each day with that day's records
pub fn simulate_year<R, F>(
    config: &SimulationConfig,
    rng: R,
    mut on_day: F,
) -> Result<SimulationResults>
where
    R: Rng,
    F: FnMut(&[HourRecord]) -> Result<()>,
{
    let mut simulation = Simulation::new(config, rng);
    for day in 0..DAYS_PER_YEAR {
        let records = simulation.run_day(day);
        on_day(&records)?;
    }

    Ok(simulation.finish())
}

/// Run the simulation and write the results.
///
/// # Arguments
///
/// * `config` - The park to simulate
/// * `seed` - Seed for the vehicle arrival generator
/// * `output_path` - The folder to which output files will be written
/// * `debug_model` - Whether to write the hourly flows
pub fn run(
    config: &SimulationConfig,
    seed: u64,
    output_path: &Path,
    debug_model: bool,
) -> Result<SimulationResults> {
    info!("Random seed: {seed}");

    let mut writer = DataWriter::create(output_path, debug_model)?;
    let results = simulate_year(config, StdRng::seed_from_u64(seed), |records| {
        writer.write_hourly_flows(records)
    })?;

    log_energy_totals(&results);
    if results.waiting_vehicles > 0 {
        warn!(
            "{} vehicles were still waiting at the end of the year ({:.0} kWh undelivered)",
            results.waiting_vehicles,
            results.unserved_demand.value()
        );
    }

    let report = FinancialReport::new(config, &results);
    report.log_summary();

    writer.write_energy_totals(&results)?;
    writer.write_financial_report(&report)?;
    writer.flush()?;

    Ok(results)
}

/// Report the year's energy flows
fn log_energy_totals(results: &SimulationResults) {
    let totals = &results.totals;
    info!("Energy bought: {:.0} kWh", totals.grid_bought.value());
    info!("Energy sold: {:.0} kWh", totals.grid_sold.value());
    info!("Energy charged: {:.0} kWh", totals.car_charging.value());

    let capacity = results.battery.capacity();
    if capacity > Energy(0.0) {
        info!(
            "Battery usage: {:.0} kWh ({} cycles, {:.0}% charged at year end)",
            totals.battery_throughput.value(),
            results.battery_cycles(),
            (results.battery.stored() / capacity * Dimensionless(100.0)).value()
        );
    }
}

//! The module responsible for writing output data to disk.
use crate::finance::FinancialReport;
use crate::simulation::{HourRecord, SimulationResults};
use anyhow::{Context, Result, ensure};
use serde::Serialize;
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

pub mod metadata;

/// The root folder in which scenario-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "chargepark_results";

/// The output file name for the year's energy totals
const ENERGY_TOTALS_FILE_NAME: &str = "energy_totals.csv";

/// The output file name for the financial report
const FINANCE_FILE_NAME: &str = "finance.csv";

/// The output file name for hourly energy flows
const HOURLY_FLOWS_FILE_NAME: &str = "debug_hourly_flows.csv";

/// Get the default output directory for the scenario at the specified path
pub fn get_output_dir(scenario_dir: &Path) -> Result<PathBuf> {
    // Canonicalise in case the user has specified "."
    let scenario_dir = scenario_dir
        .canonicalize()
        .context("Could not resolve path to scenario")?;

    let scenario_name = scenario_dir
        .file_name()
        .context("Scenario cannot be in root folder")?
        .to_str()
        .context("Invalid chars in scenario dir name")?;

    Ok([OUTPUT_DIRECTORY_ROOT, scenario_name].iter().collect())
}

/// Create a new output directory, replacing an existing one if `overwrite` is set.
///
/// # Returns
///
/// Whether an existing folder was overwritten
pub fn create_output_directory(output_dir: &Path, overwrite: bool) -> Result<bool> {
    // Check if the output folder already exists and is not empty
    let mut overwritten = false;
    if output_dir.is_dir() && output_dir.read_dir()?.next().is_some() {
        ensure!(
            overwrite,
            "Output folder already exists and is not empty. \
            Use --overwrite to replace it."
        );

        fs::remove_dir_all(output_dir)?;
        overwritten = true;
    }

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwritten)
}

/// Represents the row of the energy totals CSV file
#[derive(Serialize, Debug, PartialEq)]
struct EnergyTotalsRow {
    car_charging: f64,
    grid_bought: f64,
    grid_sold: f64,
    battery_throughput: f64,
    battery_final_charge: f64,
    battery_cycles: u32,
    unserved_demand: f64,
    waiting_vehicles: usize,
}

impl EnergyTotalsRow {
    fn new(results: &SimulationResults) -> Self {
        let totals = &results.totals;
        Self {
            car_charging: totals.car_charging.value(),
            grid_bought: totals.grid_bought.value(),
            grid_sold: totals.grid_sold.value(),
            battery_throughput: totals.battery_throughput.value(),
            battery_final_charge: results.battery.stored().value(),
            battery_cycles: results.battery_cycles(),
            unserved_demand: results.unserved_demand.value(),
            waiting_vehicles: results.waiting_vehicles,
        }
    }
}

/// Represents a row in the finance CSV file
#[derive(Serialize, Debug, PartialEq)]
struct FinanceRow {
    section: &'static str,
    item: &'static str,
    value: f64,
}

/// Represents a row in the hourly flows CSV file
#[derive(Serialize, Debug, PartialEq)]
struct HourlyFlowRow {
    day: u32,
    hour: u32,
    arrivals: u32,
    solar: f64,
    car_charging: f64,
    battery_discharge: f64,
    battery_charge: f64,
    grid_bought: f64,
    grid_sold: f64,
    battery_level: f64,
    queue_length: usize,
}

impl From<&HourRecord> for HourlyFlowRow {
    fn from(record: &HourRecord) -> Self {
        Self {
            day: record.day,
            hour: record.hour,
            arrivals: record.arrivals,
            solar: record.solar.value(),
            car_charging: record.car_charging.value(),
            battery_discharge: record.balance.battery_discharged.value(),
            battery_charge: record.balance.battery_charged.value(),
            grid_bought: record.balance.grid_bought.value(),
            grid_sold: record.balance.grid_sold.value(),
            battery_level: record.battery_level.value(),
            queue_length: record.queue_length,
        }
    }
}

/// An object for writing simulation results to file
pub struct DataWriter {
    totals_writer: csv::Writer<File>,
    finance_writer: csv::Writer<File>,
    hourly_writer: Option<csv::Writer<File>>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    /// * `save_debug_info` - Whether to include the hourly flows
    pub fn create(output_path: &Path, save_debug_info: bool) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(&file_path)
                .with_context(|| format!("Failed to create {}", file_path.display()))
        };

        let hourly_writer = if save_debug_info {
            Some(new_writer(HOURLY_FLOWS_FILE_NAME)?)
        } else {
            None
        };

        Ok(Self {
            totals_writer: new_writer(ENERGY_TOTALS_FILE_NAME)?,
            finance_writer: new_writer(FINANCE_FILE_NAME)?,
            hourly_writer,
        })
    }

    /// Write one day's hourly flows, if enabled
    pub fn write_hourly_flows(&mut self, records: &[HourRecord]) -> Result<()> {
        let Some(writer) = self.hourly_writer.as_mut() else {
            return Ok(());
        };

        for record in records {
            writer.serialize(HourlyFlowRow::from(record))?;
        }

        Ok(())
    }

    /// Write the year's energy totals
    pub fn write_energy_totals(&mut self, results: &SimulationResults) -> Result<()> {
        self.totals_writer
            .serialize(EnergyTotalsRow::new(results))?;

        Ok(())
    }

    /// Write the financial report
    pub fn write_financial_report(&mut self, report: &FinancialReport) -> Result<()> {
        for (section, item, value) in report.lines() {
            self.finance_writer.serialize(FinanceRow {
                section,
                item,
                value,
            })?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.totals_writer.flush()?;
        self.finance_writer.flush()?;
        if let Some(writer) = self.hourly_writer.as_mut() {
            writer.flush()?;
        }

        Ok(())
    }
}

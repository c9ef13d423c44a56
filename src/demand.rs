//! Generation of vehicle arrivals at the charging park.
use crate::solar::HOURS_PER_DAY;
use rand::Rng;
use rand_distr::{Distribution, Poisson};

/// Mean of the Poisson distribution from which arrival hours are drawn
const ARRIVAL_POISSON_MEAN: f64 = 16.0;

/// The number of vehicles arriving in each hour of one day
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DayArrivals([u32; HOURS_PER_DAY as usize]);

impl DayArrivals {
    /// Create from per-hour arrival counts
    pub fn from_counts(counts: [u32; HOURS_PER_DAY as usize]) -> Self {
        Self(counts)
    }

    /// The number of vehicles arriving during `hour`
    pub fn in_hour(&self, hour: u32) -> u32 {
        self.0[hour as usize]
    }

    /// The total number of arrivals over the day
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }
}

/// Draws the arrival pattern for each simulated day.
///
/// Each vehicle's arrival hour is a Poisson(16) sample taken modulo 24, so arrivals pile up in the
/// afternoon and a thin tail spills over into the small hours.
pub struct DemandGenerator<R: Rng> {
    vehicles_per_day: u32,
    arrival_hour: Poisson<f64>,
    rng: R,
}

impl<R: Rng> DemandGenerator<R> {
    /// Create a new [`DemandGenerator`].
    ///
    /// # Arguments
    ///
    /// * `vehicles_per_day` - How many vehicles turn up each day
    /// * `rng` - Source of randomness. Pass a seeded generator for reproducible runs.
    pub fn new(vehicles_per_day: u32, rng: R) -> Self {
        Self {
            vehicles_per_day,
            arrival_hour: Poisson::new(ARRIVAL_POISSON_MEAN).expect("Poisson mean is positive"),
            rng,
        }
    }

    /// Draw the arrivals for the next day
    pub fn arrivals_for_day(&mut self) -> DayArrivals {
        let mut counts = [0; HOURS_PER_DAY as usize];
        for _ in 0..self.vehicles_per_day {
            let sample = self.arrival_hour.sample(&mut self.rng) as u64;
            counts[(sample % u64::from(HOURS_PER_DAY)) as usize] += 1;
        }

        DayArrivals::from_counts(counts)
    }
}

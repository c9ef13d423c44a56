//! Solar supply: how much energy the panels deliver on a given day and in a given hour.
use crate::units::{Dimensionless, Energy, EnergyPerPower, Power};
use std::f64::consts::PI;

/// Number of days in a simulated year
pub const DAYS_PER_YEAR: u32 = 365;

/// Number of hours in a simulated day
pub const HOURS_PER_DAY: u32 = 24;

/// Lowest relative irradiance (midwinter), as a fraction of the midsummer peak
const MIN_SEASONAL_SHINE: f64 = 0.1;

/// Empirical correction so that the seasonal weights over a year add up to the nameplate yield
const YIELD_CORRECTION: f64 = 365.0 / 402.0;

/// Hour of the day at which irradiance peaks
const SOLAR_NOON: f64 = 12.0;

/// Spread of the daylight bell curve, in hours
const DAYLIGHT_SPREAD: f64 = 3.0;

/// Relative irradiance for the given day of the year.
///
/// A sinusoid squeezed into `[0.1, 1.0]`, then scaled by `2 * 365 / 402` so that its yearly mean is
/// close to one.
pub fn seasonal_weight(day: u32) -> Dimensionless {
    let wave = (f64::from(day) / f64::from(DAYS_PER_YEAR) * 2.0 * PI).sin();
    let shine = (wave + 1.0) / 2.0 * (1.0 - MIN_SEASONAL_SHINE) + MIN_SEASONAL_SHINE;

    Dimensionless(shine * 2.0 * YIELD_CORRECTION)
}

/// Energy generated by the panels over the whole of `day`.
///
/// # Arguments
///
/// * `day` - Day of the year, starting from zero
/// * `annual_yield_per_kw` - Nameplate yearly yield of one kW of panels
/// * `solar_capacity` - Installed panel capacity
pub fn daily_yield(
    day: u32,
    annual_yield_per_kw: EnergyPerPower,
    solar_capacity: Power,
) -> Energy {
    let daily_yield_per_kw = annual_yield_per_kw / Dimensionless(f64::from(DAYS_PER_YEAR));
    seasonal_weight(day) * (daily_yield_per_kw * solar_capacity)
}

/// Share of a day's yield which arrives in `hour`.
///
/// This is the normal density with mean 12 and standard deviation 3 evaluated at `hour`. It is
/// *not* renormalised over the 24 discrete hours, so the dispatched energy over a day differs very
/// slightly from [`daily_yield`].
pub fn hourly_weight(hour: u32) -> Dimensionless {
    let z = (f64::from(hour) - SOLAR_NOON) / DAYLIGHT_SPREAD;
    let density = (-0.5 * z * z).exp() / (DAYLIGHT_SPREAD * (2.0 * PI).sqrt());

    Dimensionless(density)
}

/// Solar energy available during `hour` of `day`
pub fn hourly_yield(
    day: u32,
    hour: u32,
    annual_yield_per_kw: EnergyPerPower,
    solar_capacity: Power,
) -> Energy {
    daily_yield(day, annual_yield_per_kw, solar_capacity) * hourly_weight(hour)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::{approx_eq, assert_approx_eq};
    use rstest::rstest;

    #[rstest]
    #[case(0, 0.55)]
    #[case(91, 1.0)] // close to the peak of the sinusoid
    #[case(274, 0.1)] // close to the trough
    fn test_seasonal_weight(#[case] day: u32, #[case] shine: f64) {
        let expected = Dimensionless(shine * 2.0 * 365.0 / 402.0);
        assert_approx_eq!(Dimensionless, seasonal_weight(day), expected, epsilon = 1e-3);
    }

    #[test]
    fn test_seasonal_weight_bounds() {
        let lower = 0.1 * 2.0 * YIELD_CORRECTION;
        let upper = 2.0 * YIELD_CORRECTION;
        for day in 0..DAYS_PER_YEAR {
            let weight = seasonal_weight(day).value();
            assert!((lower - 1e-12..=upper + 1e-12).contains(&weight));
        }
    }

    #[test]
    fn test_seasonal_weight_yearly_mean() {
        let total: f64 = (0..DAYS_PER_YEAR).map(|day| seasonal_weight(day).value()).sum();

        // Mean shine is 0.55, so the mean weight is 1.1 * 365 / 402
        assert_approx_eq!(
            f64,
            total / f64::from(DAYS_PER_YEAR),
            1.1 * YIELD_CORRECTION,
            epsilon = 1e-9
        );
    }

    #[rstest]
    #[case(85)]
    #[case(91)]
    #[case(97)]
    fn test_daily_yield_symmetric_about_solstice(#[case] day: u32) {
        // The sinusoid peaks at day 91.25, so `day` and `182 - day` are (almost) mirror images
        let capacity = Power(600.0);
        let yield_per_kw = EnergyPerPower(900.0);
        let here = daily_yield(day, yield_per_kw, capacity).value();
        let mirrored = daily_yield(182 - day, yield_per_kw, capacity).value();

        assert!(approx_eq!(f64, here / mirrored, 1.0, epsilon = 1e-3));
    }

    #[test]
    fn test_daily_yield_scale() {
        // Day 0: shine is exactly 0.55
        let expected = 0.55 * 2.0 * YIELD_CORRECTION * (900.0 / 365.0) * 600.0;
        assert_approx_eq!(
            Energy,
            daily_yield(0, EnergyPerPower(900.0), Power(600.0)),
            Energy(expected),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_daily_yield_no_panels() {
        assert_eq!(daily_yield(100, EnergyPerPower(900.0), Power(0.0)), Energy(0.0));
    }

    #[test]
    fn test_hourly_weight_peaks_at_noon() {
        let noon = hourly_weight(12).value();
        assert_approx_eq!(f64, noon, 1.0 / (3.0 * (2.0 * PI).sqrt()), epsilon = 1e-12);
        for hour in (0..HOURS_PER_DAY).filter(|&h| h != 12) {
            assert!(hourly_weight(hour).value() < noon);
        }
    }

    #[rstest]
    #[case(9, 15)]
    #[case(6, 18)]
    #[case(0, 24)]
    fn test_hourly_weight_symmetric(#[case] before: u32, #[case] after: u32) {
        assert_approx_eq!(
            Dimensionless,
            hourly_weight(before),
            hourly_weight(after),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_hourly_weights_are_not_normalised() {
        let total: f64 = (0..HOURS_PER_DAY).map(|hour| hourly_weight(hour).value()).sum();

        // Nearly, but not exactly, one
        assert!((total - 1.0).abs() < 1e-3);
        assert!(total != 1.0);
    }

    #[test]
    fn test_hourly_yield() {
        let day_total = daily_yield(0, EnergyPerPower(900.0), Power(600.0));
        assert_approx_eq!(
            Energy,
            hourly_yield(0, 12, EnergyPerPower(900.0), Power(600.0)),
            day_total * hourly_weight(12),
            epsilon = 1e-12
        );
    }
}

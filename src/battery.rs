//! Hourly balancing of solar supply, battery storage and the grid.
use crate::units::Energy;

/// Energy held in the on-site battery.
///
/// The stored energy always lies in `[0, capacity]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryState {
    capacity: Energy,
    stored: Energy,
}

impl BatteryState {
    /// A battery with the given capacity, starting fully charged
    pub fn new_full(capacity: Energy) -> Self {
        Self::with_charge(capacity, capacity)
    }

    /// A battery holding `stored`, clamped to its capacity
    pub fn with_charge(capacity: Energy, stored: Energy) -> Self {
        Self {
            capacity,
            stored: stored.max(Energy(0.0)).min(capacity),
        }
    }

    /// The battery's capacity
    pub fn capacity(&self) -> Energy {
        self.capacity
    }

    /// The energy currently stored
    pub fn stored(&self) -> Energy {
        self.stored
    }

    /// Take up to `wanted` out of the battery, returning how much was actually drawn
    fn discharge(&mut self, wanted: Energy) -> Energy {
        let drawn = wanted.min(self.stored);
        self.stored -= drawn;
        drawn
    }

    /// Put up to `offered` into the battery, returning how much was accepted
    fn charge(&mut self, offered: Energy) -> Energy {
        let room = self.capacity - self.stored;
        let accepted = offered.min(room);
        self.stored += accepted;
        accepted
    }
}

/// Where the energy went during one hour
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HourlyBalance {
    /// Solar energy used directly to charge vehicles
    pub solar_used: Energy,
    /// Energy taken out of the battery
    pub battery_discharged: Energy,
    /// Solar energy stored in the battery
    pub battery_charged: Energy,
    /// Energy bought from the grid
    pub grid_bought: Energy,
    /// Solar energy sold to the grid
    pub grid_sold: Energy,
}

/// Cover an hour's charging load from solar, then the battery, then the grid.
///
/// Solar output left over after charging vehicles tops up the battery and the remainder is sold.
/// The battery is discharged before it is charged.
///
/// # Arguments
///
/// * `load` - Energy delivered to vehicles this hour
/// * `solar` - Solar energy generated this hour
/// * `battery` - The battery, updated in place
pub fn balance_hour(load: Energy, solar: Energy, battery: &mut BatteryState) -> HourlyBalance {
    let solar_used = load.min(solar);
    let deficit = load - solar_used;
    let surplus = solar - solar_used;

    let battery_discharged = battery.discharge(deficit);
    let grid_bought = deficit - battery_discharged;

    let battery_charged = battery.charge(surplus);
    let grid_sold = surplus - battery_charged;

    HourlyBalance {
        solar_used,
        battery_discharged,
        battery_charged,
        grid_bought,
        grid_sold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[test]
    fn test_no_battery_sells_surplus() {
        let mut battery = BatteryState::new_full(Energy(0.0));
        let balance = balance_hour(Energy(20.0), Energy(50.0), &mut battery);
        assert_eq!(balance.grid_sold, Energy(30.0));
        assert_eq!(balance.grid_bought, Energy(0.0));
        assert_eq!(balance.battery_discharged, Energy(0.0));
        assert_eq!(balance.battery_charged, Energy(0.0));
    }

    #[test]
    fn test_no_battery_buys_deficit() {
        let mut battery = BatteryState::new_full(Energy(0.0));
        let balance = balance_hour(Energy(50.0), Energy(20.0), &mut battery);
        assert_eq!(balance.grid_bought, Energy(30.0));
        assert_eq!(balance.grid_sold, Energy(0.0));
    }

    #[test]
    fn test_battery_runs_dry_then_grid() {
        let mut battery = BatteryState::with_charge(Energy(100.0), Energy(10.0));
        let balance = balance_hour(Energy(15.0), Energy(0.0), &mut battery);
        assert_eq!(balance.battery_discharged, Energy(10.0));
        assert_eq!(balance.grid_bought, Energy(5.0));
        assert_eq!(battery.stored(), Energy(0.0));
    }

    #[test]
    fn test_battery_covers_deficit() {
        let mut battery = BatteryState::with_charge(Energy(100.0), Energy(60.0));
        let balance = balance_hour(Energy(40.0), Energy(15.0), &mut battery);
        assert_eq!(balance.solar_used, Energy(15.0));
        assert_eq!(balance.battery_discharged, Energy(25.0));
        assert_eq!(balance.grid_bought, Energy(0.0));
        assert_eq!(battery.stored(), Energy(35.0));
    }

    #[test]
    fn test_surplus_fills_battery_then_sells() {
        let mut battery = BatteryState::with_charge(Energy(100.0), Energy(80.0));
        let balance = balance_hour(Energy(10.0), Energy(50.0), &mut battery);
        assert_eq!(balance.battery_charged, Energy(20.0));
        assert_eq!(balance.grid_sold, Energy(20.0));
        assert_eq!(battery.stored(), Energy(100.0));
    }

    #[test]
    fn test_with_charge_clamps() {
        assert_eq!(
            BatteryState::with_charge(Energy(50.0), Energy(80.0)).stored(),
            Energy(50.0)
        );
        assert_eq!(
            BatteryState::with_charge(Energy(50.0), Energy(-1.0)).stored(),
            Energy(0.0)
        );
    }

    #[rstest]
    #[case(0.0, 0.0, 0.0, 0.0)]
    #[case(100.0, 40.0, 30.0, 70.0)]
    #[case(100.0, 0.0, 210.0, 0.0)]
    #[case(100.0, 100.0, 0.0, 400.0)]
    #[case(55.5, 20.25, 17.125, 3.5)]
    #[case(0.0, 0.0, 90.0, 12.0)]
    fn test_energy_conserved(
        #[case] capacity: f64,
        #[case] stored: f64,
        #[case] load: f64,
        #[case] solar: f64,
    ) {
        let mut battery = BatteryState::with_charge(Energy(capacity), Energy(stored));
        let before = battery.stored();
        let balance = balance_hour(Energy(load), Energy(solar), &mut battery);

        // Load is met in full from solar, battery and grid
        assert_approx_eq!(
            Energy,
            balance.solar_used + balance.battery_discharged + balance.grid_bought,
            Energy(load),
            epsilon = 1e-9
        );

        // Solar output is used, stored or sold
        assert_approx_eq!(
            Energy,
            balance.solar_used + balance.battery_charged + balance.grid_sold,
            Energy(solar),
            epsilon = 1e-9
        );

        // Battery only changes by what went in and out
        assert_approx_eq!(
            Energy,
            before + balance.battery_charged - balance.battery_discharged,
            battery.stored(),
            epsilon = 1e-9
        );

        assert!(battery.stored() >= Energy(0.0));
        assert!(battery.stored() <= battery.capacity());
    }
}

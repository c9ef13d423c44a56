//! The queue of vehicles waiting to be charged.
use crate::units::Energy;
use std::collections::VecDeque;

/// A vehicle waiting at the park, identified only by how much energy it still needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargeRequest {
    /// Energy still to be delivered before the vehicle leaves
    pub remaining: Energy,
}

/// First-come, first-served queue of charge requests.
///
/// Every request in the queue needs a strictly positive amount of energy: requests leave the
/// queue as soon as they are fully served.
#[derive(Debug, Clone, Default)]
pub struct ChargingQueue {
    requests: VecDeque<ChargeRequest>,
}

impl ChargingQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a newly arrived vehicle to the back of the queue.
    ///
    /// Vehicles which need no energy never join the queue.
    pub fn push(&mut self, demand: Energy) {
        if demand > Energy(0.0) {
            self.requests.push_back(ChargeRequest { remaining: demand });
        }
    }

    /// Add `count` vehicles, each needing `demand`
    pub fn push_many(&mut self, count: u32, demand: Energy) {
        for _ in 0..count {
            self.push(demand);
        }
    }

    /// Deliver up to `capacity` of energy to waiting vehicles, in arrival order.
    ///
    /// Vehicles at the front are charged completely and leave until the capacity runs out. The
    /// first vehicle which cannot be finished takes whatever is left and stays at the front.
    ///
    /// # Returns
    ///
    /// The energy delivered
    pub fn serve(&mut self, capacity: Energy) -> Energy {
        let mut available = capacity;
        let mut used = Energy(0.0);

        while available > Energy(0.0) {
            let Some(front) = self.requests.front_mut() else {
                break;
            };

            if front.remaining <= available {
                available -= front.remaining;
                used += front.remaining;
                self.requests.pop_front();
            } else {
                front.remaining -= available;
                used += available;
                available = Energy(0.0);
            }
        }

        used
    }

    /// Number of vehicles waiting
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether no vehicles are waiting
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Total energy still owed to waiting vehicles
    pub fn outstanding(&self) -> Energy {
        self.requests.iter().map(|request| request.remaining).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    fn queue_with(demands: &[f64]) -> ChargingQueue {
        let mut queue = ChargingQueue::new();
        for &demand in demands {
            queue.push(Energy(demand));
        }
        queue
    }

    fn remaining(queue: &ChargingQueue) -> Vec<f64> {
        queue.requests.iter().map(|request| request.remaining.value()).collect()
    }

    #[test]
    fn test_single_vehicle_fully_served() {
        // Two 175 kW chargers, one vehicle needing 30 kWh
        let mut queue = queue_with(&[30.0]);
        assert_eq!(queue.serve(Energy(350.0)), Energy(30.0));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_partial_service_stays_at_front() {
        let mut queue = queue_with(&[30.0, 30.0, 30.0]);
        assert_eq!(queue.serve(Energy(50.0)), Energy(50.0));
        assert_eq!(remaining(&queue), [10.0, 30.0]);

        // The partly charged vehicle is finished first next hour
        assert_eq!(queue.serve(Energy(15.0)), Energy(15.0));
        assert_eq!(remaining(&queue), [25.0]);
    }

    #[test]
    fn test_exact_capacity_serves_fully() {
        let mut queue = queue_with(&[30.0, 30.0]);
        assert_eq!(queue.serve(Energy(30.0)), Energy(30.0));
        assert_eq!(remaining(&queue), [30.0]);
    }

    #[test]
    fn test_zero_capacity() {
        let mut queue = queue_with(&[30.0, 30.0]);
        assert_eq!(queue.serve(Energy(0.0)), Energy(0.0));
        assert_eq!(remaining(&queue), [30.0, 30.0]);
    }

    #[test]
    fn test_empty_queue() {
        let mut queue = ChargingQueue::new();
        assert_eq!(queue.serve(Energy(350.0)), Energy(0.0));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_zero_demand_not_queued() {
        let mut queue = ChargingQueue::new();
        queue.push_many(3, Energy(0.0));
        assert!(queue.is_empty());
    }

    #[rstest]
    #[case(&[30.0; 20], 350.0)]
    #[case(&[12.5, 40.0, 7.25, 30.0], 20.0)]
    #[case(&[100.0, 1.0], 0.0)]
    #[case(&[], 50.0)]
    fn test_outstanding_drops_by_energy_used(#[case] demands: &[f64], #[case] capacity: f64) {
        let mut queue = queue_with(demands);
        for _ in 0..5 {
            let before = queue.outstanding();
            let used = queue.serve(Energy(capacity));
            assert!(used <= Energy(capacity));
            assert_approx_eq!(Energy, before - used, queue.outstanding(), epsilon = 1e-9);
            assert!(queue.requests.iter().all(|request| request.remaining > Energy(0.0)));
        }
    }
}

use crate::{
    prelude::*,
    quantity::{energy::KilowattHours, power::Watts},
};

/// Reconstructs a monotonic lifetime energy from the daily energy counter.
///
/// The device lifetime counter is only used once, as the initial total. After that, the total
/// grows by the daily counter increments observed while the inverter is producing.
#[must_use]
#[derive(Copy, Clone, Debug, Default)]
pub struct LifetimeEnergy(Option<State>);

#[derive(Copy, Clone, Debug)]
struct State {
    previous_daily: KilowattHours,
    total: KilowattHours,
}

impl LifetimeEnergy {
    /// Start from the known lifetime total at the beginning of the current day.
    pub const fn seeded(total: KilowattHours) -> Self {
        Self(Some(State { previous_daily: KilowattHours::ZERO, total }))
    }

    /// Feed the readings of one successful poll cycle and get the rounded total, if known.
    ///
    /// Returns [`None`] until the daily counter has been observed at least once.
    pub fn update(
        &mut self,
        daily: Option<KilowattHours>,
        device_lifetime: Option<KilowattHours>,
        power: Watts,
    ) -> Option<KilowattHours> {
        if let Some(daily) = daily {
            match &mut self.0 {
                None => {
                    let total = device_lifetime.unwrap_or(KilowattHours::ZERO);
                    info!(?daily, ?total, "initialized the lifetime energy");
                    self.0 = Some(State { previous_daily: daily, total });
                }
                Some(state) if daily > state.previous_daily => {
                    if power.is_producing() {
                        state.total += daily - state.previous_daily;
                    } else {
                        debug!(?daily, previous = ?state.previous_daily, "ignoring a rise without production");
                    }
                    state.previous_daily = daily;
                }
                Some(state) if daily < state.previous_daily => {
                    debug!(?daily, previous = ?state.previous_daily, "daily counter reset");
                    state.previous_daily = daily;
                }
                Some(_) => {}
            }
        }
        self.total()
    }

    /// Current total rounded to watt-hours.
    pub fn total(&self) -> Option<KilowattHours> {
        self.0.map(|state| state.total.round_to_watt_hours())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn kwh(value: f64) -> Option<KilowattHours> {
        Some(KilowattHours(value))
    }

    #[test]
    fn seeded_sequence_ok() {
        let mut lifetime = LifetimeEnergy::seeded(KilowattHours(100.0));
        let readings = [(5.0, 10.0), (8.0, 10.0), (8.0, 0.0), (2.0, 10.0), (2.0, 0.0), (6.0, 0.0)];
        let totals: Vec<_> = readings
            .into_iter()
            .map(|(daily, power)| lifetime.update(kwh(daily), None, Watts(power)))
            .collect();
        assert_eq!(
            totals,
            [kwh(105.0), kwh(108.0), kwh(108.0), kwh(108.0), kwh(108.0), kwh(108.0)],
        );
    }

    #[test]
    fn spurious_rise_advances_baseline() {
        let mut lifetime = LifetimeEnergy::seeded(KilowattHours(100.0));
        lifetime.update(kwh(6.0), None, Watts::ZERO);
        // Production resumes from the new baseline, the spurious 6 kWh is never counted:
        assert_eq!(lifetime.update(kwh(7.0), None, Watts(500.0)), kwh(101.0));
    }

    #[test]
    fn initializes_from_device_lifetime() {
        let mut lifetime = LifetimeEnergy::default();
        assert_eq!(lifetime.total(), None);
        assert_eq!(lifetime.update(None, kwh(5200.0), Watts(4500.0)), None);
        assert_eq!(lifetime.update(kwh(12.5), kwh(5200.0), Watts(4500.0)), kwh(5200.0));
        assert_eq!(lifetime.update(kwh(13.0), kwh(5201.0), Watts(4500.0)), kwh(5200.5));
    }

    #[test]
    fn initializes_to_zero_without_device_lifetime() {
        let mut lifetime = LifetimeEnergy::default();
        assert_eq!(lifetime.update(kwh(3.0), None, Watts::ZERO), kwh(0.0));
    }

    #[test]
    fn device_lifetime_is_seed_only() {
        let mut lifetime = LifetimeEnergy::default();
        lifetime.update(kwh(1.0), kwh(50.0), Watts(100.0));
        assert_eq!(lifetime.update(kwh(1.0), kwh(900.0), Watts(100.0)), kwh(50.0));
    }

    #[test]
    fn missing_daily_keeps_total() {
        let mut lifetime = LifetimeEnergy::seeded(KilowattHours(10.0));
        lifetime.update(kwh(2.0), None, Watts(100.0));
        assert_eq!(lifetime.update(None, None, Watts(100.0)), kwh(12.0));
    }

    #[test]
    fn repeated_readings_are_idempotent() {
        let mut lifetime = LifetimeEnergy::seeded(KilowattHours::ZERO);
        let first = lifetime.update(kwh(4.2), None, Watts(800.0));
        for _ in 0..10 {
            assert_eq!(lifetime.update(kwh(4.2), None, Watts(800.0)), first);
        }
    }

    #[test]
    fn rounds_to_watt_hours() {
        let mut lifetime = LifetimeEnergy::seeded(KilowattHours::ZERO);
        let total = lifetime.update(kwh(0.123_456), None, Watts(1.0)).unwrap();
        assert_abs_diff_eq!(total.0, 0.123, epsilon = 1e-9);
    }

    #[test]
    fn never_decreases() {
        // Deterministic pseudo-random walk over glitches, resets, and idle periods:
        let mut lifetime = LifetimeEnergy::default();
        let mut seed: u64 = 0x5EED;
        let mut previous_total = KilowattHours::ZERO;
        for _ in 0..10_000 {
            seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
            #[expect(clippy::cast_precision_loss)]
            let daily = ((seed >> 33) % 5000) as f64 / 100.0;
            let power = if (seed >> 13) % 3 == 0 { Watts::ZERO } else { Watts(1000.0) };
            let daily = if (seed >> 7) % 11 == 0 { None } else { kwh(daily) };
            if let Some(total) = lifetime.update(daily, kwh(42.0), power) {
                assert!(total >= previous_total, "{total:?} < {previous_total:?}");
                previous_total = total;
            }
        }
    }
}

quantity!(
    /// Energy as the inverter reports it in the `ET` and `EG` readings.
    KilowattHours, via: f64, suffix: "kWh", precision: 3
);

impl KilowattHours {
    /// Round to the nearest watt-hour, which is the resolution of the published totals.
    pub fn round_to_watt_hours(self) -> Self {
        Self((self.0 * 1000.0).round() / 1000.0)
    }
}

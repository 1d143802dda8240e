quantity!(Watts, via: f64, suffix: "W", precision: 0);

impl Watts {
    /// Whether the inverter is feeding anything into the grid.
    pub fn is_producing(self) -> bool {
        self > Self::ZERO
    }
}

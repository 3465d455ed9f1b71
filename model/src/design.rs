use crate::part::Part;

/// Standard gravity used for the thrust to weight ratio
pub const GRAVITY: f32 = 9.81;

/// Aggregated figures of an assembled rocket
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct DesignStats {
    pub part_count: usize,
    pub total_mass: f32,
    pub total_thrust: f32,
    pub fuel_capacity: f32,
    /// Fuel burnt per second with every engine running
    pub fuel_consumption: f32,
}

impl DesignStats {
    pub fn measure<'a>(parts: impl IntoIterator<Item = &'a Part>) -> Self {
        parts.into_iter().fold(Self::default(), |stats, part| Self {
            part_count: stats.part_count + 1,
            total_mass: stats.total_mass + part.mass(),
            total_thrust: stats.total_thrust + part.thrust(),
            fuel_capacity: stats.fuel_capacity + part.fuel_capacity(),
            fuel_consumption: stats.fuel_consumption + part.fuel_consumption(),
        })
    }

    pub fn thrust_to_weight(&self) -> f32 {
        if self.total_mass > 0.0 {
            self.total_thrust / (self.total_mass * GRAVITY)
        } else {
            0.0
        }
    }

    /// Seconds until the tanks run dry at full throttle, `None` without engines
    pub fn burn_time(&self) -> Option<f32> {
        (self.fuel_consumption > 0.0).then(|| self.fuel_capacity / self.fuel_consumption)
    }
}

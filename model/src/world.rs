use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::units::{WorldPoint, WorldVector};

/// Static body of the flight map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    pub name: String,
    pub position: WorldPoint,
    pub radius: f32,
    /// Linear RGB
    pub color: [f32; 3],
}

impl Planet {
    pub fn new(
        name: impl Into<String>,
        position: WorldPoint,
        radius: f32,
        color: [f32; 3],
    ) -> Self {
        Self {
            name: name.into(),
            position,
            radius,
            color,
        }
    }

    pub fn label(&self) -> &str {
        &self.name
    }

    /// Topmost point of the planet's surface
    pub fn surface_top(&self) -> f32 {
        self.position.y - self.radius
    }
}

/// Rock drifting at a constant velocity, the map has no bounds
#[derive(Debug, Clone, PartialEq)]
pub struct Asteroid {
    pub position: WorldPoint,
    pub velocity: WorldVector,
    pub radius: f32,
}

impl Asteroid {
    pub fn drift(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }
}

/// Background decoration
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub position: WorldPoint,
    /// In `0..=1`
    pub brightness: f32,
}

/// Index of the planet the next flight starts from
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Resource)]
pub struct LaunchSite(usize);

impl LaunchSite {
    pub fn index(&self) -> usize {
        self.0
    }

    /// Moves to the next of `planet_count` planets, wrapping around
    pub fn cycle(&mut self, planet_count: usize) {
        if planet_count == 0 {
            self.0 = 0;
        } else {
            self.0 = (self.0 + 1) % planet_count;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn planet<'a>(&self, planets: &'a [Planet]) -> Option<&'a Planet> {
        planets.get(self.0)
    }
}

use std::collections::VecDeque;

use bevy::prelude::Resource;
use rand::rngs::StdRng;
use rand::Rng;
use rocketry_core::model::part::Part;
use rocketry_core::model::settings::{FlightSettings, WorldSettings};
use rocketry_core::model::units::{wrap_degrees, ScreenSize, WorldPoint, WorldSpace, WorldVector};
use rocketry_core::model::world::{Asteroid, LaunchSite, Planet, Star};

use crate::field::{scatter_asteroids, scatter_stars};
use crate::launch::{footprint, spawn_point, Footprint};

/// Kinematic state of the rocket
#[derive(Debug, Clone, PartialEq)]
pub struct Ship {
    pub position: WorldPoint,
    pub velocity: WorldVector,
    /// Degrees, 0 points up and growing values turn left
    pub heading: f32,
    pub time_multiplier: f32,
}

impl Ship {
    pub fn at(position: WorldPoint) -> Self {
        Self {
            position,
            velocity: WorldVector::zero(),
            heading: 0.0,
            time_multiplier: 1.0,
        }
    }

    pub fn forward(&self) -> WorldVector {
        let heading = self.heading.to_radians();
        WorldVector::new(-heading.sin(), -heading.cos())
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// Controls held during a frame
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FlightInput {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub thrust: bool,
    pub boost: bool,
    pub warp_up: bool,
    pub warp_down: bool,
}

/// Recent ship positions, oldest first
#[derive(Debug, Clone)]
pub struct Trail {
    points: VecDeque<WorldPoint>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, point: WorldPoint) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &WorldPoint> + ExactSizeIterator {
        self.points.iter()
    }
}

/// Everything a running flight owns
///
/// The parts are a snapshot of the finished design, drawn as one rigid body
/// around the ship origin and never edited while flying.
#[derive(Debug, Resource)]
pub struct FlightModel {
    ship: Ship,
    settings: FlightSettings,
    footprint: Footprint,
    parts: Vec<Part>,
    planets: Vec<Planet>,
    asteroids: Vec<Asteroid>,
    stars: Vec<Star>,
    trail: Trail,
    shake: f32,
    jitter: WorldVector,
    rng: StdRng,
}

impl FlightModel {
    /// Places the design on the launch site, at rest and pointing up
    pub fn launch(
        parts: Vec<Part>,
        site: LaunchSite,
        flight: &FlightSettings,
        world: &WorldSettings,
        mut rng: StdRng,
    ) -> Self {
        let footprint = footprint(&parts, flight.default_footprint);
        let position = site
            .planet(&world.planets)
            .map(|planet| spawn_point(planet, &footprint, flight.launch_margin))
            .unwrap_or_else(WorldPoint::origin);
        let mut ship = Ship::at(position);
        ship.time_multiplier = 1.0f32.max(flight.warp_floor).min(flight.warp_ceiling);

        let asteroids = scatter_asteroids(&mut rng, world);
        let stars = scatter_stars(&mut rng, world);
        Self {
            ship,
            settings: flight.clone(),
            footprint,
            parts,
            planets: world.planets.clone(),
            asteroids,
            stars,
            trail: Trail::new(flight.trail_capacity),
            shake: 0.0,
            jitter: WorldVector::zero(),
            rng,
        }
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn planets(&self) -> &[Planet] {
        &self.planets
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn shake(&self) -> f32 {
        self.shake
    }

    /// Advances the flight by one frame of `dt_real` wall clock seconds
    pub fn step(&mut self, dt_real: f32, input: &FlightInput) {
        let settings = &self.settings;
        let ship = &mut self.ship;
        let dt = dt_real * ship.time_multiplier;

        let turn = match (input.rotate_left, input.rotate_right) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        };
        ship.heading = wrap_degrees(ship.heading + turn * settings.rotation_speed * dt);

        let forward = ship.forward();
        if input.thrust {
            ship.velocity += forward * settings.thrust_acc * dt;
        }
        if input.boost {
            ship.velocity += forward * settings.boost_acc * dt;
            self.shake = self.shake.max(settings.boost_shake);
        }

        let speed = ship.speed();
        if speed > settings.max_speed {
            ship.velocity = ship.velocity * (settings.max_speed / speed);
        }
        ship.position += ship.velocity * dt;

        if input.warp_up {
            ship.time_multiplier += settings.warp_rate * dt_real;
        }
        if input.warp_down {
            ship.time_multiplier -= settings.warp_rate * dt_real;
        }
        ship.time_multiplier = ship
            .time_multiplier
            .max(settings.warp_floor)
            .min(settings.warp_ceiling);

        for asteroid in &mut self.asteroids {
            asteroid.drift(dt);
        }
        self.trail.push(ship.position);

        self.jitter = if self.shake > 0.0 {
            WorldVector::new(
                self.rng.gen_range(-self.shake..=self.shake),
                self.rng.gen_range(-self.shake..=self.shake),
            )
        } else {
            WorldVector::zero()
        };
        self.shake = (self.shake - settings.shake_decay).max(0.0);
    }

    /// World position of the viewport's top left corner, keeping the ship
    /// centered
    pub fn camera_offset(&self, viewport: ScreenSize) -> WorldPoint {
        self.ship.position - viewport.cast_unit::<WorldSpace>().to_vector() / 2.0 + self.jitter
    }
}

use bevy::prelude::Resource;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::units::{BuildPoint, BuildRect, BuildSize, WorldPoint, WorldSize};
use crate::world::Planet;

/// Tunables of the whole game, read once at startup
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct Settings {
    pub build: BuildSettings,
    pub flight: FlightSettings,
    pub world: WorldSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Top left corner of the build area, in window pixels
    pub area_origin: BuildPoint,
    pub area_size: BuildSize,
    /// Allowed snap granularities, the first one is active at startup
    pub grid_sizes: Vec<f32>,
    pub panel: PanelSettings,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            area_origin: BuildPoint::new(160.0, 60.0),
            area_size: BuildSize::new(600.0, 600.0),
            grid_sizes: vec![10.0, 20.0, 40.0],
            panel: Default::default(),
        }
    }
}

impl BuildSettings {
    pub fn area(&self) -> BuildRect {
        BuildRect::new(self.area_origin, self.area_size)
    }
}

/// Layout of the catalog column left of the build area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSettings {
    pub origin: BuildPoint,
    pub slot_size: BuildSize,
    pub spacing: f32,
    /// Extra space between two part kinds
    pub group_gap: f32,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            origin: BuildPoint::new(10.0, 60.0),
            slot_size: BuildSize::new(130.0, 40.0),
            spacing: 4.0,
            group_gap: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightSettings {
    /// Degrees per second
    pub rotation_speed: f32,
    pub thrust_acc: f32,
    pub boost_acc: f32,
    pub max_speed: f32,
    pub warp_floor: f32,
    pub warp_ceiling: f32,
    /// Change of the time multiplier per real second while a warp key is held
    pub warp_rate: f32,
    pub trail_capacity: usize,
    /// Shake magnitude removed every frame
    pub shake_decay: f32,
    pub boost_shake: f32,
    /// Gap between the planet surface and the bottom of a freshly launched rocket
    pub launch_margin: f32,
    /// Footprint of a rocket without parts
    pub default_footprint: WorldSize,
}

impl Default for FlightSettings {
    fn default() -> Self {
        Self {
            rotation_speed: 180.0,
            thrust_acc: 200.0,
            boost_acc: 450.0,
            max_speed: 600.0,
            warp_floor: 0.1,
            warp_ceiling: 10.0,
            warp_rate: 2.0,
            trail_capacity: 240,
            shake_decay: 0.5,
            boost_shake: 4.0,
            launch_margin: 20.0,
            default_footprint: WorldSize::new(40.0, 100.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// The first planet is the default launch site
    pub planets: Vec<Planet>,
    pub asteroid_count: usize,
    pub asteroid_radius: [f32; 2],
    pub asteroid_speed: [f32; 2],
    pub star_count: usize,
    /// Region asteroids and stars are scattered over
    pub field_min: WorldPoint,
    pub field_max: WorldPoint,
    /// Fixed seed for the asteroid field, random when missing
    pub seed: Option<u64>,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            planets: vec![
                Planet::new("Earth", WorldPoint::new(0.0, 0.0), 300.0, [0.2, 0.45, 0.9]),
                Planet::new("Moon", WorldPoint::new(1800.0, -900.0), 80.0, [0.7, 0.7, 0.7]),
                Planet::new("Mars", WorldPoint::new(-2500.0, -3000.0), 200.0, [0.85, 0.35, 0.2]),
                Planet::new("Jupiter", WorldPoint::new(5000.0, -6000.0), 700.0, [0.9, 0.7, 0.45]),
            ],
            asteroid_count: 40,
            asteroid_radius: [8.0, 30.0],
            asteroid_speed: [5.0, 40.0],
            star_count: 400,
            field_min: WorldPoint::new(-6000.0, -9000.0),
            field_max: WorldPoint::new(8000.0, 3000.0),
            seed: None,
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum SettingsError {
    #[error("Could not parse the settings: {0}")]
    #[diagnostic(code(model::settings::parse))]
    Parse(#[from] serde_json5::Error),
    #[error("`{field}` is too large, got {got} where at most {limit} is expected.")]
    #[diagnostic(code(model::settings::too_large))]
    ValueTooLarge {
        field: &'static str,
        limit: f64,
        got: f64,
    },
    #[error("`{field}` is too small, got {got} where at least {limit} is expected.")]
    #[diagnostic(code(model::settings::too_small))]
    ValueTooSmall {
        field: &'static str,
        limit: f64,
        got: f64,
    },
    #[error("At least one planet is required")]
    #[diagnostic(code(model::settings::no_planets))]
    NoPlanets,
}

impl Settings {
    /// Parses a JSON5 document, missing fields take their default values
    pub fn from_json5(text: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json5::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let build = &self.build;
        above("build.area_size.width", build.area_size.width, 0.0)?;
        above("build.area_size.height", build.area_size.height, 0.0)?;
        at_least("build.grid_sizes", build.grid_sizes.len() as f32, 1.0)?;
        for size in &build.grid_sizes {
            above("build.grid_sizes", *size, 0.0)?;
        }
        above("build.panel.slot_size.width", build.panel.slot_size.width, 0.0)?;
        above("build.panel.slot_size.height", build.panel.slot_size.height, 0.0)?;
        at_least("build.panel.spacing", build.panel.spacing, 0.0)?;
        at_least("build.panel.group_gap", build.panel.group_gap, 0.0)?;

        let flight = &self.flight;
        at_least("flight.rotation_speed", flight.rotation_speed, 0.0)?;
        at_least("flight.thrust_acc", flight.thrust_acc, 0.0)?;
        at_least("flight.boost_acc", flight.boost_acc, 0.0)?;
        above("flight.max_speed", flight.max_speed, 0.0)?;
        above("flight.warp_floor", flight.warp_floor, 0.0)?;
        at_least("flight.warp_ceiling", flight.warp_ceiling, flight.warp_floor)?;
        at_least("flight.warp_rate", flight.warp_rate, 0.0)?;
        at_least("flight.shake_decay", flight.shake_decay, 0.0)?;
        at_least("flight.boost_shake", flight.boost_shake, 0.0)?;
        at_least("flight.launch_margin", flight.launch_margin, 0.0)?;
        above("flight.default_footprint.width", flight.default_footprint.width, 0.0)?;
        above("flight.default_footprint.height", flight.default_footprint.height, 0.0)?;

        let world = &self.world;
        if world.planets.is_empty() {
            return Err(SettingsError::NoPlanets);
        }
        for planet in &world.planets {
            above("world.planets.radius", planet.radius, 0.0)?;
        }
        above("world.asteroid_radius", world.asteroid_radius[0], 0.0)?;
        at_least("world.asteroid_radius", world.asteroid_radius[1], world.asteroid_radius[0])?;
        at_least("world.asteroid_speed", world.asteroid_speed[0], 0.0)?;
        at_least("world.asteroid_speed", world.asteroid_speed[1], world.asteroid_speed[0])?;
        above("world.field_max.x", world.field_max.x, world.field_min.x)?;
        above("world.field_max.y", world.field_max.y, world.field_min.y)?;
        Ok(())
    }
}

fn at_least(field: &'static str, value: f32, limit: f32) -> Result<(), SettingsError> {
    // NaN fails this comparison too
    if !(value >= limit) {
        return Err(SettingsError::ValueTooSmall {
            field,
            limit: limit as f64,
            got: value as f64,
        });
    }
    Ok(())
}

fn above(field: &'static str, value: f32, limit: f32) -> Result<(), SettingsError> {
    if !(value > limit) {
        return Err(SettingsError::ValueTooSmall {
            field,
            limit: limit as f64,
            got: value as f64,
        });
    }
    if !value.is_finite() {
        return Err(SettingsError::ValueTooLarge {
            field,
            limit: f32::MAX as f64,
            got: value as f64,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Settings::default().validate().unwrap();
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let settings = Settings::from_json5(
            r#"{
                flight: { max_speed: 900, warp_floor: 0.25 },
                build: { grid_sizes: [25, 50] },
            }"#,
        )
        .unwrap();

        assert_eq!(settings.flight.max_speed, 900.0);
        assert_eq!(settings.flight.warp_floor, 0.25);
        assert_eq!(settings.flight.thrust_acc, FlightSettings::default().thrust_acc);
        assert_eq!(settings.build.grid_sizes, vec![25.0, 50.0]);
        assert_eq!(settings.build.area_origin, BuildPoint::new(160.0, 60.0));
        assert_eq!(settings.world, WorldSettings::default());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err =
            Settings::from_json5("{ flight: { warp_floor: 2, warp_ceiling: 1 } }").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::ValueTooSmall {
                field: "flight.warp_ceiling",
                ..
            }
        ));

        let err = Settings::from_json5("{ build: { grid_sizes: [] } }").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::ValueTooSmall {
                field: "build.grid_sizes",
                ..
            }
        ));
    }

    #[test]
    fn rejects_world_without_planets() {
        let err = Settings::from_json5("{ world: { planets: [] } }").unwrap_err();
        assert!(matches!(err, SettingsError::NoPlanets));
    }

    #[test]
    fn planets_are_configurable() {
        let settings = Settings::from_json5(
            r#"{ world: { planets: [
                { name: "Kerbin", position: [10, -20], radius: 120, color: [0.1, 0.8, 0.2] },
            ] } }"#,
        )
        .unwrap();
        let planet = &settings.world.planets[0];
        assert_eq!(planet.name, "Kerbin");
        assert_eq!(planet.position, WorldPoint::new(10.0, -20.0));
        assert_eq!(planet.radius, 120.0);
    }
}

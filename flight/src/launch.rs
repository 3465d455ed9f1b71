use rocketry_core::model::part::Part;
use rocketry_core::model::units::{WorldPoint, WorldSize};
use rocketry_core::model::world::Planet;

/// Local bounding box of the rocket, fixed for the whole flight
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Footprint {
    /// Top left corner, in build coordinates carried over to the ship frame
    pub origin: WorldPoint,
    pub size: WorldSize,
}

/// Union of all part bounds, or `default` when nothing was placed
pub fn footprint(parts: &[Part], default: WorldSize) -> Footprint {
    let mut bounds = parts.iter().map(Part::bounds);
    let Some(first) = bounds.next() else {
        return Footprint {
            origin: WorldPoint::origin(),
            size: default,
        };
    };
    let union = bounds.fold(first, |acc, rect| acc.union(&rect));
    Footprint {
        origin: union.origin.cast_unit(),
        size: union.size.cast_unit(),
    }
}

/// Ship origin right above the planet's top, leaving `margin` below the rocket
pub fn spawn_point(planet: &Planet, footprint: &Footprint, margin: f32) -> WorldPoint {
    WorldPoint::new(
        planet.position.x,
        planet.surface_top() - footprint.size.height / 2.0 - margin,
    )
}

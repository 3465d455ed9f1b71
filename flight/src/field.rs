use rand::Rng;
use rocketry_core::model::settings::WorldSettings;
use rocketry_core::model::units::{WorldPoint, WorldVector};
use rocketry_core::model::world::{Asteroid, Star};

fn scatter_point(rng: &mut impl Rng, world: &WorldSettings) -> WorldPoint {
    WorldPoint::new(
        rng.gen_range(world.field_min.x..=world.field_max.x),
        rng.gen_range(world.field_min.y..=world.field_max.y),
    )
}

/// Asteroids spread over the field, each drifting in a random direction
pub fn scatter_asteroids(rng: &mut impl Rng, world: &WorldSettings) -> Vec<Asteroid> {
    let [min_radius, max_radius] = world.asteroid_radius;
    let [min_speed, max_speed] = world.asteroid_speed;
    (0..world.asteroid_count)
        .map(|_| {
            let position = scatter_point(rng, world);
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let speed = rng.gen_range(min_speed..=max_speed);
            Asteroid {
                position,
                velocity: WorldVector::new(angle.cos(), angle.sin()) * speed,
                radius: rng.gen_range(min_radius..=max_radius),
            }
        })
        .collect()
}

pub fn scatter_stars(rng: &mut impl Rng, world: &WorldSettings) -> Vec<Star> {
    (0..world.star_count)
        .map(|_| Star {
            position: scatter_point(rng, world),
            brightness: rng.gen_range(0.2..=1.0),
        })
        .collect()
}
